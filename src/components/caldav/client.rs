use crate::components::CalendarFetcher;
use crate::config::Config;
use crate::error::{fetch_error, NotifierResult};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, info};

/// CalDAV `calendar-query` selecting the VEVENT properties the parser reads
pub const CALENDAR_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <C:calendar-data>
      <C:comp name="VCALENDAR">
        <C:prop name="VERSION"/>
        <C:comp name="VEVENT">
          <C:prop name="UID"/>
          <C:prop name="SUMMARY"/>
          <C:prop name="DTSTART"/>
          <C:prop name="DTEND"/>
        </C:comp>
      </C:comp>
    </C:calendar-data>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VEVENT"/>
  </C:filter>
</C:calendar-query>"#;

/// Calendar fetcher that issues an authenticated REPORT against a CalDAV collection
#[derive(Debug, Clone)]
pub struct CalDavClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl CalDavClient {
    /// Create a client for the collection named in the config
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            url: config.caldav_server_url.clone(),
            username: config.caldav_username.clone(),
            password: config.caldav_password.clone(),
        }
    }

    fn report_method() -> NotifierResult<Method> {
        Method::from_bytes(b"REPORT")
            .map_err(|e| fetch_error(&format!("Invalid HTTP method: {}", e)))
    }
}

/// Statuses a CalDAV server answers a successful REPORT with
fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::MULTI_STATUS
}

#[async_trait]
impl CalendarFetcher for CalDavClient {
    async fn fetch(&self) -> NotifierResult<String> {
        info!("Querying calendar events from {}", self.url);

        let response = self
            .client
            .request(Self::report_method()?, &self.url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"))
            .header("Depth", "1")
            .body(CALENDAR_QUERY)
            .send()
            .await
            .map_err(|e| fetch_error(&format!("Failed to reach calendar server: {}", e)))?;

        let status = response.status();
        if !is_accepted(status) {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(fetch_error(&format!(
                "Calendar query failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(&format!("Failed to read calendar response: {}", e)))?;

        debug!("Calendar server returned {} bytes", body.len());
        Ok(body)
    }
}
