mod client;
pub mod models;
pub mod parser;
pub mod rules;

pub use client::CalDavClient;
pub use models::Event;
pub use parser::{extract_field, parse_event, parse_events, split_event_blocks, Events, Field};
pub use rules::{evaluate, NotificationDecision, TriggerWindow};
