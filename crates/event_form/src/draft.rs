use serde::{Deserialize, Serialize};
use shared::domain::EventType;

/// Shown in the start/end time fields until a time has been confirmed.
pub const TIME_PLACEHOLDER: &str = "__:__";

/// The unsaved event being composed on the create-event screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub name: String,
    pub location: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub price: String,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub link: String,
    pub image_uri: String,
}

impl Default for DraftEvent {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            date: String::new(),
            start_time: TIME_PLACEHOLDER.to_string(),
            end_time: TIME_PLACEHOLDER.to_string(),
            description: String::new(),
            price: String::new(),
            event_type: None,
            link: String::new(),
            image_uri: String::new(),
        }
    }
}

impl DraftEvent {
    /// Text displayed in the read-only type field.
    pub fn type_label(&self) -> &'static str {
        self.event_type.map(EventType::name).unwrap_or_default()
    }
}
