use crate::{error::FormatError, format};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Payload of `GET /lastRain`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainEvent {
    pub timestamp: String,
}

/// What the view shows once a rain event has been loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    pub calendar_date: String,
    pub elapsed_label: String,
}

impl DisplayState {
    pub fn from_event(event: &RainEvent, now: OffsetDateTime) -> Result<Self, FormatError> {
        Ok(Self {
            calendar_date: format::calendar_date_label(&event.timestamp)?,
            elapsed_label: format::elapsed_label(&event.timestamp, now)?,
        })
    }
}
