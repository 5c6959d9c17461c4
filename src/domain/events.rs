//! Discrete Tracker Events
//!
//! Decodes vendor event tuples and writes one log line per recognized event.

use crate::domain::models::{RawEvent, TrackerEvent};
use crate::infrastructure::tracker::protocol::event_kind;
use tracing::{info, trace};

impl TrackerEvent {
    /// Decode a raw vendor event. Unknown kinds yield `None`.
    pub fn decode(raw: &RawEvent) -> Option<TrackerEvent> {
        let first = raw.args.first().copied();
        let event = match raw.kind {
            event_kind::BLINK => TrackerEvent::Blink {
                timestamp: raw.timestamp,
                duration: first?,
            },
            event_kind::EYE_CLOSED => TrackerEvent::EyeClosed {
                timestamp: raw.timestamp,
                eye_index: first? as u32,
            },
            event_kind::EYE_OPENED => TrackerEvent::EyeOpened {
                timestamp: raw.timestamp,
                eye_index: first? as u32,
            },
            _ => return None,
        };
        Some(event)
    }

    pub fn log_line(&self) -> String {
        match self {
            TrackerEvent::Blink {
                timestamp,
                duration,
            } => format!("Got blink: {} {}", timestamp, duration),
            TrackerEvent::EyeClosed {
                timestamp,
                eye_index,
            } => format!("Eye Close: {} {}", timestamp, eye_index),
            TrackerEvent::EyeOpened {
                timestamp,
                eye_index,
            } => format!("Eye Open: {} {}", timestamp, eye_index),
        }
    }
}

/// Log a discrete event. Returns the decoded event, if any.
pub fn handle_event(raw: &RawEvent) -> Option<TrackerEvent> {
    let event = TrackerEvent::decode(raw);
    match &event {
        Some(event) => info!("{}", event.log_line()),
        None => trace!(kind = raw.kind, args = raw.args.len(), "Ignoring event"),
    }
    event
}
