//! Bridges a Bluetooth eye tracker's telemetry streams to an imagery sink.
//!
//! Samples from the tracker are normalized into a fixed-shape
//! [`TelemetryRecord`](domain::models::TelemetryRecord) and handed to an
//! [`ImagerySink`](infrastructure::sink::ImagerySink). Blink and eye open/close
//! events are written to the log.

pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::domain::models::{
        EyeCenter, EyeMask, EyeTrackingSample, Gaze, ImuQuaternion, PupilDiameter, RawEvent,
        TelemetryRecord, TrackerEvent, Vec3,
    };
    pub use crate::domain::settings::{Settings, SettingsService};
    pub use crate::infrastructure::sink::{ChannelSink, ImagerySink, JsonLinesSink, LogSink};
    pub use crate::infrastructure::tracker::api::{TrackerApi, TrackerConnector, TrackerError};
    pub use crate::infrastructure::tracker::{AdapterConfig, AdapterError, TelemetryAdapter};
}
