//! Vendor Streaming API
//!
//! The seam between the adapter and whatever binds the tracker SDK. The
//! vendor runtime owns the transport and invokes registered handlers from its
//! own thread.

use crate::domain::models::{EyeTrackingSample, RawEvent};
use crate::infrastructure::tracker::protocol::{
    AckCode, EventControlBit, EyeTrackingStreamType, PacketType,
};
use std::sync::Arc;
use thiserror::Error;

pub type SampleHandler = Arc<dyn Fn(&EyeTrackingSample) + Send + Sync>;
pub type EventHandler = Arc<dyn Fn(&RawEvent) + Send + Sync>;
pub type LifecycleHandler = Arc<dyn Fn() + Send + Sync>;

/// One-shot completion for a configuration call
pub type Completion = Box<dyn FnOnce(AckCode) + Send>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("session not started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
}

/// Handler for one stream packet family
#[derive(Clone)]
pub enum StreamHandler {
    EyeTracking(SampleHandler),
    Events(EventHandler),
}

impl StreamHandler {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Self::EyeTracking(_) => PacketType::EyeTrackingStream,
            Self::Events(_) => PacketType::Events,
        }
    }
}

/// Connect and disconnect hooks passed to [`TrackerApi::start`]
#[derive(Clone)]
pub struct LifecycleCallbacks {
    pub on_connect: LifecycleHandler,
    pub on_disconnect: LifecycleHandler,
}

/// A streaming session with one tracker
pub trait TrackerApi: Send + Sync {
    /// Register the handler for a packet family, replacing any previous one
    fn register_stream_handler(&self, handler: StreamHandler);

    /// Begin the session. Returns once the session is running; connection
    /// is reported later through `callbacks`.
    fn start(&self, callbacks: LifecycleCallbacks) -> Result<(), TrackerError>;

    /// End the session and drop every registered handler
    fn shutdown(&self) -> Result<(), TrackerError>;

    fn set_et_stream_rate(&self, rate_hz: f32, done: Completion);

    fn set_et_stream_control(
        &self,
        streams: &[EyeTrackingStreamType],
        enable: bool,
        done: Completion,
    );

    fn set_event_control(&self, bit: EventControlBit, enable: bool, done: Completion);
}

/// Opens sessions with trackers addressed by device name
pub trait TrackerConnector: Send + Sync {
    fn open(&self, device_name: &str) -> Result<Arc<dyn TrackerApi>, TrackerError>;
}
