//! Telemetry Adapter
//!
//! Owns the tracker session, wires the vendor push callbacks to sample
//! normalization and event logging, and configures the device once it
//! reports a ready link.

use crate::domain::events::handle_event;
use crate::domain::models::{EyeTrackingSample, RawEvent};
use crate::domain::normalize::normalize;
use crate::domain::settings::Settings;
use crate::infrastructure::sink::ImagerySink;
use crate::infrastructure::tracker::api::{
    Completion, LifecycleCallbacks, LifecycleHandler, StreamHandler, TrackerApi,
    TrackerConnector, TrackerError,
};
use crate::infrastructure::tracker::protocol::{
    DEFAULT_DEVICE_NAME, DEFAULT_STREAM_RATE_HZ, ENABLED_EVENTS, ENABLED_STREAMS,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid adapter configuration: {0}")]
    InvalidConfig(String),
    #[error("adapter already started")]
    AlreadyStarted,
    #[error("adapter not started")]
    NotStarted,
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Configuration for the tracker session
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Name the tracker advertises over BLE
    pub device_name: String,
    /// Continuous stream rate requested on connect
    pub stream_rate_hz: f32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            stream_rate_hz: DEFAULT_STREAM_RATE_HZ,
        }
    }
}

impl AdapterConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            device_name: settings.device_name.clone(),
            stream_rate_hz: settings.stream_rate_hz,
        }
    }

    fn validate(&self) -> Result<(), AdapterError> {
        if self.device_name.trim().is_empty() {
            return Err(AdapterError::InvalidConfig(
                "device name must not be empty".to_string(),
            ));
        }
        if !self.stream_rate_hz.is_finite() || self.stream_rate_hz <= 0.0 {
            return Err(AdapterError::InvalidConfig(format!(
                "stream rate must be positive, got {}",
                self.stream_rate_hz
            )));
        }
        Ok(())
    }
}

struct Session {
    api: Arc<dyn TrackerApi>,
    // Cleared on shutdown so late vendor callbacks are dropped
    active: Arc<AtomicBool>,
}

/// Bridges tracker push callbacks to an [`ImagerySink`]
pub struct TelemetryAdapter {
    connector: Arc<dyn TrackerConnector>,
    sink: Arc<dyn ImagerySink>,
    config: AdapterConfig,
    session: Option<Session>,
}

impl TelemetryAdapter {
    pub fn new(
        connector: Arc<dyn TrackerConnector>,
        sink: Arc<dyn ImagerySink>,
        config: AdapterConfig,
    ) -> Result<Self, AdapterError> {
        config.validate()?;
        Ok(Self {
            connector,
            sink,
            config,
            session: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Open the session, register handlers and start streaming.
    ///
    /// Returns as soon as registration is done; samples and events arrive
    /// later on the vendor runtime's thread.
    pub fn start(&mut self) -> Result<(), AdapterError> {
        if self.session.is_some() {
            return Err(AdapterError::AlreadyStarted);
        }

        info!("Opening tracker session: {}", self.config.device_name);
        let api = self.connector.open(&self.config.device_name)?;
        let active = Arc::new(AtomicBool::new(true));

        self.register_handlers(api.as_ref(), &active);

        let callbacks = LifecycleCallbacks {
            on_connect: self.connect_handler(&api, &active),
            on_disconnect: Arc::new(|| info!("tracker disconnected")),
        };

        if let Err(e) = api.start(callbacks) {
            active.store(false, Ordering::Release);
            return Err(e.into());
        }

        self.session = Some(Session { api, active });
        info!("Tracker session started");
        Ok(())
    }

    /// Stop the session and release the handle.
    pub fn shutdown(&mut self) -> Result<(), AdapterError> {
        let session = self.session.take().ok_or(AdapterError::NotStarted)?;
        session.active.store(false, Ordering::Release);
        session.api.shutdown()?;

        info!("Tracker session closed");
        Ok(())
    }

    fn register_handlers(&self, api: &dyn TrackerApi, active: &Arc<AtomicBool>) {
        let sink = Arc::clone(&self.sink);
        let gate = Arc::clone(active);
        let on_sample = move |sample: &EyeTrackingSample| {
            if !gate.load(Ordering::Acquire) {
                return;
            }
            let record = normalize(sample);
            sink.update_information(&record);
        };
        api.register_stream_handler(StreamHandler::EyeTracking(Arc::new(on_sample)));

        let gate = Arc::clone(active);
        let on_event = move |raw: &RawEvent| {
            if !gate.load(Ordering::Acquire) {
                return;
            }
            handle_event(raw);
        };
        api.register_stream_handler(StreamHandler::Events(Arc::new(on_event)));
    }

    fn connect_handler(
        &self,
        api: &Arc<dyn TrackerApi>,
        active: &Arc<AtomicBool>,
    ) -> LifecycleHandler {
        // Weak: the tracker holds this callback
        let api = Arc::downgrade(api);
        let gate = Arc::clone(active);
        let rate_hz = self.config.stream_rate_hz;

        Arc::new(move || {
            if !gate.load(Ordering::Acquire) {
                return;
            }
            info!("tracker connected");
            if let Some(api) = api.upgrade() {
                configure_tracker(api.as_ref(), rate_hz);
            }
        })
    }
}

impl Drop for TelemetryAdapter {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.active.store(false, Ordering::Release);
            if let Err(e) = session.api.shutdown() {
                warn!("Tracker shutdown on drop failed: {}", e);
            }
        }
    }
}

/// Request the stream rate, stream set and event classes the adapter needs.
pub fn configure_tracker(api: &dyn TrackerApi, rate_hz: f32) {
    api.set_et_stream_rate(
        rate_hz,
        report_ack(format!("set stream rate {} Hz", rate_hz)),
    );
    api.set_et_stream_control(
        ENABLED_STREAMS,
        true,
        report_ack(format!("enable streams {:?}", ENABLED_STREAMS)),
    );
    for bit in ENABLED_EVENTS {
        api.set_event_control(
            *bit,
            true,
            report_ack(format!("enable {:?} events", bit)),
        );
    }
}

fn report_ack(operation: String) -> Completion {
    Box::new(move |ack| {
        if ack.is_success() {
            debug!("Tracker accepted: {}", operation);
        } else {
            warn!("Tracker rejected '{}': {}", operation, ack);
        }
    })
}
