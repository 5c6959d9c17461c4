//! In-process tracker
//!
//! Implements [`TrackerApi`] without hardware. Tests and the synthetic device
//! drive it through `connect`, `push_sample` and `push_event`.

use crate::domain::models::{EyeTrackingSample, RawEvent};
use crate::infrastructure::tracker::api::{
    Completion, EventHandler, LifecycleCallbacks, SampleHandler, StreamHandler, TrackerApi,
    TrackerConnector, TrackerError,
};
use crate::infrastructure::tracker::protocol::{AckCode, EventControlBit, EyeTrackingStreamType};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A configuration request the tracker received
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCall {
    StreamRate(f32),
    StreamControl {
        streams: Vec<EyeTrackingStreamType>,
        enable: bool,
    },
    EventControl {
        bit: EventControlBit,
        enable: bool,
    },
}

struct MockState {
    sample_handler: Option<SampleHandler>,
    event_handler: Option<EventHandler>,
    callbacks: Option<LifecycleCallbacks>,
    started: bool,
    shut_down: bool,
    ack: AckCode,
    calls: Vec<ConfigCall>,
    stream_rate: Option<f32>,
    enabled_streams: Vec<EyeTrackingStreamType>,
    enabled_events: Vec<EventControlBit>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            sample_handler: None,
            event_handler: None,
            callbacks: None,
            started: false,
            shut_down: false,
            ack: AckCode::Success,
            calls: Vec::new(),
            stream_rate: None,
            enabled_streams: Vec::new(),
            enabled_events: Vec::new(),
        }
    }
}

impl MockState {
    fn is_live(&self) -> bool {
        self.started && !self.shut_down
    }
}

/// Shared handle to a simulated tracker session
#[derive(Clone, Default)]
pub struct MockTracker {
    state: Arc<Mutex<MockState>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // Handlers never run under this lock; they may call back into the tracker
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ack code answered to every configuration call
    pub fn set_ack(&self, ack: AckCode) {
        self.state().ack = ack;
    }

    /// Signal a ready link. Returns false if no live session was notified.
    pub fn connect(&self) -> bool {
        let callback = {
            let state = self.state();
            if !state.is_live() {
                return false;
            }
            state.callbacks.as_ref().map(|c| Arc::clone(&c.on_connect))
        };
        match callback {
            Some(on_connect) => {
                on_connect();
                true
            }
            None => false,
        }
    }

    /// Signal link loss
    pub fn disconnect(&self) -> bool {
        let callback = {
            let state = self.state();
            if !state.is_live() {
                return false;
            }
            state.callbacks.as_ref().map(|c| Arc::clone(&c.on_disconnect))
        };
        match callback {
            Some(on_disconnect) => {
                on_disconnect();
                true
            }
            None => false,
        }
    }

    /// Deliver a sample to the eye-tracking handler
    pub fn push_sample(&self, sample: &EyeTrackingSample) -> bool {
        let handler = {
            let state = self.state();
            if !state.is_live() {
                return false;
            }
            state.sample_handler.clone()
        };
        match handler {
            Some(handler) => {
                handler(sample);
                true
            }
            None => false,
        }
    }

    /// Deliver an event tuple to the event handler
    pub fn push_event(&self, event: &RawEvent) -> bool {
        let handler = {
            let state = self.state();
            if !state.is_live() {
                return false;
            }
            state.event_handler.clone()
        };
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state().is_live()
    }

    pub fn is_shut_down(&self) -> bool {
        self.state().shut_down
    }

    pub fn calls(&self) -> Vec<ConfigCall> {
        self.state().calls.clone()
    }

    pub fn stream_rate(&self) -> Option<f32> {
        self.state().stream_rate
    }

    pub fn enabled_streams(&self) -> Vec<EyeTrackingStreamType> {
        self.state().enabled_streams.clone()
    }

    pub fn is_stream_enabled(&self, stream: EyeTrackingStreamType) -> bool {
        self.state().enabled_streams.contains(&stream)
    }

    pub fn is_event_enabled(&self, bit: EventControlBit) -> bool {
        self.state().enabled_events.contains(&bit)
    }

    pub fn has_handlers(&self) -> bool {
        let state = self.state();
        state.sample_handler.is_some() || state.event_handler.is_some()
    }

    fn record(&self, call: ConfigCall) -> AckCode {
        let mut state = self.state();
        let ack = state.ack;
        match &call {
            ConfigCall::StreamRate(rate) => {
                debug!("Mock tracker: stream rate {} Hz -> {}", rate, ack)
            }
            ConfigCall::StreamControl { streams, enable } => {
                let codes: Vec<u8> = streams.iter().map(|s| s.code()).collect();
                debug!("Mock tracker: streams {:?} enable={} -> {}", codes, enable, ack);
            }
            ConfigCall::EventControl { bit, enable } => {
                debug!("Mock tracker: event bit {} enable={} -> {}", bit.bit(), enable, ack);
            }
        }

        if ack.is_success() {
            match &call {
                ConfigCall::StreamRate(rate) => state.stream_rate = Some(*rate),
                ConfigCall::StreamControl { streams, enable } => {
                    for stream in streams {
                        let present = state.enabled_streams.contains(stream);
                        if *enable && !present {
                            state.enabled_streams.push(*stream);
                        } else if !*enable && present {
                            state.enabled_streams.retain(|s| s != stream);
                        }
                    }
                }
                ConfigCall::EventControl { bit, enable } => {
                    let present = state.enabled_events.contains(bit);
                    if *enable && !present {
                        state.enabled_events.push(*bit);
                    } else if !*enable && present {
                        state.enabled_events.retain(|b| b != bit);
                    }
                }
            }
        }

        state.calls.push(call);
        ack
    }
}

impl TrackerApi for MockTracker {
    fn register_stream_handler(&self, handler: StreamHandler) {
        debug!("Mock tracker: handler registered for {:?}", handler.packet_type());
        let mut state = self.state();
        match handler {
            StreamHandler::EyeTracking(h) => state.sample_handler = Some(h),
            StreamHandler::Events(h) => state.event_handler = Some(h),
        }
    }

    fn start(&self, callbacks: LifecycleCallbacks) -> Result<(), TrackerError> {
        let mut state = self.state();
        if state.shut_down {
            return Err(TrackerError::ConnectionFailed(
                "session already closed".to_string(),
            ));
        }
        if state.started {
            return Err(TrackerError::AlreadyStarted);
        }
        state.started = true;
        state.callbacks = Some(callbacks);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), TrackerError> {
        let mut state = self.state();
        if !state.is_live() {
            return Err(TrackerError::NotStarted);
        }
        state.shut_down = true;
        state.sample_handler = None;
        state.event_handler = None;
        state.callbacks = None;
        Ok(())
    }

    fn set_et_stream_rate(&self, rate_hz: f32, done: Completion) {
        let ack = self.record(ConfigCall::StreamRate(rate_hz));
        done(ack);
    }

    fn set_et_stream_control(
        &self,
        streams: &[EyeTrackingStreamType],
        enable: bool,
        done: Completion,
    ) {
        let ack = self.record(ConfigCall::StreamControl {
            streams: streams.to_vec(),
            enable,
        });
        done(ack);
    }

    fn set_event_control(&self, bit: EventControlBit, enable: bool, done: Completion) {
        let ack = self.record(ConfigCall::EventControl { bit, enable });
        done(ack);
    }
}

/// Hands out sessions on one [`MockTracker`]
#[derive(Clone, Default)]
pub struct MockConnector {
    tracker: MockTracker,
    known_device: Option<String>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new(tracker: MockTracker) -> Self {
        Self {
            tracker,
            known_device: None,
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Only answer to this device name
    pub fn with_known_device(mut self, name: &str) -> Self {
        self.known_device = Some(name.to_string());
        self
    }

    pub fn tracker(&self) -> &MockTracker {
        &self.tracker
    }

    /// Device names passed to `open`, in order
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

impl TrackerConnector for MockConnector {
    fn open(&self, device_name: &str) -> Result<Arc<dyn TrackerApi>, TrackerError> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(device_name.to_string());
        }

        if let Some(known) = &self.known_device {
            if known != device_name {
                return Err(TrackerError::DeviceNotFound(device_name.to_string()));
            }
        }

        Ok(Arc::new(self.tracker.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::tracker::protocol::ENABLED_STREAMS;
    use crate::test_support::capture_logs_at;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Level;

    fn noop_callbacks() -> LifecycleCallbacks {
        LifecycleCallbacks {
            on_connect: Arc::new(|| {}),
            on_disconnect: Arc::new(|| {}),
        }
    }

    #[test]
    fn test_hooks_need_live_session() {
        let tracker = MockTracker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let on_sample = move |_: &EyeTrackingSample| {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        tracker.register_stream_handler(StreamHandler::EyeTracking(Arc::new(on_sample)));

        assert!(!tracker.push_sample(&EyeTrackingSample::default()));
        tracker.start(noop_callbacks()).unwrap();
        assert!(tracker.push_sample(&EyeTrackingSample::default()));
        tracker.shutdown().unwrap();
        assert!(!tracker.push_sample(&EyeTrackingSample::default()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!tracker.has_handlers());
    }

    #[test]
    fn test_start_and_shutdown_errors() {
        let tracker = MockTracker::new();
        assert!(matches!(tracker.shutdown(), Err(TrackerError::NotStarted)));
        tracker.start(noop_callbacks()).unwrap();
        assert!(matches!(
            tracker.start(noop_callbacks()),
            Err(TrackerError::AlreadyStarted)
        ));
        tracker.shutdown().unwrap();
        assert!(tracker.start(noop_callbacks()).is_err());
    }

    #[test]
    fn test_rejected_config_is_not_applied() {
        let tracker = MockTracker::new();
        tracker.set_ack(AckCode::TrackerNotReady);

        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        tracker.set_et_stream_rate(
            60.0,
            Box::new(move |ack| *slot.lock().unwrap() = Some(ack)),
        );

        assert_eq!(*seen.lock().unwrap(), Some(AckCode::TrackerNotReady));
        assert_eq!(tracker.stream_rate(), None);
        assert_eq!(tracker.calls(), vec![ConfigCall::StreamRate(60.0)]);
    }

    #[test]
    fn test_config_calls_log_vendor_codes() {
        let tracker = MockTracker::new();
        tracker.set_ack(AckCode::Busy);

        let lines = capture_logs_at(Level::DEBUG, || {
            tracker.set_et_stream_control(ENABLED_STREAMS, true, Box::new(|_| {}));
            tracker.set_event_control(EventControlBit::EyeCloseOpen, true, Box::new(|_| {}));
        });

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[1, 3, 5, 8]"));
        assert!(lines[0].contains("busy"));
        assert!(lines[1].contains("event bit 1"));
    }

    #[test]
    fn test_stream_control_enable_disable() {
        let tracker = MockTracker::new();
        let streams = [EyeTrackingStreamType::Gaze, EyeTrackingStreamType::EyeCenter];
        tracker.set_et_stream_control(&streams, true, Box::new(|_| {}));
        tracker.set_et_stream_control(&streams[..1], true, Box::new(|_| {}));
        assert_eq!(tracker.enabled_streams(), streams.to_vec());

        tracker.set_et_stream_control(&streams[..1], false, Box::new(|_| {}));
        assert!(!tracker.is_stream_enabled(EyeTrackingStreamType::Gaze));
        assert!(tracker.is_stream_enabled(EyeTrackingStreamType::EyeCenter));
    }

    #[test]
    fn test_connector_device_filter() {
        let connector = MockConnector::default().with_known_device("MINDLINK-1");
        assert!(connector.open("MINDLINK-1").is_ok());
        assert!(matches!(
            connector.open("OTHER"),
            Err(TrackerError::DeviceNotFound(name)) if name == "OTHER"
        ));
        assert_eq!(connector.opened(), vec!["MINDLINK-1", "OTHER"]);
    }
}
