//! Synthetic Tracker Device
//!
//! Drives a [`MockTracker`] the way the glasses would: it reports a ready link
//! once the session starts, streams samples at whatever rate the adapter
//! configured, and raises blink and eye open/close events on a schedule.
//! Only streams and event classes the adapter enabled are produced.

use crate::domain::models::{EyeMask, EyeTrackingSample, RawEvent};
use crate::domain::settings::SimulationSettings;
use crate::infrastructure::tracker::mock::MockTracker;
use crate::infrastructure::tracker::protocol::{event_kind, EventControlBit, EyeTrackingStreamType};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Poll interval while waiting for the session or for a stream rate
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Half the typical interpupillary distance, in metres
const HALF_IPD_M: f64 = 0.032;

const BLINK_DURATION_S: f64 = 0.15;

pub struct SyntheticDevice {
    tracker: MockTracker,
    settings: SimulationSettings,
    started_at: Instant,
    next_blink_s: f64,
    next_close_s: f64,
    // (eye index, time closed)
    closed_eye: Option<(u32, f64)>,
    close_count: u32,
    sample_count: u64,
}

impl SyntheticDevice {
    pub fn new(tracker: MockTracker, settings: SimulationSettings) -> Self {
        let next_blink_s = settings.blink_interval_ms as f64 / 1000.0;
        let next_close_s = settings.eye_close_interval_ms as f64 / 1000.0;
        Self {
            tracker,
            settings,
            started_at: Instant::now(),
            next_blink_s,
            next_close_s,
            closed_eye: None,
            close_count: 0,
            sample_count: 0,
        }
    }

    /// Run the device on the current tokio runtime until the session closes
    pub fn spawn(tracker: MockTracker, settings: SimulationSettings) -> JoinHandle<()> {
        tokio::spawn(Self::new(tracker, settings).run())
    }

    async fn run(mut self) {
        while !self.tracker.is_started() {
            if self.tracker.is_shut_down() {
                return;
            }
            tokio::time::sleep(IDLE_POLL).await;
        }

        info!("Synthetic tracker link ready");
        self.started_at = Instant::now();
        self.tracker.connect();

        loop {
            if self.tracker.is_shut_down() {
                break;
            }

            let Some(rate_hz) = self.tracker.stream_rate() else {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            };

            let t = self.started_at.elapsed().as_secs_f64();
            self.emit_events(t);
            let sample = self.sample_at(t);
            if self.tracker.push_sample(&sample) {
                self.sample_count += 1;
                if self.sample_count % 1000 == 0 {
                    debug!(sample_count = self.sample_count, "Synthetic samples sent");
                }
            }

            let period = 1.0 / f64::from(rate_hz.max(1.0));
            tokio::time::sleep(Duration::from_secs_f64(period)).await;
        }

        info!("Synthetic tracker stopped after {} samples", self.sample_count);
    }

    /// Build the sample for time `t` (seconds since link up)
    pub fn sample_at(&self, t: f64) -> EyeTrackingSample {
        let enabled = |stream| self.tracker.is_stream_enabled(stream);

        let eye_mask = match self.closed_eye {
            Some((0, _)) => EyeMask::LEFT,
            Some(_) => EyeMask::RIGHT,
            None => EyeMask::BINOCULAR,
        };

        let gaze = enabled(EyeTrackingStreamType::Gaze).then(|| {
            [
                0.3 * (0.5 * t).sin(),
                0.2 * t.sin(),
                -1.0,
                0.5 + 0.1 * (0.2 * t).sin(),
            ]
        });

        let eye_center = enabled(EyeTrackingStreamType::EyeCenter).then(|| {
            let drift = 0.001 * (0.1 * t).sin();
            // right eye first
            [HALF_IPD_M + drift, drift, 0.0, -HALF_IPD_M + drift, drift, 0.0]
        });

        let pupil_diameter = enabled(EyeTrackingStreamType::PupilDiameter)
            .then(|| [3.5 + 0.2 * (0.3 * t).sin(), 3.6 + 0.2 * (0.3 * t).sin()]);

        let imu_quaternion = enabled(EyeTrackingStreamType::ImuQuaternion).then(|| {
            let half_yaw = 0.05 * (0.3 * t).sin();
            [0.0, half_yaw.sin(), 0.0, half_yaw.cos()]
        });

        EyeTrackingSample {
            timestamp: t,
            eye_mask,
            gaze,
            eye_center,
            pupil_diameter,
            imu_quaternion,
        }
    }

    fn emit_events(&mut self, t: f64) {
        if self.settings.blink_interval_ms > 0 && t >= self.next_blink_s {
            self.next_blink_s = t + self.settings.blink_interval_ms as f64 / 1000.0;
            if self.tracker.is_event_enabled(EventControlBit::Blink) {
                self.tracker
                    .push_event(&RawEvent::new(event_kind::BLINK, t, [BLINK_DURATION_S]));
            }
        }

        if self.settings.eye_close_interval_ms == 0 {
            return;
        }
        let open_close = self.tracker.is_event_enabled(EventControlBit::EyeCloseOpen);

        match self.closed_eye {
            Some((eye, closed_at))
                if t - closed_at >= self.settings.eye_close_duration_ms as f64 / 1000.0 =>
            {
                self.closed_eye = None;
                if open_close {
                    self.tracker
                        .push_event(&RawEvent::new(event_kind::EYE_OPENED, t, [eye as f64]));
                }
            }
            None if t >= self.next_close_s => {
                let eye = self.close_count % 2;
                self.close_count += 1;
                self.closed_eye = Some((eye, t));
                self.next_close_s = t + self.settings.eye_close_interval_ms as f64 / 1000.0;
                if open_close {
                    self.tracker
                        .push_event(&RawEvent::new(event_kind::EYE_CLOSED, t, [eye as f64]));
                }
            }
            _ => {}
        }
    }
}
