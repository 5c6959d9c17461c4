//! Eye Tracker Protocol
//!
//! Enum codes and device constants shared with the vendor streaming API.

use std::fmt;

/// BLE name the MindLink glasses advertise under
pub const DEFAULT_DEVICE_NAME: &str = "ADHAWK MINDLINK-303";

/// Continuous eye-tracking stream rate requested on connect
pub const DEFAULT_STREAM_RATE_HZ: f32 = 60.0;

/// Stream packet families a handler can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    EyeTrackingStream,
    Events,
}

/// Sub-streams of the eye-tracking packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeTrackingStreamType {
    Gaze,
    PerEyeGaze,
    EyeCenter,
    PupilPosition,
    PupilDiameter,
    GazeInImage,
    GazeInScreen,
    ImuQuaternion,
}

impl EyeTrackingStreamType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Gaze => 1,
            Self::PerEyeGaze => 2,
            Self::EyeCenter => 3,
            Self::PupilPosition => 4,
            Self::PupilDiameter => 5,
            Self::GazeInImage => 6,
            Self::GazeInScreen => 7,
            Self::ImuQuaternion => 8,
        }
    }
}

/// Event classes that can be switched on or off at the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventControlBit {
    Blink,
    EyeCloseOpen,
    Trackloss,
    Saccade,
}

impl EventControlBit {
    pub fn bit(&self) -> u8 {
        match self {
            Self::Blink => 0,
            Self::EyeCloseOpen => 1,
            Self::Trackloss => 2,
            Self::Saccade => 3,
        }
    }
}

/// Event kind codes carried in the first slot of an event tuple
pub mod event_kind {
    pub const BLINK: u8 = 1;
    pub const EYE_CLOSED: u8 = 2;
    pub const EYE_OPENED: u8 = 3;
    pub const TRACKLOSS_START: u8 = 4;
    pub const TRACKLOSS_END: u8 = 5;
    pub const SACCADE: u8 = 6;
}

/// Streams enabled on connect
pub const ENABLED_STREAMS: &[EyeTrackingStreamType] = &[
    EyeTrackingStreamType::Gaze,
    EyeTrackingStreamType::EyeCenter,
    EyeTrackingStreamType::PupilDiameter,
    EyeTrackingStreamType::ImuQuaternion,
];

/// Event classes enabled on connect
pub const ENABLED_EVENTS: &[EventControlBit] =
    &[EventControlBit::Blink, EventControlBit::EyeCloseOpen];

/// Result code delivered to a configuration completion callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckCode {
    Success,
    Failure,
    InvalidArgument,
    TrackerNotReady,
    NotSupported,
    Busy,
    Unknown(u8),
}

impl AckCode {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for AckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::TrackerNotReady => write!(f, "tracker not ready"),
            Self::NotSupported => write!(f, "not supported"),
            Self::Busy => write!(f, "busy"),
            Self::Unknown(code) => write!(f, "unknown ack code {:#04X}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_codes() {
        assert!(AckCode::Success.is_success());
        assert!(!AckCode::Busy.is_success());
        assert_eq!(AckCode::TrackerNotReady.to_string(), "tracker not ready");
        assert_eq!(AckCode::Unknown(0x42).to_string(), "unknown ack code 0x42");
    }

    #[test]
    fn test_stream_codes_and_event_bits() {
        let codes: Vec<u8> = ENABLED_STREAMS.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![1, 3, 5, 8]);
        assert_eq!(EyeTrackingStreamType::PerEyeGaze.code(), 2);
        assert_eq!(EventControlBit::Blink.bit(), 0);
        assert_eq!(EventControlBit::Saccade.bit(), 3);
    }

    #[test]
    fn test_enabled_sets() {
        assert_eq!(ENABLED_STREAMS.len(), 4);
        assert!(!ENABLED_STREAMS.contains(&EyeTrackingStreamType::PerEyeGaze));
        assert_eq!(
            ENABLED_EVENTS,
            &[EventControlBit::Blink, EventControlBit::EyeCloseOpen]
        );
    }
}
