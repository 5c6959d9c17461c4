use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeCenter {
    pub left: Vec3,
    pub right: Vec3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gaze {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vergence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PupilDiameter {
    pub left: f64,
    pub right: f64,
}

/// IMU orientation. The default is all-zero, not the identity rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuQuaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Normalized eye-tracking record handed to the imagery sink.
///
/// Every field is always present; measurements the sample did not carry stay
/// at their zero default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub eye_center: EyeCenter,
    pub gaze: Gaze,
    pub pupil_diameter: PupilDiameter,
    #[serde(rename = "IMU")]
    pub imu_quaternion: ImuQuaternion,
}

/// Bit set of the eyes a sample was measured on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeMask(pub u8);

impl EyeMask {
    pub const NONE: EyeMask = EyeMask(0b00);
    pub const RIGHT: EyeMask = EyeMask(0b01);
    pub const LEFT: EyeMask = EyeMask(0b10);
    pub const BINOCULAR: EyeMask = EyeMask(0b11);

    pub fn is_binocular(&self) -> bool {
        *self == Self::BINOCULAR
    }
}

/// One decoded packet from the vendor eye-tracking stream.
///
/// Binocular tuples keep the vendor's positional order: right eye first,
/// then left eye.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EyeTrackingSample {
    pub timestamp: f64,
    pub eye_mask: EyeMask,
    pub gaze: Option<[f64; 4]>,
    pub eye_center: Option<[f64; 6]>,
    pub pupil_diameter: Option<[f64; 2]>,
    pub imu_quaternion: Option<[f64; 4]>,
}

/// Undecoded vendor event tuple: `(event_kind, timestamp, *args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub kind: u8,
    pub timestamp: f64,
    pub args: Vec<f64>,
}

impl RawEvent {
    pub fn new(kind: u8, timestamp: f64, args: impl Into<Vec<f64>>) -> Self {
        Self {
            kind,
            timestamp,
            args: args.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    Blink { timestamp: f64, duration: f64 },
    EyeClosed { timestamp: f64, eye_index: u32 },
    EyeOpened { timestamp: f64, eye_index: u32 },
}
