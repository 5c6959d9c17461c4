//! Sample Normalization
//!
//! Turns a decoded eye-tracking packet into the fixed-shape
//! [`TelemetryRecord`] the imagery sink consumes.

use crate::domain::models::{
    EyeCenter, EyeTrackingSample, Gaze, ImuQuaternion, PupilDiameter, TelemetryRecord, Vec3,
};

/// Positions of each eye inside the vendor's binocular tuples.
///
/// The vendor reports binocular values right eye first. Keeping the offsets
/// here means a change in vendor ordering is a one-line fix.
pub struct BinocularLayout;

impl BinocularLayout {
    pub const EYE_CENTER_RIGHT: usize = 0;
    pub const EYE_CENTER_LEFT: usize = 3;
    pub const PUPIL_RIGHT: usize = 0;
    pub const PUPIL_LEFT: usize = 1;

    pub fn eye_center(raw: &[f64; 6]) -> EyeCenter {
        EyeCenter {
            left: Self::vec3_at(raw, Self::EYE_CENTER_LEFT),
            right: Self::vec3_at(raw, Self::EYE_CENTER_RIGHT),
        }
    }

    pub fn pupil_diameter(raw: &[f64; 2]) -> PupilDiameter {
        PupilDiameter {
            left: raw[Self::PUPIL_LEFT],
            right: raw[Self::PUPIL_RIGHT],
        }
    }

    fn vec3_at(raw: &[f64; 6], offset: usize) -> Vec3 {
        Vec3::new(raw[offset], raw[offset + 1], raw[offset + 2])
    }
}

/// Build the record for one sample.
///
/// Gaze is taken whenever present. Eye center, pupil diameter and the IMU
/// quaternion are only taken from binocular samples.
pub fn normalize(sample: &EyeTrackingSample) -> TelemetryRecord {
    let mut record = TelemetryRecord::default();

    if let Some([x, y, z, vergence]) = sample.gaze {
        record.gaze = Gaze { x, y, z, vergence };
    }

    if !sample.eye_mask.is_binocular() {
        return record;
    }

    if let Some(raw) = &sample.eye_center {
        record.eye_center = BinocularLayout::eye_center(raw);
    }

    if let Some(raw) = &sample.pupil_diameter {
        record.pupil_diameter = BinocularLayout::pupil_diameter(raw);
    }

    if let Some([x, y, z, w]) = sample.imu_quaternion {
        record.imu_quaternion = ImuQuaternion { x, y, z, w };
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EyeMask;

    fn binocular() -> EyeTrackingSample {
        EyeTrackingSample {
            eye_mask: EyeMask::BINOCULAR,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_sample_is_default_record() {
        let record = normalize(&EyeTrackingSample::default());
        assert_eq!(record, TelemetryRecord::default());

        let record = normalize(&binocular());
        assert_eq!(record, TelemetryRecord::default());
    }

    #[test]
    fn test_gaze_only() {
        let sample = EyeTrackingSample {
            gaze: Some([1.0, 2.0, 3.0, 4.0]),
            ..Default::default()
        };
        let record = normalize(&sample);

        assert_eq!(
            record.gaze,
            Gaze {
                x: 1.0,
                y: 2.0,
                z: 3.0,
                vergence: 4.0
            }
        );
        assert_eq!(record.eye_center, EyeCenter::default());
        assert_eq!(record.pupil_diameter, PupilDiameter::default());
        assert_eq!(record.imu_quaternion, ImuQuaternion::default());
    }

    #[test]
    fn test_eye_center_remaps_right_then_left() {
        let sample = EyeTrackingSample {
            eye_center: Some([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]),
            ..binocular()
        };
        let record = normalize(&sample);

        assert_eq!(record.eye_center.left, Vec3::new(40.0, 50.0, 60.0));
        assert_eq!(record.eye_center.right, Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_monocular_leaves_binocular_fields_default() {
        for mask in [EyeMask::RIGHT, EyeMask::LEFT, EyeMask::NONE] {
            let sample = EyeTrackingSample {
                eye_mask: mask,
                gaze: Some([0.1, 0.2, 0.3, 0.4]),
                eye_center: Some([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]),
                pupil_diameter: Some([3.5, 3.7]),
                imu_quaternion: Some([0.0, 0.0, 0.0, 1.0]),
                ..Default::default()
            };
            let record = normalize(&sample);

            assert_eq!(record.eye_center, EyeCenter::default());
            assert_eq!(record.pupil_diameter, PupilDiameter::default());
            assert_eq!(record.imu_quaternion, ImuQuaternion::default());
            // gaze does not depend on the mask
            assert_eq!(record.gaze.vergence, 0.4);
        }
    }

    #[test]
    fn test_mask_with_extra_bits_is_not_binocular() {
        let sample = EyeTrackingSample {
            eye_mask: EyeMask(0b111),
            gaze: Some([0.1, 0.2, 0.3, 0.4]),
            eye_center: Some([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]),
            pupil_diameter: Some([3.5, 3.7]),
            imu_quaternion: Some([0.0, 0.0, 0.0, 1.0]),
            ..Default::default()
        };
        assert!(!sample.eye_mask.is_binocular());

        let record = normalize(&sample);
        assert_eq!(record.eye_center, EyeCenter::default());
        assert_eq!(record.pupil_diameter, PupilDiameter::default());
        assert_eq!(record.imu_quaternion, ImuQuaternion::default());
        assert_eq!(record.gaze.x, 0.1);
    }

    #[test]
    fn test_pupil_and_imu_on_binocular() {
        let sample = EyeTrackingSample {
            pupil_diameter: Some([3.5, 3.9]),
            imu_quaternion: Some([0.1, 0.2, 0.3, 0.9]),
            ..binocular()
        };
        let record = normalize(&sample);

        assert_eq!(
            record.pupil_diameter,
            PupilDiameter {
                left: 3.9,
                right: 3.5
            }
        );
        assert_eq!(
            record.imu_quaternion,
            ImuQuaternion {
                x: 0.1,
                y: 0.2,
                z: 0.3,
                w: 0.9
            }
        );
    }

    #[test]
    fn test_record_serializes_with_imu_key() {
        let json = serde_json::to_value(TelemetryRecord::default()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("eye_center"));
        assert!(obj.contains_key("gaze"));
        assert!(obj.contains_key("pupil_diameter"));
        assert!(obj.contains_key("IMU"));
        assert_eq!(json["eye_center"]["left"]["z"], 0.0);
        assert_eq!(json["IMU"]["w"], 0.0);
    }
}
