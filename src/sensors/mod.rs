//! Sensor messages published by the simulator and their fusion into frames.
pub mod sync;

pub use sync::ApproximateTimeSynchronizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 3D point (m).
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// An orientation quaternion.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation about the z axis by `yaw` radians.
    pub fn from_yaw(yaw: f64) -> Self {
        let (sin, cos) = (0.5 * yaw).sin_cos();
        Self {
            x: 0.0,
            y: 0.0,
            z: sin,
            w: cos,
        }
    }

    /// Convert to Euler angles `(roll, pitch, yaw)` in radians.
    ///
    /// Each angle is a counterclockwise rotation about the x, y and z axis respectively.
    pub fn to_euler(&self) -> (f64, f64, f64) {
        let Self { x, y, z, w } = *self;

        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        // Clamp guards against |t| slightly above 1 from rounding on non-unit input
        let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

        (roll, pitch, yaw)
    }

    /// Heading about the z axis (radians, in `[-pi, pi]`).
    pub fn yaw(&self) -> f64 {
        self.to_euler().2
    }
}

/// Position and orientation of a simulated model.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

/// States of every model in the simulated world.
///
/// `name[i]` names the model whose pose is `pose[i]`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStates {
    pub name: Vec<String>,
    pub pose: Vec<Pose>,
}

impl ModelStates {
    /// Pose of the model with the given name.
    pub fn find(&self, model: &str) -> Option<&Pose> {
        self.name
            .iter()
            .position(|n| n == model)
            .and_then(|i| self.pose.get(i))
    }
}

/// A planar range scan.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Range samples (m), ordered by increasing angle.
    ///
    /// May contain non-finite values for readings without a return.
    #[serde(with = "range_samples")]
    pub ranges: Vec<f32>,
}

/// JSON form of range samples.
///
/// JSON numbers cannot be non-finite so those are written as `"inf"`, `"-inf"` or `"nan"`.
/// On input `null` is also accepted and reads as a reading without a return (`inf`).
mod range_samples {
    use serde::de::{self, Deserializer, Unexpected};
    use serde::ser::{SerializeSeq, Serializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sample {
        Number(Option<f32>),
        Text(String),
    }

    pub fn serialize<S: Serializer>(ranges: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ranges.len()))?;
        for &range in ranges {
            if range.is_finite() {
                seq.serialize_element(&range)?;
            } else if range.is_nan() {
                seq.serialize_element("nan")?;
            } else if range > 0.0 {
                seq.serialize_element("inf")?;
            } else {
                seq.serialize_element("-inf")?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        Vec::<Sample>::deserialize(deserializer)?
            .into_iter()
            .map(|sample| match sample {
                Sample::Number(Some(range)) => Ok(range),
                Sample::Number(None) => Ok(f32::INFINITY),
                Sample::Text(text) => text.trim().parse::<f32>().map_err(|_| {
                    de::Error::invalid_value(
                        Unexpected::Str(&text),
                        &"a number, null, \"inf\", \"-inf\" or \"nan\"",
                    )
                }),
            })
            .collect()
    }
}

/// A message with the time (s) at which it was produced or received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub stamp: f64,
    pub message: T,
}

impl<T> Stamped<T> {
    pub const fn new(stamp: f64, message: T) -> Self {
        Self { stamp, message }
    }
}

/// An inbound message from either sensor stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMessage {
    ModelStates(Stamped<ModelStates>),
    Scan(Stamped<LaserScan>),
}

/// Vehicle pose in world coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    /// Position along the world x axis (m).
    pub x: f64,
    /// Position along the world y axis (m).
    pub y: f64,
    /// Heading (radians).
    pub yaw: f64,
}

impl From<&Pose> for VehiclePose {
    fn from(pose: &Pose) -> Self {
        Self {
            x: pose.position.x,
            y: pose.position.y,
            yaw: pose.orientation.yaw(),
        }
    }
}

/// A time-aligned pair of vehicle pose and range scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    pub pose: VehiclePose,
    pub ranges: Vec<f32>,
}

/// Number of angular sectors a scan is compressed into.
pub const NUM_SECTORS: usize = 8;

/// Malformed sensor data rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("model {0:?} not found in model states")]
    MissingModel(String),
    #[error("model states list {names} names but {poses} poses")]
    MismatchedStates { names: usize, poses: usize },
    #[error("scan has {0} samples; expected a positive multiple of {}", NUM_SECTORS)]
    ScanLength(usize),
}

impl SensorFrame {
    /// Build a frame from a synchronized pair of messages.
    ///
    /// # Args
    /// * `model` - Name of the vehicle model within `states`.
    pub fn from_messages(
        states: &ModelStates,
        scan: LaserScan,
        model: &str,
    ) -> Result<Self, SensorError> {
        if states.name.len() != states.pose.len() {
            return Err(SensorError::MismatchedStates {
                names: states.name.len(),
                poses: states.pose.len(),
            });
        }
        let pose = states
            .find(model)
            .ok_or_else(|| SensorError::MissingModel(model.to_owned()))?;
        let num_ranges = scan.ranges.len();
        if num_ranges == 0 || num_ranges % NUM_SECTORS != 0 {
            return Err(SensorError::ScanLength(num_ranges));
        }
        Ok(Self {
            pose: pose.into(),
            ranges: scan.ranges,
        })
    }
}

/// Synchronizes the pose and scan streams and emits validated frames.
#[derive(Debug, Clone)]
pub struct SensorFusion {
    sync: ApproximateTimeSynchronizer<ModelStates, LaserScan>,
    model: String,
}

impl SensorFusion {
    pub fn new(sync: ApproximateTimeSynchronizer<ModelStates, LaserScan>, model: String) -> Self {
        Self { sync, model }
    }

    /// Add a message. Returns a frame if the message completed a synchronized pair.
    pub fn push(&mut self, message: SensorMessage) -> Option<Result<SensorFrame, SensorError>> {
        let (states, scan) = match message {
            SensorMessage::ModelStates(m) => self.sync.push_first(m)?,
            SensorMessage::Scan(m) => self.sync.push_second(m)?,
        };
        Some(SensorFrame::from_messages(&states, scan, &self.model))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case(0.0)]
    #[case(0.3)]
    #[case(-1.2)]
    #[case(FRAC_PI_2)]
    #[case(3.0)]
    fn yaw_round_trip(#[case] yaw: f64) {
        assert!((Quaternion::from_yaw(yaw).yaw() - yaw).abs() < 1e-12);
    }

    #[test]
    fn identity_euler_is_zero() {
        assert_eq!(Quaternion::IDENTITY.to_euler(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn yaw_half_turn() {
        let q = Quaternion {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            w: 0.0,
        };
        assert!((q.yaw().abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn pitch_clamped_for_non_unit_input() {
        let q = Quaternion {
            x: 0.0,
            y: 1.0,
            z: 0.0,
            w: 1.0,
        };
        let (_, pitch, _) = q.to_euler();
        assert!(pitch.is_finite());
        assert!((pitch - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn model_found_by_name() {
        let states = model_states("racecar", 1.0, 2.0, 0.5);
        let pose = states.find("racecar").unwrap();
        assert_eq!(pose.position.x, 1.0);
        assert!(states.find("missing").is_none());
    }

    #[test]
    fn frame_from_messages() {
        let states = model_states("racecar", 1.0, 0.75, 0.25);
        let frame = SensorFrame::from_messages(&states, uniform_scan(3.0), "racecar").unwrap();
        assert_eq!(frame.pose.x, 1.0);
        assert_eq!(frame.pose.y, 0.75);
        assert!((frame.pose.yaw - 0.25).abs() < 1e-12);
        assert_eq!(frame.ranges.len(), 360);
    }

    #[test]
    fn frame_missing_model() {
        let states = model_states("other", 1.0, 0.75, 0.0);
        assert_eq!(
            SensorFrame::from_messages(&states, uniform_scan(3.0), "racecar"),
            Err(SensorError::MissingModel("racecar".into()))
        );
    }

    #[test]
    fn frame_bad_scan_length() {
        let states = model_states("racecar", 0.0, 0.0, 0.0);
        let scan = LaserScan {
            ranges: vec![1.0; 359],
        };
        assert_eq!(
            SensorFrame::from_messages(&states, scan, "racecar"),
            Err(SensorError::ScanLength(359))
        );
        assert_eq!(
            SensorFrame::from_messages(&states, LaserScan::default(), "racecar"),
            Err(SensorError::ScanLength(0))
        );
    }

    #[test]
    fn frame_mismatched_states() {
        let mut states = model_states("racecar", 0.0, 0.0, 0.0);
        states.pose.pop();
        assert_eq!(
            SensorFrame::from_messages(&states, uniform_scan(1.0), "racecar"),
            Err(SensorError::MismatchedStates { names: 2, poses: 1 })
        );
    }

    #[test]
    fn scan_decodes_missing_returns() {
        let scan: LaserScan =
            serde_json::from_str(r#"{"ranges": [1.5, null, "inf", "-inf", "nan", 3]}"#).unwrap();
        assert_eq!(scan.ranges[..2], [1.5, f32::INFINITY]);
        assert_eq!(scan.ranges[2], f32::INFINITY);
        assert_eq!(scan.ranges[3], f32::NEG_INFINITY);
        assert!(scan.ranges[4].is_nan());
        assert_eq!(scan.ranges[5], 3.0);
    }

    #[test]
    fn scan_rejects_unknown_text() {
        assert!(serde_json::from_str::<LaserScan>(r#"{"ranges": ["far"]}"#).is_err());
    }

    #[test]
    fn scan_encodes_non_finite_as_text() {
        let scan = LaserScan {
            ranges: vec![2.0, f32::INFINITY, f32::NEG_INFINITY, f32::NAN],
        };
        let line = serde_json::to_string(&scan).unwrap();
        assert_eq!(line, r#"{"ranges":[2.0,"inf","-inf","nan"]}"#);
        let decoded: LaserScan = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded.ranges[..3], scan.ranges[..3]);
        assert!(decoded.ranges[3].is_nan());
    }

    #[test]
    fn fusion_emits_frame_on_pair() {
        let mut fusion =
            SensorFusion::new(ApproximateTimeSynchronizer::new(10, 0.1), "racecar".into());
        let pose =
            SensorMessage::ModelStates(Stamped::new(1.0, model_states("racecar", 2.0, 0.0, 0.0)));
        assert!(fusion.push(pose).is_none());
        let scan = SensorMessage::Scan(Stamped::new(1.05, uniform_scan(5.0)));
        let frame = fusion.push(scan).unwrap().unwrap();
        assert_eq!(frame.pose.x, 2.0);
    }
}
