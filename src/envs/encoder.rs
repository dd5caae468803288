//! Encoding of the sensor state into a fixed-size observation.
use crate::sensors::NUM_SECTORS;
use serde::{Deserialize, Serialize};

/// Number of values in an [`Observation`].
pub const OBSERVATION_DIM: usize = 3 + NUM_SECTORS;

/// Observation of the racecar state.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Absolute normalized x distance to the target.
    pub dx: f32,
    /// Absolute normalized y distance to the target.
    pub dy: f32,
    /// Vehicle heading (radians).
    pub yaw: f32,
    /// Closest normalized range in each angular sector.
    pub sectors: [f32; NUM_SECTORS],
}

impl Observation {
    /// Flatten into `[dx, dy, yaw, sectors..]`.
    pub fn to_array(&self) -> [f32; OBSERVATION_DIM] {
        let mut out = [0.0; OBSERVATION_DIM];
        out[0] = self.dx;
        out[1] = self.dy;
        out[2] = self.yaw;
        out[3..].copy_from_slice(&self.sectors);
        out
    }

    /// The closest normalized range over all sectors.
    pub fn min_sector(&self) -> f32 {
        self.sectors.iter().copied().fold(f32::INFINITY, f32::min)
    }
}

impl From<Observation> for [f32; OBSERVATION_DIM] {
    fn from(observation: Observation) -> Self {
        observation.to_array()
    }
}

/// Encodes pose and range scans into [`Observation`]s.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObservationEncoder {
    max_range: f32,
}

impl ObservationEncoder {
    /// # Args
    /// * `max_range` - Maximum range of the range sensor (m).
    ///     Non-finite readings are treated as this range.
    ///
    /// # Panics
    /// If `max_range` is not positive and finite. See [`EnvConfig::validate`].
    ///
    /// [`EnvConfig::validate`]: crate::config::EnvConfig::validate
    pub fn new(max_range: f32) -> Self {
        assert!(
            max_range.is_finite() && max_range > 0.0,
            "max_range must be positive"
        );
        Self { max_range }
    }

    /// Normalize a raw reading to `[0, 1]`.
    pub fn normalize_range(&self, range: f32) -> f32 {
        let range = if range.is_finite() {
            range.clamp(0.0, self.max_range)
        } else {
            self.max_range
        };
        range / self.max_range
    }

    /// Compress a scan to the minimum normalized range of each of `NUM_SECTORS` sectors.
    ///
    /// Sector `i` covers samples `[i * n / NUM_SECTORS, (i + 1) * n / NUM_SECTORS)`.
    /// A sector without samples reads `1.0`.
    pub fn sectors(&self, ranges: &[f32]) -> [f32; NUM_SECTORS] {
        let n = ranges.len();
        let mut sectors = [1.0; NUM_SECTORS];
        for (i, sector) in sectors.iter_mut().enumerate() {
            let samples = &ranges[i * n / NUM_SECTORS..(i + 1) * n / NUM_SECTORS];
            *sector = samples
                .iter()
                .map(|&r| self.normalize_range(r))
                .fold(1.0, f32::min);
        }
        sectors
    }

    /// Encode an observation.
    ///
    /// # Args
    /// * `position` - Normalized vehicle position.
    /// * `yaw` - Vehicle heading (radians).
    /// * `target` - Normalized target position.
    /// * `ranges` - Raw range scan (m).
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(
        &self,
        position: (f64, f64),
        yaw: f64,
        target: (f64, f64),
        ranges: &[f32],
    ) -> Observation {
        Observation {
            dx: (position.0 - target.0).abs() as f32,
            dy: (position.1 - target.1).abs() as f32,
            yaw: yaw as f32,
            sectors: self.sectors(ranges),
        }
    }
}
