use crate::common::geometry::DOWNSTREAM_DISTANCE;
use crate::domain::{JanusError, JanusResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ALPHA: f64 = 66.9848;
pub const DEFAULT_BETA: f64 = 5.62012;
pub const DEFAULT_SAMPLES_PER_OFFSET: usize = 200_000;
pub const DEFAULT_OFFSET_EXTENT: f64 = 0.2;
pub const DEFAULT_OFFSET_STEPS_PER_CM: f64 = 100.0;
/// Largest number of offsets accepted along one grid axis.
pub const MAX_OFFSET_AXIS_POINTS: usize = 10_001;

/// Parameters of a beam-spot database sweep.
///
/// `alpha` and `beta` are csc^2(theta/2) at the smallest and largest simulated
/// scattering angle. The smallest angle is the first one any beam spot on the
/// grid could put on the detector, since the Rutherford cross section
/// diverges at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SamplerConfig {
    pub alpha: f64,
    pub beta: f64,
    pub detector_distance: f64,
    pub samples_per_offset: usize,
    pub offset_extent: f64,
    pub offset_steps_per_cm: f64,
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            detector_distance: DOWNSTREAM_DISTANCE,
            samples_per_offset: DEFAULT_SAMPLES_PER_OFFSET,
            offset_extent: DEFAULT_OFFSET_EXTENT,
            offset_steps_per_cm: DEFAULT_OFFSET_STEPS_PER_CM,
            seed: None,
        }
    }
}

impl SamplerConfig {
    pub fn from_json_str(source: &str) -> JanusResult<Self> {
        serde_json::from_str(source).map_err(|source| {
            JanusError::input_validation(
                "INPUT.BEAMSPOT_CONFIG",
                format!("failed to parse sampler configuration: {}", source),
            )
        })
    }

    pub fn from_json_path(path: &Path) -> JanusResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| {
            JanusError::io_system(
                "IO.BEAMSPOT_CONFIG",
                format!(
                    "failed to read sampler configuration '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> JanusResult<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value < 1.0 {
                return Err(JanusError::input_validation(
                    "INPUT.BEAMSPOT_CROSS_SECTION",
                    format!(
                        "{} is csc^2 of a half angle and must be a finite value >= 1, got {}",
                        name, value
                    ),
                ));
            }
        }
        if !self.detector_distance.is_finite() || self.detector_distance <= 0.0 {
            return Err(JanusError::input_validation(
                "INPUT.BEAMSPOT_DISTANCE",
                format!(
                    "detector distance must be finite and positive, got {}",
                    self.detector_distance
                ),
            ));
        }
        if self.samples_per_offset == 0 {
            return Err(JanusError::input_validation(
                "INPUT.BEAMSPOT_SAMPLES",
                "samples per offset must be at least 1",
            ));
        }
        if !self.offset_extent.is_finite() || self.offset_extent < 0.0 {
            return Err(JanusError::input_validation(
                "INPUT.BEAMSPOT_GRID",
                format!(
                    "offset extent must be finite and non-negative, got {}",
                    self.offset_extent
                ),
            ));
        }
        if !self.offset_steps_per_cm.is_finite() || self.offset_steps_per_cm <= 0.0 {
            return Err(JanusError::input_validation(
                "INPUT.BEAMSPOT_GRID",
                format!(
                    "offset steps per cm must be finite and positive, got {}",
                    self.offset_steps_per_cm
                ),
            ));
        }
        OffsetGrid::axis_point_count(self.offset_extent, self.offset_steps_per_cm)?;
        Ok(())
    }

    pub fn grid(&self) -> JanusResult<OffsetGrid> {
        OffsetGrid::new(self.offset_extent, self.offset_steps_per_cm)
    }

    pub fn cross_section(&self) -> CrossSection {
        CrossSection::new(self.alpha, self.beta)
    }
}

/// Transverse beam displacement in the detector plane (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Square grid of offsets `i / steps_per_cm - extent` on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetGrid {
    values: Vec<f64>,
}

impl OffsetGrid {
    pub fn new(extent: f64, steps_per_cm: f64) -> JanusResult<Self> {
        let count = Self::axis_point_count(extent, steps_per_cm)?;
        let values = (0..count)
            .map(|index| index as f64 / steps_per_cm - extent)
            .collect();
        Ok(Self { values })
    }

    /// Offsets per axis, `round(2 * extent * steps_per_cm) + 1`, capped at
    /// [`MAX_OFFSET_AXIS_POINTS`].
    pub fn axis_point_count(extent: f64, steps_per_cm: f64) -> JanusResult<usize> {
        let intervals = (2.0 * extent * steps_per_cm).round();
        // NaN fails the range check as well.
        if (0.0..MAX_OFFSET_AXIS_POINTS as f64).contains(&intervals) {
            return Ok(intervals as usize + 1);
        }
        Err(JanusError::input_validation(
            "INPUT.BEAMSPOT_GRID",
            format!(
                "offset grid with extent {} cm and {} steps per cm exceeds {} points per axis",
                extent, steps_per_cm, MAX_OFFSET_AXIS_POINTS
            ),
        ))
    }

    pub fn axis_values(&self) -> &[f64] {
        &self.values
    }

    pub fn axis_len(&self) -> usize {
        self.values.len()
    }

    pub fn cell_count(&self) -> usize {
        self.values.len() * self.values.len()
    }

    /// Offsets in sweep order: x ascending outside, y ascending inside.
    pub fn offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        self.values
            .iter()
            .flat_map(move |x| self.values.iter().map(move |y| Offset::new(*x, *y)))
    }
}

/// Rutherford-like cross section with a CDF linear in csc^2(theta/2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    alpha: f64,
    beta: f64,
}

impl CrossSection {
    pub const fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Inverse-transform sample of the polar scattering angle for `u` in `[0, 1)`.
    pub fn sample_theta(&self, u: f64) -> f64 {
        2.0 * (self.alpha + (self.beta - self.alpha) * u).powf(-0.5).asin()
    }
}
