//! JANUS silicon detector geometry and the static sector/ring lookup tables.
//!
//! Both detectors are annular S3-type arrays with 32 azimuthal sectors and
//! 24 radial rings between an inner radius of 1.1 cm and an outer radius of
//! 3.5 cm. Lengths are in centimetres, angles in radians unless a name says
//! otherwise.

use crate::domain::{JanusError, JanusResult};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

pub const SECTOR_COUNT: usize = 32;
pub const RING_COUNT: usize = 24;

pub const INNER_RADIUS: f64 = 1.1;
pub const OUTER_RADIUS: f64 = 3.5;
pub const RING_PITCH: f64 = 0.1;

pub const DOWNSTREAM_DISTANCE: f64 = 2.8;
pub const UPSTREAM_DISTANCE: f64 = -3.2;

pub const PHI_INCREMENT: f64 = PI / 16.0;

/// Azimuthal slice edges `k * pi/16` for `k = 0..=32`.
pub const PHI_BOUNDS: [f64; SECTOR_COUNT + 1] = phi_bounds();

/// Sector number for each azimuthal slice; numbering starts 8 slices in.
pub const SECTOR_MAP: [usize; SECTOR_COUNT] = [
    9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32,
    1, 2, 3, 4, 5, 6, 7, 8,
];

pub const RING_MAP: [usize; RING_COUNT] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
];

/// Polar angle of each ring edge as seen from the target at axial `distance`.
pub fn theta_bounds(distance: f64) -> [f64; RING_COUNT + 1] {
    std::array::from_fn(|edge| ((INNER_RADIUS + RING_PITCH * edge as f64) / distance).atan())
}

const fn phi_bounds() -> [f64; SECTOR_COUNT + 1] {
    let mut bounds = [0.0; SECTOR_COUNT + 1];
    let mut edge = 0;
    while edge <= SECTOR_COUNT {
        bounds[edge] = edge as f64 * PHI_INCREMENT;
        edge += 1;
    }
    bounds
}

/// Leftmost insertion position of `value` among `bounds`, minus one.
///
/// A value equal to an edge lands in the slice below that edge; values at or
/// below the first edge give `-1`.
pub fn slice_index(bounds: &[f64], value: f64) -> isize {
    bounds.partition_point(|bound| *bound < value) as isize - 1
}

/// Ring number (1-based) hit by a particle at polar angle `theta`, if any,
/// for ring edges `bounds` from [`theta_bounds`].
pub fn ring_for_theta(bounds: &[f64; RING_COUNT + 1], theta: f64) -> Option<usize> {
    let slice = slice_index(bounds, theta);
    if (0..RING_COUNT as isize).contains(&slice) {
        Some(RING_MAP[slice as usize])
    } else {
        None
    }
}

/// Sector number (1-based) for an azimuth already normalised into `[0, 2pi)`.
///
/// The slice index wraps cyclically, so an azimuth of exactly zero shares the
/// last slice with azimuths just below `2pi`.
pub fn sector_for_phi(phi: f64) -> usize {
    let slice = slice_index(&PHI_BOUNDS, phi).rem_euclid(SECTOR_COUNT as isize);
    SECTOR_MAP[slice as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    Upstream,
    Downstream,
}

impl Detector {
    /// Maps the command-line detector number: 1 downstream, 0 upstream.
    pub fn from_number(number: i64) -> JanusResult<Self> {
        match number {
            1 => Ok(Self::Downstream),
            0 => Ok(Self::Upstream),
            other => Err(JanusError::input_validation(
                "INPUT.PHI_DETECTOR",
                format!(
                    "invalid detector number {}; detector number must be 1 for the downstream detector and 0 for the upstream detector",
                    other
                ),
            )),
        }
    }

    /// Signed distance from the target to the detector plane along the beam.
    pub const fn axial_distance(self) -> f64 {
        match self {
            Self::Downstream => DOWNSTREAM_DISTANCE,
            Self::Upstream => UPSTREAM_DISTANCE,
        }
    }
}

impl Display for Detector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Downstream => f.write_str("downstream"),
            Self::Upstream => f.write_str("upstream"),
        }
    }
}
