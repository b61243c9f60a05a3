use crate::common::geometry::{Detector, INNER_RADIUS, OUTER_RADIUS};
use crate::domain::{JanusError, JanusResult};
use crate::modules::serialization::join_fixed_f64;
use std::f64::consts::PI;

/// Keeps the first and last theta clear of the exact acceptance limits.
const THETA_EDGE_MARGIN_DEG: f64 = 0.05;
/// The azimuth scan runs from -180 degrees in 0.1 degree steps.
const PHI_SCAN_STEPS: usize = 3600;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhiPatternInput {
    pub x_offset: f64,
    pub y_offset: f64,
    pub detector: Detector,
    pub theta_increments: usize,
}

impl PhiPatternInput {
    pub fn validate(&self) -> JanusResult<()> {
        if !self.x_offset.is_finite() || !self.y_offset.is_finite() {
            return Err(JanusError::input_validation(
                "INPUT.PHI_OFFSET",
                format!(
                    "beam offsets must be finite, got ({}, {})",
                    self.x_offset, self.y_offset
                ),
            ));
        }
        if self.theta_increments < 2 {
            return Err(JanusError::input_validation(
                "INPUT.PHI_INCREMENTS",
                format!(
                    "at least 2 theta increments are required, got {}",
                    self.theta_increments
                ),
            ));
        }
        Ok(())
    }
}

/// Azimuthal coverage of the detector at one polar angle.
#[derive(Debug, Clone, PartialEq)]
pub struct PhiCoverage {
    pub theta_deg: f64,
    /// Alternating start/stop azimuths in degrees.
    pub bounds_deg: Vec<f64>,
}

impl PhiCoverage {
    pub fn range_count(&self) -> usize {
        self.bounds_deg.len() / 2
    }

    /// Total covered azimuth; `None` unless the coverage is one or two ranges.
    pub fn delta_phi(&self) -> Option<f64> {
        match self.bounds_deg.as_slice() {
            [start, stop] => Some(stop - start),
            [first_start, first_stop, second_start, second_stop] => {
                Some(first_stop - first_start + second_stop - second_start)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhiPattern {
    pub input: PhiPatternInput,
    pub thetas_deg: Vec<f64>,
    /// Coverage on the half-step grid: each theta and the midpoint to the next.
    pub coverage: Vec<PhiCoverage>,
}

impl PhiPattern {
    pub fn compute(input: PhiPatternInput) -> JanusResult<Self> {
        input.validate()?;

        let z_axis = input.detector.axial_distance();
        let rho_offset = (input.x_offset.powi(2) + input.y_offset.powi(2)).sqrt();
        let rho_min = INNER_RADIUS - rho_offset;
        let rho_max = OUTER_RADIUS + rho_offset;

        let (near_rho, far_rho) = match input.detector {
            Detector::Downstream => (rho_min, rho_max),
            Detector::Upstream => (rho_max, rho_min),
        };
        let theta_min = near_rho.atan2(z_axis) * 180.0 / PI + THETA_EDGE_MARGIN_DEG;
        let theta_max = far_rho.atan2(z_axis) * 180.0 / PI - THETA_EDGE_MARGIN_DEG;

        let theta_step = (theta_max - theta_min) / (input.theta_increments - 1) as f64;
        let thetas_deg: Vec<f64> = (0..input.theta_increments)
            .map(|index| theta_min + theta_step * index as f64)
            .collect();

        let coverage = half_step_thetas(&thetas_deg)
            .into_iter()
            .map(|theta_deg| PhiCoverage {
                theta_deg,
                bounds_deg: coverage_bounds(&input, rho_offset, theta_deg),
            })
            .collect::<Vec<_>>();

        for sample in &coverage {
            if sample.delta_phi().is_none() {
                tracing::warn!(
                    theta = sample.theta_deg,
                    bounds = sample.bounds_deg.len(),
                    "phi range does not have the correct number of entries"
                );
            }
        }

        Ok(Self {
            input,
            thetas_deg,
            coverage,
        })
    }

    /// Coverage at the requested thetas, skipping the midpoints.
    pub fn theta_coverage(&self) -> impl Iterator<Item = &PhiCoverage> {
        self.coverage.iter().step_by(2)
    }

    pub fn delta_phis(&self) -> Vec<f64> {
        self.coverage
            .iter()
            .filter_map(PhiCoverage::delta_phi)
            .collect()
    }

    /// GOSIA2 `OP,INTI` text: thetas, then range count and bounds per theta,
    /// then the total coverage over the half-step grid.
    pub fn render(&self) -> String {
        let mut lines = vec![join_fixed_f64(&self.thetas_deg, 2)];
        for sample in self.theta_coverage() {
            lines.push(sample.range_count().to_string());
            lines.push(join_fixed_f64(&sample.bounds_deg, 1));
        }
        lines.push(join_fixed_f64(&self.delta_phis(), 1));

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn half_step_thetas(thetas_deg: &[f64]) -> Vec<f64> {
    let mut half_steps = Vec::with_capacity(thetas_deg.len() * 2);
    for pair in thetas_deg.windows(2) {
        half_steps.push(pair[0]);
        half_steps.push((pair[0] + pair[1]) / 2.0);
    }
    if let Some(last) = thetas_deg.last() {
        half_steps.push(*last);
    }
    half_steps
}

fn coverage_bounds(input: &PhiPatternInput, rho_offset: f64, theta_deg: f64) -> Vec<f64> {
    let rho = input.detector.axial_distance() * (theta_deg * PI / 180.0).tan();
    let min_radius = rho - rho_offset;
    let max_radius = rho + rho_offset;

    if min_radius >= INNER_RADIUS && max_radius <= OUTER_RADIUS {
        vec![-180.0, 180.0]
    } else if min_radius < INNER_RADIUS {
        scan_edge_crossings(input, rho, |radius| radius >= INNER_RADIUS)
    } else {
        scan_edge_crossings(input, rho, |radius| radius <= OUTER_RADIUS)
    }
}

/// Radius in the detector frame of the point at beam-frame radius `rho` and azimuth `phi`.
fn detector_radius(input: &PhiPatternInput, rho: f64, phi: f64) -> f64 {
    (rho.powi(2)
        + input.x_offset.powi(2)
        + input.y_offset.powi(2)
        + 2.0 * rho * input.x_offset * phi.cos()
        + 2.0 * rho * input.y_offset * phi.sin())
    .sqrt()
}

fn scan_edge_crossings(
    input: &PhiPatternInput,
    rho: f64,
    on_detector: impl Fn(f64) -> bool,
) -> Vec<f64> {
    let mut covered = on_detector(detector_radius(input, rho, -PI));
    let mut bounds = if covered { vec![-180.0] } else { Vec::new() };

    for step in 1..PHI_SCAN_STEPS {
        let phi = (step as f64 / 10.0 - 180.0) * PI / 180.0;
        let now_covered = on_detector(detector_radius(input, rho, phi));
        if now_covered != covered {
            covered = now_covered;
            bounds.push(phi * 180.0 / PI);
        }
    }

    if bounds.first() == Some(&-180.0) {
        bounds.push(180.0);
    }
    bounds
}
