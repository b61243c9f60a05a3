use super::config::{CrossSection, Offset, OffsetGrid, SamplerConfig};
use crate::common::geometry::{
    RING_COUNT, SECTOR_COUNT, ring_for_theta, sector_for_phi, theta_bounds,
};
use crate::domain::{JanusError, JanusResult};
use crate::modules::serialization::{format_repr_f64, join_repr_f64};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::f64::consts::PI;
use std::io::Write;

/// Hit counts for one offset hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDistribution {
    pub offset: Offset,
    pub sector_counts: [u64; SECTOR_COUNT],
    pub ring_counts: [u64; RING_COUNT],
    pub valid_samples: u64,
    pub discarded_samples: u64,
}

impl CellDistribution {
    fn empty(offset: Offset) -> Self {
        Self {
            offset,
            sector_counts: [0; SECTOR_COUNT],
            ring_counts: [0; RING_COUNT],
            valid_samples: 0,
            discarded_samples: 0,
        }
    }

    /// True when no sample reached the rings; frequencies are then NaN.
    pub fn is_degenerate(&self) -> bool {
        self.valid_samples == 0
    }

    pub fn sector_frequencies(&self) -> [f64; SECTOR_COUNT] {
        self.sector_counts
            .map(|count| count as f64 / self.valid_samples as f64)
    }

    pub fn ring_frequencies(&self) -> [f64; RING_COUNT] {
        self.ring_counts
            .map(|count| count as f64 / self.valid_samples as f64)
    }

    /// The three database lines for this cell, newline terminated.
    pub fn render_record(&self) -> String {
        format!(
            "{},{}\n{}\n{}\n",
            format_repr_f64(self.offset.x),
            format_repr_f64(self.offset.y),
            join_repr_f64(&self.sector_frequencies()),
            join_repr_f64(&self.ring_frequencies())
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub seed: u64,
    pub samples_per_offset: usize,
    pub cells: usize,
    pub valid_samples: u64,
    pub discarded_samples: u64,
    pub degenerate_cells: Vec<Offset>,
}

#[derive(Debug, Clone)]
pub struct BeamspotSampler {
    cross_section: CrossSection,
    grid: OffsetGrid,
    detector_distance: f64,
    ring_edges: [f64; RING_COUNT + 1],
    samples_per_offset: usize,
}

impl BeamspotSampler {
    pub fn new(config: &SamplerConfig) -> JanusResult<Self> {
        config.validate()?;
        Ok(Self {
            cross_section: config.cross_section(),
            grid: config.grid()?,
            detector_distance: config.detector_distance,
            ring_edges: theta_bounds(config.detector_distance),
            samples_per_offset: config.samples_per_offset,
        })
    }

    pub fn grid(&self) -> &OffsetGrid {
        &self.grid
    }

    /// Random stream for the cell at `cell_index` in sweep order.
    ///
    /// Streams depend only on the run seed and the cell position, so the
    /// database does not change with the worker count.
    pub fn cell_rng(seed: u64, cell_index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(cell_index as u64);
        rng
    }

    pub fn sample_cell<R: Rng + ?Sized>(&self, offset: Offset, rng: &mut R) -> CellDistribution {
        let mut cell = CellDistribution::empty(offset);
        let distance = self.detector_distance;

        for _ in 0..self.samples_per_offset {
            let theta = self.cross_section.sample_theta(rng.r#gen::<f64>());
            let phi = (rng.r#gen::<f64>() * 2.0 - 1.0) * PI;

            let rho = distance * theta.tan();
            let shifted_x = rho * phi.cos() - offset.x;
            let shifted_y = rho * phi.sin() - offset.y;

            let shifted_rho = (shifted_x.powi(2) + shifted_y.powi(2)).sqrt();
            let shifted_theta = shifted_rho.atan2(distance);
            let mut shifted_phi = shifted_y.atan2(shifted_x);
            if shifted_phi < 0.0 {
                shifted_phi += 2.0 * PI;
            }

            let Some(ring) = ring_for_theta(&self.ring_edges, shifted_theta) else {
                cell.discarded_samples += 1;
                continue;
            };
            cell.ring_counts[ring - 1] += 1;
            cell.sector_counts[sector_for_phi(shifted_phi) - 1] += 1;
            cell.valid_samples += 1;
        }

        cell
    }

    /// Samples every cell of the grid and writes the database records in
    /// sweep order.
    ///
    /// Cells of one x row are sampled in parallel; the row is written as a
    /// whole before the next row starts.
    pub fn sweep<W: Write>(&self, seed: u64, writer: &mut W) -> JanusResult<SweepSummary> {
        let axis = self.grid.axis_values();
        let mut summary = SweepSummary {
            seed,
            samples_per_offset: self.samples_per_offset,
            cells: 0,
            valid_samples: 0,
            discarded_samples: 0,
            degenerate_cells: Vec::new(),
        };

        for (row_index, x) in axis.iter().copied().enumerate() {
            let row: Vec<CellDistribution> = axis
                .par_iter()
                .enumerate()
                .map(|(column_index, y)| {
                    let mut rng = Self::cell_rng(seed, row_index * axis.len() + column_index);
                    self.sample_cell(Offset::new(x, *y), &mut rng)
                })
                .collect();

            for cell in &row {
                if cell.is_degenerate() {
                    tracing::warn!(
                        x = cell.offset.x,
                        y = cell.offset.y,
                        "no sample reached the detector rings; record written with nan frequencies"
                    );
                    summary.degenerate_cells.push(cell.offset);
                }
                summary.cells += 1;
                summary.valid_samples += cell.valid_samples;
                summary.discarded_samples += cell.discarded_samples;

                writer
                    .write_all(cell.render_record().as_bytes())
                    .map_err(|source| {
                        JanusError::io_system(
                            "IO.BEAMSPOT_WRITE",
                            format!("failed to write beam-spot record: {}", source),
                        )
                    })?;
            }
            writer.flush().map_err(|source| {
                JanusError::io_system(
                    "IO.BEAMSPOT_WRITE",
                    format!("failed to flush beam-spot database: {}", source),
                )
            })?;

            tracing::debug!(
                row = row_index + 1,
                rows = axis.len(),
                x,
                "beam-spot row complete"
            );
        }

        Ok(summary)
    }
}
