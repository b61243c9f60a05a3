//! Chi-square surface plots for two-parameter GOSIA2 fits.
//!
//! Reads the tab-separated output of `chisqsurface`, lays the projectile,
//! target and total chi-square values onto a grid of the two matrix elements
//! and renders each as a heatmap. The one-sigma region (total within one of
//! the minimum) yields the best fit and the matrix-element bounds.

mod model;
mod parser;
mod render;

pub use model::{ChiSquareSurface, ElementBounds, SurfaceMatrix};
pub use parser::{ChiSquarePoint, LevelLabel, TransitionLevels, parse_chisq_source};
pub use render::{CELL_PIXELS, hot_colormap, render_heatmap, write_heatmap};

use super::ToolExecutor;
use crate::domain::{AnalysisTool, ComputeResult, JanusError, ToolArtifact, ToolRequest};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes of the four heatmaps written next to the image stem.
pub const HEATMAP_SUFFIXES: [&str; 4] = ["_proj", "_targ", "_tot", "_tot_onesigma"];

#[derive(Debug, Clone)]
pub struct ChiSquareReport {
    pub surface: ChiSquareSurface,
    pub summary: String,
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ChiSquareModule {
    levels: TransitionLevels,
}

impl ChiSquareModule {
    pub fn new(levels: TransitionLevels) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &TransitionLevels {
        &self.levels
    }

    /// Reads the surface from the request input and writes the heatmaps using
    /// the request output path as the file stem.
    pub fn run(&self, request: &ToolRequest) -> ComputeResult<ChiSquareReport> {
        request.ensure_tool(AnalysisTool::ChiSquare, "INPUT.CHISQ_TOOL")?;
        let input = request.require_input("INPUT.CHISQ_FILE")?;

        let source = fs::read_to_string(input).map_err(|source| {
            JanusError::io_system(
                "IO.CHISQ_INPUT",
                format!(
                    "failed to read chi-square surface '{}': {}",
                    input.display(),
                    source
                ),
            )
        })?;
        let points = parse_chisq_source(&source)?;
        let surface = ChiSquareSurface::from_points(&points)?;
        tracing::info!(
            points = points.len(),
            columns = surface.x_elements.len(),
            rows = surface.y_elements.len(),
            chi_min = surface.chi_min,
            "loaded chi-square surface"
        );

        let matrices = [
            &surface.projectile,
            &surface.target,
            &surface.total,
            &surface.one_sigma,
        ];
        let mut images = Vec::with_capacity(HEATMAP_SUFFIXES.len());
        for (matrix, suffix) in matrices.into_iter().zip(HEATMAP_SUFFIXES) {
            let path = heatmap_path(&request.output_path, suffix);
            write_heatmap(matrix, &path)?;
            tracing::debug!(path = %path.display(), "wrote heatmap");
            images.push(path);
        }

        let summary = surface.render_summary(&self.levels);
        Ok(ChiSquareReport {
            surface,
            summary,
            images,
        })
    }
}

impl ToolExecutor for ChiSquareModule {
    fn execute(&self, request: &ToolRequest) -> ComputeResult<Vec<ToolArtifact>> {
        let report = self.run(request)?;
        Ok(report.images.iter().map(ToolArtifact::new).collect())
    }
}

/// The input path without its extension, used as the default image stem.
pub fn image_stem(input: &Path) -> PathBuf {
    input.with_extension("")
}

fn heatmap_path(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(suffix);
    name.push(".png");
    PathBuf::from(name)
}
