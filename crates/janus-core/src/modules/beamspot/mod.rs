//! Monte Carlo beam-spot database.
//!
//! For every beam offset on a square grid, particles are drawn from the
//! Rutherford cross section, displaced by the offset and classified into the
//! sector and ring they would hit on the downstream detector. The normalized
//! hit distributions are compared offline with measured ones to locate the
//! beam spot.

mod config;
mod model;

pub use config::{
    CrossSection, DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_OFFSET_EXTENT,
    DEFAULT_OFFSET_STEPS_PER_CM, DEFAULT_SAMPLES_PER_OFFSET, MAX_OFFSET_AXIS_POINTS, Offset,
    OffsetGrid, SamplerConfig,
};
pub use model::{BeamspotSampler, CellDistribution, SweepSummary};

use super::ToolExecutor;
use crate::domain::{AnalysisTool, ComputeResult, JanusError, ToolArtifact, ToolRequest};
use std::fs::File;
use std::io::BufWriter;

pub const BEAMSPOT_DATABASE_FILE: &str = "beamspotDatabase.txt";

#[derive(Debug, Clone)]
pub struct BeamspotModule {
    sampler: BeamspotSampler,
    seed: u64,
}

impl BeamspotModule {
    /// Builds the module; without a configured seed a fresh one is drawn.
    pub fn new(config: &SamplerConfig) -> ComputeResult<Self> {
        let sampler = BeamspotSampler::new(config)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self { sampler, seed })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Creates the database file, then sweeps the grid into it.
    pub fn run(&self, request: &ToolRequest) -> ComputeResult<SweepSummary> {
        request.ensure_tool(AnalysisTool::Beamspot, "INPUT.BEAMSPOT_TOOL")?;

        let file = File::create(&request.output_path).map_err(|source| {
            JanusError::io_system(
                "IO.BEAMSPOT_OUTPUT",
                format!(
                    "failed to open beam-spot database '{}' for writing: {}",
                    request.output_path.display(),
                    source
                ),
            )
        })?;
        let mut writer = BufWriter::new(file);

        tracing::info!(
            seed = self.seed,
            cells = self.sampler.grid().cell_count(),
            output = %request.output_path.display(),
            "starting beam-spot sweep"
        );
        let summary = self.sampler.sweep(self.seed, &mut writer)?;
        if !summary.degenerate_cells.is_empty() {
            tracing::warn!(
                count = summary.degenerate_cells.len(),
                "beam-spot cells without valid samples were written with nan frequencies"
            );
        }
        Ok(summary)
    }
}

impl ToolExecutor for BeamspotModule {
    fn execute(&self, request: &ToolRequest) -> ComputeResult<Vec<ToolArtifact>> {
        self.run(request)?;
        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}

#[cfg(test)]
mod tests {
    use super::{BEAMSPOT_DATABASE_FILE, BeamspotModule, SamplerConfig};
    use crate::domain::{AnalysisTool, JanusErrorCategory, ToolRequest};
    use crate::modules::ToolExecutor;
    use std::fs;
    use tempfile::TempDir;

    fn small_config(seed: u64) -> SamplerConfig {
        SamplerConfig {
            samples_per_offset: 100,
            offset_extent: 0.01,
            seed: Some(seed),
            ..SamplerConfig::default()
        }
    }

    #[test]
    fn execute_writes_database_artifact() {
        let temp = TempDir::new().expect("tempdir should be created");
        let output = temp.path().join(BEAMSPOT_DATABASE_FILE);
        let module = BeamspotModule::new(&small_config(3)).expect("module should build");

        let artifacts = module
            .execute(&ToolRequest::new(AnalysisTool::Beamspot, &output))
            .expect("sweep should succeed");

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, output);
        let content = fs::read_to_string(&output).expect("database should be readable");
        assert_eq!(content.lines().count(), 27);
    }

    #[test]
    fn configured_seed_is_used_verbatim() {
        let module = BeamspotModule::new(&small_config(1234)).expect("module should build");
        assert_eq!(module.seed(), 1234);
    }

    #[test]
    fn unwritable_output_fails_before_sampling() {
        let temp = TempDir::new().expect("tempdir should be created");
        let output = temp.path().join("missing-dir").join(BEAMSPOT_DATABASE_FILE);
        let module = BeamspotModule::new(&small_config(3)).expect("module should build");

        let error = module
            .run(&ToolRequest::new(AnalysisTool::Beamspot, &output))
            .expect_err("missing parent directory should fail");

        assert_eq!(error.category(), JanusErrorCategory::IoSystemError);
        assert_eq!(error.placeholder(), "IO.BEAMSPOT_OUTPUT");
        assert!(!output.exists());
    }

    #[test]
    fn invalid_configuration_is_rejected_at_construction() {
        let config = SamplerConfig {
            detector_distance: -1.0,
            ..SamplerConfig::default()
        };
        let error = BeamspotModule::new(&config).expect_err("negative distance should fail");
        assert_eq!(error.placeholder(), "INPUT.BEAMSPOT_DISTANCE");
    }
}
