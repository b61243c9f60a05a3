//! Phi coverage patterns for the GOSIA2 beam-spot correction.
//!
//! With the beam displaced from the detector axis, the rings near the inner
//! and outer edge are only partially covered in azimuth. GOSIA2 integrates
//! over explicit phi ranges per theta, which this module derives by scanning
//! the detector edge in 0.1 degree steps.

mod model;

pub use model::{PhiCoverage, PhiPattern, PhiPatternInput};

use super::ToolExecutor;
use super::serialization::write_text_artifact;
use crate::domain::{AnalysisTool, ComputeResult, JanusError, ToolArtifact, ToolRequest};

#[derive(Debug, Clone, Copy)]
pub struct PhiPatternModule {
    input: PhiPatternInput,
}

impl PhiPatternModule {
    pub fn new(input: PhiPatternInput) -> Self {
        Self { input }
    }

    pub fn compute(&self) -> ComputeResult<PhiPattern> {
        PhiPattern::compute(self.input)
    }
}

impl ToolExecutor for PhiPatternModule {
    fn execute(&self, request: &ToolRequest) -> ComputeResult<Vec<ToolArtifact>> {
        request.ensure_tool(AnalysisTool::PhiPattern, "INPUT.PHI_TOOL")?;
        let pattern = self.compute()?;

        write_text_artifact(&request.output_path, &pattern.render()).map_err(|source| {
            JanusError::io_system(
                "IO.PHI_OUTPUT",
                format!(
                    "failed to write phi pattern '{}': {}",
                    request.output_path.display(),
                    source
                ),
            )
        })?;

        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}
