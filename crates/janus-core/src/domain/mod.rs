pub mod errors;

pub use errors::{
    ComputeResult, ExitStatus, JanusError, JanusErrorCategory, JanusResult, ParserResult,
};

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTool {
    Beamspot,
    PhiPattern,
    ChiSquare,
}

impl AnalysisTool {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beamspot => "BEAMSPOT",
            Self::PhiPattern => "PHI_PATTERN",
            Self::ChiSquare => "CHISQ",
        }
    }
}

impl Display for AnalysisTool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Where a tool reads its input from and where its primary artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub tool: AnalysisTool,
    pub input_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl ToolRequest {
    pub fn new(tool: AnalysisTool, output_path: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            input_path: None,
            output_path: output_path.into(),
        }
    }

    pub fn with_input(mut self, input_path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(input_path.into());
        self
    }

    pub fn require_input(&self, placeholder: &'static str) -> JanusResult<&Path> {
        self.input_path.as_deref().ok_or_else(|| {
            JanusError::input_validation(
                placeholder,
                format!("{} requires an input file", self.tool),
            )
        })
    }

    pub fn ensure_tool(&self, expected: AnalysisTool, placeholder: &'static str) -> JanusResult<()> {
        if self.tool != expected {
            return Err(JanusError::input_validation(
                placeholder,
                format!(
                    "{} executor received a request for {}",
                    expected, self.tool
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArtifact {
    pub path: PathBuf,
}

impl ToolArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
