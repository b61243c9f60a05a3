use crate::domain::{ComputeResult, ToolArtifact, ToolRequest};

pub trait ToolExecutor {
    fn execute(&self, request: &ToolRequest) -> ComputeResult<Vec<ToolArtifact>>;
}
