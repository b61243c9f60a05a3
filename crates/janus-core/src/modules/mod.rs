pub mod beamspot;
pub mod chisq;
pub mod phi_pattern;
pub mod serialization;

mod traits;

pub use traits::ToolExecutor;
