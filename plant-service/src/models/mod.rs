//! Domain models for the plant service.

pub mod analysis;
pub mod upload;

pub use analysis::AnalysisResult;
pub use upload::Upload;
