pub mod analysis;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod storage;

pub use analysis::AnalysisService;
pub use metrics::{get_metrics, init_metrics};
pub use prompt::DIAGNOSIS_PROMPT;
pub use storage::{LocalStorage, Storage, StorageError};
