use crate::models::AnalysisResult;
use serde::{Deserialize, Serialize};

/// Successful body of `POST /analyze`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: String,
    pub image_url: String,
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            success: true,
            result: result.text,
            image_url: result.image_url,
        }
    }
}
