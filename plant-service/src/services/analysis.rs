//! Storage -> model orchestration for one diagnosis.

use crate::error::AnalyzeError;
use crate::models::AnalysisResult;
use crate::services::metrics::{self, AnalysisOutcome};
use crate::services::prompt::DIAGNOSIS_PROMPT;
use crate::services::providers::{ImageInput, VisionProvider};
use crate::services::Storage;
use std::sync::Arc;
use std::time::Instant;

/// MIME type used when neither the client nor the file name tells us better.
const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

#[derive(Clone)]
pub struct AnalysisService {
    storage: Arc<dyn Storage>,
    provider: Arc<dyn VisionProvider>,
}

impl AnalysisService {
    pub fn new(storage: Arc<dyn Storage>, provider: Arc<dyn VisionProvider>) -> Self {
        Self { storage, provider }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn provider(&self) -> &Arc<dyn VisionProvider> {
        &self.provider
    }

    /// Persist the image, then ask the model about the stored copy.
    pub async fn diagnose(
        &self,
        filename: &str,
        declared_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let model = self.provider.model().to_string();

        let upload = match self.storage.save_verified(filename, data).await {
            Ok(upload) => upload,
            Err(e) => {
                tracing::error!(filename = %filename, error = %e, "Failed to store upload");
                metrics::record_analysis(AnalysisOutcome::StorageFailure, &model);
                return Err(e.into());
            }
        };
        metrics::record_upload_bytes(upload.size);

        tracing::info!(
            filename = %upload.filename,
            size = upload.size,
            "Upload stored"
        );

        let bytes = self.storage.read(&upload.filename).await.map_err(|e| {
            tracing::error!(filename = %upload.filename, error = %e, "Failed to read back upload");
            metrics::record_analysis(AnalysisOutcome::StorageFailure, &model);
            AnalyzeError::from(e)
        })?;

        let image = ImageInput {
            mime_type: image_mime_type(declared_type, &upload.filename),
            data: bytes,
        };

        let started = Instant::now();
        let response = self.provider.analyze(DIAGNOSIS_PROMPT, &image).await;
        metrics::record_provider_latency(&model, started.elapsed());

        let response = response.map_err(|e| {
            tracing::error!(
                filename = %upload.filename,
                model = %model,
                error = %e,
                "Model analysis failed"
            );
            metrics::record_analysis(AnalysisOutcome::ProviderFailure, &model);
            AnalyzeError::from(e)
        })?;

        metrics::record_analysis(AnalysisOutcome::Success, &model);
        tracing::info!(
            filename = %upload.filename,
            model = %model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = response.finish_reason.as_str(),
            "Analysis completed"
        );

        Ok(AnalysisResult::new(&upload, model, response.text)
            .with_usage(response.input_tokens, response.output_tokens))
    }
}

/// Pick the MIME type sent to the model: the declared one when it is an
/// image type, else a guess from the extension, else JPEG.
pub fn image_mime_type(declared: Option<&str>, filename: &str) -> String {
    if let Some(declared) = declared {
        if declared.starts_with("image/") {
            return declared.to_string();
        }
    }

    mime_guess::from_path(filename)
        .iter()
        .find(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string())
}
