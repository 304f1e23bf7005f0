//! Mock provider implementation for testing.

use super::{FinishReason, ImageInput, ProviderError, ProviderResponse, VisionProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const MOCK_MODEL: &str = "mock-vision";

enum Behavior {
    Respond(String),
    Fail(String),
}

/// Mock vision provider that answers with a fixed text or a fixed failure.
pub struct MockVisionProvider {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockVisionProvider {
    /// Answer every request with `text`.
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Respond(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every request with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `analyze` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn analyze(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Respond(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4 + image.data.len() as i32 / 1024,
                output_tokens: text.len() as i32 / 4,
                finish_reason: FinishReason::Complete,
            }),
            Behavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
