//! Vision model provider abstraction.
//!
//! The service only ever needs one capability from a model: look at an image
//! with a prompt and answer in free text. Providers implement
//! [`VisionProvider`]; Gemini is the production backend and the mock backs
//! the tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Image handed to the model.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Model answer, verbatim.
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
        }
    }
}

/// Trait for image understanding providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Ask the model about a single image.
    async fn analyze(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logs and metrics.
    fn model(&self) -> &str;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
