//! Outcome of one diagnosis request.

use crate::models::Upload;

/// The model's verbatim answer together with the stored image it describes.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Free text returned by the model. Never parsed or truncated.
    pub text: String,

    /// Public path of the analysed image.
    pub image_url: String,

    /// Model that produced the answer.
    pub model: String,

    pub input_tokens: i32,
    pub output_tokens: i32,
}

impl AnalysisResult {
    pub fn new(upload: &Upload, model: impl Into<String>, text: String) -> Self {
        Self {
            text,
            image_url: upload.public_url(),
            model: model.into(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }

    pub fn with_usage(mut self, input_tokens: i32, output_tokens: i32) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self
    }
}
