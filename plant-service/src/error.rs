//! Error envelope for the analyze endpoint.

use crate::services::providers::ProviderError;
use crate::services::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("No image uploaded")]
    MissingImage,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Upload exceeds the maximum allowed size")]
    PayloadTooLarge,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analysis(#[from] ProviderError),
}

impl AnalyzeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::MissingImage | AnalyzeError::EmptyFilename => StatusCode::BAD_REQUEST,
            AnalyzeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AnalyzeError::Storage(_) | AnalyzeError::Analysis(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ValidationResponse {
            error: String,
        }

        #[derive(Serialize)]
        struct FailureResponse {
            success: bool,
            error: String,
        }

        let status = self.status_code();
        let error = self.to_string();

        if status.is_server_error() {
            (
                status,
                Json(FailureResponse {
                    success: false,
                    error,
                }),
            )
                .into_response()
        } else {
            (status, Json(ValidationResponse { error })).into_response()
        }
    }
}
