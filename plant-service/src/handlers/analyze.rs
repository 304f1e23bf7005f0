use crate::dtos::AnalyzeResponse;
use crate::error::AnalyzeError;
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

struct ImageField {
    file_name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    // A non-multipart body simply has no image in it.
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Request is not a multipart form");
        AnalyzeError::MissingImage
    })?;

    let image = read_image_field(&mut multipart).await?;

    if image.file_name.is_empty() {
        return Err(AnalyzeError::EmptyFilename);
    }

    tracing::info!(
        filename = %image.file_name,
        size = image.data.len(),
        "Analysis requested"
    );

    let result = state
        .analysis
        .diagnose(&image.file_name, image.content_type.as_deref(), image.data)
        .await?;

    Ok(Json(AnalyzeResponse::from(result)))
}

/// Find the first `image` part that is a file. Parts without a file name are
/// plain form values and do not count as an upload.
async fn read_image_field(multipart: &mut Multipart) -> Result<ImageField, AnalyzeError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(AnalyzeError::MissingImage),
            Err(e) => return Err(multipart_error(e)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(multipart_error)?.to_vec();

        return Ok(ImageField {
            file_name,
            content_type,
            data,
        });
    }
}

fn multipart_error(e: MultipartError) -> AnalyzeError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, "Upload rejected by size limit");
        AnalyzeError::PayloadTooLarge
    } else {
        tracing::debug!(error = %e, "Malformed multipart body");
        AnalyzeError::MissingImage
    }
}
