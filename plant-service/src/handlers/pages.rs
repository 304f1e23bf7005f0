use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Landing page, served at both `/` and `/plant-disease-detector`.
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
