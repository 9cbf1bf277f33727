use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

/// Stylesheets compiled into the binary
#[derive(Embed)]
#[folder = "assets/"]
struct WidgetAssets;

pub async fn serve(Path(path): Path<String>) -> Response {
    let Some(file) = WidgetAssets::get(&path) else {
        tracing::debug!("No embedded asset at {}", path);
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        file.data.into_owned(),
    )
        .into_response()
}
