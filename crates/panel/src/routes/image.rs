//! Image proxy route.
//!
//! Serves images from the configured storage disk with the manipulations
//! named in a signed URL (see [`crate::PanelManager::image`]).

use axum::{
    Router,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::imaging::{ImageOptions, MAX_INPUT_SIZE, Manipulations, manipulate};
use crate::state::AppState;
use crate::url::UrlGenerator;

/// Create the image proxy route.
pub fn router(urls: &UrlGenerator) -> Router<AppState> {
    Router::new().route(&urls.route_path("/image/{*path}"), get(serve_image))
}

/// Validate an image path to prevent directory traversal attacks.
///
/// Uses component-by-component validation rather than substring matching
/// to prevent normalization bypass attacks.
fn validate_image_path(path: &str) -> bool {
    if path.is_empty() || path.contains('\0') {
        return false;
    }
    // Reject absolute paths (Unix and Windows)
    if path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    if path.len() >= 2 && path.as_bytes()[1] == b':' {
        return false;
    }
    for component in path.split(['/', '\\']) {
        if component == ".." || component == "." {
            return false;
        }
    }
    true
}

/// GET /admin/image/{path}?{manipulations}&s={signature}
async fn serve_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<Manipulations>,
) -> AppResult<Response> {
    if !validate_image_path(&path) {
        return Err(AppError::BadRequest("invalid image path".to_string()));
    }

    state.signer().verify(&path, &params).inspect_err(|e| {
        debug!(path = %path, error = %e, "rejected image request");
    })?;

    let manager = state.manager();
    let disk = manager.storage()?;

    if !disk.exists(&path).await? || !manager.is_image(&path).await? {
        return Err(AppError::NotFound);
    }

    let size = disk.size(&path).await?;
    if size > MAX_INPUT_SIZE as u64 {
        warn!(path = %path, size, "image exceeds the processing size limit");
        return Err(AppError::PayloadTooLarge);
    }

    let original = disk.read(&path).await?;
    let options = ImageOptions::from_manipulations(&params);

    // Decoding and encoding are CPU-bound; keep them off the async workers.
    let result = tokio::task::spawn_blocking(move || manipulate(&original, &options)).await;

    let (data, format) = match result {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(path = %path, error = %e, "failed to process image");
            return Err(AppError::Internal(e));
        }
        Err(e) => {
            warn!(path = %path, error = %e, "image processing task panicked");
            return Err(AppError::Internal(anyhow::anyhow!("image processing failed")));
        }
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CACHE_CONTROL, "public, max-age=31536000"),
        ],
        Body::from(data),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_validation_rejects_traversal() {
        assert!(!validate_image_path(""));
        assert!(!validate_image_path("../etc/passwd"));
        assert!(!validate_image_path("foo/../../etc/passwd"));
        assert!(!validate_image_path("/etc/passwd"));
        assert!(!validate_image_path("\\windows\\system32"));
        assert!(!validate_image_path("C:file.jpg"));
        assert!(!validate_image_path("foo\0bar.jpg"));
        assert!(!validate_image_path("foo/./bar.jpg"));
    }

    #[test]
    fn path_validation_accepts_valid() {
        assert!(validate_image_path("photo.jpg"));
        assert!(validate_image_path("uploads/2024/photo.jpg"));
        assert!(validate_image_path("file..name.jpg"));
    }
}
