//! Serving the built javascript and stylesheet from the dist directory.
//!
//! Only used while assets are unpublished; published assets are served by
//! the web server straight from the public root.

use axum::{
    Router,
    body::Body,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::fs;
use tracing::warn;

use crate::asset::AssetKind;
use crate::state::AppState;
use crate::url::UrlGenerator;

/// Create the asset routes.
pub fn router(urls: &UrlGenerator) -> Router<AppState> {
    Router::new()
        .route(&urls.route_path("/assets/js"), get(serve_js))
        .route(&urls.route_path("/assets/css"), get(serve_css))
}

async fn serve_js(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    serve(&state, AssetKind::Script, query.is_some()).await
}

async fn serve_css(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    serve(&state, AssetKind::Style, query.is_some()).await
}

/// Versioned requests (carrying the manifest's cache-busting query) are cached for a year.
async fn serve(state: &AppState, kind: AssetKind, versioned: bool) -> Response {
    let file = state.manager().assets().dist_file(kind);

    let content = match fs::read(&file).await {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %file.display(), error = %e, "failed to read asset");
            }
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
    };

    let cache_control = if versioned {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, kind.content_type()),
            (header::CACHE_CONTROL, cache_control),
        ],
        Body::from(content),
    )
        .into_response()
}
