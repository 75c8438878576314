//! HTTP route handlers.

pub mod assets;
pub mod image;
pub mod panel;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the panel router with every route mounted under the configured prefix.
pub fn app(state: AppState) -> Router {
    let urls = state.urls().clone();

    Router::new()
        .merge(panel::router(&urls))
        .merge(assets::router(&urls))
        .merge(image::router(&urls))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
