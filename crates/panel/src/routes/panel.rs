//! Dashboard and resource listing pages.

use axum::{
    Router,
    extract::{Path, State},
    http::Uri,
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::markup::Markup;
use crate::state::AppState;
use crate::text;
use crate::theme::PageFrame;
use crate::url::{UrlGenerator, names};

/// Create the panel page routes.
pub fn router(urls: &UrlGenerator) -> Router<AppState> {
    Router::new()
        .route(&urls.route_path(""), get(dashboard))
        .route(&urls.route_path("/resources/{resource}"), get(resource_index))
}

/// GET /admin: the dashboard.
async fn dashboard(State(state): State<AppState>, uri: Uri) -> AppResult<Markup> {
    let manager = state.manager();
    let navigation = manager.navigation()?;

    let frame = PageFrame {
        title: &state.config().dashboard_label,
        navigation,
        route_name: Some(names::DASHBOARD),
        path: uri.path(),
        scripts: manager.scripts(),
        styles: manager.styles(),
    };

    let mut context = tera::Context::new();
    context.insert("resource_count", &manager.resources()?.len());

    Ok(state.theme().render_page("dashboard.html", &frame, context)?)
}

/// GET /admin/resources/{resource}: listing page of one resource.
async fn resource_index(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
) -> AppResult<Markup> {
    let manager = state.manager();
    let registry = manager.resources()?;

    let resource = registry.get(&slug).ok_or(AppError::NotFound)?;
    let identifier = registry.identifier(&slug).unwrap_or_default();
    let title = text::title(&text::plural(resource.label()));

    let frame = PageFrame {
        title: &title,
        navigation: manager.navigation()?,
        route_name: Some(names::RESOURCE),
        path: uri.path(),
        scripts: manager.scripts(),
        styles: manager.styles(),
    };

    let mut context = tera::Context::new();
    context.insert("slug", &slug);
    context.insert("identifier", identifier);
    context.insert("action", resource.default_action().unwrap_or_default());

    Ok(state.theme().render_page("resource.html", &frame, context)?)
}
