#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP routes and image handling.

mod common;

use std::io::Cursor;

use atrium_panel::imaging::{MAX_INPUT_SIZE, Manipulations};
use atrium_test_utils::{
    GIF_SIGNATURE, JPEG_SIGNATURE, PNG_SIGNATURE, TestWorkspace, WEBP_SIGNATURE, assert,
    test_resource,
};
use axum::http::{StatusCode, header};
use image::{ImageFormat, RgbImage};
use serde_json::json;

use common::{TestApp, manager, response_bytes, response_text, state};

/// A solid 8x4 PNG.
fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 4, image::Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn manipulations(pairs: &[(&str, &str)]) -> Manipulations {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Absolute URL → request URI.
fn local(url: &str) -> &str {
    url.strip_prefix("http://localhost").unwrap()
}

#[tokio::test]
async fn dashboard_renders_navigation_and_assets() {
    let workspace = TestWorkspace::new("route_dashboard");
    workspace.write_resource(
        "PostResource.yaml",
        &test_resource().icon("heroicon-o-document").listed().to_yaml(),
    );
    workspace.write_dist_manifest(json!({"/js/filament.js": "/js/filament.js?id=xyz"}));
    let app = TestApp::new(state(&workspace));

    let response = app.get("/admin").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert::contains(&html, "<title>Dashboard</title>");
    assert::contains(&html, "href=\"http://localhost/admin/resources/posts\"");
    assert::contains(&html, "heroicon-o-document");
    assert::contains(&html, "1 resource registered.");
    assert::contains(
        &html,
        "<script src=\"http://localhost/admin/assets/js?id=xyz\" data-turbolinks-eval=\"false\"></script>",
    );
    assert::occurrences(&html, "class=\"active\"", 1);
}

#[tokio::test]
async fn resource_page_is_served_by_slug() {
    let workspace = TestWorkspace::new("route_resource");
    workspace.write_resource(
        "blog/PostResource.yaml",
        &test_resource().label("article").listed().to_yaml(),
    );
    let app = TestApp::new(state(&workspace));

    let response = app.get("/admin/resources/posts").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert::contains(&html, "<h1>Articles</h1>");
    assert::contains(&html, "app::resources::blog::PostResource");
    assert::contains(&html, "data-action=\"list\"");

    let response = app.get("/admin/resources/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn broken_resources_fail_the_page() {
    let workspace = TestWorkspace::new("route_broken");
    workspace.write_resource(
        "PostResource.yaml",
        "kind: resource\nextends: app::resources::Missing\n",
    );
    let app = TestApp::new(state(&workspace));

    let response = app.get("/admin").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn dist_assets_are_served() {
    let workspace = TestWorkspace::new("route_assets");
    workspace.write_dist_manifest(json!({"/js/filament.js": "/js/filament.js?id=xyz"}));
    workspace.write("dist/js/filament.js", "window.atrium = {};");
    let app = TestApp::new(state(&workspace));

    let response = app.get("/admin/assets/js?id=xyz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/javascript; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(response_text(response).await, "window.atrium = {};");

    let response = app.get("/admin/assets/js").await;
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let response = app.get("/admin/assets/css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signed_image_urls_are_served() {
    let workspace = TestWorkspace::new("route_image");
    workspace.write_storage_file("photos/cat.png", png_bytes());
    let state = state(&workspace);
    let app = TestApp::new(state.clone());

    let url = state
        .manager()
        .image("photos/cat.png", &manipulations(&[("w", "4")]));
    let response = app.get(local(&url)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let body = response_bytes(response).await;
    let img = image::load_from_memory(&body).unwrap();
    assert_eq!((img.width(), img.height()), (4, 2));

    let url = state
        .manager()
        .image("photos/cat.png", &manipulations(&[("fm", "jpg")]));
    let response = app.get(local(&url)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
}

#[tokio::test]
async fn image_paths_with_empty_segments_still_verify() {
    let workspace = TestWorkspace::new("route_image_segments");
    workspace.write_storage_file("photos/cat.png", png_bytes());
    let state = state(&workspace);
    let app = TestApp::new(state.clone());

    let url = state.manager().image("photos//cat.png", &Manipulations::new());
    assert!(url.starts_with("http://localhost/admin/image/photos/cat.png?s="));

    let response = app.get(local(&url)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_images_are_rejected_before_reading() {
    let workspace = TestWorkspace::new("route_image_large");
    let path = workspace.write_storage_file("huge.png", PNG_SIGNATURE);
    // Sparse: the length is past the limit without writing the bytes.
    std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap()
        .set_len(MAX_INPUT_SIZE as u64 + 1)
        .unwrap();
    let state = state(&workspace);
    let app = TestApp::new(state.clone());

    let url = state.manager().image("huge.png", &Manipulations::new());
    let response = app.get(local(&url)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn tampered_or_unsigned_image_urls_are_forbidden() {
    let workspace = TestWorkspace::new("route_image_forbidden");
    workspace.write_storage_file("photos/cat.png", png_bytes());
    let state = state(&workspace);
    let app = TestApp::new(state.clone());

    let url = state
        .manager()
        .image("photos/cat.png", &manipulations(&[("w", "4")]));
    let tampered = local(&url).replace("w=4", "w=400");
    assert_eq!(app.get(&tampered).await.status(), StatusCode::FORBIDDEN);

    let response = app.get("/admin/image/photos/cat.png?w=4").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_images_and_missing_files_are_not_found() {
    let workspace = TestWorkspace::new("route_image_missing");
    workspace.write_storage_file("notes.txt", "plain text");
    let state = state(&workspace);
    let app = TestApp::new(state.clone());

    let url = state.manager().image("notes.txt", &Manipulations::new());
    assert_eq!(app.get(local(&url)).await.status(), StatusCode::NOT_FOUND);

    let url = state.manager().image("photos/gone.png", &Manipulations::new());
    assert_eq!(app.get(local(&url)).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn is_image_accepts_jpeg_gif_and_png_only() {
    let workspace = TestWorkspace::new("is_image");
    workspace.write_storage_file("a.png", PNG_SIGNATURE);
    workspace.write_storage_file("b.gif", GIF_SIGNATURE);
    workspace.write_storage_file("c.jpg", JPEG_SIGNATURE);
    workspace.write_storage_file("d.webp", WEBP_SIGNATURE);
    workspace.write_storage_file("e.png", "not really a png");
    let manager = manager(&workspace);

    assert!(manager.is_image("a.png").await.unwrap());
    assert!(manager.is_image("b.gif").await.unwrap());
    assert!(manager.is_image("c.jpg").await.unwrap());
    assert!(!manager.is_image("d.webp").await.unwrap());
    assert!(!manager.is_image("e.png").await.unwrap());
    assert!(manager.is_image("missing.png").await.is_err());
}
