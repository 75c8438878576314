#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Script and style tag rendering, and asset publishing.

mod common;

use atrium_panel::asset::{self, AssetKind};
use atrium_test_utils::{TestWorkspace, assert};
use serde_json::json;

use common::manager;

const STALE_SCRIPTS: &str =
    r#"<script>console.warn("Atrium: The published javascript assets are out of date.\n");</script>"#;
const STALE_STYLES: &str =
    r#"<script>console.warn("Atrium: The published style assets are out of date.\n");</script>"#;

fn dist_manifest(workspace: &TestWorkspace) {
    workspace.write_dist_manifest(json!({
        "/js/filament.js": "/js/filament.js?id=xyz",
        "/css/filament.css": "/css/filament.css?id=abc",
    }));
}

#[test]
fn unpublished_assets_point_at_the_asset_routes() {
    let workspace = TestWorkspace::new("unpublished");
    dist_manifest(&workspace);
    let manager = manager(&workspace);

    assert_eq!(
        manager.scripts().as_str(),
        "<!-- Atrium Scripts -->\n\
         <script src=\"http://localhost/admin/assets/js?id=xyz\" data-turbolinks-eval=\"false\"></script>"
    );
    assert_eq!(
        manager.styles().as_str(),
        "<!-- Atrium Styles -->\n\
         <link rel=\"stylesheet\" href=\"http://localhost/admin/assets/css?id=abc\">"
    );
}

#[test]
fn published_assets_matching_dist_are_used_without_warning() {
    let workspace = TestWorkspace::new("published");
    dist_manifest(&workspace);
    workspace.write_published_manifest(json!({
        "/js/filament.js": "/js/filament.js?id=xyz",
        "/css/filament.css": "/css/filament.css?id=abc",
    }));
    let manager = manager(&workspace);

    assert_eq!(
        manager.scripts().as_str(),
        "<!-- Atrium Published Scripts -->\n\
         <script src=\"/vendor/atrium/js/filament.js?id=xyz\" data-turbolinks-eval=\"false\"></script>"
    );
    assert_eq!(
        manager.styles().as_str(),
        "<!-- Atrium Published Styles -->\n\
         <link rel=\"stylesheet\" href=\"/vendor/atrium/css/filament.css?id=abc\">"
    );
}

#[test]
fn stale_published_assets_warn_once() {
    let workspace = TestWorkspace::new("stale");
    dist_manifest(&workspace);
    workspace.write_published_manifest(json!({
        "/js/filament.js": "/js/filament.js?id=old",
        "/css/filament.css": "/css/filament.css?id=abc",
    }));
    let manager = manager(&workspace);

    let scripts = manager.scripts();
    assert_eq!(
        scripts.as_str(),
        format!(
            "<!-- Atrium Published Scripts -->\n{STALE_SCRIPTS}\n\
             <script src=\"/vendor/atrium/js/filament.js?id=old\" data-turbolinks-eval=\"false\"></script>"
        )
    );
    assert::occurrences(scripts.as_str(), "console.warn", 1);

    // Styles still match, so only the scripts carry a warning.
    assert::not_contains(manager.styles().as_str(), "console.warn");
}

#[test]
fn published_without_dist_counts_as_stale() {
    let workspace = TestWorkspace::new("published_only");
    workspace.write_published_manifest(json!({
        "/css/filament.css": "/css/filament.css?id=abc",
    }));
    let manager = manager(&workspace);

    let styles = manager.styles();
    assert::contains(styles.as_str(), STALE_STYLES);
    assert::contains(styles.as_str(), "href=\"/vendor/atrium/css/filament.css?id=abc\"");
}

#[test]
fn empty_published_entry_is_not_published() {
    let workspace = TestWorkspace::new("published_empty");
    dist_manifest(&workspace);
    workspace.write_published_manifest(json!({
        "/js/filament.js": "",
    }));
    let manager = manager(&workspace);

    assert_eq!(
        manager.scripts().as_str(),
        "<!-- Atrium Scripts -->\n\
         <script src=\"http://localhost/admin/assets/js?id=xyz\" data-turbolinks-eval=\"false\"></script>"
    );
    assert!(manager.assets().published_asset(AssetKind::Script).is_none());
}

#[test]
fn missing_manifests_fall_back_to_bare_routes() {
    let workspace = TestWorkspace::new("no_manifest");
    let manager = manager(&workspace);

    assert_eq!(
        manager.scripts().as_str(),
        "<!-- Atrium Scripts -->\n\
         <script src=\"http://localhost/admin/assets/js\" data-turbolinks-eval=\"false\"></script>"
    );
    assert_eq!(
        manager.styles().as_str(),
        "<!-- Atrium Styles -->\n<link rel=\"stylesheet\" href=\"http://localhost/admin/assets/css\">"
    );
}

#[test]
fn invalid_dist_manifest_is_treated_as_empty() {
    let workspace = TestWorkspace::new("invalid_manifest");
    workspace.write("dist/mix-manifest.json", "{ not json");
    let manager = manager(&workspace);

    assert::contains(
        manager.scripts().as_str(),
        "src=\"http://localhost/admin/assets/js\"",
    );
}

#[test]
fn hashed_dist_asset_forwards_its_version_query() {
    let workspace = TestWorkspace::new("hashed");
    workspace.write_dist_manifest(json!({"/js/filament.js": "/js/filament.abc123.js?id=xyz"}));
    let manager = manager(&workspace);

    assert::contains(
        manager.scripts().as_str(),
        "<script src=\"http://localhost/admin/assets/js?id=xyz\" data-turbolinks-eval=\"false\"></script>",
    );
    assert_eq!(
        manager.assets().dist_file(AssetKind::Script),
        workspace.dist_dir().join("js/filament.abc123.js")
    );
}

#[test]
fn dist_file_strips_version_query() {
    let workspace = TestWorkspace::new("dist_file");
    dist_manifest(&workspace);
    let manager = manager(&workspace);

    assert_eq!(
        manager.assets().dist_file(AssetKind::Script),
        workspace.dist_dir().join("js/filament.js")
    );
}

#[test]
fn publish_copies_manifest_and_assets() {
    let workspace = TestWorkspace::new("publish");
    dist_manifest(&workspace);
    workspace.write("dist/js/filament.js", "console.log('atrium');");
    workspace.write("dist/css/filament.css", "body{}");

    let report = asset::publish(&workspace.dist_dir(), &workspace.published_dir(), false).unwrap();
    assert_eq!(
        report.copied,
        vec!["css/filament.css", "js/filament.js", "mix-manifest.json"]
    );
    assert!(report.skipped.is_empty());
    assert_eq!(
        std::fs::read_to_string(workspace.published_dir().join("js/filament.js")).unwrap(),
        "console.log('atrium');"
    );

    // Freshly published assets match the dist manifest.
    let manager = manager(&workspace);
    assert::contains(manager.scripts().as_str(), "Atrium Published Scripts");
    assert::not_contains(manager.scripts().as_str(), "console.warn");
}

#[test]
fn publish_keeps_existing_files_unless_forced() {
    let workspace = TestWorkspace::new("publish_force");
    dist_manifest(&workspace);
    workspace.write("dist/js/filament.js", "new");
    workspace.write("dist/css/filament.css", "new");
    workspace.write("public/vendor/atrium/js/filament.js", "old");

    let report = asset::publish(&workspace.dist_dir(), &workspace.published_dir(), false).unwrap();
    assert_eq!(report.skipped, vec!["js/filament.js"]);
    assert_eq!(
        std::fs::read_to_string(workspace.published_dir().join("js/filament.js")).unwrap(),
        "old"
    );

    let report = asset::publish(&workspace.dist_dir(), &workspace.published_dir(), true).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(
        std::fs::read_to_string(workspace.published_dir().join("js/filament.js")).unwrap(),
        "new"
    );
}

#[test]
fn publish_requires_a_dist_manifest() {
    let workspace = TestWorkspace::new("publish_missing");
    assert!(asset::publish(&workspace.dist_dir(), &workspace.published_dir(), false).is_err());
}

#[test]
fn publish_with_an_empty_manifest_copies_only_the_manifest() {
    let workspace = TestWorkspace::new("publish_empty");
    workspace.write_dist_manifest(json!({"/js/filament.js": ""}));

    let report = asset::publish(&workspace.dist_dir(), &workspace.published_dir(), false).unwrap();
    assert_eq!(report.copied, vec!["mix-manifest.json"]);
}
