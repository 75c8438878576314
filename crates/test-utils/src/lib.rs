//! Atrium test utilities.
//!
//! Helpers for integration testing: throwaway panel directories, resource
//! document builders, file signatures, and assertion utilities for
//! rendered markup.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Leading bytes of a PNG file.
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// Leading bytes of a GIF file.
pub const GIF_SIGNATURE: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

/// Leading bytes of a JPEG file.
pub const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Leading bytes of a WebP file.
pub const WEBP_SIGNATURE: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";

/// A panel root in a unique temporary directory, removed on drop.
///
/// Layout mirrors a deployed panel:
/// `resources/`, `dist/`, `public/` and `storage/app/`.
#[derive(Debug)]
pub struct TestWorkspace {
    root: PathBuf,
}

impl TestWorkspace {
    /// Create an empty workspace. `label` only helps identify leftovers.
    pub fn new(label: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "atrium_test_{label}_{}",
            Uuid::now_v7().simple()
        ));
        for dir in ["resources", "dist", "public", "storage/app"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.root.join("resources")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    pub fn published_dir(&self) -> PathBuf {
        self.root.join("public/vendor/atrium")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.root.join("storage/app")
    }

    /// Write a file relative to the workspace root, creating parents.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a resource document under `resources/`.
    pub fn write_resource(&self, relative: &str, yaml: &str) -> PathBuf {
        self.write(&format!("resources/{relative}"), yaml)
    }

    /// Write `dist/mix-manifest.json`.
    pub fn write_dist_manifest(&self, manifest: JsonValue) -> PathBuf {
        self.write("dist/mix-manifest.json", manifest.to_string())
    }

    /// Write `public/vendor/atrium/mix-manifest.json`.
    pub fn write_published_manifest(&self, manifest: JsonValue) -> PathBuf {
        self.write("public/vendor/atrium/mix-manifest.json", manifest.to_string())
    }

    /// Write a file onto the `local` storage disk.
    pub fn write_storage_file(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        self.write(&format!("storage/app/{relative}"), contents)
    }
}

impl Drop for TestWorkspace {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

/// Create a resource document builder.
pub fn test_resource() -> TestResource {
    TestResource::default()
}

/// A resource document builder.
#[derive(Debug, Clone, Default)]
pub struct TestResource {
    pub is_abstract: bool,
    pub extends: Option<String>,
    pub slug: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub sort: Option<i32>,
    pub default_action: Option<String>,
}

impl TestResource {
    /// Mark as an abstract template.
    pub fn abstract_template(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, identifier: &str) -> Self {
        self.extends = Some(identifier.to_string());
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn sort(mut self, sort: i32) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Give the resource a default action so it shows in navigation.
    pub fn listed(mut self) -> Self {
        self.default_action = Some("list".to_string());
        self
    }

    /// Render as a YAML document.
    pub fn to_yaml(&self) -> String {
        let mut yaml = String::from("kind: resource\n");
        if self.is_abstract {
            yaml.push_str("abstract: true\n");
        }
        let fields = [
            ("extends", &self.extends),
            ("slug", &self.slug),
            ("label", &self.label),
            ("icon", &self.icon),
            ("default_action", &self.default_action),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                yaml.push_str(&format!("{key}: \"{value}\"\n"));
            }
        }
        if let Some(sort) = self.sort {
            yaml.push_str(&format!("sort: {sort}\n"));
        }
        yaml
    }
}

/// Assertion helpers for rendered markup.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that `needle` occurs exactly `expected` times.
    pub fn occurrences(haystack: &str, needle: &str, expected: usize) {
        let actual = haystack.matches(needle).count();
        assert_eq!(
            actual, expected,
            "Expected '{}' {} time(s), found {}\nActual: {}",
            needle, expected, actual, haystack
        );
    }
}
