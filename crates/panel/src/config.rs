//! Configuration loaded from environment variables.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Application secret used to sign image URLs.
    pub app_key: String,

    /// Absolute base URL used when generating links (default: http://localhost:{port}).
    pub base_url: String,

    /// URL path segment the panel is mounted under (default: "admin").
    pub path: String,

    /// Directory scanned for declared resources (default: ./resources).
    pub resources_dir: PathBuf,

    /// Identifier prefix for declared resources (default: "app::resources").
    pub resource_namespace: String,

    /// Directory holding the built assets and their manifest (default: ./dist).
    pub dist_dir: PathBuf,

    /// Public web root; published assets live under vendor/atrium (default: ./public).
    pub public_dir: PathBuf,

    /// Name of the storage disk used for uploaded files (default: "local").
    pub storage_disk: String,

    /// Root directories of the configured storage disks, by name.
    pub disks: BTreeMap<String, PathBuf>,

    /// Optional directory of templates overriding the built-in ones.
    pub templates_dir: Option<PathBuf>,

    /// Label of the dashboard navigation entry (default: "Dashboard").
    pub dashboard_label: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let app_key = env::var("APP_KEY").context("APP_KEY environment variable is required")?;
        if app_key.is_empty() {
            anyhow::bail!("APP_KEY must not be empty");
        }

        let base_url =
            env::var("ATRIUM_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let path = env::var("ATRIUM_PATH")
            .map(|p| p.trim_matches('/').to_string())
            .unwrap_or_else(|_| "admin".to_string());

        let resources_dir = env::var("ATRIUM_RESOURCES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./resources"));

        let resource_namespace = env::var("ATRIUM_RESOURCE_NAMESPACE")
            .unwrap_or_else(|_| "app::resources".to_string());

        let dist_dir = env::var("ATRIUM_DIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./dist"));

        let public_dir = env::var("ATRIUM_PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let storage_disk = env::var("ATRIUM_STORAGE_DISK").unwrap_or_else(|_| "local".to_string());

        let storage_root = env::var("ATRIUM_STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage/app"));

        let templates_dir = env::var("ATRIUM_TEMPLATES_DIR").ok().map(PathBuf::from);

        let dashboard_label =
            env::var("ATRIUM_DASHBOARD_LABEL").unwrap_or_else(|_| "Dashboard".to_string());

        Ok(Self {
            port,
            app_key,
            base_url,
            path,
            resources_dir,
            resource_namespace,
            dist_dir,
            public_dir,
            storage_disk,
            disks: default_disks(storage_root),
            templates_dir,
            dashboard_label,
        })
    }

    /// Build a configuration rooted at `root`, with every directory beneath it.
    ///
    /// Used by tests and the CLI when no environment is available.
    pub fn rooted_at(root: impl Into<PathBuf>, app_key: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            port: 3000,
            app_key: app_key.into(),
            base_url: "http://localhost".to_string(),
            path: "admin".to_string(),
            resources_dir: root.join("resources"),
            resource_namespace: "app::resources".to_string(),
            dist_dir: root.join("dist"),
            public_dir: root.join("public"),
            storage_disk: "local".to_string(),
            disks: default_disks(root.join("storage/app")),
            templates_dir: None,
            dashboard_label: "Dashboard".to_string(),
        }
    }

    /// Directory published assets are copied into.
    pub fn published_dir(&self) -> PathBuf {
        self.public_dir.join("vendor").join("atrium")
    }
}

/// `local` points at the storage root, `public` at its `public` subdirectory.
fn default_disks(root: PathBuf) -> BTreeMap<String, PathBuf> {
    let mut disks = BTreeMap::new();
    disks.insert("public".to_string(), root.join("public"));
    disks.insert("local".to_string(), root);
    disks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_config_places_directories_under_root() {
        let config = Config::rooted_at("/srv/panel", "secret");
        assert_eq!(config.dist_dir, PathBuf::from("/srv/panel/dist"));
        assert_eq!(
            config.published_dir(),
            PathBuf::from("/srv/panel/public/vendor/atrium")
        );
        assert_eq!(
            config.disks.get("public"),
            Some(&PathBuf::from("/srv/panel/storage/app/public"))
        );
        assert_eq!(config.storage_disk, "local");
    }
}
