//! Per-request panel facade.
//!
//! A [`PanelManager`] is cheap to create and meant to live for one request.
//! The resource registry and the navigation are computed on first use and
//! stay fixed for the manager's lifetime; a new request gets a new manager
//! and therefore sees resources added in the meantime.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::asset::AssetRenderer;
use crate::config::Config;
use crate::imaging::{Manipulations, UrlSigner, is_image_mime};
use crate::markup::Markup;
use crate::navigation::Navigation;
use crate::resource::{ResourceCatalog, ResourceError, ResourceRegistry};
use crate::storage::{Disk, StorageManager};
use crate::url::UrlGenerator;

/// Request-scoped access to the panel's navigation, resources, images and assets.
pub struct PanelManager {
    config: Arc<Config>,
    catalog: Arc<ResourceCatalog>,
    storage: Arc<StorageManager>,
    signer: UrlSigner,
    urls: UrlGenerator,
    navigation: OnceLock<Navigation>,
    resources: OnceLock<ResourceRegistry>,
}

impl PanelManager {
    pub fn new(
        config: Arc<Config>,
        catalog: Arc<ResourceCatalog>,
        storage: Arc<StorageManager>,
        signer: UrlSigner,
        urls: UrlGenerator,
    ) -> Self {
        Self {
            config,
            catalog,
            storage,
            signer,
            urls,
            navigation: OnceLock::new(),
            resources: OnceLock::new(),
        }
    }

    /// The navigation, built on first call.
    pub fn navigation(&self) -> Result<&Navigation, ResourceError> {
        if let Some(navigation) = self.navigation.get() {
            return Ok(navigation);
        }

        let navigation =
            Navigation::build(self.resources()?, &self.urls, &self.config.dashboard_label);
        Ok(self.navigation.get_or_init(|| navigation))
    }

    /// The slug-keyed resource registry, discovered on first call.
    pub fn resources(&self) -> Result<&ResourceRegistry, ResourceError> {
        if let Some(resources) = self.resources.get() {
            return Ok(resources);
        }

        let registrations = self.catalog.discover()?;
        let registry = ResourceRegistry::build(&registrations)?;
        Ok(self.resources.get_or_init(|| registry))
    }

    /// Signed URL serving `path` through the image proxy with `manipulations` applied.
    pub fn image(&self, path: &str, manipulations: &Manipulations) -> String {
        let signed = self.signer.sign(path, manipulations);
        self.urls.image(&signed)
    }

    /// Whether the stored `file` is a JPEG, GIF or PNG image.
    pub async fn is_image(&self, file: &str) -> Result<bool> {
        let mime = self.storage()?.mime_type(file).await?;
        Ok(mime.as_deref().is_some_and(is_image_mime))
    }

    /// The disk configured for panel uploads.
    pub fn storage(&self) -> Result<Arc<dyn Disk>> {
        self.storage.disk(&self.config.storage_disk)
    }

    /// Script tags for the panel's javascript.
    pub fn scripts(&self) -> Markup {
        self.assets().scripts()
    }

    /// Stylesheet tags for the panel's css.
    pub fn styles(&self) -> Markup {
        self.assets().styles()
    }

    pub fn assets(&self) -> AssetRenderer {
        AssetRenderer::new(&self.config.dist_dir, self.config.published_dir(), self.urls.clone())
    }

    /// Path inside the dist directory.
    pub fn dist_path(&self, path: &str) -> PathBuf {
        join_relative(&self.config.dist_dir, path)
    }

    /// Path inside the public web root.
    pub fn public_path(&self, path: &str) -> PathBuf {
        join_relative(&self.config.public_dir, path)
    }

    pub fn urls(&self) -> &UrlGenerator {
        &self.urls
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn join_relative(base: &Path, path: &str) -> PathBuf {
    base.join(path.trim_start_matches('/'))
}
