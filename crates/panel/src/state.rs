//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::imaging::UrlSigner;
use crate::manager::PanelManager;
use crate::resource::ResourceCatalog;
use crate::storage::StorageManager;
use crate::theme::ThemeEngine;
use crate::url::UrlGenerator;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything in here is
/// immutable; per-request data lives in [`PanelManager`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Arc<Config>,

    /// Where resources are discovered from.
    catalog: Arc<ResourceCatalog>,

    /// Named storage disks.
    storage: Arc<StorageManager>,

    /// Image URL signer keyed by the application key.
    signer: UrlSigner,

    /// Route URL builder.
    urls: UrlGenerator,

    /// Theme engine for template rendering.
    theme: ThemeEngine,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Resources are discovered from the configured directory plus
    /// whatever `catalog` already has registered.
    pub fn new(config: Config, catalog: ResourceCatalog) -> Result<Self> {
        let catalog =
            catalog.with_directory(&config.resources_dir, config.resource_namespace.clone());

        let storage = StorageManager::from_roots(&config.disks);
        storage.disk(&config.storage_disk).with_context(|| {
            let known: Vec<_> = storage.names().collect();
            format!(
                "ATRIUM_STORAGE_DISK names an unknown disk (configured: {})",
                known.join(", ")
            )
        })?;

        let signer = UrlSigner::new(&config.app_key)?;
        let urls = UrlGenerator::new(&config.base_url, &config.path)?;
        let theme = ThemeEngine::new(config.templates_dir.as_deref())
            .context("failed to initialize theme engine")?;

        info!(
            path = %urls.route_path(""),
            disk = %config.storage_disk,
            resources_dir = %config.resources_dir.display(),
            "panel state initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: Arc::new(config),
                catalog: Arc::new(catalog),
                storage: Arc::new(storage),
                signer,
                urls,
                theme,
            }),
        })
    }

    /// A fresh manager for one request.
    pub fn manager(&self) -> PanelManager {
        PanelManager::new(
            self.inner.config.clone(),
            self.inner.catalog.clone(),
            self.inner.storage.clone(),
            self.inner.signer.clone(),
            self.inner.urls.clone(),
        )
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn urls(&self) -> &UrlGenerator {
        &self.inner.urls
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.inner.signer
    }

    pub fn storage(&self) -> &StorageManager {
        &self.inner.storage
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }
}
