//! Storage disks.
//!
//! Uploaded files live on named disks; configuration picks the one the
//! panel reads images from.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Bytes inspected when sniffing a file's type.
const SNIFF_LEN: u64 = 8192;

/// Storage disk trait.
#[async_trait]
pub trait Disk: Send + Sync {
    /// Read data from the disk at the given path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Check if a file exists.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Size of the file in bytes.
    async fn size(&self, path: &str) -> Result<u64>;

    /// Detect the MIME type from the file's contents.
    ///
    /// `None` when the contents match no known signature.
    async fn mime_type(&self, path: &str) -> Result<Option<String>>;

    /// Get the disk name (e.g., "local", "public").
    fn name(&self) -> &str;
}

/// Local filesystem disk.
pub struct LocalDisk {
    name: String,
    root: PathBuf,
}

impl LocalDisk {
    /// Create a new local disk rooted at `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Resolve a disk-relative path.
    ///
    /// Rejects absolute paths and `..` components to prevent directory traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        for component in relative.components() {
            if !matches!(component, Component::Normal(_) | Component::CurDir) {
                anyhow::bail!("directory traversal not allowed in storage path");
            }
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Disk for LocalDisk {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        let data = fs::read(&full).await.context("failed to read file")?;
        debug!(disk = %self.name, path = %path, size = data.len(), "file read");
        Ok(data)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full = self.resolve(path)?;
        Ok(fs::try_exists(&full).await.unwrap_or(false))
    }

    async fn size(&self, path: &str) -> Result<u64> {
        let full = self.resolve(path)?;
        let metadata = fs::metadata(&full)
            .await
            .with_context(|| format!("failed to stat {path} on disk '{}'", self.name))?;
        Ok(metadata.len())
    }

    async fn mime_type(&self, path: &str) -> Result<Option<String>> {
        let full = self.resolve(path)?;
        let file = fs::File::open(&full)
            .await
            .with_context(|| format!("failed to open {path} on disk '{}'", self.name))?;

        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        file.take(SNIFF_LEN)
            .read_to_end(&mut head)
            .await
            .context("failed to read file header")?;

        Ok(infer::get(&head).map(|kind| kind.mime_type().to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for LocalDisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDisk")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish()
    }
}

/// Named storage disks.
#[derive(Clone, Default)]
pub struct StorageManager {
    disks: BTreeMap<String, Arc<dyn Disk>>,
}

impl StorageManager {
    /// Create local disks for every configured root.
    pub fn from_roots(roots: &BTreeMap<String, PathBuf>) -> Self {
        let disks = roots
            .iter()
            .map(|(name, root)| {
                (
                    name.clone(),
                    Arc::new(LocalDisk::new(name.clone(), root.clone())) as Arc<dyn Disk>,
                )
            })
            .collect();
        Self { disks }
    }

    /// Look up a disk by name.
    pub fn disk(&self, name: &str) -> Result<Arc<dyn Disk>> {
        self.disks
            .get(name)
            .cloned()
            .with_context(|| format!("storage disk '{name}' is not configured"))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.disks.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("disks", &self.disks.keys().collect::<Vec<_>>())
            .finish()
    }
}
