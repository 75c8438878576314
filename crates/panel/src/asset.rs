//! Script and style tags for the panel's built assets.
//!
//! The build writes `mix-manifest.json` into the dist directory, mapping a
//! logical asset (`/js/filament.js`) to its versioned path
//! (`/js/filament.js?id=abc123`). Assets can also be published into the public
//! web root, where they are served statically. When a published manifest
//! exists it wins; if it disagrees with the dist manifest the page gets a
//! console warning that the published copy is stale.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::markup::Markup;
use crate::url::UrlGenerator;

/// File name of the manifest in both the dist and the published directory.
pub const MANIFEST_FILE: &str = "mix-manifest.json";

/// Public URL prefix of published assets.
pub const PUBLISHED_PREFIX: &str = "/vendor/atrium";

/// Logical asset key → versioned path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    /// Read a manifest file.
    ///
    /// A missing or unparseable file yields an empty manifest.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to read asset manifest");
                }
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid asset manifest");
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two assets the panel ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Style,
}

impl AssetKind {
    /// Manifest key of the asset.
    pub fn key(self) -> &'static str {
        match self {
            AssetKind::Script => "/js/filament.js",
            AssetKind::Style => "/css/filament.css",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            AssetKind::Script => "application/javascript; charset=utf-8",
            AssetKind::Style => "text/css; charset=utf-8",
        }
    }

    fn description(self) -> &'static str {
        match self {
            AssetKind::Script => "javascript",
            AssetKind::Style => "style",
        }
    }

    fn comment(self, published: bool) -> &'static str {
        match (self, published) {
            (AssetKind::Script, true) => "<!-- Atrium Published Scripts -->",
            (AssetKind::Script, false) => "<!-- Atrium Scripts -->",
            (AssetKind::Style, true) => "<!-- Atrium Published Styles -->",
            (AssetKind::Style, false) => "<!-- Atrium Styles -->",
        }
    }

    fn tag(self, src: &str) -> String {
        match self {
            AssetKind::Script => {
                format!(r#"<script src="{src}" data-turbolinks-eval="false"></script>"#)
            }
            AssetKind::Style => format!(r#"<link rel="stylesheet" href="{src}">"#),
        }
    }

    fn stale_warning(self) -> String {
        format!(
            r#"<script>console.warn("Atrium: The published {} assets are out of date.\n");</script>"#,
            self.description()
        )
    }
}

/// Renders asset tags from the dist and published manifests.
#[derive(Debug, Clone)]
pub struct AssetRenderer {
    dist_dir: PathBuf,
    published_dir: PathBuf,
    urls: UrlGenerator,
}

impl AssetRenderer {
    pub fn new(
        dist_dir: impl Into<PathBuf>,
        published_dir: impl Into<PathBuf>,
        urls: UrlGenerator,
    ) -> Self {
        Self {
            dist_dir: dist_dir.into(),
            published_dir: published_dir.into(),
            urls,
        }
    }

    /// Tags for the panel's javascript.
    pub fn scripts(&self) -> Markup {
        self.render(AssetKind::Script)
    }

    /// Tags for the panel's stylesheet.
    pub fn styles(&self) -> Markup {
        self.render(AssetKind::Style)
    }

    /// Versioned path of `kind` in the dist manifest.
    pub fn dist_asset(&self, kind: AssetKind) -> Option<String> {
        Manifest::load(&self.dist_dir.join(MANIFEST_FILE))
            .get(kind.key())
            .map(str::to_string)
    }

    /// Versioned path of `kind` in the published manifest.
    ///
    /// An empty entry counts as unpublished.
    pub fn published_asset(&self, kind: AssetKind) -> Option<String> {
        Manifest::load(&self.published_dir.join(MANIFEST_FILE))
            .get(kind.key())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }

    /// File in the dist directory that the asset route serves for `kind`.
    pub fn dist_file(&self, kind: AssetKind) -> PathBuf {
        let asset = self.dist_asset(kind);
        let path = asset
            .as_deref()
            .map(|a| a.split_once('?').map_or(a, |(path, _)| path))
            .unwrap_or(kind.key());
        self.dist_dir.join(path.trim_start_matches('/'))
    }

    fn render(&self, kind: AssetKind) -> Markup {
        let asset = self.dist_asset(kind);

        if let Some(published) = self.published_asset(kind) {
            let mut lines = vec![kind.comment(true).to_string()];

            if asset.as_deref() != Some(published.as_str()) {
                warn!(
                    asset = kind.key(),
                    published = %published,
                    dist = asset.as_deref().unwrap_or("-"),
                    "published assets are out of date"
                );
                lines.push(kind.stale_warning());
            }

            lines.push(kind.tag(&format!("{PUBLISHED_PREFIX}{published}")));
            return Markup::trusted(lines.join("\n"));
        }

        let params = asset.as_deref().map(query_params).unwrap_or_default();
        let src = self.urls.asset(kind, &params);

        debug!(asset = kind.key(), src = %src, "serving unpublished asset");
        Markup::trusted([kind.comment(false).to_string(), kind.tag(&src)].join("\n"))
    }
}

/// Query parameters of a versioned asset path (`/js/a.js?id=1` → `[("id", "1")]`).
fn query_params(asset: &str) -> Vec<(String, String)> {
    match asset.split_once('?') {
        Some((_, query)) => form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        None => Vec::new(),
    }
}

/// Outcome of [`publish`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Copy the dist manifest and every file it references into `published_dir`.
///
/// Existing files are kept unless `force` is set.
pub fn publish(dist_dir: &Path, published_dir: &Path, force: bool) -> Result<PublishReport> {
    let manifest_path = dist_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        anyhow::bail!("no asset manifest at {}", manifest_path.display());
    }

    let manifest = Manifest::load(&manifest_path);
    if manifest.is_empty() {
        warn!(
            path = %manifest_path.display(),
            "asset manifest has no entries; publishing it alone"
        );
    }
    let mut report = PublishReport::default();

    let mut files: Vec<String> = manifest
        .iter()
        .map(|(_, value)| {
            value
                .split_once('?')
                .map_or(value, |(path, _)| path)
                .trim_start_matches('/')
                .to_string()
        })
        .filter(|file| !file.is_empty())
        .collect();
    files.sort();
    files.dedup();
    files.push(MANIFEST_FILE.to_string());

    for file in files {
        if file.split('/').any(|segment| segment == "..") {
            anyhow::bail!("manifest entry escapes the dist directory: {file}");
        }

        let source = dist_dir.join(&file);
        let target = published_dir.join(&file);

        if target.exists() && !force {
            report.skipped.push(file);
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(&source, &target)
            .with_context(|| format!("failed to copy {}", source.display()))?;

        debug!(file = %file, "published asset");
        report.copied.push(file);
    }

    info!(
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        target = %published_dir.display(),
        "published assets"
    );

    Ok(report)
}
