//! URL generation for the panel's named routes.

use anyhow::{Context, Result};
use url::Url;

use crate::asset::AssetKind;
use crate::imaging::SignedPath;

/// Route names, used for active-state matching in navigation.
pub mod names {
    pub const DASHBOARD: &str = "atrium.dashboard";
    pub const RESOURCE: &str = "atrium.resource";
    pub const IMAGE: &str = "atrium.image";
    pub const ASSETS_JS: &str = "atrium.assets.js";
    pub const ASSETS_CSS: &str = "atrium.assets.css";
}

/// Builds absolute URLs for the panel's routes.
#[derive(Debug, Clone)]
pub struct UrlGenerator {
    base: Url,
    prefix: String,
}

impl UrlGenerator {
    /// Create a generator for routes mounted under `/{prefix}` on `base_url`.
    pub fn new(base_url: &str, prefix: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("base URL cannot carry paths: {base_url}");
        }

        Ok(Self {
            base,
            prefix: prefix.trim_matches('/').to_string(),
        })
    }

    /// Mount prefix without slashes (`admin`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Router path for a route suffix (`/resources/{resource}` → `/admin/resources/{resource}`).
    pub fn route_path(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            if suffix.is_empty() {
                return "/".to_string();
            }
            return suffix.to_string();
        }
        format!("/{}{suffix}", self.prefix)
    }

    pub fn dashboard(&self) -> String {
        self.to(&[], &[])
    }

    /// Listing page of the resource `slug`.
    pub fn resource(&self, slug: &str) -> String {
        self.to(&["resources", slug], &[])
    }

    /// Image proxy URL for a signed path.
    pub fn image(&self, signed: &SignedPath) -> String {
        let mut segments = vec!["image"];
        segments.extend(signed.path.split('/').filter(|s| !s.is_empty()));

        let mut url = self.build(&segments);
        url.set_query(Some(&signed.query));
        url.to_string()
    }

    /// Asset-serving route for `kind`, forwarding `params` as the query string.
    pub fn asset(&self, kind: AssetKind, params: &[(String, String)]) -> String {
        let segment = match kind {
            AssetKind::Script => "js",
            AssetKind::Style => "css",
        };
        self.to(&["assets", segment], params)
    }

    fn to(&self, segments: &[&str], params: &[(String, String)]) -> String {
        let mut url = self.build(segments);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url.to_string()
    }

    /// Base URL with the prefix and `segments` appended, each percent-encoded.
    fn build(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            if !self.prefix.is_empty() {
                path.extend(self.prefix.split('/'));
            }
            path.extend(segments);
        }

        url
    }
}
