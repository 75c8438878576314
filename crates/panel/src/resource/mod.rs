//! Admin resources: discovery, construction and the slug registry.
//!
//! A resource describes one administrable entity ("Posts", "Users"). The
//! panel learns about resources from two places:
//! - YAML documents under the resources directory (`kind: resource`)
//! - Rust types registered on the [`ResourceCatalog`]
//!
//! The [`ResourceRegistry`] is the slug-keyed view the navigation and the
//! resource routes consume.

mod catalog;
mod declared;
mod error;
mod registry;

pub use catalog::{ResourceCatalog, ResourceRegistration};
pub use declared::DeclaredResource;
pub use error::ResourceError;
pub use registry::{RegisteredResource, ResourceRegistry};

/// Icon used when a resource does not name one.
pub const DEFAULT_ICON: &str = "heroicon-o-collection";

/// An administrable entity descriptor.
pub trait Resource: Send + Sync {
    /// URL-safe unique key of the resource (`posts`).
    fn slug(&self) -> &str;

    /// Singular, human-readable name (`post`).
    fn label(&self) -> &str;

    fn icon(&self) -> &str {
        DEFAULT_ICON
    }

    /// Navigation weight; lower sorts first.
    fn sort(&self) -> i32 {
        0
    }

    /// The action the resource opens with (usually a listing).
    fn default_action(&self) -> Option<&str> {
        None
    }

    /// Whether the resource gets a navigation entry.
    fn has_default_action(&self) -> bool {
        self.default_action().is_some()
    }
}

/// Check that a slug only uses URL-safe characters.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("posts"));
        assert!(is_valid_slug("blog-posts_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Posts"));
        assert!(!is_valid_slug("blog/posts"));
        assert!(!is_valid_slug("../etc"));
    }
}
