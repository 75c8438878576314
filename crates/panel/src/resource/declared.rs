//! Resources declared as YAML documents.
//!
//! ```yaml
//! kind: resource
//! extends: app::resources::BaseResource
//! label: blog post
//! icon: heroicon-o-document-text
//! sort: 10
//! default_action: list
//! ```
//!
//! Documents marked `abstract: true` are templates: they never reach the
//! registry but concrete documents can `extends` them to inherit `label`,
//! `icon`, `sort` and `default_action`. The slug is never inherited.

use std::collections::HashMap;

use serde::Deserialize;

use super::{DEFAULT_ICON, Resource, ResourceError};
use crate::text;

/// Raw contents of a resource document, before inheritance is applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResourceDocument {
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort: Option<i32>,
    #[serde(default)]
    pub default_action: Option<String>,
}

impl ResourceDocument {
    /// Parse a YAML document.
    ///
    /// Returns `Ok(None)` for documents that are valid YAML but do not
    /// declare `kind: resource`.
    pub(crate) fn parse(identifier: &str, contents: &str) -> Result<Option<Self>, ResourceError> {
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_yml::Value =
            serde_yml::from_str(contents).map_err(|e| ResourceError::Malformed {
                identifier: identifier.to_string(),
                details: e.to_string(),
            })?;

        let kind = value.get("kind").and_then(|k| k.as_str());
        if kind != Some("resource") {
            return Ok(None);
        }

        serde_yml::from_value(value)
            .map(Some)
            .map_err(|e| ResourceError::Malformed {
                identifier: identifier.to_string(),
                details: e.to_string(),
            })
    }
}

/// A concrete resource built from a YAML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredResource {
    slug: String,
    label: String,
    icon: String,
    sort: i32,
    default_action: Option<String>,
}

impl DeclaredResource {
    /// Resolve the document named `identifier`, applying its `extends` chain.
    ///
    /// `documents` holds every resource document found by the scan,
    /// abstract ones included.
    pub(crate) fn resolve(
        identifier: &str,
        documents: &HashMap<String, ResourceDocument>,
    ) -> Result<Self, ResourceError> {
        let doc = documents
            .get(identifier)
            .ok_or_else(|| ResourceError::Construction {
                identifier: identifier.to_string(),
                details: "no document for identifier".to_string(),
            })?;

        let mut label = doc.label.clone();
        let mut icon = doc.icon.clone();
        let mut sort = doc.sort;
        let mut default_action = doc.default_action.clone();

        let mut chain = vec![identifier.to_string()];
        let mut next = doc.extends.clone();
        while let Some(parent) = next {
            if chain.contains(&parent) {
                chain.push(parent);
                return Err(ResourceError::CircularInheritance {
                    chain: chain.join(" -> "),
                });
            }

            let parent_doc =
                documents
                    .get(&parent)
                    .ok_or_else(|| ResourceError::UnknownParent {
                        identifier: chain.last().cloned().unwrap_or_default(),
                        parent: parent.clone(),
                    })?;

            label = label.or_else(|| parent_doc.label.clone());
            icon = icon.or_else(|| parent_doc.icon.clone());
            sort = sort.or(parent_doc.sort);
            default_action = default_action.or_else(|| parent_doc.default_action.clone());

            chain.push(parent);
            next = parent_doc.extends.clone();
        }

        let stem = stem(identifier);
        let slug = doc
            .slug
            .clone()
            .unwrap_or_else(|| text::plural(&text::kebab(stem)));
        let label = label.unwrap_or_else(|| text::words(stem).join(" "));

        Ok(Self {
            slug,
            label,
            icon: icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            sort: sort.unwrap_or(0),
            default_action,
        })
    }
}

/// Last segment of the identifier without a trailing "Resource".
fn stem(identifier: &str) -> &str {
    const SUFFIX: &str = "resource";

    let name = identifier.rsplit("::").next().unwrap_or(identifier);
    let split = name.len().saturating_sub(SUFFIX.len());
    match (name.get(..split), name.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(SUFFIX) => {
            let head = head.trim_end_matches(['_', '-']);
            if head.is_empty() { name } else { head }
        }
        _ => name,
    }
}

impl Resource for DeclaredResource {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn icon(&self) -> &str {
        &self.icon
    }

    fn sort(&self) -> i32 {
        self.sort
    }

    fn default_action(&self) -> Option<&str> {
        self.default_action.as_deref()
    }
}
