//! Slug-keyed registry of constructed resources.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::{Resource, ResourceError, ResourceRegistration, is_valid_slug};

/// One constructed resource and the identifier it was registered under.
pub struct RegisteredResource {
    identifier: String,
    resource: Box<dyn Resource>,
}

impl RegisteredResource {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn resource(&self) -> &dyn Resource {
        self.resource.as_ref()
    }
}

impl fmt::Debug for RegisteredResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredResource")
            .field("identifier", &self.identifier)
            .field("slug", &self.resource.slug())
            .finish()
    }
}

/// Mapping from slug to resource.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, RegisteredResource>,
}

impl ResourceRegistry {
    /// Construct every registration and key it by its slug.
    ///
    /// Any constructor failure aborts the whole build. A later registration
    /// with an already-used slug replaces the earlier one.
    pub fn build(registrations: &[ResourceRegistration]) -> Result<Self, ResourceError> {
        let mut resources = BTreeMap::new();

        for registration in registrations {
            let resource = registration.construct()?;
            let slug = resource.slug().to_string();

            if !is_valid_slug(&slug) {
                return Err(ResourceError::InvalidSlug {
                    identifier: registration.identifier().to_string(),
                    slug,
                });
            }

            let entry = RegisteredResource {
                identifier: registration.identifier().to_string(),
                resource,
            };

            if let Some(previous) = resources.insert(slug.clone(), entry) {
                warn!(
                    slug = %slug,
                    replaced = %previous.identifier,
                    by = %registration.identifier(),
                    "duplicate resource slug"
                );
            }
        }

        debug!(count = resources.len(), "built resource registry");
        Ok(Self { resources })
    }

    /// The identifier registered for `slug`.
    pub fn identifier(&self, slug: &str) -> Option<&str> {
        self.resources.get(slug).map(|r| r.identifier())
    }

    /// The resource registered for `slug`.
    pub fn get(&self, slug: &str) -> Option<&dyn Resource> {
        self.resources.get(slug).map(|r| r.resource())
    }

    /// Iterate `(slug, entry)` pairs in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredResource)> {
        self.resources.iter().map(|(slug, r)| (slug.as_str(), r))
    }

    /// The slug → identifier mapping.
    pub fn identifiers(&self) -> BTreeMap<&str, &str> {
        self.iter().map(|(slug, r)| (slug, r.identifier())).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
