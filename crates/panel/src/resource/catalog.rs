//! Resource discovery sources.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::declared::{DeclaredResource, ResourceDocument};
use super::{Resource, ResourceError};

type Constructor = Arc<dyn Fn() -> Result<Box<dyn Resource>, ResourceError> + Send + Sync>;

/// A named, fallible way to construct one resource.
#[derive(Clone)]
pub struct ResourceRegistration {
    identifier: String,
    constructor: Constructor,
}

impl ResourceRegistration {
    /// Register a resource with a custom constructor.
    pub fn new<F>(identifier: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Resource>, ResourceError> + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            constructor: Arc::new(constructor),
        }
    }

    /// Register a resource type that builds from `Default`.
    pub fn of<R>(identifier: impl Into<String>) -> Self
    where
        R: Resource + Default + 'static,
    {
        Self::new(identifier, || Ok(Box::new(R::default()) as Box<dyn Resource>))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Build a fresh instance of the resource.
    pub fn construct(&self) -> Result<Box<dyn Resource>, ResourceError> {
        (self.constructor)()
    }
}

impl fmt::Debug for ResourceRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistration")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Where the panel looks for resources.
///
/// Declared resources come first, in path order, followed by registered
/// types in registration order. When two resources share a slug, the later
/// one wins in the registry.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    directory: Option<(PathBuf, String)>,
    registered: Vec<ResourceRegistration>,
}

impl ResourceCatalog {
    /// Create a catalog with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` for resource documents, naming them under `namespace`.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        self.directory = Some((dir.into(), namespace.into()));
        self
    }

    /// Add an explicitly registered resource.
    pub fn register(&mut self, registration: ResourceRegistration) -> &mut Self {
        self.registered.push(registration);
        self
    }

    /// Add a `Default`-constructible resource type.
    pub fn register_type<R>(&mut self, identifier: impl Into<String>) -> &mut Self
    where
        R: Resource + Default + 'static,
    {
        self.register(ResourceRegistration::of::<R>(identifier))
    }

    /// Collect the registrations of every concrete resource.
    ///
    /// Reads the resources directory on every call.
    pub fn discover(&self) -> Result<Vec<ResourceRegistration>, ResourceError> {
        let mut registrations = match &self.directory {
            Some((dir, namespace)) => discover_declared(dir, namespace)?,
            None => Vec::new(),
        };

        registrations.extend(self.registered.iter().cloned());
        Ok(registrations)
    }
}

/// Scan `dir` and turn every concrete resource document into a registration.
fn discover_declared(
    dir: &Path,
    namespace: &str,
) -> Result<Vec<ResourceRegistration>, ResourceError> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "resources directory not found");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let mut order = Vec::new();
    let mut documents = HashMap::new();

    for file in files {
        let Ok(relative) = file.strip_prefix(dir) else {
            continue;
        };

        let is_yaml = matches!(
            file.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        if !is_yaml {
            debug!(path = %file.display(), "skipping non-resource file");
            continue;
        }

        let identifier = identifier_for(namespace, relative);
        let contents = std::fs::read_to_string(&file).map_err(|source| ResourceError::Scan {
            path: file.display().to_string(),
            source,
        })?;

        if let Some(document) = ResourceDocument::parse(&identifier, &contents)? {
            if !document.is_abstract {
                order.push(identifier.clone());
            }
            documents.insert(identifier, document);
        }
    }

    let mut registrations = Vec::with_capacity(order.len());

    for identifier in order {
        // Resolve eagerly so a broken `extends` chain fails discovery.
        let resource = DeclaredResource::resolve(&identifier, &documents)?;
        debug!(identifier = %identifier, slug = %resource.slug(), "discovered resource");
        registrations.push(ResourceRegistration::new(identifier, move || {
            Ok(Box::new(resource.clone()) as Box<dyn Resource>)
        }));
    }

    Ok(registrations)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ResourceError> {
    let scan_error = |source: std::io::Error| ResourceError::Scan {
        path: dir.display().to_string(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(scan_error)? {
        let path = entry.map_err(scan_error)?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }

    Ok(())
}

/// `blog/PostResource.yaml` under `app::resources` → `app::resources::blog::PostResource`.
fn identifier_for(namespace: &str, relative: &Path) -> String {
    let mut segments: Vec<String> = namespace
        .split("::")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let components: Vec<_> = relative.components().collect();
    for (i, component) in components.iter().enumerate() {
        let part = component.as_os_str().to_string_lossy();
        if i + 1 == components.len() {
            let stem = Path::new(part.as_ref())
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| part.to_string());
            segments.push(stem);
        } else {
            segments.push(part.to_string());
        }
    }

    segments.join("::")
}
