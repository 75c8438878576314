//! Resource discovery error types.

use thiserror::Error;

/// Errors that abort building the resource registry.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resources directory could not be read.
    #[error("failed to scan resources at {path}: {source}")]
    Scan {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A resource document could not be parsed.
    #[error("resource '{identifier}': malformed definition: {details}")]
    Malformed { identifier: String, details: String },

    /// A resource extends an identifier that is not a declared resource.
    #[error("resource '{identifier}': extends unknown resource '{parent}'")]
    UnknownParent { identifier: String, parent: String },

    /// A chain of `extends` loops back on itself.
    #[error("circular resource inheritance: {chain}")]
    CircularInheritance { chain: String },

    /// A resource's constructor failed.
    #[error("resource '{identifier}': construction failed: {details}")]
    Construction { identifier: String, details: String },

    /// A resource reported a slug that is not URL-safe.
    #[error("resource '{identifier}': invalid slug '{slug}' (use lowercase letters, digits, '-' or '_')")]
    InvalidSlug { identifier: String, slug: String },
}
