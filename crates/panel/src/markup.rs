//! Trusted HTML markup.
//!
//! [`Markup`] marks a string as safe to embed in a page without escaping.
//! It is only built from strings the panel controls: build manifests,
//! fixed tag shapes and templates rendered with autoescaping.

use std::fmt;

use axum::response::{Html, IntoResponse, Response};

/// HTML that is embedded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap markup assembled from build-controlled values.
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl IntoResponse for Markup {
    fn into_response(self) -> Response {
        Html(self.into_string()).into_response()
    }
}
