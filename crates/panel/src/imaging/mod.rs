//! Image URL signing and on-the-fly manipulation.

mod manipulate;
mod signer;

pub use manipulate::{Fit, ImageOptions, MAX_INPUT_SIZE, OutputFormat, manipulate};
pub use signer::{Manipulations, SIGNATURE_PARAM, SignatureError, SignedPath, UrlSigner};

/// MIME types [`crate::PanelManager::is_image`] accepts.
pub const IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/gif", "image/png"];

/// Exact, case-sensitive check against [`IMAGE_MIME_TYPES`].
pub fn is_image_mime(mime: &str) -> bool {
    IMAGE_MIME_TYPES.contains(&mime)
}
