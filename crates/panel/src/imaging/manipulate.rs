//! Applying manipulations to stored images.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use super::Manipulations;

/// Maximum allowed dimension (width or height) of a manipulated image.
const MAX_DIMENSION: u32 = 4096;

/// Maximum input file size for image processing (50 MB).
pub const MAX_INPUT_SIZE: usize = 50 * 1024 * 1024;

const DEFAULT_QUALITY: u8 = 90;

/// How an image is fitted into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale down or up to fit inside the box, keeping the aspect ratio.
    Contain,
    /// Fill the box and crop the overflow.
    Crop,
    /// Ignore the aspect ratio.
    Stretch,
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Gif => "image/gif",
        }
    }

    fn from_param(value: &str) -> Option<Self> {
        match value {
            "jpg" | "jpeg" | "pjpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "gif" => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    fn from_image_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => OutputFormat::Png,
            ImageFormat::Gif => OutputFormat::Gif,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Parsed manipulation parameters. Unknown or invalid values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
    pub format: Option<OutputFormat>,
    pub quality: u8,
}

impl ImageOptions {
    pub fn from_manipulations(params: &Manipulations) -> Self {
        let dimension = |key: &str| {
            params
                .get(key)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .map(|v| v.min(MAX_DIMENSION))
        };

        let fit = match params.get("fit").map(String::as_str) {
            Some("crop") => Fit::Crop,
            Some("stretch") => Fit::Stretch,
            _ => Fit::Contain,
        };

        let quality = params
            .get("q")
            .and_then(|v| v.parse::<u8>().ok())
            .map(|q| q.clamp(1, 100))
            .unwrap_or(DEFAULT_QUALITY);

        Self {
            width: dimension("w"),
            height: dimension("h"),
            fit,
            format: params.get("fm").and_then(|v| OutputFormat::from_param(v)),
            quality,
        }
    }
}

/// Decode `original`, apply `options` and re-encode.
///
/// Returns the encoded bytes and their content type.
pub fn manipulate(original: &[u8], options: &ImageOptions) -> Result<(Vec<u8>, OutputFormat)> {
    if original.len() > MAX_INPUT_SIZE {
        anyhow::bail!(
            "image too large: {} bytes exceeds {} byte limit",
            original.len(),
            MAX_INPUT_SIZE
        );
    }

    let source_format = image::guess_format(original).context("unrecognized image format")?;
    let img = image::load_from_memory_with_format(original, source_format)
        .context("failed to load image")?;

    let img = resize(img, options);
    let format = options
        .format
        .unwrap_or_else(|| OutputFormat::from_image_format(source_format));

    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, options.quality);
            rgb.write_with_encoder(encoder)
                .context("failed to encode jpeg")?;
        }
        OutputFormat::Png => img
            .write_to(&mut buf, ImageFormat::Png)
            .context("failed to encode png")?,
        OutputFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut buf, ImageFormat::Gif)
            .context("failed to encode gif")?,
    }

    Ok((buf.into_inner(), format))
}

fn resize(img: DynamicImage, options: &ImageOptions) -> DynamicImage {
    if options.width.is_none() && options.height.is_none() {
        return img;
    }

    let w = options.width.unwrap_or(img.width().min(MAX_DIMENSION));
    let h = options.height.unwrap_or(img.height().min(MAX_DIMENSION));

    match options.fit {
        Fit::Contain => {
            // A missing dimension only constrains through the aspect ratio.
            let bound_w = options.width.unwrap_or(MAX_DIMENSION);
            let bound_h = options.height.unwrap_or(MAX_DIMENSION);
            img.resize(bound_w, bound_h, FilterType::Lanczos3)
        }
        Fit::Crop => img.resize_to_fill(w, h, FilterType::Lanczos3),
        Fit::Stretch => img.resize_exact(w, h, FilterType::Lanczos3),
    }
}
