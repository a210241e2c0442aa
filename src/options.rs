//! Request options and their named defaults.
//!
//! All defaults live in `Default` impls built from named functions so the
//! serde boundary and programmatic construction share one source of truth.

use serde::Deserialize;

use crate::error::Error;

fn default_percentage() -> f64 {
    10.0
}

fn default_fail_on_error() -> bool {
    true
}

/// How the generated thumbnail is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Raw encoded bytes.
    #[default]
    Buffer,
    /// Base64-encoded text.
    Base64,
}

/// Strategy for reconciling the source aspect ratio with the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Cover the target box, center-cropping the overflow.
    Cover,
    /// Letterbox onto a white canvas of exactly the target size.
    #[default]
    Contain,
    /// Exact target dimensions, ignoring aspect ratio.
    Fill,
    /// Largest size with both axes within the target box.
    Inside,
    /// Smallest size with both axes covering the target box.
    Outside,
}

/// JPEG encoder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JpegOptions {
    /// Encoding quality 1-100 (default 80).
    pub quality: Option<u8>,
    /// Emit progressive scans.
    pub progressive: Option<bool>,
    /// `Some(false)` keeps the input format for non-JPEG sources; anything
    /// else forces JPEG output.
    pub force: Option<bool>,
}

/// Options for one thumbnail request.
///
/// Deserializes from the camelCase JSON shape
/// (`{"percentage": 25, "responseType": "base64", ...}`); missing fields take
/// their documented defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThumbnailOptions {
    /// Scale factor applied to the original dimensions when neither `width`
    /// nor `height` is set.
    pub percentage: f64,
    /// Explicit target width. Setting this (or `height`) skips percentage
    /// scaling entirely.
    pub width: Option<u32>,
    /// Explicit target height.
    pub height: Option<u32>,
    pub response_type: ResponseType,
    pub jpeg_options: Option<JpegOptions>,
    pub fit: Fit,
    /// Abort on a malformed input image. When false, decoding retries every
    /// enabled format before giving up.
    pub fail_on_error: bool,
    /// Carry the source EXIF segment into the output.
    #[serde(rename = "withMetaData")]
    pub with_metadata: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            percentage: default_percentage(),
            width: None,
            height: None,
            response_type: ResponseType::default(),
            jpeg_options: None,
            fit: Fit::default(),
            fail_on_error: default_fail_on_error(),
            with_metadata: false,
        }
    }
}

impl ThumbnailOptions {
    /// True when at least one explicit dimension is set.
    pub fn has_explicit_dimensions(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Reject option combinations that cannot produce a valid thumbnail:
    /// zero explicit dimensions and non-positive or non-finite percentages.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == Some(0) {
            return Err(Error::InvalidDimensions("width must be positive".into()));
        }
        if self.height == Some(0) {
            return Err(Error::InvalidDimensions("height must be positive".into()));
        }
        if !self.has_explicit_dimensions() && !(self.percentage > 0.0 && self.percentage.is_finite())
        {
            return Err(Error::InvalidDimensions(format!(
                "percentage must be a positive number, got {}",
                self.percentage
            )));
        }
        Ok(())
    }
}
