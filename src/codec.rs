//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the two operations the pipeline needs
//! from an imaging engine: identify (header-only dimension probe) and render
//! (decode, flatten, resize, encode).
//!
//! The production implementation is [`RustCodec`](crate::rust_codec::RustCodec).
//! Keeping the codec behind a trait means the dispatch and dimension logic can
//! be tested with a mock that records operations instead of doing pixel work.

use thiserror::Error;

use crate::dimensions::TargetDimensions;
use crate::options::{Fit, JpegOptions};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Intrinsic dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Full specification of one render pass.
///
/// `dimensions` may be partial: an unset axis is derived by the codec from
/// the source aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub dimensions: TargetDimensions,
    pub fit: Fit,
    pub jpeg: Option<JpegOptions>,
    pub fail_on_error: bool,
    pub with_metadata: bool,
}

/// Trait for imaging engines.
pub trait ImageCodec: Send + Sync {
    /// Read intrinsic dimensions from the image header without a full decode.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, CodecError>;

    /// Decode, flatten onto white, resize per `params`, and re-encode.
    fn render(&self, bytes: &[u8], params: &RenderParams) -> Result<Vec<u8>, CodecError>;
}
