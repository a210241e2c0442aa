//! # image-thumbnail
//!
//! Thumbnail generation from an image delivered through any of five input
//! modalities: an in-memory byte buffer, an async byte stream, a filesystem
//! path, a remote URI, or a base64-encoded string. Every input normalizes
//! into one decode → resize → encode pipeline behind a single entry point:
//!
//! ```no_run
//! # async fn demo() -> Result<(), image_thumbnail::Error> {
//! use image_thumbnail::{ThumbnailOptions, image_thumbnail};
//!
//! let thumb = image_thumbnail("photos/cat.jpg", &ThumbnailOptions::default()).await?;
//! # let _ = thumb; Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Tagged [`Source`] union, ordered input inference, async acquisition into bytes |
//! | [`dimensions`] | Percentage scaling and partial explicit target dimensions |
//! | [`options`] | [`ThumbnailOptions`] and its named defaults |
//! | [`codec`] | [`ImageCodec`] trait seam between pipeline logic and pixel work |
//! | [`rust_codec`] | Production codec: `image` crate decode/resize, mozjpeg encode |
//! | [`thumbnail`] | [`Thumbnailer`] façade and the [`image_thumbnail`] entry point |
//! | [`error`] | Structured error taxonomy preserving the originating failure kind |
//!
//! # Design Decisions
//!
//! ## Explicit Tagged Union at the Boundary
//!
//! Input dispatch is a [`Source`] enum constructed once — via typed `From`
//! impls or [`Source::from_value`] for untyped JSON — and then exhaustively
//! matched. Ambient runtime type checks are confined to that single boundary,
//! so no acquisition branch can be reached by accident.
//!
//! ## Codec Behind a Trait
//!
//! Decode, resize, and encode sit behind [`ImageCodec`]. The pipeline itself
//! contains no pixel work, which keeps dispatch and dimension logic testable
//! with a recording mock and leaves CPU-heavy work swappable.
//!
//! ## Errors Keep Their Kind
//!
//! Acquisition failures, codec failures, and unsupported inputs surface as
//! distinct [`Error`] variants wrapping their causes, so callers can react
//! programmatically instead of parsing message strings.

pub mod codec;
pub mod dimensions;
pub mod error;
pub mod options;
pub mod rust_codec;
pub mod source;
pub mod thumbnail;

pub use codec::{CodecError, Dimensions, ImageCodec, RenderParams};
pub use dimensions::TargetDimensions;
pub use error::{AcquisitionError, Error};
pub use options::{Fit, JpegOptions, ResponseType, ThumbnailOptions};
pub use rust_codec::RustCodec;
pub use source::{ByteStream, Source};
pub use thumbnail::{ThumbnailOutput, Thumbnailer, image_thumbnail};
