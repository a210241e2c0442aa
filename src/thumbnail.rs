//! The thumbnail pipeline façade.
//!
//! One linear pass per call: validate options → resolve the source to bytes →
//! resolve target dimensions → render → package the response. No retries, no
//! partial results, no shared state between calls.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::codec::{ImageCodec, RenderParams};
use crate::dimensions::{TargetDimensions, scale_by_percentage};
use crate::error::Error;
use crate::options::{ResponseType, ThumbnailOptions};
use crate::rust_codec::RustCodec;
use crate::source::Source;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A generated thumbnail, packaged per the requested response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutput {
    Buffer(Vec<u8>),
    Base64(String),
}

impl ThumbnailOutput {
    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            Self::Base64(_) => None,
        }
    }

    pub fn into_base64(self) -> Option<String> {
        match self {
            Self::Buffer(_) => None,
            Self::Base64(text) => Some(text),
        }
    }
}

/// Thumbnail generator: an [`ImageCodec`] plus the HTTP client used for
/// remote sources.
///
/// Each [`generate`](Self::generate) call is fully independent; the struct
/// holds no request state and is safe to share across tasks.
pub struct Thumbnailer<C = RustCodec> {
    codec: C,
    http: reqwest::Client,
}

impl Thumbnailer<RustCodec> {
    pub fn new() -> Self {
        Self::with_codec(RustCodec::new())
    }
}

impl Default for Thumbnailer<RustCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> Thumbnailer<C> {
    pub fn with_codec(codec: C) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self { codec, http }
    }

    /// Replace the HTTP client, e.g. to impose a caller-chosen timeout on
    /// remote fetches — the only cancellation surface of the pipeline.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Generate a thumbnail from any supported source.
    pub async fn generate(
        &self,
        source: impl Into<Source>,
        options: &ThumbnailOptions,
    ) -> Result<ThumbnailOutput, Error> {
        options.validate()?;

        let source = source.into();
        tracing::debug!(?source, "resolving thumbnail source");
        let bytes = source.resolve(&self.http).await?;

        let dimensions = self.resolve_dimensions(&bytes, options)?;
        tracing::debug!(?dimensions, fit = ?options.fit, "rendering thumbnail");

        let rendered = self.codec.render(
            &bytes,
            &RenderParams {
                dimensions,
                fit: options.fit,
                jpeg: options.jpeg_options,
                fail_on_error: options.fail_on_error,
                with_metadata: options.with_metadata,
            },
        )?;

        Ok(match options.response_type {
            ResponseType::Buffer => ThumbnailOutput::Buffer(rendered),
            ResponseType::Base64 => ThumbnailOutput::Base64(BASE64.encode(rendered)),
        })
    }

    /// Explicit dimensions win outright; only the percentage path probes the
    /// image header for the original size.
    fn resolve_dimensions(
        &self,
        bytes: &[u8],
        options: &ThumbnailOptions,
    ) -> Result<TargetDimensions, Error> {
        if options.has_explicit_dimensions() {
            return Ok(TargetDimensions {
                width: options.width,
                height: options.height,
            });
        }
        let original = self.codec.identify(bytes)?;
        Ok(scale_by_percentage(original, options.percentage))
    }
}

/// Generate a thumbnail with the production codec and default HTTP client.
///
/// ```no_run
/// # async fn demo() -> Result<(), image_thumbnail::Error> {
/// use image_thumbnail::{ThumbnailOptions, image_thumbnail};
///
/// let options = ThumbnailOptions {
///     percentage: 25.0,
///     ..ThumbnailOptions::default()
/// };
/// let thumb = image_thumbnail("photos/cat.jpg", &options).await?;
/// # let _ = thumb; Ok(())
/// # }
/// ```
pub async fn image_thumbnail(
    source: impl Into<Source>,
    options: &ThumbnailOptions,
) -> Result<ThumbnailOutput, Error> {
    Thumbnailer::new().generate(source, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Dimensions;
    use crate::codec::tests::{MockCodec, RecordedOp};
    use crate::options::Fit;

    #[tokio::test]
    async fn explicit_width_skips_identify_and_stays_partial() {
        let codec = MockCodec::new();
        let thumbnailer = Thumbnailer::with_codec(codec);
        let options = ThumbnailOptions {
            width: Some(100),
            ..ThumbnailOptions::default()
        };

        thumbnailer
            .generate(vec![1u8, 2, 3], &options)
            .await
            .unwrap();

        let ops = thumbnailer.codec.get_operations();
        assert_eq!(ops.len(), 1, "identify must not run");
        assert!(matches!(
            &ops[0],
            RecordedOp::Render(p) if p.dimensions == TargetDimensions {
                width: Some(100),
                height: None,
            }
        ));
    }

    #[tokio::test]
    async fn percentage_path_probes_and_scales() {
        let codec = MockCodec::with_dimensions(vec![Dimensions {
            width: 640,
            height: 480,
        }]);
        let thumbnailer = Thumbnailer::with_codec(codec);
        let options = ThumbnailOptions {
            percentage: 50.0,
            ..ThumbnailOptions::default()
        };

        thumbnailer
            .generate(vec![1u8, 2, 3], &options)
            .await
            .unwrap();

        let ops = thumbnailer.codec.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], RecordedOp::Identify);
        assert!(matches!(
            &ops[1],
            RecordedOp::Render(p) if p.dimensions == TargetDimensions {
                width: Some(320),
                height: Some(240),
            }
        ));
    }

    #[tokio::test]
    async fn render_params_mirror_options() {
        let codec = MockCodec::new();
        let thumbnailer = Thumbnailer::with_codec(codec);
        let options = ThumbnailOptions {
            width: Some(64),
            height: Some(64),
            fit: Fit::Cover,
            fail_on_error: false,
            with_metadata: true,
            ..ThumbnailOptions::default()
        };

        thumbnailer
            .generate(vec![0u8; 4], &options)
            .await
            .unwrap();

        let ops = thumbnailer.codec.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Render(p)
                if p.fit == Fit::Cover && !p.fail_on_error && p.with_metadata
        ));
    }

    #[tokio::test]
    async fn base64_response_encodes_rendered_bytes() {
        let codec = MockCodec::new();
        let thumbnailer = Thumbnailer::with_codec(codec);
        let options = ThumbnailOptions {
            width: Some(10),
            response_type: ResponseType::Base64,
            ..ThumbnailOptions::default()
        };

        // MockCodec echoes its input
        let out = thumbnailer
            .generate(vec![1u8, 2, 3], &options)
            .await
            .unwrap();
        assert_eq!(out, ThumbnailOutput::Base64(BASE64.encode([1u8, 2, 3])));
    }

    #[tokio::test]
    async fn invalid_options_reject_before_acquisition() {
        let codec = MockCodec::new();
        let thumbnailer = Thumbnailer::with_codec(codec);
        let options = ThumbnailOptions {
            width: Some(0),
            ..ThumbnailOptions::default()
        };

        let err = thumbnailer
            .generate(vec![1u8], &options)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions(_)));
        assert!(thumbnailer.codec.get_operations().is_empty());
    }
}
