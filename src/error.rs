//! Error taxonomy for the thumbnail pipeline.
//!
//! Three failure kinds exist and each stays distinguishable to the caller:
//!
//! | Kind | Variant | Produced by |
//! |---|---|---|
//! | Unrecognized input shape | [`Error::UnsupportedSource`] | dynamic source dispatch |
//! | Read failure | [`Error::Acquisition`] | base64 decode, file read, stream drain, HTTP GET |
//! | Codec failure | [`Error::Render`] | image decode, resize, encode |
//!
//! Every variant carries the originating error as a wrapped cause (reachable
//! via [`std::error::Error::source`]) rather than flattening it into an opaque
//! message string.

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;

/// Top-level error returned by [`Thumbnailer::generate`](crate::Thumbnailer::generate).
#[derive(Debug, Error)]
pub enum Error {
    /// The dynamic input matched none of the supported source shapes.
    #[error("unsupported source type")]
    UnsupportedSource,

    /// Requested target dimensions cannot produce a valid thumbnail.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Acquiring the raw image bytes failed.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// The codec failed to decode, resize, or encode the image.
    #[error(transparent)]
    Render(#[from] CodecError),
}

/// Failure while turning a [`Source`](crate::Source) into raw bytes.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read {}: {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Stream(#[source] std::io::Error),

    #[error("failed to fetch {uri}: {source}")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unsupported_source_message() {
        assert_eq!(Error::UnsupportedSource.to_string(), "unsupported source type");
    }

    #[test]
    fn stream_error_surfaces_original_message() {
        let err = Error::from(AcquisitionError::Stream(std::io::Error::other(
            "connection reset",
        )));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn file_error_preserves_cause() {
        let err = AcquisitionError::File {
            path: PathBuf::from("/missing/image.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/missing/image.jpg"));
        assert!(err.source().is_some());
    }

    #[test]
    fn render_error_stays_distinguishable() {
        let err = Error::from(CodecError::Decode("bad magic bytes".into()));
        assert!(matches!(err, Error::Render(_)));
        assert!(err.to_string().contains("bad magic bytes"));
    }
}
