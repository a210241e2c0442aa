//! Source resolution — turning heterogeneous inputs into raw image bytes.
//!
//! [`Source`] is an explicit tagged union over the five acquisition
//! strategies. The union is constructed once at the API boundary and then
//! exhaustively matched, so no dispatch can silently fall through.
//!
//! | Input | Variant | Acquisition |
//! |---|---|---|
//! | `Vec<u8>` / `&[u8]` / `Bytes` | `Buffer` | pass through |
//! | `impl AsyncRead` | `Stream` | drain fully, preserving arrival order |
//! | `Source::uri(..)` / `{"uri": ..}` | `Uri` | single HTTP GET |
//! | non-base64 string | `Path` | full file read |
//! | base64 string | `Base64` | standard-alphabet decode |
//!
//! String inference checks the base64 predicate before falling back to a
//! filesystem path, which means a short all-alphanumeric filename with a
//! length divisible by four is treated as base64. Callers who know the shape
//! of their input should construct the variant directly.

use std::fmt;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{AcquisitionError, Error};

/// Boxed async byte reader accepted by [`Source::stream`].
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// One image input, tagged by acquisition strategy.
pub enum Source {
    /// In-memory bytes, used as-is.
    Buffer(Bytes),
    /// Async byte stream, drained into a buffer.
    Stream(ByteStream),
    /// Remote image fetched with a single HTTP GET.
    Uri(String),
    /// Image file read from the local filesystem.
    Path(PathBuf),
    /// Base64-encoded image data (standard alphabet).
    Base64(String),
}

impl Source {
    pub fn buffer(bytes: impl Into<Bytes>) -> Self {
        Self::Buffer(bytes.into())
    }

    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn base64(text: impl Into<String>) -> Self {
        Self::Base64(text.into())
    }

    /// Infer the variant for a bare string: base64 first, else a path.
    fn infer(text: String) -> Self {
        if BASE64.decode(&text).is_ok() {
            Self::Base64(text)
        } else {
            Self::Path(PathBuf::from(text))
        }
    }

    /// Construct a source from untyped JSON, reproducing the dynamic
    /// dispatch order: objects must carry a string `uri` field, strings go
    /// through base64/path inference, byte arrays become buffers. Anything
    /// else is an unsupported source.
    ///
    /// Streams cannot arrive through JSON; use [`Source::stream`].
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => match map.get("uri").and_then(Value::as_str) {
                Some(uri) => Ok(Self::Uri(uri.to_owned())),
                None => Err(Error::UnsupportedSource),
            },
            Value::String(text) => Ok(Self::infer(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(|bytes| Self::Buffer(bytes.into()))
                .ok_or(Error::UnsupportedSource),
            _ => Err(Error::UnsupportedSource),
        }
    }

    /// Resolve the source into raw image bytes.
    pub(crate) async fn resolve(self, http: &reqwest::Client) -> Result<Bytes, AcquisitionError> {
        match self {
            Self::Buffer(bytes) => Ok(bytes),
            Self::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(AcquisitionError::Stream)?;
                tracing::debug!(bytes = buf.len(), "drained source stream");
                Ok(buf.into())
            }
            Self::Uri(uri) => {
                tracing::debug!(%uri, "fetching source image");
                let response = http
                    .get(&uri)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|source| AcquisitionError::Http {
                        uri: uri.clone(),
                        source,
                    })?;
                response
                    .bytes()
                    .await
                    .map_err(|source| AcquisitionError::Http { uri, source })
            }
            Self::Path(path) => {
                tracing::debug!(path = %path.display(), "reading source file");
                tokio::fs::read(&path)
                    .await
                    .map(Bytes::from)
                    .map_err(|source| AcquisitionError::File { path, source })
            }
            Self::Base64(text) => Ok(Bytes::from(BASE64.decode(&text)?)),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
            Self::Uri(uri) => f.debug_tuple("Uri").field(uri).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Base64(text) => f.debug_tuple("Base64").field(&text.len()).finish(),
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes.into())
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Self::Buffer(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for Source {
    fn from(bytes: Bytes) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::infer(text)
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::infer(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_inference_prefers_base64() {
        let encoded = BASE64.encode(b"not really an image");
        assert!(matches!(Source::from(encoded.as_str()), Source::Base64(_)));
    }

    #[test]
    fn string_inference_falls_back_to_path() {
        // '.' and spaces are outside the base64 alphabet
        let source = Source::from("/tmp/photos/cat.jpg");
        assert!(matches!(source, Source::Path(p) if p == PathBuf::from("/tmp/photos/cat.jpg")));
    }

    #[test]
    fn from_value_dispatch() {
        assert!(matches!(
            Source::from_value(&json!({ "uri": "http://example.com/a.png" })),
            Ok(Source::Uri(uri)) if uri == "http://example.com/a.png"
        ));
        assert!(matches!(
            Source::from_value(&json!([137, 80, 78, 71])),
            Ok(Source::Buffer(b)) if b.as_ref() == [137, 80, 78, 71]
        ));
        assert!(matches!(
            Source::from_value(&json!("path with spaces.png")),
            Ok(Source::Path(_))
        ));
    }

    #[test]
    fn from_value_rejects_unsupported_shapes() {
        for value in [json!(42), json!(true), json!(null), json!({ "url": "typo" })] {
            let err = Source::from_value(&value).unwrap_err();
            assert!(err.to_string().contains("unsupported source type"));
        }
    }

    #[tokio::test]
    async fn buffer_resolves_unchanged() {
        let http = reqwest::Client::new();
        let bytes = Source::buffer(vec![1u8, 2, 3]).resolve(&http).await.unwrap();
        assert_eq!(bytes.as_ref(), [1, 2, 3]);
    }

    #[tokio::test]
    async fn base64_resolves_to_decoded_bytes() {
        let http = reqwest::Client::new();
        let source = Source::from(BASE64.encode([9u8, 8, 7]).as_str());
        let bytes = source.resolve(&http).await.unwrap();
        assert_eq!(bytes.as_ref(), [9, 8, 7]);
    }

    #[tokio::test]
    async fn stream_resolves_in_arrival_order() {
        let http = reqwest::Client::new();
        let source = Source::stream(std::io::Cursor::new(vec![1u8, 2, 3, 4]));
        let bytes = source.resolve(&http).await.unwrap();
        assert_eq!(bytes.as_ref(), [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let http = reqwest::Client::new();
        let err = Source::path("/definitely/not/here.png")
            .resolve(&http)
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::File { .. }));
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }

    #[tokio::test]
    async fn invalid_base64_variant_fails_to_decode() {
        let http = reqwest::Client::new();
        let err = Source::base64("@@not-base64@@").resolve(&http).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Base64(_)));
    }
}
