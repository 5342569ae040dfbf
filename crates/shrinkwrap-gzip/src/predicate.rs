//! Eligibility checks for gzip encoding

use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Request, Response};
use http_body::Body as HttpBody;
use std::fmt;

/// Default minimum declared body length worth compressing
pub const DEFAULT_MINIMAL_GZIP_CONTENT_LENGTH: u64 = 512;

/// Check whether the client accepts gzip.
///
/// This is a substring match on `Accept-Encoding`; quality values are not
/// parsed, so `gzip;q=0` still counts as accepted.
pub fn accepts_gzip_encoding<B>(request: &Request<B>) -> bool {
    request
        .headers()
        .get(ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("gzip"))
}

/// Body length declared by a response.
///
/// Taken from `Content-Length` when it parses, otherwise from the body's exact
/// size hint. Streamed bodies of unknown length yield `None`.
pub fn declared_content_length<B: HttpBody>(response: &Response<B>) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .or_else(|| response.body().size_hint().exact())
}

/// Check whether a response may be gzip encoded.
///
/// When the length is undeclared the size check is skipped, so small streamed
/// bodies are still compressed.
pub fn can_gzip_encode_response<B, F>(
    response: &Response<B>,
    minimal_length: u64,
    already_compressed: F,
) -> bool
where
    B: HttpBody,
    F: Fn(&str) -> bool,
{
    skip_reason(response, minimal_length, already_compressed).is_none()
}

/// Why a response was passed through uncompressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The response already carries a `Content-Encoding`
    AlreadyEncoded(String),
    /// The declared length is under the configured minimum
    TooSmall {
        /// Declared length
        length: u64,
        /// Configured minimum
        minimum: u64,
    },
    /// The content type is an already-compressed format
    CompressedContentType(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyEncoded(encoding) => write!(f, "already encoded as {encoding}"),
            Self::TooSmall { length, minimum } => {
                write!(f, "{length} bytes is below the {minimum} byte minimum")
            }
            Self::CompressedContentType(ct) => write!(f, "{ct} is already compressed"),
        }
    }
}

/// Find the first reason to leave `response` uncompressed, if any
pub fn skip_reason<B, F>(
    response: &Response<B>,
    minimal_length: u64,
    already_compressed: F,
) -> Option<SkipReason>
where
    B: HttpBody,
    F: Fn(&str) -> bool,
{
    let headers = response.headers();

    if let Some(encoding) = headers.get(CONTENT_ENCODING) {
        if !encoding.is_empty() {
            return Some(SkipReason::AlreadyEncoded(
                String::from_utf8_lossy(encoding.as_bytes()).into_owned(),
            ));
        }
    }

    if let Some(length) = declared_content_length(response) {
        if length < minimal_length {
            return Some(SkipReason::TooSmall {
                length,
                minimum: minimal_length,
            });
        }
    }

    if let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        if already_compressed(content_type) {
            return Some(SkipReason::CompressedContentType(content_type.to_string()));
        }
    }

    None
}
