//! Gzip compression middleware implementation

use crate::accumulator::{ByteAccumulator, DEFAULT_CAPACITY, MAX_INITIAL_CAPACITY};
use crate::config::GzipConfig;
use crate::encoder::GzipEncoder;
use crate::predicate::{accepts_gzip_encoding, declared_content_length, skip_reason};
use async_trait::async_trait;
use http::header::{HeaderName, CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderValue, Request, Response};
use shrinkwrap_core::body::{self, Body};
use shrinkwrap_core::{Error, Middleware, Next, Result};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Header reporting `compressed / original` for a compressed response
pub const X_COMPRESSION_RATIO: HeaderName = HeaderName::from_static("x-compression-ratio");

/// `server-timing` header
pub const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// Gzip compression middleware
///
/// Compresses responses when:
/// - the client's `Accept-Encoding` mentions gzip
/// - the response has no `Content-Encoding` of its own
/// - the declared length, if any, reaches the configured minimum
/// - the content type is not an already-compressed format
#[derive(Clone)]
pub struct GzipMiddleware {
    config: Arc<GzipConfig>,
}

impl GzipMiddleware {
    /// Create a new gzip middleware with default config
    pub fn new() -> Self {
        Self::with_config(GzipConfig::default())
    }

    /// Create a new gzip middleware with custom config
    pub fn with_config(config: GzipConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GzipConfig {
        &self.config
    }
}

impl Default for GzipMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GzipMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipMiddleware")
            .field("level", &self.config.compression_level)
            .field("min_length", &self.config.minimal_gzip_content_length)
            .finish()
    }
}

#[async_trait]
impl Middleware for GzipMiddleware {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        if !accepts_gzip_encoding(&req) {
            return next.run(req).await;
        }

        let response = next.run(req).await?;

        gzip_encode_response(response, &self.config).await
    }
}

/// Sizes and timing of one compression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOutcome {
    /// Body length before compression
    pub body_length: usize,
    /// Body length after compression
    pub compressed_length: usize,
    /// Time from eligibility decision to compressed output
    pub elapsed: Duration,
}

impl CompressionOutcome {
    /// `compressed_length / body_length`.
    ///
    /// An empty body (only possible for streams of undeclared length) yields
    /// `f64::INFINITY`, rendered as `inf` in the header.
    pub fn ratio(&self) -> f64 {
        self.compressed_length as f64 / self.body_length as f64
    }

    /// Value for the `X-Compression-Ratio` header, e.g. `0.3333 (341/1023)`
    pub fn ratio_header_value(&self) -> String {
        format!(
            "{} ({}/{})",
            format_ratio(self.ratio()),
            self.compressed_length,
            self.body_length
        )
    }

    /// Elapsed time in milliseconds at microsecond precision
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_micros() as f64 / 1000.0
    }
}

/// Shortest representation, or four fractional digits once that runs long
fn format_ratio(ratio: f64) -> String {
    let natural = ratio.to_string();
    if natural.len() > 6 {
        format!("{ratio:.4}")
    } else {
        natural
    }
}

/// Gzip encode `response` if it is eligible, otherwise return it untouched.
///
/// The body is drained completely before compressing. A body that fails
/// partway surfaces as [`Error::Body`]; nothing partial is returned.
pub async fn gzip_encode_response(
    response: Response<Body>,
    config: &GzipConfig,
) -> Result<Response<Body>> {
    if let Some(reason) = skip_reason(
        &response,
        config.minimal_gzip_content_length,
        &*config.already_compressed_content_type,
    ) {
        trace!(%reason, "Passing response through uncompressed");
        return Ok(response);
    }

    let started = Instant::now();

    // The declared length is only a hint; a bogus Content-Length must not
    // drive the allocation.
    let capacity = declared_content_length(&response)
        .map(|len| usize::try_from(len).unwrap_or(usize::MAX).min(MAX_INITIAL_CAPACITY))
        .unwrap_or(DEFAULT_CAPACITY);

    let (mut parts, body) = response.into_parts();

    let body_bytes = ByteAccumulator::drain(body, capacity)
        .await
        .map_err(|e| Error::Body(e.to_string()))?;

    let compressed = GzipEncoder::for_level(config.compression_level).compress(&body_bytes)?;

    let outcome = CompressionOutcome {
        body_length: body_bytes.len(),
        compressed_length: compressed.len(),
        elapsed: started.elapsed(),
    };

    let headers = &mut parts.headers;
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(outcome.compressed_length));
    headers.remove(TRANSFER_ENCODING);

    if config.add_compression_ratio_header {
        headers.insert(
            X_COMPRESSION_RATIO,
            HeaderValue::from_str(&outcome.ratio_header_value())?,
        );
    }

    if config.add_server_timing {
        let entry = format!(
            "{};dur={}",
            config.server_timing_entry_name,
            outcome.elapsed_ms()
        );
        let value = match headers.get(SERVER_TIMING) {
            Some(existing) if !existing.is_empty() => {
                let mut combined = existing.as_bytes().to_vec();
                combined.push(b',');
                combined.extend_from_slice(entry.as_bytes());
                HeaderValue::from_bytes(&combined)?
            }
            _ => HeaderValue::from_str(&entry)?,
        };
        headers.insert(SERVER_TIMING, value);
    }

    debug!(
        original_size = outcome.body_length,
        compressed_size = outcome.compressed_length,
        level = config.compression_level,
        elapsed_us = outcome.elapsed.as_micros() as u64,
        "Response compressed"
    );

    Ok(Response::from_parts(parts, body::full(compressed)))
}
