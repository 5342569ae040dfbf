//! Gzip response compression middleware for Shrinkwrap
//!
//! Compresses response bodies with gzip when the client accepts it and the
//! response is worth compressing. Responses are buffered in full before
//! compression; there is no streaming mode.
//!
//! Features:
//! - Accept-Encoding check (substring match on `gzip`)
//! - Skips responses that already carry a `Content-Encoding`
//! - Minimum declared length threshold
//! - Already-compressed content type detection (images, media, archives, fonts)
//! - Configurable compression level with a shared default-level encoder
//! - `X-Compression-Ratio` and `server-timing` instrumentation headers
//!
//! ```no_run
//! use shrinkwrap_gzip::{GzipConfig, MiddlewareBuilder};
//!
//! let chain = MiddlewareBuilder::new()
//!     .with_gzip_config(GzipConfig::default().with_server_timing("gzip"))
//!     .build();
//! assert_eq!(chain.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod accumulator;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod loader;
pub mod middleware;
pub mod predicate;

pub use accumulator::ByteAccumulator;
pub use builder::MiddlewareBuilder;
pub use classifier::{is_already_compressed_content_type, is_already_compressed_extension};
pub use config::{ContentTypeClassifier, GzipConfig};
pub use encoder::{compress, GzipEncoder, DEFAULT_COMPRESSION_LEVEL};
pub use loader::{load_from_file, load_from_str, ConfigFormat};
pub use middleware::{gzip_encode_response, CompressionOutcome, GzipMiddleware};
pub use predicate::{accepts_gzip_encoding, can_gzip_encode_response, SkipReason};

// Re-export core middleware types from shrinkwrap-core
pub use shrinkwrap_core::middleware::{Middleware, Next};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::builder::MiddlewareBuilder;
    pub use crate::config::GzipConfig;
    pub use crate::middleware::{gzip_encode_response, GzipMiddleware};
    pub use shrinkwrap_core::middleware::{Middleware, Next};
}
