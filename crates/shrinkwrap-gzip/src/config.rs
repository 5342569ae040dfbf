//! Configuration for the gzip middleware

use crate::classifier::is_already_compressed_content_type;
use crate::encoder::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use crate::predicate::DEFAULT_MINIMAL_GZIP_CONTENT_LENGTH;
use serde::{Deserialize, Serialize};
use shrinkwrap_core::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Strategy deciding whether a content type is already compressed
pub type ContentTypeClassifier = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Gzip middleware configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GzipConfig {
    /// Responses declaring fewer bytes than this are passed through
    #[serde(default = "default_minimal_gzip_content_length")]
    pub minimal_gzip_content_length: u64,

    /// Classifier for already-compressed content types
    #[serde(skip, default = "default_classifier")]
    pub already_compressed_content_type: ContentTypeClassifier,

    /// Deflate compression level (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Add an `X-Compression-Ratio` header to compressed responses
    #[serde(default = "default_add_compression_ratio_header")]
    pub add_compression_ratio_header: bool,

    /// Add a `server-timing` entry with the time spent compressing
    #[serde(default)]
    pub add_server_timing: bool,

    /// Name of the `server-timing` entry
    #[serde(default = "default_server_timing_entry_name")]
    pub server_timing_entry_name: String,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            minimal_gzip_content_length: DEFAULT_MINIMAL_GZIP_CONTENT_LENGTH,
            already_compressed_content_type: default_classifier(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            add_compression_ratio_header: true,
            add_server_timing: false,
            server_timing_entry_name: default_server_timing_entry_name(),
        }
    }
}

fn default_minimal_gzip_content_length() -> u64 {
    DEFAULT_MINIMAL_GZIP_CONTENT_LENGTH
}

fn default_classifier() -> ContentTypeClassifier {
    Arc::new(is_already_compressed_content_type)
}

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

fn default_add_compression_ratio_header() -> bool {
    true
}

fn default_server_timing_entry_name() -> String {
    "gzip".to_string()
}

impl GzipConfig {
    /// Replace the already-compressed classifier
    #[must_use]
    pub fn with_classifier<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.already_compressed_content_type = Arc::new(classifier);
        self
    }

    /// Set the compression level
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the minimum declared length
    #[must_use]
    pub fn with_minimal_length(mut self, length: u64) -> Self {
        self.minimal_gzip_content_length = length;
        self
    }

    /// Enable the `server-timing` entry under `entry_name`
    #[must_use]
    pub fn with_server_timing(mut self, entry_name: impl Into<String>) -> Self {
        self.add_server_timing = true;
        self.server_timing_entry_name = entry_name.into();
        self
    }

    /// Disable the `X-Compression-Ratio` header
    #[must_use]
    pub fn without_ratio_header(mut self) -> Self {
        self.add_compression_ratio_header = false;
        self
    }

    /// Check if a content type is already compressed
    pub fn is_already_compressed(&self, content_type: &str) -> bool {
        (self.already_compressed_content_type)(content_type)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(Error::Config(format!(
                "compression_level must be between 0 and {MAX_COMPRESSION_LEVEL}, got {}",
                self.compression_level
            )));
        }

        if self.add_server_timing && !is_token(&self.server_timing_entry_name) {
            return Err(Error::Config(format!(
                "server_timing_entry_name '{}' is not a valid token",
                self.server_timing_entry_name
            )));
        }

        Ok(())
    }
}

/// RFC 7230 `token`
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}

impl fmt::Debug for GzipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipConfig")
            .field("minimal_gzip_content_length", &self.minimal_gzip_content_length)
            .field("compression_level", &self.compression_level)
            .field("add_compression_ratio_header", &self.add_compression_ratio_header)
            .field("add_server_timing", &self.add_server_timing)
            .field("server_timing_entry_name", &self.server_timing_entry_name)
            .finish_non_exhaustive()
    }
}
