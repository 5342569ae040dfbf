//! Gzip encoding of fully buffered payloads

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::io::Write;

/// Default compression level.
///
/// Level 4 gives most of the ratio of level 9 at a fraction of the CPU cost,
/// which matters when every response is compressed on the fly.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 4;

/// Highest level accepted by deflate
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

static DEFAULT_ENCODER: Lazy<GzipEncoder> =
    Lazy::new(|| GzipEncoder::new(DEFAULT_COMPRESSION_LEVEL));

/// Gzip encoder bound to a compression level.
///
/// The encoder holds no per-call state, so one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct GzipEncoder {
    level: Compression,
}

impl GzipEncoder {
    /// Create an encoder; levels above 9 are clamped to 9
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(MAX_COMPRESSION_LEVEL)),
        }
    }

    /// The process-wide encoder at [`DEFAULT_COMPRESSION_LEVEL`]
    pub fn shared() -> &'static Self {
        &DEFAULT_ENCODER
    }

    /// Get an encoder for `level`, reusing the shared one for the default level
    pub fn for_level(level: u32) -> Cow<'static, Self> {
        if level == DEFAULT_COMPRESSION_LEVEL {
            Cow::Borrowed(Self::shared())
        } else {
            Cow::Owned(Self::new(level))
        }
    }

    /// Compression level in use
    pub fn level(&self) -> u32 {
        self.level.level()
    }

    /// Compress `data` into a complete gzip member.
    ///
    /// Output is deterministic: the header carries no timestamp or file name.
    pub fn compress(&self, data: &[u8]) -> std::io::Result<Bytes> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), self.level);
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        Ok(Bytes::from(compressed))
    }
}

/// Compress `data` at `level`
pub fn compress(data: &[u8], level: u32) -> std::io::Result<Bytes> {
    GzipEncoder::for_level(level).compress(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use proptest::prelude::*;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> Vec<u8> {
        let mut decoded = Vec::new();
        GzDecoder::new(data).read_to_end(&mut decoded).unwrap();
        decoded
    }

    #[test]
    fn test_compress_gzip() {
        let data = "Hello, World! This is a test string that should compress well. ".repeat(100);
        let compressed = compress(data.as_bytes(), DEFAULT_COMPRESSION_LEVEL).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(gunzip(&compressed), data.as_bytes());
    }

    #[test]
    fn test_output_is_gzip_container() {
        let compressed = compress(b"payload", 6).unwrap();
        // gzip magic followed by the deflate method byte
        assert_eq!(&compressed[..3], &[0x1f, 0x8b, 0x08]);
    }

    #[test]
    fn test_level_zero_still_round_trips() {
        let data = b"stored, not deflated";
        let compressed = compress(data, 0).unwrap();
        assert!(compressed.len() > data.len());
        assert_eq!(gunzip(&compressed), data);
    }

    #[test]
    fn test_empty_input() {
        let compressed = compress(b"", DEFAULT_COMPRESSION_LEVEL).unwrap();
        assert!(!compressed.is_empty());
        assert!(gunzip(&compressed).is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let data = "deterministic ".repeat(64);
        let first = compress(data.as_bytes(), 9).unwrap();
        let second = compress(data.as_bytes(), 9).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_encoder_for_default_level() {
        let encoder = GzipEncoder::for_level(DEFAULT_COMPRESSION_LEVEL);
        assert!(matches!(encoder, Cow::Borrowed(_)));
        assert!(std::ptr::eq(encoder.as_ref(), GzipEncoder::shared()));

        let custom = GzipEncoder::for_level(9);
        assert!(matches!(custom, Cow::Owned(_)));
        assert_eq!(custom.level(), 9);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(GzipEncoder::new(42).level(), MAX_COMPRESSION_LEVEL);
    }

    proptest! {
        #[test]
        fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..4096), level in 0u32..=9) {
            let compressed = compress(&data, level).unwrap();
            prop_assert_eq!(gunzip(&compressed), data);
        }
    }
}
