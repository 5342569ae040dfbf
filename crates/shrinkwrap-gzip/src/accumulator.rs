//! Growable buffer that collects a response body into one contiguous slice

use bytes::Bytes;
use http_body::Body as HttpBody;
use http_body_util::BodyExt;

/// Initial capacity used when a body does not declare its length
pub const DEFAULT_CAPACITY: usize = 4096;

/// Upper bound on the initial capacity taken from a declared length
pub const MAX_INITIAL_CAPACITY: usize = 1024 * 1024;

/// Accumulates byte chunks into a single buffer.
///
/// Growth doubles the capacity (or jumps straight to the required size when a
/// single chunk is larger than that), so appending a whole body costs
/// amortized O(1) per byte. Owned by exactly one in-flight transformation.
#[derive(Debug)]
pub struct ByteAccumulator {
    buf: Vec<u8>,
}

impl ByteAccumulator {
    /// Create an accumulator with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an accumulator with a capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes appended so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Allocated capacity
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Append a chunk
    pub fn append(&mut self, chunk: &[u8]) {
        let needed = self.buf.len() + chunk.len();
        if needed > self.buf.capacity() {
            let target = (self.buf.capacity() * 2).max(needed);
            self.buf.reserve_exact(target - self.buf.len());
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Return exactly the appended bytes.
    ///
    /// Over-allocated storage is copied into a tight buffer rather than
    /// handed out with unused trailing capacity.
    pub fn finish(self) -> Bytes {
        if self.buf.len() < self.buf.capacity() {
            Bytes::copy_from_slice(&self.buf)
        } else {
            Bytes::from(self.buf)
        }
    }

    /// Drain `body` to completion and return its bytes.
    ///
    /// Trailers are discarded. A body error aborts the drain and nothing
    /// collected so far is returned.
    pub async fn drain<B>(mut body: B, capacity: usize) -> Result<Bytes, B::Error>
    where
        B: HttpBody<Data = Bytes> + Unpin,
    {
        let mut acc = Self::with_capacity(capacity);
        while let Some(frame) = body.frame().await {
            if let Ok(data) = frame?.into_data() {
                acc.append(&data);
            }
        }
        Ok(acc.finish())
    }
}

impl Default for ByteAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shrinkwrap_core::body::{self, BoxError};

    #[test]
    fn test_default_capacity() {
        let acc = ByteAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.capacity() >= DEFAULT_CAPACITY);
    }

    #[test]
    fn test_growth_doubles() {
        let mut acc = ByteAccumulator::with_capacity(8);
        acc.append(b"12345678");
        let before = acc.capacity();
        acc.append(b"9");
        assert!(acc.capacity() >= before * 2);
        assert_eq!(acc.len(), 9);
    }

    #[test]
    fn test_growth_jumps_to_needed_size() {
        let mut acc = ByteAccumulator::with_capacity(4);
        acc.append(&[7u8; 100]);
        assert!(acc.capacity() >= 100);
        assert_eq!(acc.len(), 100);
    }

    #[test]
    fn test_zero_capacity_grows() {
        let mut acc = ByteAccumulator::with_capacity(0);
        acc.append(b"abc");
        acc.append(b"def");
        assert_eq!(&acc.finish()[..], b"abcdef");
    }

    #[test]
    fn test_finish_returns_logical_length() {
        let mut acc = ByteAccumulator::with_capacity(1024);
        acc.append(b"hello");
        let bytes = acc.finish();
        assert_eq!(bytes.len(), 5);
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_drain_multi_chunk_stream() {
        let chunks: Vec<Result<Bytes, BoxError>> = vec![
            Ok(Bytes::from_static(b"Requested: ")),
            Ok(Bytes::from_static(b"/foo")),
        ];
        let body = body::from_stream(futures::stream::iter(chunks));

        let bytes = ByteAccumulator::drain(body, 2).await.unwrap();
        assert_eq!(&bytes[..], b"Requested: /foo");
    }

    #[tokio::test]
    async fn test_drain_propagates_stream_error() {
        let chunks: Vec<Result<Bytes, BoxError>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err("connection reset".into()),
        ];
        let body = body::from_stream(futures::stream::iter(chunks));

        let err = ByteAccumulator::drain(body, DEFAULT_CAPACITY)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    proptest! {
        #[test]
        fn prop_append_concatenates(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 0..20), hint in 0usize..64) {
            let mut acc = ByteAccumulator::with_capacity(hint);
            for chunk in &chunks {
                acc.append(chunk);
            }
            let expected: Vec<u8> = chunks.concat();
            prop_assert_eq!(&acc.finish()[..], &expected[..]);
        }
    }
}
