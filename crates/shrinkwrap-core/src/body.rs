//! Response body type and constructors
//!
//! Bodies are single-pass: once drained, a body cannot be replayed. A
//! middleware that needs the bytes must consume the body and hand a fresh one
//! to the response it returns.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body::Frame;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full, StreamBody};

/// Boxed error carried by body streams
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body type alias
pub type Body = BoxBody<Bytes, BoxError>;

/// Create a body holding `data` in memory.
///
/// The body reports an exact size hint equal to the length of `data`.
pub fn full(data: impl Into<Bytes>) -> Body {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

/// Create an empty body
pub fn empty() -> Body {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Create a body from a stream of byte chunks.
///
/// The resulting body has no exact size hint.
pub fn from_stream<S, E>(stream: S) -> Body
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    StreamBody::new(stream.map_ok(Frame::data).map_err(Into::<BoxError>::into)).boxed()
}
