//! # Shrinkwrap Core
//!
//! Core types, traits, and error handling shared by Shrinkwrap middleware.
//!
//! This crate provides the foundational abstractions:
//! - A one-shot boxed body type and its constructors
//! - Middleware trait and chain runner
//! - Error types
//! - A response builder

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod body;
pub mod error;
pub mod middleware;
pub mod response;

pub use body::{Body, BoxError};
pub use error::{Error, Result};
pub use middleware::{wrap_handler, HandlerFn, Middleware, Next};
pub use response::ResponseBuilder;

// Re-export commonly used HTTP types
pub use bytes::Bytes;
pub use http::{Request, Response, StatusCode};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::body::{self, Body, BoxError};
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{wrap_handler, HandlerFn, Middleware, Next};
    pub use crate::response::ResponseBuilder;
}
