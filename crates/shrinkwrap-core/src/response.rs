//! Response builder and utilities

use crate::body::{self, Body};
use crate::Result;
use bytes::Bytes;
use http::{header, Response, StatusCode};

/// Response builder for convenient response construction
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(header::HeaderName, String)>,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Set a header
    pub fn header(mut self, name: header::HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the content type
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(header::CONTENT_TYPE, content_type)
    }

    /// Build response with text body
    pub fn text(self, text: impl Into<String>) -> Result<Response<Body>> {
        let has_content_type = self
            .headers
            .iter()
            .any(|(name, _)| name == header::CONTENT_TYPE);
        let builder = if has_content_type {
            self
        } else {
            self.content_type("text/plain; charset=utf-8")
        };
        builder.finish(body::full(text.into()))
    }

    /// Build response with a byte body
    pub fn bytes(self, data: impl Into<Bytes>) -> Result<Response<Body>> {
        self.finish(body::full(data))
    }

    fn finish(self, body: Body) -> Result<Response<Body>> {
        let mut response = Response::builder().status(self.status);

        for (name, value) in self.headers {
            response = response.header(name, value);
        }

        Ok(response.body(body)?)
    }
}

/// Convenience functions for common responses
pub mod responses {
    use super::*;

    /// 200 OK
    pub fn ok() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::OK)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Result<Response<Body>> {
        ResponseBuilder::new(StatusCode::NOT_FOUND).text(message)
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed() -> Result<Response<Body>> {
        ResponseBuilder::new(StatusCode::METHOD_NOT_ALLOWED).text("Method not allowed")
    }
}
