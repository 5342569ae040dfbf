//! Middleware chain builder
//!
//! Middlewares run in the order they are added; the first one added sees the
//! request first and the response last.

use crate::config::GzipConfig;
use crate::middleware::GzipMiddleware;
use shrinkwrap_core::{wrap_handler, HandlerFn, Middleware};
use std::sync::Arc;

/// Middleware chain builder
#[derive(Debug, Default)]
pub struct MiddlewareBuilder {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareBuilder {
    /// Create a new middleware builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add gzip middleware with default config
    #[must_use]
    pub fn with_gzip(mut self) -> Self {
        self.middlewares.push(Arc::new(GzipMiddleware::new()));
        self
    }

    /// Add gzip middleware with custom configuration
    #[must_use]
    pub fn with_gzip_config(mut self, config: GzipConfig) -> Self {
        self.middlewares
            .push(Arc::new(GzipMiddleware::with_config(config)));
        self
    }

    /// Add custom middleware
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Build the middleware chain
    ///
    /// Returns an `Arc<[Arc<dyn Middleware>]>` for efficient sharing.
    #[must_use]
    pub fn build(self) -> Arc<[Arc<dyn Middleware>]> {
        self.middlewares.into()
    }

    /// Build the chain around `handler`, producing the outer handler
    #[must_use]
    pub fn wrap(self, handler: HandlerFn) -> HandlerFn {
        wrap_handler(self.build(), handler)
    }

    /// Get the number of middlewares in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Check if the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
    use http::{HeaderValue, Request, Response};
    use shrinkwrap_core::body::{self, Body};
    use shrinkwrap_core::{Next, Result};

    #[derive(Debug)]
    struct SawEncoding;

    #[async_trait]
    impl Middleware for SawEncoding {
        async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
            let mut response = next.run(req).await?;
            let seen = response
                .headers()
                .get(CONTENT_ENCODING)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("identity"));
            response.headers_mut().insert("x-saw-encoding", seen);
            Ok(response)
        }
    }

    #[test]
    fn test_builder_empty() {
        let chain = MiddlewareBuilder::new().build();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_builder_multiple_middlewares() {
        let chain = MiddlewareBuilder::new()
            .with_gzip()
            .with_gzip_config(GzipConfig::default().with_level(9))
            .build();
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_builder_len_and_is_empty() {
        let builder = MiddlewareBuilder::new();
        assert_eq!(builder.len(), 0);
        assert!(builder.is_empty());

        let builder = builder.with_gzip();
        assert_eq!(builder.len(), 1);
        assert!(!builder.is_empty());
    }

    #[tokio::test]
    async fn test_custom_middleware_order() {
        let handler = MiddlewareBuilder::new()
            .with_middleware(Arc::new(SawEncoding))
            .with_gzip()
            .wrap(Box::new(|_req| {
                Box::pin(async { Ok(Response::new(body::full("y".repeat(2048)))) })
            }));

        let req = Request::builder()
            .header(ACCEPT_ENCODING, "gzip")
            .body(body::empty())
            .unwrap();
        let response = handler(req).await.unwrap();

        // The outer middleware sees the response after gzip has run
        assert_eq!(response.headers().get("x-saw-encoding").unwrap(), "gzip");
        assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
    }

    #[tokio::test]
    async fn test_wrap_handler() {
        let handler = MiddlewareBuilder::new().with_gzip().wrap(Box::new(|_req| {
            Box::pin(async { Ok(Response::new(body::full("x".repeat(2048)))) })
        }));

        let req = Request::builder()
            .header(ACCEPT_ENCODING, "gzip")
            .body(body::empty())
            .unwrap();
        let response = handler(req).await.unwrap();
        assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
    }
}
