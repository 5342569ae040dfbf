//! Static file server with gzip compression
//!
//! Serves files below a root directory and compresses eligible responses.
//!
//! Run with:
//!   cargo run --bin static_server -- --root ./public --server-timing
//!
//! Then compare:
//!   curl -sI http://127.0.0.1:8080/index.html
//!   curl -sI -H 'Accept-Encoding: gzip' http://127.0.0.1:8080/index.html

use anyhow::Result;
use clap::Parser;
use http::{Method, Request, Response};
use shrinkwrap_core::body::{self, Body};
use shrinkwrap_core::response::responses;
use shrinkwrap_core::HandlerFn;
use shrinkwrap_gzip::{load_from_file, GzipConfig, MiddlewareBuilder};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "static_server")]
#[command(about = "Static file server with gzip compression", long_about = None)]
struct Cli {
    /// Directory to serve
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Gzip configuration file (yaml, toml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the compression level (0-9)
    #[arg(long)]
    level: Option<u32>,

    /// Add a server-timing entry to compressed responses
    #[arg(long)]
    server_timing: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "SHRINKWRAP_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Config file: {}", path.display());
            load_from_file(path)?
        }
        None => GzipConfig::default(),
    };
    if let Some(level) = cli.level {
        config.compression_level = level;
    }
    if cli.server_timing {
        config.add_server_timing = true;
    }
    config.validate()?;

    tracing::info!(
        root = %cli.root.display(),
        level = config.compression_level,
        min_length = config.minimal_gzip_content_length,
        server_timing = config.add_server_timing,
        "Gzip middleware enabled"
    );

    let handler = Arc::new(
        MiddlewareBuilder::new()
            .with_gzip_config(config)
            .wrap(file_handler(Arc::new(cli.root))),
    );

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!("Listening on http://{}", cli.listen);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        tracing::trace!("Accepted connection from {}", addr);
                        let handler = Arc::clone(&handler);

                        tokio::spawn(async move {
                            let service = hyper::service::service_fn(move |req: Request<hyper::body::Incoming>| {
                                let handler = Arc::clone(&handler);
                                async move {
                                    let (parts, _) = req.into_parts();
                                    let req = Request::from_parts(parts, body::empty());
                                    let response = handler(req).await.unwrap_or_else(|e| {
                                        tracing::error!("Request handler error: {}", e);
                                        error_response(&e)
                                    });
                                    Ok::<_, std::convert::Infallible>(response)
                                }
                            });

                            let io = hyper_util::rt::TokioIo::new(stream);
                            if let Err(e) = hyper::server::conn::http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                tracing::error!("HTTP connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(filter.into())
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    Ok(())
}

fn error_response(err: &shrinkwrap_core::Error) -> Response<Body> {
    let mut response = Response::new(body::full(format!("Error: {err}")));
    *response.status_mut() = err.to_status_code();
    response
}

fn file_handler(root: Arc<PathBuf>) -> HandlerFn {
    Box::new(move |req| {
        let root = Arc::clone(&root);
        Box::pin(async move { serve_file(&root, req).await })
    })
}

async fn serve_file(root: &Path, req: Request<Body>) -> shrinkwrap_core::Result<Response<Body>> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return responses::method_not_allowed();
    }

    let Some(mut path) = resolve_path(root, req.uri().path()) else {
        return responses::not_found("Not found");
    };

    if tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(data) => {
            tracing::debug!(path = %path.display(), size = data.len(), "Serving file");
            responses::ok()
                .content_type(guess_content_type(&path))
                .bytes(data)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => responses::not_found("Not found"),
        Err(e) => Err(e.into()),
    }
}

/// Map a request path onto `root`, refusing anything that climbs out of it
fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => path.push(segment),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(path)
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "txt" | "md" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp4" => "video/mp4",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
