//! Read-only HTTP file server.
//!
//! Exposes the attendance ledger to whoever joins the appliance's network.
//! Three routes exist, all `GET` (axum answers `HEAD` on them too):
//!
//! | Path | Response |
//! |------|----------|
//! | `/` | landing page from the web root, `text/html` |
//! | `/csv` | ledger file verbatim, `text/csv` (404 until the first record) |
//! | `/test` | `Hello World`, `text/plain` |
//!
//! Anything else is 404; other methods on a known path are 405.
//!
//! The ledger is read while the panel may be appending to it and no locking
//! is done, so a client can observe a partially written last line.
//!
//! # Example
//!
//! ```no_run
//! use rollcall_network::{HttpServer, HttpServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpServerConfig::default()
//!     .with_bind_addr("0.0.0.0:8080".parse()?)
//!     .with_web_root("data");
//!
//! let server = HttpServer::bind(config).await?;
//! println!("Serving on {}", server.local_addr()?);
//! server.serve().await?;
//! # Ok(())
//! # }
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use rollcall_core::constants::{DEFAULT_HTTP_PORT, DEFAULT_LANDING_PAGE, DEFAULT_LEDGER_FILE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeFile;
use tracing::{error, info};

/// Body of the liveness route.
pub const LIVENESS_BODY: &str = "Hello World";

/// Configuration for the HTTP server.
///
/// # Example
///
/// ```
/// use rollcall_network::HttpServerConfig;
///
/// let config = HttpServerConfig::default();
/// assert_eq!(config.bind_addr.port(), 80);
/// assert_eq!(config.landing_page().to_str(), Some("index.html"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,

    /// Directory holding the landing page.
    pub web_root: PathBuf,

    /// Ledger file served at `/csv`.
    pub ledger_path: PathBuf,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT)),
            web_root: PathBuf::from("."),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
        }
    }
}

impl HttpServerConfig {
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_web_root(mut self, web_root: impl Into<PathBuf>) -> Self {
        self.web_root = web_root.into();
        self
    }

    pub fn with_ledger_path(mut self, ledger_path: impl Into<PathBuf>) -> Self {
        self.ledger_path = ledger_path.into();
        self
    }

    /// Path of the landing page served at `/`.
    #[must_use]
    pub fn landing_page(&self) -> PathBuf {
        self.web_root.join(DEFAULT_LANDING_PAGE)
    }
}

/// Errors that can occur in the HTTP server.
#[derive(Debug, Error)]
pub enum HttpServerError {
    /// Failed to bind to address
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the routes for `config`.
pub fn router(config: HttpServerConfig) -> Router {
    let landing = ServeFile::new(config.landing_page());

    Router::new()
        .route_service("/", landing.clone())
        .route_service("/index.html", landing)
        .route("/csv", get(ledger))
        .route("/test", get(liveness))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(config))
}

/// GET /csv - the ledger file verbatim
async fn ledger(State(config): State<Arc<HttpServerConfig>>) -> Response {
    match rollcall_storage::read_ledger(&config.ledger_path).await {
        Ok(Some(contents)) => ([(header::CONTENT_TYPE, "text/csv")], contents).into_response(),
        Ok(None) => not_found().await.into_response(),
        Err(e) => {
            error!(error = %e, path = %config.ledger_path.display(), "Failed to read ledger");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// GET /test - liveness check
async fn liveness() -> &'static str {
    LIVENESS_BODY
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    info!(%method, %path, status = response.status().as_u16(), "HTTP request");
    response
}

/// HTTP file server for the ledger and landing page.
pub struct HttpServer {
    listener: TcpListener,
    config: HttpServerConfig,
}

impl HttpServer {
    /// Bind the server to the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServerError::BindFailed`] if the address is in use or
    /// the port is privileged.
    pub async fn bind(config: HttpServerConfig) -> Result<Self, HttpServerError> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| HttpServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;

        info!(
            addr = %config.bind_addr,
            web_root = %config.web_root.display(),
            ledger = %config.ledger_path.display(),
            "HTTP server listening"
        );

        Ok(Self { listener, config })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, HttpServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &HttpServerConfig {
        &self.config
    }

    /// Serve requests forever.
    ///
    /// # Errors
    ///
    /// Returns only if the listener itself fails.
    pub async fn serve(self) -> Result<(), HttpServerError> {
        axum::serve(self.listener, router(self.config)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;
    use rstest::rstest;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site() -> (TempDir, HttpServerConfig) {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("index.html"), "<h1>Attendance</h1>").unwrap();
        let config = HttpServerConfig::default()
            .with_web_root(root.path())
            .with_ledger_path(root.path().join("RTR_Attendance.csv"));
        (root, config)
    }

    async fn call(
        config: &HttpServerConfig,
        method: Method,
        path: &str,
    ) -> (StatusCode, String, String) {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router(config.clone()).oneshot(request).await.unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[rstest]
    #[case("/")]
    #[case("/index.html")]
    #[tokio::test]
    async fn test_landing_page(#[case] path: &str) {
        let (_root, config) = site();

        let (status, content_type, body) = call(&config, Method::GET, path).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert_eq!(body, "<h1>Attendance</h1>");
    }

    #[tokio::test]
    async fn test_missing_landing_page() {
        let root = TempDir::new().unwrap();
        let config = HttpServerConfig::default().with_web_root(root.path());

        let (status, _, _) = call(&config, Method::GET, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ledger_route() {
        let (_root, config) = site();

        let (status, _, _) = call(&config, Method::GET, "/csv").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::write(&config.ledger_path, "12/5/23,16:32:0,12,Asha,Arrival\n").unwrap();
        let (status, content_type, body) = call(&config, Method::GET, "/csv").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/csv");
        assert_eq!(body, "12/5/23,16:32:0,12,Asha,Arrival\n");
    }

    #[tokio::test]
    async fn test_unreadable_ledger_is_500() {
        let (root, config) = site();
        let config = config.with_ledger_path(root.path());

        let (status, _, _) = call(&config, Method::GET, "/csv").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_liveness_route() {
        let (_root, config) = site();

        let (status, content_type, body) = call(&config, Method::GET, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body, LIVENESS_BODY);
    }

    #[rstest]
    #[case("/csv/")]
    #[case("/RTR_Attendance.csv")]
    #[case("/admin")]
    #[tokio::test]
    async fn test_unknown_paths(#[case] path: &str) {
        let (_root, config) = site();

        let (status, _, body) = call(&config, Method::GET, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[rstest]
    #[case(Method::POST, "/csv")]
    #[case(Method::DELETE, "/csv")]
    #[case(Method::PUT, "/test")]
    #[tokio::test]
    async fn test_other_methods_rejected(#[case] method: Method, #[case] path: &str) {
        let (_root, config) = site();

        let (status, _, _) = call(&config, method, path).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_head_is_answered_without_body() {
        let (_root, config) = site();

        let (status, _, body) = call(&config, Method::HEAD, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[test]
    fn test_config_from_json() {
        let config: HttpServerConfig =
            serde_json::from_str(r#"{"bind_addr": "127.0.0.1:8080", "web_root": "data"}"#)
                .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.landing_page(), PathBuf::from("data/index.html"));
        assert_eq!(config.ledger_path, PathBuf::from("RTR_Attendance.csv"));
    }
}
