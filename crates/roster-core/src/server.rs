//! # HTTP Server
//!
//! HTTP server and request dispatcher built on Hyper and Tokio.
//! Implements graceful shutdown with signal handling.
//!
//! Dispatch is synchronous from the caller's perspective: a request is
//! matched against the route table, the bound handler runs to completion
//! (it may await the record store), and exactly one terminal [`Response`]
//! comes back. A route miss yields the runtime-default 404; a handler error
//! is logged and converted to a generic 500 at this boundary, so a storage
//! fault never kills the serving process or leaks internal error text.

use crate::error::{Error, Result};
use crate::html::Fragment;
use crate::request::RequestContext;
use crate::router::{HandlerId, Method, RouteTable};
use http_body_util::Full;
pub use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// HTTP Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub address: SocketAddr,
    /// Shutdown timeout for graceful shutdown (default: 30 seconds)
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 8000).into(),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP response produced by a handler
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Bytes,
    /// Content type
    pub content_type: String,
}

impl Response {
    /// Create an HTML response from a composed fragment
    #[must_use]
    pub fn html(fragment: Fragment) -> Self {
        Self {
            status: 200,
            body: Bytes::from(fragment.into_string()),
            content_type: "text/html; charset=utf-8".to_string(),
        }
    }

    /// Create a plain-text response
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.into()),
            content_type: "text/plain; charset=utf-8".to_string(),
        }
    }

    /// Create a response from raw bytes with an explicit content type
    #[must_use]
    pub fn bytes(body: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            status: 200,
            body,
            content_type: content_type.into(),
        }
    }

    /// Set the status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// View the body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Convert to a hyper response
    fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        hyper::Response::builder()
            .status(status)
            .header("Content-Type", &self.content_type)
            .body(Full::new(self.body))
            .unwrap_or_else(|_| {
                hyper::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Full::new(Bytes::from_static(b"Internal Server Error")))
                    .unwrap()
            })
    }
}

/// Boxed future returned by a handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

/// Handler function type (async)
pub type Handler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// HTTP server: route table, handlers, and the serving loop
#[derive(Default)]
pub struct Server {
    config: ServerConfig,
    routes: RouteTable,
    handlers: Vec<Handler>,
}

impl Server {
    /// Create a new server with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the server to an address
    #[must_use]
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.config.address = addr;
        self
    }

    /// Register a route and its handler.
    ///
    /// Bindings are matched in registration order, first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoutePattern`] if the pattern is malformed.
    pub fn route(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<HandlerId> {
        let id = self.routes.add(method, pattern)?;
        self.handlers.push(handler);
        Ok(id)
    }

    /// Register a GET route from an async closure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoutePattern`] if the pattern is malformed.
    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<HandlerId>
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        self.route(
            Method::Get,
            pattern,
            Arc::new(move |ctx| -> HandlerFuture { Box::pin(handler(ctx)) }),
        )
    }

    /// Dispatch a request directly, without the network stack.
    ///
    /// This is the same path the serving loop takes; tests use it to
    /// exercise routing and handlers in-process.
    pub async fn dispatch(&self, method: Method, path: &str) -> Response {
        process(&self.routes, &self.handlers, method, path).await
    }

    /// Start the server with graceful shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BindError`] when the listening socket cannot be set
    /// up, and [`Error::Io`] for accept failures.
    pub async fn serve(&self) -> Result<()> {
        let addr = self.config.address;
        let bind_err = |source: std::io::Error| Error::BindError {
            address: addr.to_string(),
            source,
        };

        let socket = tokio::net::TcpSocket::new_v4().map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        #[cfg(not(windows))]
        {
            socket.set_reuseport(true).map_err(bind_err)?;
        }
        socket.bind(addr).map_err(bind_err)?;

        let listener = socket.listen(1024).map_err(bind_err)?;

        info!("Server listening on http://{}", addr);

        let routes = Arc::new(self.routes.clone());
        let handlers = Arc::new(self.handlers.clone());
        let active = Arc::new(AtomicUsize::new(0));

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, remote_addr) = accept_result?;
                    let io = TokioIo::new(stream);

                    let routes = routes.clone();
                    let handlers = handlers.clone();
                    let active = active.clone();

                    tokio::task::spawn(async move {
                        active.fetch_add(1, Ordering::Relaxed);

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service_fn(move |req| {
                                let routes = routes.clone();
                                let handlers = handlers.clone();
                                async move {
                                    let method = req.method().clone();
                                    let path = req.uri().path().to_string();
                                    let version = format!("{:?}", req.version());

                                    let result = handle_request(req, &routes, &handlers).await;

                                    match &result {
                                        Ok(resp) => {
                                            info!("    {} - \"{} {} {}\" {}",
                                                remote_addr,
                                                method,
                                                path,
                                                version,
                                                resp.status()
                                            );
                                        }
                                        Err(_) => {
                                            error!("    {} - \"{} {} {}\" ERROR",
                                                remote_addr,
                                                method,
                                                path,
                                                version
                                            );
                                        }
                                    }
                                    result
                                }
                            }))
                            .await
                        {
                            error!("Error serving connection: {:?}", err);
                        }
                        active.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                _ = shutdown_signal() => {
                    info!("Shutdown signal received, stopping server...");
                    break;
                }
            }
        }

        let timeout = self.config.shutdown_timeout;
        let drain = async {
            loop {
                if active.load(Ordering::Relaxed) == 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        let _ = tokio::time::timeout(timeout, drain).await;
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}

/// Core request processing (network agnostic).
///
/// Route miss -> 404. Handler fault -> logged, generic 500; the internal
/// error text stays on the server side.
async fn process(
    routes: &RouteTable,
    handlers: &[Handler],
    method: Method,
    path: &str,
) -> Response {
    let matched = match routes.match_route(method, path) {
        Ok(m) => m,
        Err(_) => {
            return Response::text("Not Found").with_status(404);
        }
    };

    let ctx = RequestContext::new(method, path).with_params(matched.params);
    let handler = &handlers[matched.handler_id];

    match handler(ctx).await {
        Ok(response) => response,
        Err(err) => {
            error!(%method, path, error = %err, "Handler failed");
            Response::text("Internal Server Error").with_status(500)
        }
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    routes: &RouteTable,
    handlers: &[Handler],
) -> std::result::Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();

    let response = match Method::from_http(req.method()) {
        Some(method) => process(routes, handlers, method, &path).await,
        None => Response::text("Not Found").with_status(404),
    };

    Ok(response.into_hyper())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_response_text() {
        let resp = Response::text("User not found").with_status(404);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body_str(), Some("User not found"));
        assert_eq!(resp.content_type, "text/plain; charset=utf-8");
    }

    #[test]
    fn test_response_html() {
        let resp = Response::html(Fragment::raw("<p>hi</p>"));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "text/html; charset=utf-8");
        assert_eq!(resp.body_str(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.address.port(), 8000);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_dispatch_runs_matched_handler() {
        let mut server = Server::new();
        server
            .get("/ping", |_ctx| async { Ok(Response::text("pong")) })
            .unwrap();

        let resp = server.dispatch(Method::Get, "/ping").await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body_str(), Some("pong"));
    }

    #[tokio::test]
    async fn test_dispatch_threads_params() {
        let mut server = Server::new();
        server
            .get("/users/{id}", |ctx| async move {
                let id = ctx.param("id").unwrap_or_default().to_string();
                Ok(Response::text(id))
            })
            .unwrap();

        let resp = server.dispatch(Method::Get, "/users/abc").await;
        assert_eq!(resp.body_str(), Some("abc"));
    }

    #[tokio::test]
    async fn test_dispatch_route_miss_is_404() {
        let server = Server::new();
        let resp = server.dispatch(Method::Get, "/nonexistent-path").await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn test_route_miss_never_invokes_handlers() {
        static CALLED: AtomicBool = AtomicBool::new(false);

        let mut server = Server::new();
        server
            .get("/users", |_ctx| async {
                CALLED.store(true, Ordering::SeqCst);
                Ok(Response::text("users"))
            })
            .unwrap();

        for _ in 0..3 {
            let resp = server.dispatch(Method::Get, "/nonexistent-path").await;
            assert_eq!(resp.status, 404);
        }
        assert!(!CALLED.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_handler_fault_becomes_generic_500() {
        let mut server = Server::new();
        server
            .get("/boom", |_ctx| async {
                Err(Error::Database {
                    message: "connection lost to db/people.db".to_string(),
                })
            })
            .unwrap();

        let resp = server.dispatch(Method::Get, "/boom").await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body_str(), Some("Internal Server Error"));
        assert!(!resp.body_str().unwrap().contains("connection lost"));
    }
}
