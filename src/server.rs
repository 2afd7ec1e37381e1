//! HTTP server and graceful shutdown.
//!
//! On **SIGTERM** or **Ctrl-C** the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::{Error, RequestError};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "postboard listening");
        run(listener, router, shutdown_signal()).await;
        info!("postboard stopped");
        Ok(())
    }
}

/// Accepts connections on `listener` until `shutdown` resolves, then drains
/// the in-flight ones.
async fn run(listener: TcpListener, router: Router, shutdown: impl Future<Output = ()>) {
    let router = Arc::new(router);
    let mut tasks = tokio::task::JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Check shutdown first so a SIGTERM stops accepting
            // immediately, even with connections still queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };
                debug!(peer = %remote_addr, "connection accepted");

                let router = Arc::clone(&router);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| {
                        let router = Arc::clone(&router);
                        async move { dispatch(router, req).await }
                    });

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet stays bounded.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Buffers one request, routes it, and produces one response.
///
/// Every failure is mapped to an HTTP response here, so hyper never sees an
/// error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    // Rejected requests still pass through the `after` hooks, so they get
    // CORS headers and an access log line like any other.
    let response = match Request::from_hyper(req).await {
        Ok(req) => router.handle(req).await,
        Err(e) => router.finish(&method, &path, started, reject(e)),
    };
    Ok(response.into_inner())
}

fn reject(e: RequestError) -> Response {
    warn!("rejected request: {e}");
    match e {
        // An unknown method token never matches a route, whatever the path.
        RequestError::UnsupportedMethod(token) => {
            Response::error(Status::MethodNotAllowed, format!("Method {token} not allowed"))
        }
        RequestError::Body(_) => Response::error(Status::BadRequest, "Failed to read request body"),
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C). Only Ctrl-C on Windows.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;
    use crate::middleware::Cors;

    /// Sends one raw HTTP/1.1 request and returns the whole response text.
    async fn exchange(router: Router, raw: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, router, async move {
            let _ = stopped.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();

        stop.send(()).unwrap();
        server.await.unwrap();
        out
    }

    #[tokio::test]
    async fn unknown_method_token_still_gets_cors_headers() {
        let router = Router::new().layer(Cors::permissive());
        let raw = "BREW /api/posts HTTP/1.1\r\n\
                   Host: localhost\r\n\
                   Origin: http://example.com\r\n\
                   Connection: close\r\n\r\n";
        let out = exchange(router, raw).await.to_ascii_lowercase();

        assert!(out.starts_with("http/1.1 405"), "{out}");
        assert!(out.contains("access-control-allow-origin: *"), "{out}");
        assert!(out.contains(r#"{"error":"method brew not allowed"}"#), "{out}");
    }

    #[tokio::test]
    async fn head_is_answered_without_a_body() {
        let router = Router::new().on(crate::Method::Get, "/ping", |_req: Request| async { "pong" });
        let raw = "HEAD /ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        let out = exchange(router, raw).await;

        assert!(out.starts_with("HTTP/1.1 200"), "{out}");
        assert!(!out.contains("pong"), "{out}");
    }
}
