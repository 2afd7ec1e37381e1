//! # postboard
//!
//! A small blog post API: create, read, update, delete, search and sort
//! title/content records held in memory, served as HTTP/JSON.
//!
//! ## Endpoints
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/posts?sort=&direction=` | 200, array of posts |
//! | POST | `/api/posts` | 201, created post |
//! | PUT | `/api/posts/{id}` | 200, updated post |
//! | DELETE | `/api/posts/{id}` | 200, `{"message": …}` |
//! | GET | `/api/posts/search?title=&content=` | 200, array of posts |
//! | GET | `/healthz`, `/readyz` | 200 |
//!
//! Errors are JSON objects with an `error` key. Every route allows
//! cross-origin requests from any origin.
//!
//! ## Pieces
//!
//! - Radix-tree routing per method via [`matchit`]
//! - hyper for the wire (HTTP/1.1 and HTTP/2), tokio for I/O
//! - Graceful shutdown on SIGTERM / Ctrl-C, draining in-flight requests
//! - One mutex around the post list; no lock is held across an `.await`
//!
//! ## Running in-process
//!
//! ```rust
//! use std::sync::Arc;
//! use postboard::{Method, PostStore, Request, app};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = app(Arc::new(PostStore::seeded()));
//! let res = router.handle(Request::builder(Method::Get, "/api/posts/search?title=first").build()).await;
//! assert_eq!(res.code(), 200);
//! # }
//! ```

mod app;
mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod health;
pub mod middleware;
pub mod posts;
pub mod telemetry;

pub use app::app;
pub use config::Config;
pub use error::{Error, RequestError};
pub use handler::Handler;
pub use method::Method;
pub use posts::{ApiError, Post, PostStore};
pub use request::{Request, RequestBuilder};
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
