//! The `/api/posts` resource.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/api/posts` | [`handlers::list_posts`] |
//! | POST | `/api/posts` | [`handlers::create_post`] |
//! | GET | `/api/posts/search` | [`handlers::search_posts`] |
//! | PUT | `/api/posts/{id}` | [`handlers::update_post`] |
//! | DELETE | `/api/posts/{id}` | [`handlers::delete_post`] |

mod error;
pub mod handlers;
mod model;
mod query;
mod store;

use std::sync::Arc;

use crate::method::Method;
use crate::request::Request;
use crate::router::Router;

pub use error::ApiError;
pub use model::{NewPost, Post, PostFields};
pub use query::{Direction, SearchQuery, SortField, SortOrder};
pub use store::PostStore;

/// Registers every posts route on `router`, sharing `store` between them.
pub fn routes(router: Router, store: Arc<PostStore>) -> Router {
    router
        .on(Method::Get,    "/api/posts",        with_store(&store, handlers::list_posts))
        .on(Method::Post,   "/api/posts",        with_store(&store, handlers::create_post))
        .on(Method::Get,    "/api/posts/search", with_store(&store, handlers::search_posts))
        .on(Method::Put,    "/api/posts/{id}",   with_store(&store, handlers::update_post))
        .on(Method::Delete, "/api/posts/{id}",   with_store(&store, handlers::delete_post))
}

/// Adapts a `(store, request)` handler to the router's `request`-only shape.
fn with_store<F, Fut>(
    store: &Arc<PostStore>,
    handler: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static + use<F, Fut>
where
    F: Fn(Arc<PostStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Send + 'static,
{
    let store = Arc::clone(store);
    move |req| handler(Arc::clone(&store), req)
}
