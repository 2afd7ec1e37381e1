//! HTTP handlers for `/api/posts`.
//!
//! Each handler takes the shared store and the request, and returns a
//! `Result` whose error side renders as a JSON error body.

use std::sync::Arc;

use serde::Serialize;

use crate::request::Request;
use crate::response::Json;
use crate::status::Status;

use super::error::ApiError;
use super::model::{NewPost, Post, PostFields};
use super::query::{SearchQuery, SortOrder};
use super::store::PostStore;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

/// `GET /api/posts?sort=&direction=`
pub async fn list_posts(store: Arc<PostStore>, req: Request) -> Result<Json<Vec<Post>>, ApiError> {
    let order = SortOrder::from_params(req.query("sort"), req.query("direction"))?;
    Ok(Json(store.list(order)))
}

/// `POST /api/posts`
pub async fn create_post(store: Arc<PostStore>, req: Request) -> Result<(Status, Json<Post>), ApiError> {
    let fields = decode_fields(&req)?
        .ok_or_else(|| ApiError::Validation("No JSON data provided".to_owned()))?;
    let draft = NewPost::try_from(fields)?;
    Ok((Status::Created, Json(store.create(draft))))
}

/// `PUT /api/posts/{id}`
///
/// An empty body is a valid no-op update.
pub async fn update_post(store: Arc<PostStore>, req: Request) -> Result<Json<Post>, ApiError> {
    let id = post_id(&req)?;
    let fields = decode_fields(&req)?.unwrap_or_default();
    store.update(id, &fields).map(Json).ok_or(ApiError::PostNotFound(id))
}

/// `DELETE /api/posts/{id}`
pub async fn delete_post(store: Arc<PostStore>, req: Request) -> Result<Json<Deleted>, ApiError> {
    let id = post_id(&req)?;
    store.delete(id).ok_or(ApiError::PostNotFound(id))?;
    Ok(Json(Deleted {
        message: format!("Post with id {id} has been deleted successfully."),
    }))
}

/// `GET /api/posts/search?title=&content=`
pub async fn search_posts(store: Arc<PostStore>, req: Request) -> Json<Vec<Post>> {
    let query = SearchQuery::new(req.query("title"), req.query("content"));
    Json(store.search(&query))
}

/// Only plain ASCII digits name a post; `+1`, `-1` and `abc` are not ids.
/// A digit string too large for `u64` cannot name a stored post either.
fn post_id(req: &Request) -> Result<u64, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadId);
    }
    raw.parse().map_err(|_| ApiError::IdOutOfRange(raw.to_owned()))
}

fn decode_fields(req: &Request) -> Result<Option<PostFields>, ApiError> {
    req.json::<PostFields>()
        .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {e}")))
}
