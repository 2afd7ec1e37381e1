//! The in-memory post collection.
//!
//! # Locking
//!
//! One `std::sync::Mutex` guards the whole list. Every operation takes it
//! once, finishes, and releases it before returning, so no guard is ever held
//! across an `.await`. Id assignment and append happen under the same
//! acquisition, which is what keeps ids unique under concurrent creates.
//!
//! A poisoned lock is recovered rather than propagated: each operation
//! leaves the list consistent before it could panic, so the data behind a
//! poisoned guard is still valid.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::model::{NewPost, Post, PostFields};
use super::query::{SearchQuery, SortOrder};

/// Ordered, process-local collection of posts.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Mutex<Vec<Post>>,
}

impl PostStore {
    /// An empty store. The first post created gets id `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two posts the service starts with.
    pub fn seeded() -> Self {
        Self::from_posts(vec![
            Post::new(1, "First post", "This is the first post."),
            Post::new(2, "Second post", "This is the second post."),
        ])
    }

    /// A store holding `posts` in the given order.
    ///
    /// Ids are taken as given; callers are responsible for their uniqueness.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts: Mutex::new(posts) }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Post>> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A snapshot of every post, in stored order or sorted by `order`.
    ///
    /// Sorting works on the copy; stored order never changes.
    pub fn list(&self, order: Option<SortOrder>) -> Vec<Post> {
        let mut posts = self.lock().clone();
        if let Some(order) = order {
            order.apply(&mut posts);
        }
        posts
    }

    /// Appends a post with id `max(existing) + 1`, or `1` when empty.
    pub fn create(&self, draft: NewPost) -> Post {
        let mut posts = self.lock();
        let id = posts.iter().map(|p| p.id).max().map_or(1, |max| max + 1);
        let post = Post { id, title: draft.title, content: draft.content };
        posts.push(post.clone());
        info!(id, "post created");
        post
    }

    /// Overwrites each supplied field of post `id` and returns the result.
    ///
    /// `None` when no such post exists.
    pub fn update(&self, id: u64, fields: &PostFields) -> Option<Post> {
        let mut posts = self.lock();
        let post = posts.iter_mut().find(|p| p.id == id)?;
        if let Some(title) = fields.title() {
            post.title = title.to_owned();
        }
        if let Some(content) = fields.content() {
            post.content = content.to_owned();
        }
        debug!(id, "post updated");
        Some(post.clone())
    }

    /// Removes post `id`, preserving the order of the rest.
    pub fn delete(&self, id: u64) -> Option<Post> {
        let mut posts = self.lock();
        let idx = posts.iter().position(|p| p.id == id)?;
        let removed = posts.remove(idx);
        info!(id, "post deleted");
        Some(removed)
    }

    /// Every post matching `query`, in stored order. Empty for an empty query.
    pub fn search(&self, query: &SearchQuery) -> Vec<Post> {
        if query.is_empty() {
            return Vec::new();
        }
        self.lock().iter().filter(|p| query.matches(p)).cloned().collect()
    }
}
