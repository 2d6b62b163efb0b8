//! Capabilities the application needs from the content service.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::{CursorPage, PageRequest, PaginationError, PostCursor};
use crate::domain::document::{Document, PostSummary};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl RepoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Posts immediately around another one in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacentPosts {
    /// Next older post.
    pub previous: Option<PostSummary>,
    /// Next newer post.
    pub next: Option<PostSummary>,
}

/// Read access to already-published documents, newest first.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn list_posts(
        &self,
        page: PageRequest<PostCursor>,
    ) -> Result<CursorPage<PostSummary>, RepoError>;

    async fn get_post(&self, uid: &str) -> Result<Option<Document>, RepoError>;

    /// Fails with [`RepoError::NotFound`] when `uid` is unknown.
    async fn adjacent_posts(&self, uid: &str) -> Result<AdjacentPosts, RepoError>;

    async fn post_uids(&self) -> Result<Vec<String>, RepoError>;
}
