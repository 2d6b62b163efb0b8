//! Cursor pagination for the post listing.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::document::PostSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PostCursorPayload {
    sort_key: Option<OffsetDateTime>,
    uid: String,
}

/// Position after the last post of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCursor {
    sort_key: Option<OffsetDateTime>,
    uid: String,
}

impl PostCursor {
    pub fn new(sort_key: Option<OffsetDateTime>, uid: impl Into<String>) -> Self {
        Self {
            sort_key,
            uid: uid.into(),
        }
    }

    /// Cursor pointing just past `post`.
    pub fn after(post: &PostSummary) -> Self {
        Self::new(post.first_publication_date, post.uid.clone())
    }

    pub fn sort_key(&self) -> Option<OffsetDateTime> {
        self.sort_key
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Summary-shaped key so cursors compare with the listing order.
    pub(crate) fn as_summary(&self) -> PostSummary {
        PostSummary {
            uid: self.uid.clone(),
            first_publication_date: self.sort_key,
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
        }
    }

    pub fn encode(&self) -> String {
        let payload = PostCursorPayload {
            sort_key: self.sort_key,
            uid: self.uid.clone(),
        };
        let serialized =
            serde_json::to_vec(&payload).expect("serializing post cursor payload should succeed");
        URL_SAFE_NO_PAD.encode(serialized)
    }

    pub fn decode(cursor: &str) -> Result<Self, PaginationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor)
            .map_err(|err| PaginationError::InvalidCursor(err.to_string()))?;
        let payload: PostCursorPayload = serde_json::from_slice(&bytes)
            .map_err(|err| PaginationError::InvalidCursor(err.to_string()))?;
        Ok(Self {
            sort_key: payload.sort_key,
            uid: payload.uid,
        })
    }
}

/// Page size and optional starting cursor.
#[derive(Debug, Clone)]
pub struct PageRequest<C> {
    pub limit: u32,
    pub cursor: Option<C>,
}

impl<C> PageRequest<C> {
    pub fn new(limit: u32, cursor: Option<C>) -> Self {
        Self { limit, cursor }
    }
}

/// Cursor-aware page result.
#[derive(Debug, Clone, Serialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}
