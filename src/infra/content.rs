//! Content fetcher over a directory of CMS document exports.

use std::{
    cmp::Ordering,
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::application::pagination::{CursorPage, PageRequest, PostCursor};
use crate::application::repos::{AdjacentPosts, ContentFetcher, RepoError};
use crate::domain::document::{Document, PostSummary, listing_order};
use crate::domain::error::DomainError;

use super::error::InfraError;

/// Serves documents held in memory, ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct JsonContentFetcher {
    documents: Vec<Document>,
    summaries: Vec<PostSummary>,
    by_uid: HashMap<String, usize>,
}

impl JsonContentFetcher {
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, DomainError> {
        let mut documents = documents;
        for document in &documents {
            document.validate()?;
        }
        documents.sort_by(|a, b| listing_order(&a.summary(), &b.summary()));

        let mut by_uid = HashMap::with_capacity(documents.len());
        for (index, document) in documents.iter().enumerate() {
            if by_uid.insert(document.uid.clone(), index).is_some() {
                return Err(DomainError::validation(format!(
                    "document uid `{}` appears more than once",
                    document.uid
                )));
            }
        }

        let summaries = documents.iter().map(Document::summary).collect();
        Ok(Self {
            documents,
            summaries,
            by_uid,
        })
    }

    /// Load every `*.json` file directly inside `directory` as a document.
    pub async fn from_dir(directory: &Path) -> Result<Self, InfraError> {
        let mut entries = fs::read_dir(directory).await?;
        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
            if is_json && entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            documents.push(load_document(path).await?);
        }

        let fetcher = Self::from_documents(documents)
            .map_err(|err| InfraError::content(directory, err.to_string()))?;

        info!(
            target = "spacetraveling::content",
            directory = %directory.display(),
            documents = fetcher.documents.len(),
            "Loaded content documents"
        );

        Ok(fetcher)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn position_after(&self, cursor: &PostCursor) -> usize {
        let key = cursor.as_summary();
        self.summaries
            .partition_point(|summary| listing_order(summary, &key) != Ordering::Greater)
    }
}

/// Parse one exported document and check its invariants.
pub async fn load_document(path: &Path) -> Result<Document, InfraError> {
    let raw = fs::read_to_string(path).await?;
    let document: Document =
        serde_json::from_str(&raw).map_err(|err| InfraError::content(path, err.to_string()))?;
    document
        .validate()
        .map_err(|err| InfraError::content(path, err.to_string()))?;

    debug!(
        target = "spacetraveling::content",
        path = %path.display(),
        uid = %document.uid,
        "Parsed content document"
    );

    Ok(document)
}

#[async_trait]
impl ContentFetcher for JsonContentFetcher {
    async fn list_posts(
        &self,
        page: PageRequest<PostCursor>,
    ) -> Result<CursorPage<PostSummary>, RepoError> {
        if page.limit == 0 {
            return Err(RepoError::invalid_input("page limit must be greater than zero"));
        }

        let start = page
            .cursor
            .as_ref()
            .map_or(0, |cursor| self.position_after(cursor));
        if start >= self.summaries.len() {
            return Ok(CursorPage::empty());
        }

        let end = start
            .saturating_add(page.limit as usize)
            .min(self.summaries.len());
        let items = self.summaries[start..end].to_vec();
        let next_cursor = (end < self.summaries.len())
            .then(|| items.last().map(|last| PostCursor::after(last).encode()))
            .flatten();

        Ok(CursorPage::new(items, next_cursor))
    }

    async fn get_post(&self, uid: &str) -> Result<Option<Document>, RepoError> {
        Ok(self
            .by_uid
            .get(uid)
            .map(|&index| self.documents[index].clone()))
    }

    async fn adjacent_posts(&self, uid: &str) -> Result<AdjacentPosts, RepoError> {
        let index = *self.by_uid.get(uid).ok_or(RepoError::NotFound)?;
        Ok(AdjacentPosts {
            previous: self.summaries.get(index + 1).cloned(),
            next: index
                .checked_sub(1)
                .and_then(|newer| self.summaries.get(newer))
                .cloned(),
        })
    }

    async fn post_uids(&self) -> Result<Vec<String>, RepoError> {
        Ok(self
            .summaries
            .iter()
            .map(|summary| summary.uid.clone())
            .collect())
    }
}
