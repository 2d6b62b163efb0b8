//! Static site generation: every listing page and article page, written to a sink.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures::stream::{self, TryStreamExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::blog::BlogService;
use crate::application::error::AppError;
use crate::infra::error::InfraError;
use crate::presentation::views::{HomePageView, PostPageView};

const MAX_CONCURRENCY: usize = 32;

#[derive(Debug, Error)]
#[error("failed to render {page}: {message}")]
pub struct PageRenderError {
    pub page: &'static str,
    pub message: String,
}

impl PageRenderError {
    pub fn new(page: &'static str, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
        }
    }
}

/// Turns page views into complete HTML documents.
pub trait PageRenderer: Send + Sync {
    fn render_home(&self, view: &HomePageView) -> Result<String, PageRenderError>;

    fn render_post(&self, view: &PostPageView) -> Result<String, PageRenderError>;
}

/// Destination for generated files, addressed by site-relative path.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn write_page(&self, path: &str, contents: String) -> Result<(), InfraError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub list_pages: usize,
    pub post_pages: usize,
    pub assets: usize,
}

pub struct SiteGenerator {
    blog: BlogService,
    renderer: Arc<dyn PageRenderer>,
    concurrency: usize,
    assets: Vec<(String, String)>,
}

impl SiteGenerator {
    pub fn new(blog: BlogService, renderer: Arc<dyn PageRenderer>, concurrency: usize) -> Self {
        Self {
            blog,
            renderer,
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
            assets: Vec::new(),
        }
    }

    /// Emit a static file alongside the pages.
    pub fn with_asset(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.assets.push((path.into(), contents.into()));
        self
    }

    pub async fn generate(&self, sink: &dyn PageSink) -> Result<SiteReport, AppError> {
        info!(
            target = "spacetraveling::site",
            concurrency = self.concurrency,
            "Starting site generation"
        );

        let list_pages = self.generate_listing(sink).await?;
        let post_pages = self.generate_posts(sink).await?;

        for (path, contents) in &self.assets {
            sink.write_page(path, contents.clone()).await?;
        }

        let report = SiteReport {
            list_pages,
            post_pages,
            assets: self.assets.len(),
        };

        info!(
            target = "spacetraveling::site",
            list_pages = report.list_pages,
            post_pages = report.post_pages,
            assets = report.assets,
            "Site generation completed"
        );

        Ok(report)
    }

    async fn generate_listing(&self, sink: &dyn PageSink) -> Result<usize, AppError> {
        let mut cursor: Option<String> = None;
        let mut page_number: u32 = 1;

        loop {
            let view = self.blog.home_page(cursor.as_deref(), page_number).await?;
            let html = self.renderer.render_home(&view)?;
            sink.write_page(&list_page_path(page_number), html).await?;

            match view.next_cursor {
                Some(next) => {
                    cursor = Some(next);
                    page_number += 1;
                }
                None => break,
            }
        }

        Ok(page_number as usize)
    }

    async fn generate_posts(&self, sink: &dyn PageSink) -> Result<usize, AppError> {
        let uids = self.blog.post_uids().await?;
        let written = AtomicUsize::new(0);

        stream::iter(uids.into_iter().map(Ok::<_, AppError>))
            .try_for_each_concurrent(Some(self.concurrency), |uid| {
                let written = &written;
                async move {
                    let Some(view) = self.blog.post_page(&uid).await? else {
                        warn!(
                            target = "spacetraveling::site",
                            uid = %uid,
                            "Post listed but not retrievable; skipping"
                        );
                        return Ok(());
                    };
                    let html = self.renderer.render_post(&view)?;
                    sink.write_page(&post_page_path(&uid), html).await?;
                    written.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
            })
            .await?;

        Ok(written.load(Ordering::Relaxed))
    }
}

/// Output path of listing page `page_number` (1-based).
pub fn list_page_path(page_number: u32) -> String {
    if page_number <= 1 {
        "index.html".to_string()
    } else {
        format!("page/{page_number}/index.html")
    }
}

pub fn post_page_path(uid: &str) -> String {
    format!("post/{uid}/index.html")
}
