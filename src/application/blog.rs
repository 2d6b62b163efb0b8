//! Page view assembly for the listing and article pages.

use std::{num::NonZeroU32, sync::Arc};

use time::UtcOffset;
use tracing::debug;

use crate::application::error::AppError;
use crate::application::pagination::{PageRequest, PostCursor};
use crate::application::render::RenderService;
use crate::application::repos::ContentFetcher;
use crate::domain::dates::{format_edit_timestamp, format_publication_date};
use crate::domain::document::{PostSummary, post_href};
use crate::presentation::views::{HomePageView, PostCardView, PostLinkView, PostPageView};

const DEFAULT_BANNER_ALT: &str = "Banner";

#[derive(Debug, Clone, Copy)]
pub struct BlogSettings {
    pub page_size: NonZeroU32,
    pub utc_offset: UtcOffset,
}

#[derive(Clone)]
pub struct BlogService {
    fetcher: Arc<dyn ContentFetcher>,
    renderer: Arc<dyn RenderService>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        renderer: Arc<dyn RenderService>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            settings,
        }
    }

    /// Listing page `page_number` (1-based) starting at `cursor`.
    pub async fn home_page(
        &self,
        cursor: Option<&str>,
        page_number: u32,
    ) -> Result<HomePageView, AppError> {
        let cursor = cursor.map(PostCursor::decode).transpose().map_err(|err| {
            AppError::validation(format!("listing cursor rejected: {err}"))
        })?;

        let page = self
            .fetcher
            .list_posts(PageRequest::new(self.settings.page_size.get(), cursor))
            .await?;

        let posts: Vec<PostCardView> = page.items.iter().map(|post| self.card(post)).collect();
        let next_cursor = page.next_cursor.filter(|_| !posts.is_empty());
        let next_page = next_cursor
            .as_ref()
            .map(|_| list_page_href(page_number.saturating_add(1)));

        debug!(
            target = "spacetraveling::blog",
            page_number,
            posts = posts.len(),
            has_next = next_cursor.is_some(),
            "Assembled listing page"
        );

        Ok(HomePageView {
            page_number,
            posts,
            next_page,
            next_cursor,
        })
    }

    /// Article page for `uid`, or `None` when the content service has no such post.
    pub async fn post_page(&self, uid: &str) -> Result<Option<PostPageView>, AppError> {
        let Some(document) = self.fetcher.get_post(uid).await? else {
            return Ok(None);
        };
        let adjacent = self.fetcher.adjacent_posts(uid).await?;
        let rendered = self.renderer.render(&document);
        let offset = self.settings.utc_offset;

        let published_on = document
            .first_publication_date
            .map(|timestamp| format_publication_date(timestamp, offset))
            .unwrap_or_default();
        let edited_at = document
            .last_publication_date
            .map(|timestamp| format_edit_timestamp(timestamp, offset));

        let banner_alt = document
            .data
            .banner
            .alt
            .clone()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BANNER_ALT.to_string());

        Ok(Some(PostPageView {
            uid: document.uid.clone(),
            title: document.data.title.clone(),
            banner_url: document.data.banner.url.clone(),
            banner_alt,
            author: document.data.author.clone(),
            published_on,
            edited_at,
            read_time_minutes: rendered.read_time_minutes,
            sections: rendered.sections,
            previous: adjacent.previous.as_ref().and_then(link_view),
            next: adjacent.next.as_ref().and_then(link_view),
        }))
    }

    pub async fn post_uids(&self) -> Result<Vec<String>, AppError> {
        Ok(self.fetcher.post_uids().await?)
    }

    fn card(&self, post: &PostSummary) -> PostCardView {
        PostCardView {
            uid: post.uid.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            published_on: post
                .first_publication_date
                .map(|timestamp| format_publication_date(timestamp, self.settings.utc_offset))
                .unwrap_or_default(),
            href: post_href(&post.uid),
        }
    }
}

/// Navigation only links posts that have a title to show.
fn link_view(post: &PostSummary) -> Option<PostLinkView> {
    (!post.title.trim().is_empty()).then(|| PostLinkView {
        title: post.title.clone(),
        href: post_href(&post.uid),
    })
}

/// Site-relative link to listing page `page_number`.
pub fn list_page_href(page_number: u32) -> String {
    if page_number <= 1 {
        "/".to_string()
    } else {
        format!("/page/{page_number}/")
    }
}
