use askama::{Error as AskamaError, Template};

use crate::application::render::{HighlightMode, RenderedSection};
use crate::application::site::{PageRenderError, PageRenderer};

const HIGHLIGHT_JS_STYLESHEET: &str =
    "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11.9.0/build/styles/default.min.css";
const HIGHLIGHT_JS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11.9.0/build/highlight.min.js";
pub const SYNTAX_STYLESHEET_PATH: &str = "assets/syntax.css";

fn render_template<T: Template>(template: T, page: &'static str) -> Result<String, PageRenderError> {
    template
        .render()
        .map_err(|err: AskamaError| PageRenderError::new(page, err.to_string()))
}

#[derive(Clone, Debug)]
pub struct BrandView {
    pub title: String,
    pub href: String,
    pub logo_src: String,
}

#[derive(Clone, Debug)]
pub struct PageMetaView {
    pub title: String,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    /// Run the browser highlighter once the page has loaded.
    pub highlight_on_load: bool,
}

impl PageMetaView {
    pub fn with_title(self, title: String) -> Self {
        Self { title, ..self }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn for_site(site_title: impl Into<String>, highlight: HighlightMode) -> Self {
        let site_title = site_title.into();
        let (stylesheets, scripts, highlight_on_load) = match highlight {
            HighlightMode::Client => (
                vec![HIGHLIGHT_JS_STYLESHEET.to_string()],
                vec![HIGHLIGHT_JS_SCRIPT.to_string()],
                true,
            ),
            HighlightMode::Server => (
                vec![format!("/{SYNTAX_STYLESHEET_PATH}")],
                Vec::new(),
                false,
            ),
        };

        Self {
            brand: BrandView {
                title: site_title.clone(),
                href: "/".to_string(),
                logo_src: "/logo.svg".to_string(),
            },
            meta: PageMetaView {
                title: site_title,
                stylesheets,
                scripts,
                highlight_on_load,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCardView {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_on: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomePageView {
    pub page_number: u32,
    pub posts: Vec<PostCardView>,
    /// Link to the following listing page.
    pub next_page: Option<String>,
    /// Opaque cursor for fetching the following listing page.
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostLinkView {
    pub title: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostPageView {
    pub uid: String,
    pub title: String,
    pub banner_url: Option<String>,
    pub banner_alt: String,
    pub author: String,
    pub published_on: String,
    pub edited_at: Option<String>,
    pub read_time_minutes: u32,
    pub sections: Vec<RenderedSection>,
    pub previous: Option<PostLinkView>,
    pub next: Option<PostLinkView>,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<HomePageView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostPageView>,
}

/// [`PageRenderer`] backed by compiled askama templates.
#[derive(Clone, Debug)]
pub struct AskamaPageRenderer {
    chrome: LayoutChrome,
}

impl AskamaPageRenderer {
    pub fn new(chrome: LayoutChrome) -> Self {
        Self { chrome }
    }

    fn chrome_titled(&self, page_title: &str) -> LayoutChrome {
        let title = format!("{} | {page_title}", self.chrome.brand.title);
        LayoutChrome {
            brand: self.chrome.brand.clone(),
            meta: self.chrome.meta.clone().with_title(title),
        }
    }
}

impl PageRenderer for AskamaPageRenderer {
    fn render_home(&self, view: &HomePageView) -> Result<String, PageRenderError> {
        let chrome = self.chrome_titled("Home");
        render_template(
            HomeTemplate {
                view: LayoutContext::new(chrome, view.clone()),
            },
            "home page",
        )
    }

    fn render_post(&self, view: &PostPageView) -> Result<String, PageRenderError> {
        let chrome = self.chrome_titled(&view.title);
        render_template(
            PostTemplate {
                view: LayoutContext::new(chrome, view.clone()),
            },
            "post page",
        )
    }
}
