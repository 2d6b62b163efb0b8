use std::{num::NonZeroU32, path::Path, sync::Arc};

use spacetraveling::application::blog::{BlogService, BlogSettings};
use spacetraveling::application::render::{
    HighlightMode, RenderOptions, RichDocumentRenderer, highlight_css,
};
use spacetraveling::application::site::SiteGenerator;
use spacetraveling::domain::document::{ContentSection, Document, DocumentData, RichTextBlock};
use spacetraveling::infra::content::JsonContentFetcher;
use spacetraveling::infra::output::DirectorySink;
use spacetraveling::presentation::views::{
    AskamaPageRenderer, LayoutChrome, SYNTAX_STYLESHEET_PATH,
};
use time::{UtcOffset, macros::datetime};

fn fixture() -> Document {
    serde_json::from_str(include_str!("fixtures/como-utilizar-hooks.json"))
        .expect("fixture deserializes")
}

fn post(uid: &str, title: &str, published: time::OffsetDateTime) -> Document {
    Document {
        uid: uid.into(),
        first_publication_date: Some(published),
        last_publication_date: None,
        data: DocumentData {
            title: title.into(),
            subtitle: format!("Sobre {title}"),
            author: "Danilo Vieira".into(),
            banner: Default::default(),
            content: vec![ContentSection::new(
                "Introdução",
                vec![RichTextBlock::paragraph("Texto curto.")],
            )],
        },
    }
}

fn blog(highlight: HighlightMode) -> BlogService {
    let fetcher = JsonContentFetcher::from_documents(vec![
        post("mapas-com-react", "Mapas com React", datetime!(2021-03-20 12:00 UTC)),
        fixture(),
        post("criando-um-app", "Criando um app", datetime!(2021-03-01 08:00 UTC)),
    ])
    .expect("valid documents");

    BlogService::new(
        Arc::new(fetcher),
        Arc::new(RichDocumentRenderer::new(RenderOptions {
            highlight,
            ..RenderOptions::default()
        })),
        BlogSettings {
            page_size: NonZeroU32::new(2).expect("non-zero"),
            utc_offset: UtcOffset::UTC,
        },
    )
}

fn generator(highlight: HighlightMode) -> SiteGenerator {
    let chrome = LayoutChrome::for_site("spacetraveling", highlight);
    SiteGenerator::new(blog(highlight), Arc::new(AskamaPageRenderer::new(chrome)), 4)
}

fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative))
        .unwrap_or_else(|err| panic!("expected {relative} to be written: {err}"))
}

#[tokio::test]
async fn build_writes_listing_and_post_pages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sink = DirectorySink::new(dir.path());

    let report = generator(HighlightMode::Client)
        .generate(&sink)
        .await
        .expect("site generated");

    assert_eq!(report.list_pages, 2);
    assert_eq!(report.post_pages, 3);
    assert_eq!(report.assets, 0);

    let first = read(dir.path(), "index.html");
    assert!(first.contains("href=\"/post/mapas-com-react\""));
    assert!(first.contains("href=\"/post/como-utilizar-hooks\""));
    assert!(!first.contains("href=\"/post/criando-um-app\""));
    assert!(first.contains("Carregar mais posts"));
    assert!(first.contains("href=\"/page/2/\""));
    assert!(first.contains("20 mar 2021"));

    let second = read(dir.path(), "page/2/index.html");
    assert!(second.contains("href=\"/post/criando-um-app\""));
    assert!(!second.contains("Carregar mais posts"));
}

#[tokio::test]
async fn post_page_links_neighbours_and_shows_read_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    generator(HighlightMode::Client)
        .generate(&DirectorySink::new(dir.path()))
        .await
        .expect("site generated");

    let html = read(dir.path(), "post/como-utilizar-hooks/index.html");
    assert!(html.contains("<title>spacetraveling | Como utilizar Hooks</title>"));
    assert!(html.contains("15 mar 2021"));
    assert!(html.contains("1 min"));
    assert!(html.contains("* editado em 25 mar 2021, às 19:27"));
    assert!(html.contains("alt=\"Banner\""));
    assert!(html.contains("<pre><code class=\"language-js\">"));
    assert!(html.contains("href=\"/post/criando-um-app\""));
    assert!(html.contains("Post anterior"));
    assert!(html.contains("href=\"/post/mapas-com-react\""));
    assert!(html.contains("Próximo post"));

    let newest = read(dir.path(), "post/mapas-com-react/index.html");
    assert!(newest.contains("Post anterior"));
    assert!(!newest.contains("Próximo post"));
    assert!(!newest.contains("editado em"));
}

#[tokio::test]
async fn server_highlighting_emits_stylesheet_asset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stylesheet = highlight_css("InspiredGitHub").expect("bundled theme");

    let report = generator(HighlightMode::Server)
        .with_asset(SYNTAX_STYLESHEET_PATH, stylesheet)
        .generate(&DirectorySink::new(dir.path()))
        .await
        .expect("site generated");
    assert_eq!(report.assets, 1);

    let css = read(dir.path(), SYNTAX_STYLESHEET_PATH);
    assert!(css.contains(".syntax-"));

    let html = read(dir.path(), "post/como-utilizar-hooks/index.html");
    assert!(html.contains("/assets/syntax.css"));
    assert!(html.contains("<pre class=\"syntax-highlight\"><code class=\"language-js\">"));
    assert!(!html.contains("highlight.min.js"));
}

#[tokio::test]
async fn rejected_cursor_is_a_validation_error() {
    let err = blog(HighlightMode::Client)
        .home_page(Some("not a cursor"), 2)
        .await
        .expect_err("cursor must be rejected");

    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn unknown_post_has_no_page() {
    let page = blog(HighlightMode::Client)
        .post_page("nao-existe")
        .await
        .expect("lookup succeeds");

    assert!(page.is_none());
}
