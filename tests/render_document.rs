use std::num::NonZeroU32;

use spacetraveling::application::render::{
    HighlightMode, RenderOptions, RenderService, RichDocumentRenderer, count_words,
    extract_fenced_language, section_word_count,
};
use spacetraveling::domain::document::{ContentSection, Document, DocumentData, RichTextBlock};

fn load_fixture() -> Document {
    serde_json::from_str(include_str!("fixtures/como-utilizar-hooks.json"))
        .expect("fixture deserializes")
}

fn document_with(content: Vec<ContentSection>) -> Document {
    Document {
        uid: "lorem".into(),
        first_publication_date: None,
        last_publication_date: None,
        data: DocumentData {
            title: "Lorem".into(),
            subtitle: String::new(),
            author: String::new(),
            banner: Default::default(),
            content,
        },
    }
}

fn words(count: usize) -> String {
    vec!["palavra"; count].join(" ")
}

#[test]
fn fixture_sections_render_in_order() {
    let rendered = RichDocumentRenderer::default().render(&load_fixture());

    let headings: Vec<&str> = rendered
        .sections
        .iter()
        .map(|section| section.heading.as_str())
        .collect();
    assert_eq!(headings, ["Proin et varius", "Cras laoreet mi"]);

    assert_eq!(
        rendered.sections[0].html,
        "<p><strong>Nullam</strong> dolor sapien, vulputate eu diam at.</p>\
         <ul><li>Hooks</li><li>Effects</li></ul>\
         <pre><code class=\"language-js\">const [a, b] = useState(0);\n```</code></pre>"
    );
    insta::assert_snapshot!(
        rendered.sections[1].html,
        @r#"<p>Veja a <a href="https://react.dev" target="_blank" rel="noopener">documentação oficial</a>.</p><pre class="code">npm install</pre>"#
    );
}

#[test]
fn fixture_word_count_sums_sections() {
    let document = load_fixture();
    let rendered = RichDocumentRenderer::default().render(&document);

    let per_section: usize = document.sections().iter().map(section_word_count).sum();
    assert_eq!(rendered.word_count, per_section);
    assert_eq!(rendered.word_count, 52);
    assert_eq!(rendered.read_time_minutes, 1);
}

#[test]
fn preformatted_without_marker_keeps_children() {
    let renderer = RichDocumentRenderer::default();
    let html = renderer.serialize_block(&RichTextBlock::preformatted("  indented <b>\ncode  "));

    assert_eq!(html, "<pre class=\"code\">  indented &lt;b&gt;\ncode  </pre>");
}

#[test]
fn fenced_go_block_keeps_closing_fence() {
    let renderer = RichDocumentRenderer::default();
    let html = renderer.serialize_block(&RichTextBlock::preformatted("```go\nfmt.Println(1)\n```"));

    assert_eq!(
        html,
        "<pre><code class=\"language-go\">fmt.Println(1)\n```</code></pre>"
    );
}

#[test]
fn read_time_rounds_up_per_started_minute() {
    let renderer = RichDocumentRenderer::default();

    let exactly = document_with(vec![ContentSection::new(
        "",
        vec![RichTextBlock::paragraph(words(200))],
    )]);
    assert_eq!(renderer.render(&exactly).read_time_minutes, 1);

    let one_more = document_with(vec![ContentSection::new(
        "",
        vec![RichTextBlock::paragraph(words(201))],
    )]);
    assert_eq!(renderer.render(&one_more).read_time_minutes, 2);

    let empty = document_with(vec![ContentSection::new("", Vec::new())]);
    let rendered = renderer.render(&empty);
    assert_eq!(rendered.read_time_minutes, 0);
    assert_eq!(rendered.sections[0].html, "");
}

#[test]
fn document_without_sections_reads_in_zero_minutes() {
    let rendered = RichDocumentRenderer::default().render(&document_with(Vec::new()));

    assert_eq!(rendered.read_time_minutes, 0);
    assert_eq!(rendered.word_count, 0);
    assert!(rendered.sections.is_empty());
}

#[test]
fn word_class_prefix_is_captured() {
    assert_eq!(extract_fenced_language("```c++\nint x;"), Some("c"));
    assert_eq!(extract_fenced_language("no fence here"), None);
}

#[test]
fn custom_reading_speed_changes_estimate() {
    let options = RenderOptions {
        words_per_minute: NonZeroU32::new(100).expect("non-zero"),
        highlight: HighlightMode::Client,
    };
    let renderer = RichDocumentRenderer::new(options);
    let document = document_with(vec![ContentSection::new(
        "",
        vec![RichTextBlock::paragraph(words(150))],
    )]);

    assert_eq!(count_words(document.sections()), 150);
    assert_eq!(renderer.render(&document).read_time_minutes, 2);
}

#[test]
fn server_highlighting_colours_known_languages() {
    let renderer = RichDocumentRenderer::new(RenderOptions {
        highlight: HighlightMode::Server,
        ..RenderOptions::default()
    });
    let html = renderer.serialize_block(&RichTextBlock::preformatted(
        "```rust\nfn main() {}\n```",
    ));

    assert!(html.starts_with("<pre class=\"syntax-highlight\"><code class=\"language-rust\">"));
    assert!(html.contains("<span class=\"syntax-"));
    assert!(html.ends_with("</code></pre>"));
}
