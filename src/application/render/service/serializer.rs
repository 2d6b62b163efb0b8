use tracing::warn;

use crate::application::render::types::HighlightMode;
use crate::domain::document::{EmbedBlock, ImageBlock, RichTextBlock, TextBlock};

use super::fence::{extract_fenced_language, fence_marker};
use super::highlight::highlight_code;
use super::spans::{LineBreaks, escape_html, serialize_inline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn of(block: &RichTextBlock) -> Option<Self> {
        match block {
            RichTextBlock::ListItem(_) => Some(ListKind::Unordered),
            RichTextBlock::OrderedListItem(_) => Some(ListKind::Ordered),
            _ => None,
        }
    }

    fn open(self) -> &'static str {
        match self {
            ListKind::Unordered => "<ul>",
            ListKind::Ordered => "<ol>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}

/// Serialise a section body, wrapping consecutive list items in `<ul>` / `<ol>`.
pub(crate) fn serialize_body(blocks: &[RichTextBlock], highlight: HighlightMode) -> String {
    let mut html = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        let list = ListKind::of(block);
        if list != open_list {
            if let Some(previous) = open_list {
                html.push_str(previous.close());
            }
            if let Some(next) = list {
                html.push_str(next.open());
            }
            open_list = list;
        }
        html.push_str(&serialize_block(block, highlight));
    }

    if let Some(previous) = open_list {
        html.push_str(previous.close());
    }

    html
}

pub(crate) fn serialize_block(block: &RichTextBlock, highlight: HighlightMode) -> String {
    match block {
        RichTextBlock::Paragraph(text) => wrap("p", text),
        RichTextBlock::Heading1(text) => wrap("h1", text),
        RichTextBlock::Heading2(text) => wrap("h2", text),
        RichTextBlock::Heading3(text) => wrap("h3", text),
        RichTextBlock::Heading4(text) => wrap("h4", text),
        RichTextBlock::Heading5(text) => wrap("h5", text),
        RichTextBlock::Heading6(text) => wrap("h6", text),
        RichTextBlock::ListItem(text) | RichTextBlock::OrderedListItem(text) => wrap("li", text),
        RichTextBlock::Preformatted(text) => serialize_preformatted(text, highlight),
        RichTextBlock::Image(image) => serialize_image(image),
        RichTextBlock::Embed(embed) => serialize_embed(embed),
        RichTextBlock::Unknown => String::new(),
    }
}

fn wrap(tag: &str, block: &TextBlock) -> String {
    let children = serialize_inline(&block.text, &block.spans, LineBreaks::Html);
    format!("<{tag}>{children}</{tag}>")
}

/// Fenced blocks lose their opening marker and gain a `language-<tag>` class.
/// The closing fence is left in place.
fn serialize_preformatted(block: &TextBlock, highlight: HighlightMode) -> String {
    let children = serialize_inline(&block.text, &block.spans, LineBreaks::Preserve);

    let Some(language) = extract_fenced_language(&block.text) else {
        return format!("<pre class=\"code\">{children}</pre>");
    };
    let marker = fence_marker(language);

    if highlight == HighlightMode::Server {
        let code = block.text.replacen(&marker, "", 1);
        match highlight_code(language, code.trim()) {
            Ok(highlighted) => {
                return format!(
                    "<pre class=\"syntax-highlight\"><code class=\"language-{language}\">{highlighted}</code></pre>"
                );
            }
            Err(err) => warn!(
                target = "spacetraveling::render::highlight",
                language,
                error = %err,
                "Server-side highlighting failed; emitting client-side markup"
            ),
        }
    }

    let code = children.replacen(&marker, "", 1);
    format!(
        "<pre><code class=\"language-{language}\">{}</code></pre>",
        code.trim()
    )
}

fn serialize_image(image: &ImageBlock) -> String {
    let alt = image.alt.as_deref().unwrap_or_default();
    let dimensions = image
        .dimensions
        .map(|size| format!(" width=\"{}\" height=\"{}\"", size.width, size.height))
        .unwrap_or_default();

    format!(
        "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\"{dimensions} /></p>",
        escape_html(&image.url),
        escape_html(alt)
    )
}

/// Provider markup is trusted CMS output and inserted verbatim.
fn serialize_embed(embed: &EmbedBlock) -> String {
    let oembed = &embed.oembed;
    format!(
        "<div data-oembed=\"{}\" data-oembed-type=\"{}\" data-oembed-provider=\"{}\">{}</div>",
        escape_html(&oembed.embed_url),
        escape_html(oembed.kind.as_deref().unwrap_or_default()),
        escape_html(oembed.provider_name.as_deref().unwrap_or_default()),
        oembed.html.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{ImageDimensions, OEmbed, Span, SpanKind};

    fn client(block: &RichTextBlock) -> String {
        serialize_block(block, HighlightMode::Client)
    }

    #[test]
    fn fenced_block_strips_opening_marker_only() {
        let block = RichTextBlock::preformatted("```go\nfmt.Println(1)\n```");
        assert_eq!(
            client(&block),
            "<pre><code class=\"language-go\">fmt.Println(1)\n```</code></pre>"
        );
    }

    #[test]
    fn unfenced_block_is_wrapped_unchanged() {
        let block = RichTextBlock::preformatted("  let x = 1;\n```\n");
        assert_eq!(
            client(&block),
            "<pre class=\"code\">  let x = 1;\n```\n</pre>"
        );
    }

    #[test]
    fn only_first_marker_occurrence_is_removed() {
        let block = RichTextBlock::preformatted("```sh\necho '```sh'\n```");
        assert_eq!(
            client(&block),
            "<pre><code class=\"language-sh\">echo &#39;```sh&#39;\n```</code></pre>"
        );
    }

    #[test]
    fn truncated_tag_leaves_rest_of_marker() {
        let block = RichTextBlock::preformatted("```c++\nint x;");
        assert_eq!(
            client(&block),
            "<pre><code class=\"language-c\">++\nint x;</code></pre>"
        );
    }

    #[test]
    fn code_content_is_escaped() {
        let block = RichTextBlock::preformatted("```html\n<p>&</p>");
        assert_eq!(
            client(&block),
            "<pre><code class=\"language-html\">&lt;p&gt;&amp;&lt;/p&gt;</code></pre>"
        );
    }

    #[test]
    fn server_mode_highlights_fenced_code() {
        let block = RichTextBlock::preformatted("```rust\nfn main() {}\n```");
        let html = serialize_block(&block, HighlightMode::Server);
        assert!(html.starts_with("<pre class=\"syntax-highlight\"><code class=\"language-rust\">"));
        assert!(html.contains("syntax-"));
        assert!(!html.contains("```rust"));
    }

    #[test]
    fn server_mode_leaves_unfenced_blocks_alone() {
        let block = RichTextBlock::preformatted("plain");
        assert_eq!(
            serialize_block(&block, HighlightMode::Server),
            "<pre class=\"code\">plain</pre>"
        );
    }

    #[test]
    fn text_blocks_map_to_elements() {
        let heading = RichTextBlock::Heading2(TextBlock::plain("Title"));
        assert_eq!(client(&heading), "<h2>Title</h2>");

        let paragraph = RichTextBlock::Paragraph(TextBlock::with_spans(
            "bold move",
            vec![Span::new(0, 4, SpanKind::Strong)],
        ));
        assert_eq!(client(&paragraph), "<p><strong>bold</strong> move</p>");
    }

    #[test]
    fn unknown_blocks_render_nothing() {
        assert_eq!(client(&RichTextBlock::Unknown), "");
    }

    #[test]
    fn list_items_are_grouped_by_kind() {
        let blocks = vec![
            RichTextBlock::ListItem(TextBlock::plain("a")),
            RichTextBlock::ListItem(TextBlock::plain("b")),
            RichTextBlock::OrderedListItem(TextBlock::plain("one")),
            RichTextBlock::paragraph("after"),
            RichTextBlock::ListItem(TextBlock::plain("c")),
        ];
        assert_eq!(
            serialize_body(&blocks, HighlightMode::Client),
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p>after</p><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn empty_body_is_empty_html() {
        assert_eq!(serialize_body(&[], HighlightMode::Client), "");
    }

    #[test]
    fn images_and_embeds() {
        let image = RichTextBlock::Image(ImageBlock {
            url: "https://img.example/a.png".into(),
            alt: Some("A \"quoted\" alt".into()),
            dimensions: Some(ImageDimensions {
                width: 640,
                height: 480,
            }),
        });
        assert_eq!(
            client(&image),
            "<p class=\"block-img\"><img src=\"https://img.example/a.png\" alt=\"A &quot;quoted&quot; alt\" width=\"640\" height=\"480\" /></p>"
        );

        let embed = RichTextBlock::Embed(EmbedBlock {
            oembed: OEmbed {
                embed_url: "https://video.example/v/1".into(),
                kind: Some("video".into()),
                provider_name: Some("Video".into()),
                html: Some("<iframe></iframe>".into()),
            },
        });
        assert_eq!(
            client(&embed),
            "<div data-oembed=\"https://video.example/v/1\" data-oembed-type=\"video\" data-oembed-provider=\"Video\"><iframe></iframe></div>"
        );
    }
}
