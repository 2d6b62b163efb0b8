use std::ops::Range;

use crate::domain::document::{LinkTarget, Span, SpanKind, post_href};

/// How newlines inside block text are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineBreaks {
    /// `\n` becomes `<br />`.
    Html,
    /// `\n` is kept verbatim, for preformatted content.
    Preserve,
}

/// Serialise block text with its inline spans into escaped HTML.
///
/// Spans nest when one lies inside another. A span that runs past the end of
/// its parent is clipped to the parent; one that starts inside a previous
/// sibling is clipped to start after it.
pub(crate) fn serialize_inline(text: &str, spans: &[Span], breaks: LineBreaks) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut ordered: Vec<&Span> = spans.iter().filter(|span| span.start < span.end).collect();
    ordered.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));

    let mut html = String::with_capacity(text.len());
    write_range(&mut html, &chars, 0..chars.len(), &ordered, breaks);
    html
}

fn write_range(
    out: &mut String,
    chars: &[char],
    range: Range<usize>,
    spans: &[&Span],
    breaks: LineBreaks,
) {
    let mut cursor = range.start;
    let mut index = 0;

    while index < spans.len() {
        let span = spans[index];
        let start = span.start.max(cursor);
        let end = span.end.min(range.end);
        index += 1;

        if start >= end {
            continue;
        }

        let nested_end = spans[index..]
            .iter()
            .position(|inner| inner.start >= end)
            .map_or(spans.len(), |offset| index + offset);

        write_text(out, &chars[cursor..start], breaks);
        match span_tags(&span.kind) {
            Some((open, close)) => {
                out.push_str(&open);
                write_range(out, chars, start..end, &spans[index..nested_end], breaks);
                out.push_str(close);
            }
            None => write_range(out, chars, start..end, &spans[index..nested_end], breaks),
        }

        cursor = end;
        index = nested_end;
    }

    write_text(out, &chars[cursor..range.end], breaks);
}

fn span_tags(kind: &SpanKind) -> Option<(String, &'static str)> {
    match kind {
        SpanKind::Strong => Some(("<strong>".to_string(), "</strong>")),
        SpanKind::Em => Some(("<em>".to_string(), "</em>")),
        SpanKind::Hyperlink(target) => link_open_tag(target).map(|open| (open, "</a>")),
        SpanKind::Label(label) => Some((
            format!("<span class=\"{}\">", escape_html(label)),
            "</span>",
        )),
        SpanKind::Other(_) => None,
    }
}

fn link_open_tag(target: &LinkTarget) -> Option<String> {
    match target {
        LinkTarget::Web {
            url,
            target: Some(window),
        } => Some(format!(
            "<a href=\"{}\" target=\"{}\" rel=\"noopener\">",
            escape_html(url),
            escape_html(window)
        )),
        LinkTarget::Web { url, target: None } | LinkTarget::Media { url } => {
            Some(format!("<a href=\"{}\">", escape_html(url)))
        }
        LinkTarget::Document { uid: Some(uid) } => {
            Some(format!("<a href=\"{}\">", escape_html(&post_href(uid))))
        }
        LinkTarget::Document { uid: None } | LinkTarget::Any => None,
    }
}

fn write_text(out: &mut String, chars: &[char], breaks: LineBreaks) {
    for &ch in chars {
        match (ch, breaks) {
            ('\n', LineBreaks::Html) => out.push_str("<br />"),
            _ => push_escaped(out, ch),
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut escaped, ch);
    }
    escaped
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(ch),
    }
}
