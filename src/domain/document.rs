//! Content documents as delivered by the headless CMS.
//!
//! The JSON shape mirrors the CMS API: a document carries publication
//! timestamps and a `data` object whose `content` is an ordered list of
//! sections, each holding a heading and a body of rich-text blocks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::DomainError;

/// A single rich-text block. Unrecognised block types deserialize as [`RichTextBlock::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RichTextBlock {
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OrderedListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    #[serde(other)]
    Unknown,
}

impl RichTextBlock {
    /// Plain text carried by the block. Non-text blocks contribute nothing.
    pub fn text(&self) -> &str {
        match self {
            RichTextBlock::Paragraph(block)
            | RichTextBlock::Heading1(block)
            | RichTextBlock::Heading2(block)
            | RichTextBlock::Heading3(block)
            | RichTextBlock::Heading4(block)
            | RichTextBlock::Heading5(block)
            | RichTextBlock::Heading6(block)
            | RichTextBlock::Preformatted(block)
            | RichTextBlock::ListItem(block)
            | RichTextBlock::OrderedListItem(block) => block.text.as_str(),
            RichTextBlock::Image(_) | RichTextBlock::Embed(_) | RichTextBlock::Unknown => "",
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        RichTextBlock::Paragraph(TextBlock::plain(text))
    }

    pub fn preformatted(text: impl Into<String>) -> Self {
        RichTextBlock::Preformatted(TextBlock::plain(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    pub fn with_spans(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub dimensions: Option<ImageDimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub oembed: OEmbed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OEmbed {
    pub embed_url: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Inline annotation over a character range of a text block.
///
/// `start` is inclusive and `end` exclusive; both count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSpan", into = "RawSpan")]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink(LinkTarget),
    Label(String),
    /// Span type this crate does not render; the text is kept without a wrapper.
    Other(String),
}

/// Destination of a hyperlink span, tagged by the CMS `link_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "link_type")]
pub enum LinkTarget {
    Web {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Document {
        #[serde(default)]
        uid: Option<String>,
    },
    Media {
        url: String,
    },
    #[serde(other)]
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        let kind = match raw.kind.as_str() {
            "strong" => SpanKind::Strong,
            "em" => SpanKind::Em,
            "hyperlink" => raw
                .data
                .and_then(|data| serde_json::from_value::<LinkTarget>(data).ok())
                .map(SpanKind::Hyperlink)
                .unwrap_or(SpanKind::Other(raw.kind)),
            "label" => raw
                .data
                .as_ref()
                .and_then(|data| data.get("label"))
                .and_then(|label| label.as_str())
                .map(|label| SpanKind::Label(label.to_string()))
                .unwrap_or(SpanKind::Other(raw.kind)),
            _ => SpanKind::Other(raw.kind),
        };

        Span {
            start: raw.start,
            end: raw.end,
            kind,
        }
    }
}

impl From<Span> for RawSpan {
    fn from(span: Span) -> Self {
        let (kind, data) = match span.kind {
            SpanKind::Strong => ("strong".to_string(), None),
            SpanKind::Em => ("em".to_string(), None),
            SpanKind::Hyperlink(target) => {
                ("hyperlink".to_string(), serde_json::to_value(target).ok())
            }
            SpanKind::Label(label) => (
                "label".to_string(),
                Some(serde_json::json!({ "label": label })),
            ),
            SpanKind::Other(kind) => (kind, None),
        };

        RawSpan {
            start: span.start,
            end: span.end,
            kind,
            data,
        }
    }
}

/// A headed section of an article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

impl ContentSection {
    pub fn new(heading: impl Into<String>, body: Vec<RichTextBlock>) -> Self {
        Self {
            heading: heading.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub uid: String,
    #[serde(default, with = "timestamp")]
    pub first_publication_date: Option<OffsetDateTime>,
    #[serde(default, with = "timestamp")]
    pub last_publication_date: Option<OffsetDateTime>,
    pub data: DocumentData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default)]
    pub content: Vec<ContentSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Document {
    pub fn sections(&self) -> &[ContentSection] {
        &self.data.content
    }

    /// Check invariants the rest of the system relies on.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_uid(&self.uid)
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            uid: self.uid.clone(),
            first_publication_date: self.first_publication_date,
            title: self.data.title.clone(),
            subtitle: self.data.subtitle.clone(),
            author: self.data.author.clone(),
        }
    }
}

/// Listing projection of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<OffsetDateTime>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// Newest first; undated posts sort last; ties break on uid.
pub fn listing_order(a: &PostSummary, b: &PostSummary) -> Ordering {
    let by_date = match (a.first_publication_date, b.first_publication_date) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.uid.cmp(&b.uid))
}

/// Site-relative link to an article page.
pub fn post_href(uid: &str) -> String {
    format!("/post/{uid}")
}

/// A uid becomes a path segment of the generated site.
pub fn validate_uid(uid: &str) -> Result<(), DomainError> {
    if uid.trim().is_empty() {
        return Err(DomainError::validation("document uid must not be empty"));
    }
    if uid.contains('/') || uid.contains('\\') || uid.contains("..") {
        return Err(DomainError::validation(format!(
            "document uid `{uid}` must not contain path separators"
        )));
    }
    Ok(())
}

pub(crate) mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::{
        OffsetDateTime,
        format_description::{FormatItem, well_known::Rfc3339},
        macros::format_description,
    };

    /// CMS timestamps carry an offset without a colon, e.g. `+0000`.
    const CMS_TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
    );

    pub(crate) fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(value, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(value, CMS_TIMESTAMP_FORMAT))
    }

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => {
                let formatted = timestamp.format(&Rfc3339).map_err(S::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| parse(&value).map_err(D::Error::custom))
            .transpose()
    }
}
