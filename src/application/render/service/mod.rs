mod fence;
mod highlight;
mod read_time;
mod serializer;
mod spans;

use tracing::debug;

use crate::application::render::types::{
    RenderOptions, RenderService, RenderedDocument, RenderedSection,
};
use crate::domain::document::{ContentSection, Document, RichTextBlock};

pub use fence::extract_fenced_language;
pub use highlight::{HighlightError, highlight_css};
pub use read_time::{count_words, estimate_read_time, section_word_count};

use read_time::minutes_for;
use serializer::{serialize_block, serialize_body};

/// Converts CMS rich text into HTML fragments and a read-time estimate.
///
/// Holds only immutable options, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RichDocumentRenderer {
    options: RenderOptions,
}

impl RichDocumentRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn estimate_read_time(&self, sections: &[ContentSection]) -> u32 {
        estimate_read_time(sections, self.options.words_per_minute)
    }

    pub fn serialize_block(&self, block: &RichTextBlock) -> String {
        serialize_block(block, self.options.highlight)
    }

    /// HTML for a whole section body. An empty body yields an empty string.
    pub fn serialize_body(&self, blocks: &[RichTextBlock]) -> String {
        serialize_body(blocks, self.options.highlight)
    }
}

impl RenderService for RichDocumentRenderer {
    fn render(&self, document: &Document) -> RenderedDocument {
        let sections = document.sections();
        let word_count = count_words(sections);
        let read_time_minutes = minutes_for(word_count, self.options.words_per_minute);

        let rendered = sections
            .iter()
            .map(|section| RenderedSection {
                heading: section.heading.clone(),
                html: self.serialize_body(&section.body),
            })
            .collect();

        debug!(
            target = "spacetraveling::render",
            uid = %document.uid,
            sections = sections.len(),
            word_count,
            read_time_minutes,
            "Rendered document"
        );

        RenderedDocument {
            word_count,
            read_time_minutes,
            sections: rendered,
        }
    }
}
