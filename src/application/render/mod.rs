//! Rich-text rendering pipeline.
//!
//! The pipeline is pure: it accepts an already-fetched document, produces
//! deterministic HTML per section plus a read-time estimate, and never fails.
//! Malformed input degrades the output instead of surfacing an error.

mod service;
mod types;

pub use service::{
    HighlightError, RichDocumentRenderer, count_words, estimate_read_time,
    extract_fenced_language, highlight_css, section_word_count,
};
pub use types::{
    DEFAULT_HIGHLIGHT_THEME, DEFAULT_WORDS_PER_MINUTE, HighlightMode, ParseHighlightModeError,
    RenderOptions, RenderService, RenderedDocument, RenderedSection,
};
