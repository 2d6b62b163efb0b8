use std::{num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::document::Document;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Where fenced code gets its syntax colouring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// Emit a `language-<tag>` class and let a browser library colour the code.
    #[default]
    Client,
    /// Colour the code while rendering, using class-based spans.
    Server,
}

#[derive(Debug, Error)]
#[error("unknown highlight mode `{0}` (expected `client` or `server`)")]
pub struct ParseHighlightModeError(String);

impl FromStr for HighlightMode {
    type Err = ParseHighlightModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(HighlightMode::Client),
            "server" => Ok(HighlightMode::Server),
            other => Err(ParseHighlightModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub words_per_minute: NonZeroU32,
    pub highlight: HighlightMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            words_per_minute: NonZeroU32::new(DEFAULT_WORDS_PER_MINUTE)
                .unwrap_or(NonZeroU32::MIN),
            highlight: HighlightMode::Client,
        }
    }
}

/// HTML produced for one content section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub heading: String,
    pub html: String,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub word_count: usize,
    pub read_time_minutes: u32,
    /// One entry per section, in document order.
    pub sections: Vec<RenderedSection>,
}

/// Implementations must be pure and deterministic, and never fail.
pub trait RenderService: Send + Sync {
    fn render(&self, document: &Document) -> RenderedDocument;
}
