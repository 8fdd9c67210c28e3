//! Speech text rendering strategies.
//!
//! Two interchangeable renderers feed the same per-unit synthesis call:
//! punctuation-paced plain text (the default) and structured speech
//! markup. Both produce a [`SpeechPayload`].

pub mod markup;
pub mod normalizer;

pub use markup::MarkupRenderer;
pub use normalizer::SpeechNormalizer;

use crate::config::{SpeechConfig, Strategy};

/// Input handed to the synthesis adapter for one span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechPayload {
    /// Punctuation-paced plain text
    Text(String),

    /// A complete speech markup document
    Markup(String),
}

impl SpeechPayload {
    /// The raw content regardless of kind
    pub fn content(&self) -> &str {
        match self {
            Self::Text(text) | Self::Markup(text) => text,
        }
    }
}

/// The configured rendering strategy, constructed once per run
#[derive(Debug, Clone)]
pub enum RenderStrategy {
    /// Normalize into punctuation-paced plain text
    Plain(SpeechNormalizer),

    /// Wrap sentence-split text in speech markup
    Markup(MarkupRenderer),
}

impl RenderStrategy {
    /// Build the strategy selected by the configuration
    pub fn from_config(config: &SpeechConfig) -> Self {
        match config.strategy {
            Strategy::Plain => Self::Plain(SpeechNormalizer::new()),
            Strategy::Markup => Self::Markup(MarkupRenderer::new(config)),
        }
    }

    /// Render one cleaned span, or `None` when nothing remains to speak
    pub fn render(&self, text: &str, voice: &str) -> Option<SpeechPayload> {
        match self {
            Self::Plain(normalizer) => {
                let text = normalizer.normalize(text);
                if text.is_empty() {
                    None
                } else {
                    Some(SpeechPayload::Text(text))
                }
            }
            Self::Markup(renderer) => renderer.render(text, voice).map(SpeechPayload::Markup),
        }
    }
}
