//! Structured speech markup rendering.
//!
//! The alternative to punctuation pacing: sentences get explicit break
//! tags and the whole span is wrapped in SSML with configurable prosody.
//! Markup support is occasionally unreliable in batch automation, which
//! is why the plain strategy is the default.

use regex::Regex;

use crate::config::SpeechConfig;

/// Renders one cleaned span as a complete SSML document.
#[derive(Debug, Clone)]
pub struct MarkupRenderer {
    locale: String,
    rate: String,
    pitch: String,
    sentence_break_ms: u32,
    sentence_end: Regex,
    whitespace: Regex,
}

impl MarkupRenderer {
    /// Create a renderer from the configured prosody settings
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            locale: config.locale.clone(),
            rate: config.rate.clone(),
            pitch: config.pitch.clone(),
            sentence_break_ms: config.sentence_break_ms,
            sentence_end: Regex::new(r"[。！？.!?]").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Render the span, or `None` when nothing remains to speak
    pub fn render(&self, text: &str, voice: &str) -> Option<String> {
        let text = self.whitespace.replace_all(text, " ");
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let break_tag = format!("<break time='{}ms'/>", self.sentence_break_ms);
        let mut body = String::new();
        let mut cursor = 0;
        for m in self.sentence_end.find_iter(text) {
            let sentence = text[cursor..m.end()].trim();
            if !sentence.is_empty() {
                body.push_str(sentence);
                body.push_str(&break_tag);
            }
            cursor = m.end();
        }
        // a trailing fragment without a terminator is still spoken
        let remainder = text[cursor..].trim();
        if !remainder.is_empty() {
            body.push_str(remainder);
            body.push_str(&break_tag);
        }

        Some(format!(
            "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{}'>\
<voice name='{}'><prosody rate='{}' pitch='{}'>{}</prosody></voice></speak>",
            self.locale, voice, self.rate, self.pitch, body
        ))
    }
}
