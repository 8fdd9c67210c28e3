//! Markdown-to-plain-text cleanup.
//!
//! Strips formatting from one extracted span so the downstream speech
//! normalizer only sees plain text. Cleanup is idempotent: re-running it
//! on already-cleaned text is a no-op.

use regex::Regex;

/// Removes markdown syntax from extracted section text.
#[derive(Debug, Clone)]
pub struct MarkdownCleaner {
    heading: Regex,
    bold_star: Regex,
    italic_star: Regex,
    bold_underscore: Regex,
    italic_underscore: Regex,
    image: Regex,
    link: Regex,
    emoji: Regex,
    blank_lines: Regex,
}

impl Default for MarkdownCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownCleaner {
    /// Compile the cleanup patterns
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"(?m)^#{1,6}\s+").unwrap(),
            bold_star: Regex::new(r"\*\*([^*]+)\*\*").unwrap(),
            italic_star: Regex::new(r"\*([^*]+)\*").unwrap(),
            bold_underscore: Regex::new(r"__([^_]+)__").unwrap(),
            italic_underscore: Regex::new(r"_([^_]+)_").unwrap(),
            // images must go before links so alt text is dropped, not kept
            image: Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap(),
            link: Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap(),
            emoji: Regex::new(
                r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}✅📘]",
            )
            .unwrap(),
            blank_lines: Regex::new(r"\n\s*\n").unwrap(),
        }
    }

    /// Strip markdown formatting and return plain text
    pub fn clean(&self, text: &str) -> String {
        let text = self.heading.replace_all(text, "");
        let text = self.bold_star.replace_all(&text, "$1");
        let text = self.italic_star.replace_all(&text, "$1");
        let text = self.bold_underscore.replace_all(&text, "$1");
        let text = self.italic_underscore.replace_all(&text, "$1");
        let text = self.image.replace_all(&text, "");
        let text = self.link.replace_all(&text, "$1");
        let text = self.emoji.replace_all(&text, "");
        let text = self.blank_lines.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}
