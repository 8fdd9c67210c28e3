//! Block parser: frontmatter metadata plus the three content sections.
//!
//! Parsing is pure and deterministic; the same block text always yields a
//! structurally identical result. A block is rejected outright when the
//! question or concise-answer heading is missing.

use regex::Regex;
use thiserror::Error;

use crate::domain::{MetaValue, Metadata, ParsedQuestion};

use super::cleanup::MarkdownCleaner;

/// Keyword whose presence makes a block a question candidate
pub const QUESTION_KEYWORD: &str = "题目";

/// Literal heading opening the question section
const QUESTION_HEADING: &str = "## **题目：**";

/// Literal heading opening the concise-answer section
const SIMPLE_ANSWER_HEADING: &str = "## **✅ 精简答案：**";

/// Literal heading opening the detailed-analysis section
const ANALYSIS_HEADING: &str = "**📘 详细解析：**";

/// Why a candidate block could not be parsed into a question
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("block has no question heading")]
    MissingQuestion,

    #[error("block has no concise-answer heading")]
    MissingConciseAnswer,
}

/// Extracts a [`ParsedQuestion`] from one block's text.
#[derive(Debug, Clone)]
pub struct BlockParser {
    cleaner: MarkdownCleaner,
    analysis_end: Regex,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    /// Create a parser with compiled cleanup patterns
    pub fn new() -> Self {
        Self {
            cleaner: MarkdownCleaner::new(),
            // the analysis section ends at a horizontal rule, the next
            // top-level heading, or the end of the block
            analysis_end: Regex::new(r"\n\s*---\s*\n|\n\s*##").unwrap(),
        }
    }

    /// Whether a block is worth an ordinal: non-empty and carrying the
    /// question keyword somewhere in its text
    pub fn is_candidate(block: &str) -> bool {
        let block = block.trim();
        !block.is_empty() && block.contains(QUESTION_KEYWORD)
    }

    /// Parse one block into metadata and the three cleaned sections
    pub fn parse(&self, block: &str) -> Result<ParsedQuestion, ParseError> {
        let (metadata, content) = parse_frontmatter(block);

        let q_pos = content
            .find(QUESTION_HEADING)
            .ok_or(ParseError::MissingQuestion)?;
        let after_question = &content[q_pos + QUESTION_HEADING.len()..];

        let sa_pos = after_question
            .find(SIMPLE_ANSWER_HEADING)
            .ok_or(ParseError::MissingConciseAnswer)?;
        let question_raw = &after_question[..sa_pos];
        let after_answer = &after_question[sa_pos + SIMPLE_ANSWER_HEADING.len()..];

        // the analysis heading may follow the answer with or without a
        // line break; when absent the analysis is empty, not an error
        let (answer_raw, analysis_raw) = match after_answer.find(ANALYSIS_HEADING) {
            Some(pos) => {
                let tail = &after_answer[pos + ANALYSIS_HEADING.len()..];
                let end = self
                    .analysis_end
                    .find(tail)
                    .map(|m| m.start())
                    .unwrap_or(tail.len());
                (&after_answer[..pos], &tail[..end])
            }
            None => (after_answer, ""),
        };

        Ok(ParsedQuestion {
            metadata,
            question: self.cleaner.clean(question_raw.trim()),
            simple_answer: self.cleaner.clean(answer_raw.trim()),
            detailed_analysis: self.cleaner.clean(analysis_raw.trim()),
        })
    }
}

/// Parse the region between the first and second delimiter lines as
/// line-oriented `key: value` pairs; return the metadata and the content
/// that follows. A block without a frontmatter region yields empty
/// metadata and the full block as content.
fn parse_frontmatter(block: &str) -> (Metadata, &str) {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        lines.push((offset, line));
        offset += line.len();
    }

    let opens = match lines.first() {
        Some((_, first)) if first.trim() == "---" => true,
        _ => false,
    };
    if !opens {
        return (Metadata::new(), block);
    }

    let close = lines
        .iter()
        .skip(1)
        .find(|(_, line)| line.trim() == "---");
    let (close_offset, close_line) = match close {
        Some(&(offset, line)) => (offset, line),
        None => return (Metadata::new(), block),
    };

    let region = &block[lines[0].1.len()..close_offset];
    let content = &block[close_offset + close_line.len()..];

    let mut metadata = Metadata::new();
    for line in region.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        metadata.insert(key.trim(), parse_value(value.trim()));
    }
    (metadata, content)
}

/// Parse one metadata value: `[a, b, c]` becomes an ordered list, quoted
/// scalars lose their quotes
fn parse_value(value: &str) -> MetaValue {
    if value.starts_with('[') && value.ends_with(']') {
        let inner = &value[1..value.len() - 1];
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return MetaValue::List(items);
    }

    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    MetaValue::Scalar(unquoted.unwrap_or(value).to_string())
}
