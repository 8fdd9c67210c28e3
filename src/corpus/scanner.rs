//! Frontmatter boundary scanner.
//!
//! Locates record boundaries in the raw corpus text. A bare delimiter line
//! only opens a block when nearby metadata evidence confirms it, so
//! horizontal rules inside body prose do not split records.

use crate::domain::BlockSpan;

/// Line prefixes that count as metadata evidence near a candidate boundary
pub const METADATA_KEYS: [&str; 4] = ["id:", "type:", "difficulty:", "tags:"];

/// The block boundary delimiter line
const BOUNDARY_DELIMITER: &str = "---";

/// How many lines after a candidate boundary are checked for metadata keys
const LOOKAHEAD_LINES: usize = 4;

/// Splits the corpus into block spans at confirmed frontmatter boundaries.
#[derive(Debug, Clone)]
pub struct FrontmatterScanner {
    keys: Vec<String>,
    lookahead: usize,
}

impl Default for FrontmatterScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterScanner {
    /// Create a scanner with the default metadata keys and lookahead window
    pub fn new() -> Self {
        Self {
            keys: METADATA_KEYS.iter().map(|k| k.to_string()).collect(),
            lookahead: LOOKAHEAD_LINES,
        }
    }

    /// Create a scanner that confirms boundaries with a custom key set
    pub fn with_keys(keys: Vec<String>) -> Self {
        Self {
            keys,
            lookahead: LOOKAHEAD_LINES,
        }
    }

    /// Scan the corpus and return ordered block spans.
    ///
    /// The spans partition the input: content before the first confirmed
    /// boundary is emitted as a leading span, and concatenating every span
    /// in order reconstructs the corpus exactly. Zero confirmed boundaries
    /// yields an empty result.
    pub fn scan(&self, corpus: &str) -> Vec<BlockSpan> {
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in corpus.split_inclusive('\n') {
            lines.push((offset, line));
            offset += line.len();
        }

        let mut starts = Vec::new();
        for (idx, (line_offset, line)) in lines.iter().enumerate() {
            if line.trim() != BOUNDARY_DELIMITER {
                continue;
            }
            if idx == 0 || self.has_metadata_evidence(&lines, idx) {
                starts.push(*line_offset);
            }
        }

        if starts.is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        if starts[0] > 0 {
            spans.push(BlockSpan::new(0, starts[0]));
        }
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(corpus.len());
            spans.push(BlockSpan::new(start, end));
        }
        spans
    }

    /// Whether any of the next few lines after `idx` contains a metadata key
    fn has_metadata_evidence(&self, lines: &[(usize, &str)], idx: usize) -> bool {
        lines
            .iter()
            .skip(idx + 1)
            .take(self.lookahead)
            .any(|(_, line)| self.keys.iter().any(|key| line.contains(key.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(corpus: &str, spans: &[BlockSpan]) {
        let mut cursor = 0;
        let mut rebuilt = String::new();
        for span in spans {
            assert_eq!(span.start, cursor, "gap or overlap at {}", span.start);
            rebuilt.push_str(span.slice(corpus));
            cursor = span.end;
        }
        assert_eq!(cursor, corpus.len());
        assert_eq!(rebuilt, corpus);
    }

    #[test]
    fn test_splits_at_confirmed_boundaries() {
        let corpus = "---\nid: one\n---\nbody one\nmore body\nstill body\nlast line\n\
---\nid: two\n---\nbody two\n";
        let spans = FrontmatterScanner::new().scan(corpus);

        assert_eq!(spans.len(), 2);
        assert!(spans[0].slice(corpus).contains("body one"));
        assert!(spans[1].slice(corpus).contains("body two"));
        assert_partition(corpus, &spans);
    }

    #[test]
    fn test_rejects_delimiter_without_metadata_evidence() {
        // the second "---" is a horizontal rule inside prose
        let corpus = "---\nid: one\n---\nsome analysis\n---\nmore prose\nstill the same block\n";
        let spans = FrontmatterScanner::new().scan(corpus);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].slice(corpus), corpus);
    }

    #[test]
    fn test_first_line_is_always_a_boundary() {
        let corpus = "---\nunrecognized: value\n---\nbody\n";
        let spans = FrontmatterScanner::new().scan(corpus);
        assert_eq!(spans.len(), 1);
        assert_partition(corpus, &spans);
    }

    #[test]
    fn test_preamble_becomes_leading_span() {
        let corpus = "stray preamble\n---\nid: one\n---\nbody\n";
        let spans = FrontmatterScanner::new().scan(corpus);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].slice(corpus), "stray preamble\n");
        assert_partition(corpus, &spans);
    }

    #[test]
    fn test_no_boundaries_yields_empty_result() {
        let corpus = "just prose\nwith no delimiters\n";
        assert!(FrontmatterScanner::new().scan(corpus).is_empty());
        assert!(FrontmatterScanner::new().scan("").is_empty());
    }

    #[test]
    fn test_lookahead_window_is_bounded() {
        // metadata key appears five lines after the delimiter: too far
        let corpus = "---\nid: one\n---\nbody\n---\na\nb\nc\nd\nid: too-late\n";
        let spans = FrontmatterScanner::new().scan(corpus);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_trailing_rule_before_next_block_degenerates() {
        // the rule closing block one is followed by block two's frontmatter
        // within the lookahead window, so it opens a degenerate span that
        // carries no question content
        let corpus = "---\nid: one\n---\nbody one\n---\n\n---\nid: two\n---\nbody two\n";
        let spans = FrontmatterScanner::new().scan(corpus);

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].slice(corpus), "---\n\n");
        assert_partition(corpus, &spans);
    }

    #[test]
    fn test_scan_handles_missing_final_newline() {
        let corpus = "---\nid: one\n---\nbody without newline";
        let spans = FrontmatterScanner::new().scan(corpus);
        assert_eq!(spans.len(), 1);
        assert_partition(corpus, &spans);
    }
}
