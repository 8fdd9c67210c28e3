//! Parsed question records and their frontmatter metadata.

/// A single metadata value: a scalar string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// Plain scalar value (quotes already stripped)
    Scalar(String),

    /// Ordered list parsed from a `[a, b, c]`-shaped value
    List(Vec<String>),
}

impl MetaValue {
    /// The scalar content, if this value is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// The list content, if this value is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

/// Ordered key/value mapping parsed from a block's frontmatter region.
///
/// Insertion order is preserved; re-inserting an existing key replaces its
/// value in place. Unrecognized keys are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    /// Create an empty metadata mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, replacing the value if the key exists
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a scalar value by key
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_scalar)
    }

    /// Look up a list value by key
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(MetaValue::as_list)
    }

    /// The identity key, if present
    pub fn id(&self) -> Option<&str> {
        self.scalar("id")
    }

    /// The question type classification, if present
    pub fn question_type(&self) -> Option<&str> {
        self.scalar("type")
    }

    /// The difficulty classification, if present
    pub fn difficulty(&self) -> Option<&str> {
        self.scalar("difficulty")
    }

    /// The tag list, if present
    pub fn tags(&self) -> Option<&[String]> {
        self.list("tags")
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A structured record extracted from one valid block.
///
/// Exists only for blocks carrying both the question marker and the
/// concise-answer marker; the detailed analysis may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuestion {
    /// Frontmatter metadata
    pub metadata: Metadata,

    /// Plain-text question
    pub question: String,

    /// Plain-text concise answer
    pub simple_answer: String,

    /// Plain-text detailed analysis (may be empty)
    pub detailed_analysis: String,
}

impl ParsedQuestion {
    /// Short identity prefix used in directory and file names: the first
    /// 8 characters of the identity value, or `q{ordinal:04}` when absent.
    pub fn id_prefix(&self, ordinal: usize) -> String {
        match self.metadata.id() {
            Some(id) if !id.is_empty() => id.chars().take(8).collect(),
            _ => format!("q{:04}", ordinal),
        }
    }

    /// Output directory name for this question's artifacts
    pub fn dir_name(&self, ordinal: usize) -> String {
        format!("q{:04}_{}", ordinal, self.id_prefix(ordinal))
    }
}
