//! Speech and pacing configuration.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flag overrides (batch size, interval, strategy)
//! 2. Config file passed with `--config` (YAML)
//! 3. Built-in defaults
//!
//! Voice preferences, pacing bounds and markup prosody all live here and
//! are passed into the orchestrator at construction; no module keeps its
//! own constants for these.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which rendering strategy feeds the synthesis engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Punctuation-paced plain text
    Plain,

    /// Structured speech markup with explicit break tags
    Markup,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Plain
    }
}

/// Bounds for the randomized pacing draws
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Units per batch, inclusive range
    pub batch_size: (usize, usize),

    /// Seconds slept between units within a batch, inclusive range
    pub unit_delay_secs: (f64, f64),

    /// Minutes slept between batches, inclusive range
    pub interval_minutes: (f64, f64),
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: (3, 5),
            unit_delay_secs: (1.0, 3.0),
            interval_minutes: (5.0, 15.0),
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Voice names in preference order
    pub voices: Vec<String>,

    /// Locale prefix used for the fallback voice query
    pub locale: String,

    /// Rendering strategy for synthesis input
    pub strategy: Strategy,

    /// Prosody rate for the markup strategy (e.g. "+10%")
    pub rate: String,

    /// Prosody pitch for the markup strategy (e.g. "+5Hz")
    pub pitch: String,

    /// Pause inserted after each sentence by the markup strategy
    pub sentence_break_ms: u32,

    /// Randomized pacing bounds
    pub pacing: PacingConfig,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voices: vec![
                "zh-CN-YunyangNeural".to_string(),
                "zh-CN-YunjianNeural".to_string(),
                "zh-CN-YunxiNeural".to_string(),
                "zh-CN-YunhaoNeural".to_string(),
                "zh-CN-YunzeNeural".to_string(),
            ],
            locale: "zh-CN".to_string(),
            strategy: Strategy::default(),
            rate: "+10%".to_string(),
            pitch: "+5Hz".to_string(),
            sentence_break_ms: 600,
            pacing: PacingConfig::default(),
        }
    }
}

impl SpeechConfig {
    /// Load configuration from an optional YAML file, falling back to
    /// defaults when no file is given. Missing fields in the file take
    /// their default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SpeechConfig::default();
        assert_eq!(config.voices.len(), 5);
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.strategy, Strategy::Plain);
        assert_eq!(config.pacing.batch_size, (3, 5));
        assert_eq!(config.pacing.interval_minutes, (5.0, 15.0));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = SpeechConfig::load(None).unwrap();
        assert_eq!(config.sentence_break_ms, 600);
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("speech.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
strategy: markup
pacing:
  batch_size: [2, 4]
"#
        )
        .unwrap();

        let config = SpeechConfig::load(Some(&path)).unwrap();
        assert_eq!(config.strategy, Strategy::Markup);
        assert_eq!(config.pacing.batch_size, (2, 4));
        // untouched fields fall back to defaults
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.pacing.unit_delay_secs, (1.0, 3.0));
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("speech.yaml");
        std::fs::write(&path, "strategy: [not, a, strategy]").unwrap();
        assert!(SpeechConfig::load(Some(&path)).is_err());
    }
}
