//! Per-unit output artifacts.
//!
//! Each processed ordinal gets its own directory holding three audio
//! files and a metadata record with identity, classification fields,
//! content-length metrics, the plain-text spans and the artifact
//! filename map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ParsedQuestion;

/// Filenames of the artifacts belonging to one unit
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactFiles {
    pub audio_simple: String,
    pub audio_question: String,
    pub audio_analysis: String,
    pub meta: String,
}

/// The metadata record written next to the audio artifacts
#[derive(Debug, Serialize)]
pub struct UnitMeta<'a> {
    pub id: Option<&'a str>,
    #[serde(rename = "type")]
    pub question_type: &'a str,
    pub difficulty: &'a str,
    pub tags: &'a [String],
    pub question_length: usize,
    pub simple_answer_length: usize,
    pub detailed_analysis_length: usize,
    pub created_at: DateTime<Utc>,
    pub question_markdown: &'a str,
    pub answer_simple_markdown: &'a str,
    pub answer_analysis_markdown: &'a str,
    pub files: ArtifactFiles,
}

/// Resolved paths for one unit's artifacts
#[derive(Debug, Clone)]
pub struct UnitPaths {
    /// The unit's directory under the output root
    pub dir: PathBuf,

    pub audio_question: PathBuf,
    pub audio_simple: PathBuf,
    pub audio_analysis: PathBuf,
    pub meta: PathBuf,

    files: ArtifactFiles,
}

/// Lays out and writes per-unit artifacts under the output root.
#[derive(Debug, Clone)]
pub struct UnitWriter {
    output_dir: PathBuf,
}

impl UnitWriter {
    /// Create a writer rooted at the output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Resolve the artifact paths for one ordinal
    pub fn paths(&self, ordinal: usize, question: &ParsedQuestion) -> UnitPaths {
        let stem = question.dir_name(ordinal);
        let dir = self.output_dir.join(&stem);
        let files = ArtifactFiles {
            audio_simple: format!("{stem}_audio_simple.mp3"),
            audio_question: format!("{stem}_audio_question.mp3"),
            audio_analysis: format!("{stem}_audio_analysis.mp3"),
            meta: format!("{stem}_meta.json"),
        };
        UnitPaths {
            audio_question: dir.join(&files.audio_question),
            audio_simple: dir.join(&files.audio_simple),
            audio_analysis: dir.join(&files.audio_analysis),
            meta: dir.join(&files.meta),
            dir,
            files,
        }
    }

    /// Write the unit's metadata record
    pub async fn write_meta(&self, paths: &UnitPaths, question: &ParsedQuestion) -> Result<()> {
        let metadata = &question.metadata;
        let meta = UnitMeta {
            id: metadata.id(),
            question_type: metadata.question_type().unwrap_or("unknown"),
            difficulty: metadata.difficulty().unwrap_or("medium"),
            tags: metadata.tags().unwrap_or(&[]),
            question_length: question.question.chars().count(),
            simple_answer_length: question.simple_answer.chars().count(),
            detailed_analysis_length: question.detailed_analysis.chars().count(),
            created_at: Utc::now(),
            question_markdown: &question.question,
            answer_simple_markdown: &question.simple_answer,
            answer_analysis_markdown: &question.detailed_analysis,
            files: paths.files.clone(),
        };

        let json = serde_json::to_string_pretty(&meta)?;
        tokio::fs::write(&paths.meta, json)
            .await
            .with_context(|| format!("Failed to write {}", paths.meta.display()))?;
        Ok(())
    }

    /// The output root this writer lays units under
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MetaValue, Metadata};
    use tempfile::TempDir;

    fn sample_question() -> ParsedQuestion {
        let mut metadata = Metadata::new();
        metadata.insert("id", MetaValue::Scalar("550e8400-e29b".into()));
        metadata.insert("type", MetaValue::Scalar("concept".into()));
        metadata.insert("difficulty", MetaValue::Scalar("easy".into()));
        metadata.insert("tags", MetaValue::List(vec!["vue".into()]));
        ParsedQuestion {
            metadata,
            question: "什么是响应式？".into(),
            simple_answer: "数据驱动视图。".into(),
            detailed_analysis: String::new(),
        }
    }

    #[test]
    fn test_paths_follow_layout() {
        let writer = UnitWriter::new("/out");
        let paths = writer.paths(3, &sample_question());

        assert_eq!(paths.dir, PathBuf::from("/out/q0003_550e8400"));
        assert_eq!(
            paths.audio_question,
            PathBuf::from("/out/q0003_550e8400/q0003_550e8400_audio_question.mp3")
        );
        assert_eq!(
            paths.meta,
            PathBuf::from("/out/q0003_550e8400/q0003_550e8400_meta.json")
        );
    }

    #[tokio::test]
    async fn test_meta_record_contents() {
        let temp = TempDir::new().unwrap();
        let writer = UnitWriter::new(temp.path());
        let question = sample_question();
        let paths = writer.paths(1, &question);

        tokio::fs::create_dir_all(&paths.dir).await.unwrap();
        writer.write_meta(&paths, &question).await.unwrap();

        let content = tokio::fs::read_to_string(&paths.meta).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["id"], "550e8400-e29b");
        assert_eq!(value["type"], "concept");
        assert_eq!(value["difficulty"], "easy");
        assert_eq!(value["tags"], serde_json::json!(["vue"]));
        assert_eq!(value["question_length"], 7);
        assert_eq!(value["detailed_analysis_length"], 0);
        assert_eq!(
            value["files"]["audio_simple"],
            "q0001_550e8400_audio_simple.mp3"
        );
        assert_eq!(value["files"]["meta"], "q0001_550e8400_meta.json");
    }

    #[tokio::test]
    async fn test_meta_defaults_without_classification() {
        let temp = TempDir::new().unwrap();
        let writer = UnitWriter::new(temp.path());
        let question = ParsedQuestion {
            metadata: Metadata::new(),
            question: "问？".into(),
            simple_answer: "答。".into(),
            detailed_analysis: String::new(),
        };
        let paths = writer.paths(2, &question);

        tokio::fs::create_dir_all(&paths.dir).await.unwrap();
        writer.write_meta(&paths, &question).await.unwrap();

        let content = tokio::fs::read_to_string(&paths.meta).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["id"], serde_json::Value::Null);
        assert_eq!(value["type"], "unknown");
        assert_eq!(value["difficulty"], "medium");
        assert_eq!(value["tags"], serde_json::json!([]));
        assert_eq!(value["files"]["meta"], "q0002_q0002_meta.json");
    }
}
