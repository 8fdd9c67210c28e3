//! Resumability Integration Tests
//!
//! A run checkpointed after unit k must restart at unit k+1, never
//! reprocess earlier units, and remove the progress record once every
//! unit has completed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use quizvoice::{
    BatchOrchestrator, FixedPacing, ProgressRecord, ProgressStore, SpeechConfig, SpeechPayload,
    SynthError, Synthesizer, VoiceInfo,
};

/// Records every synthesized path instead of producing real audio
#[derive(Default)]
struct RecordingSynth {
    synthesized: Mutex<Vec<PathBuf>>,
}

impl RecordingSynth {
    fn paths(&self) -> Vec<PathBuf> {
        self.synthesized.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for RecordingSynth {
    fn name(&self) -> &str {
        "recording"
    }

    async fn synthesize(
        &self,
        _payload: &SpeechPayload,
        _voice: &str,
        output: &Path,
    ) -> Result<(), SynthError> {
        tokio::fs::write(output, b"audio").await?;
        self.synthesized.lock().unwrap().push(output.to_path_buf());
        Ok(())
    }

    async fn list_voices(&self, _locale: &str) -> Result<Vec<VoiceInfo>, SynthError> {
        Ok(vec![VoiceInfo {
            name: "zh-CN-YunyangNeural".to_string(),
            gender: "Male".to_string(),
        }])
    }
}

fn valid_block(id: &str) -> String {
    format!(
        "---\n\
id: {id}\n\
type: concept\n\
difficulty: easy\n\
tags: [vue]\n\
---\n\
\n\
## **题目：** 问题 {id}？\n\
\n\
## **✅ 精简答案：**\n\
答案要点。\n\
\n\
**📘 详细解析：**\n\
详细说明。\n\
\n"
    )
}

async fn write_corpus(dir: &TempDir, blocks: &[String]) -> PathBuf {
    let path = dir.path().join("corpus.md");
    tokio::fs::write(&path, blocks.concat()).await.unwrap();
    path
}

fn orchestrator(
    synth: Arc<RecordingSynth>,
    output: &Path,
    batch_size: usize,
) -> BatchOrchestrator {
    BatchOrchestrator::new(
        SpeechConfig::default(),
        synth,
        Box::new(FixedPacing::new(batch_size)),
        output,
    )
}

#[tokio::test]
async fn test_fresh_run_processes_every_unit() {
    let temp = TempDir::new().unwrap();
    let blocks: Vec<String> = ["aaaa0001", "aaaa0002", "aaaa0003"]
        .iter()
        .map(|id| valid_block(id))
        .collect();
    let corpus = write_corpus(&temp, &blocks).await;
    let output = temp.path().join("out");

    let synth = Arc::new(RecordingSynth::default());
    let mut orch = orchestrator(synth.clone(), &output, 10);
    let report = orch.run(&corpus).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 3);
    assert!(report.failed.is_empty());

    // three audio artifacts per unit, all spans non-empty
    assert_eq!(synth.paths().len(), 9);

    // the unit layout is in place
    let unit_dir = output.join("q0001_aaaa0001");
    assert!(unit_dir.join("q0001_aaaa0001_audio_question.mp3").exists());
    assert!(unit_dir.join("q0001_aaaa0001_audio_simple.mp3").exists());
    assert!(unit_dir.join("q0001_aaaa0001_audio_analysis.mp3").exists());
    assert!(unit_dir.join("q0001_aaaa0001_meta.json").exists());
}

#[tokio::test]
async fn test_restart_resumes_after_checkpointed_unit() {
    let temp = TempDir::new().unwrap();
    let blocks: Vec<String> = ["aaaa0001", "aaaa0002", "aaaa0003", "aaaa0004"]
        .iter()
        .map(|id| valid_block(id))
        .collect();
    let corpus = write_corpus(&temp, &blocks).await;
    let output = temp.path().join("out");
    tokio::fs::create_dir_all(&output).await.unwrap();

    // simulate a crash after unit 2 completed: only the checkpoint survives
    let store = ProgressStore::new(&output);
    let mut record = ProgressRecord::new();
    record.processed_questions = 2;
    record.total_questions = 4;
    record.start_time = Some(chrono::Utc::now());
    store.save(&record).await.unwrap();

    let synth = Arc::new(RecordingSynth::default());
    let mut orch = orchestrator(synth.clone(), &output, 10);
    let report = orch.run(&corpus).await.unwrap();

    assert_eq!(report.processed, 4);
    assert!(report.failed.is_empty());

    // units 1 and 2 are never reprocessed
    let paths = synth.paths();
    assert_eq!(paths.len(), 6);
    for path in &paths {
        let path = path.to_string_lossy();
        assert!(
            path.contains("q0003") || path.contains("q0004"),
            "unexpected synthesis for {path}"
        );
    }
}

#[tokio::test]
async fn test_progress_record_is_removed_on_completion() {
    let temp = TempDir::new().unwrap();
    let blocks = vec![valid_block("aaaa0001")];
    let corpus = write_corpus(&temp, &blocks).await;
    let output = temp.path().join("out");

    let synth = Arc::new(RecordingSynth::default());
    let mut orch = orchestrator(synth, &output, 10);
    orch.run(&corpus).await.unwrap();

    let store = ProgressStore::new(&output);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_completed_run_is_a_no_op_when_reinvoked() {
    let temp = TempDir::new().unwrap();
    let blocks = vec![valid_block("aaaa0001"), valid_block("aaaa0002")];
    let corpus = write_corpus(&temp, &blocks).await;
    let output = temp.path().join("out");

    let synth = Arc::new(RecordingSynth::default());
    let mut orch = orchestrator(synth.clone(), &output, 10);
    orch.run(&corpus).await.unwrap();
    let after_first = synth.paths().len();

    // re-invoking against the same output directory starts a fresh run
    // (the record was deleted), so units are derived again from scratch;
    // a stable corpus makes that deterministic
    let mut record = ProgressRecord::new();
    record.processed_questions = 2;
    record.total_questions = 2;
    ProgressStore::new(&output).save(&record).await.unwrap();

    let report = orch.run(&corpus).await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(synth.paths().len(), after_first, "no unit was reprocessed");
}

#[tokio::test]
async fn test_empty_corpus_reports_no_blocks() {
    let temp = TempDir::new().unwrap();
    let corpus = temp.path().join("corpus.md");
    tokio::fs::write(&corpus, "plain prose with no delimiters\n")
        .await
        .unwrap();
    let output = temp.path().join("out");

    let synth = Arc::new(RecordingSynth::default());
    let mut orch = orchestrator(synth.clone(), &output, 10);
    let report = orch.run(&corpus).await.unwrap();

    assert_eq!(report.total, 0);
    assert_eq!(report.processed, 0);
    assert!(synth.paths().is_empty());
    assert!(ProgressStore::new(&output).load().await.unwrap().is_none());
}
