//! Batch orchestrator for corpus-to-speech processing.
//!
//! Drives unit-by-unit synthesis with randomized batch sizing and pacing,
//! isolates per-unit failures into the failed-ordinal set, and checkpoints
//! durable progress after every unit so a run can resume after any number
//! of process restarts.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::adapters::{resolve_voice, Synthesizer};
use crate::config::SpeechConfig;
use crate::corpus::{BlockParser, FrontmatterScanner};
use crate::speech::RenderStrategy;

use super::artifacts::UnitWriter;
use super::pacing::PacingPolicy;
use super::progress::{ProgressRecord, ProgressStore};

/// Summary returned after a run or a retry pass
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Candidate blocks discovered in the corpus
    pub total: usize,

    /// Units attempted (run) or recovered (retry)
    pub processed: usize,

    /// Ordinals still recorded as failed
    pub failed: Vec<usize>,

    /// Batches executed
    pub batches: usize,

    /// Wall-clock time across all runs against this output directory
    pub elapsed: chrono::Duration,
}

impl BatchReport {
    fn empty() -> Self {
        Self {
            total: 0,
            processed: 0,
            failed: Vec::new(),
            batches: 0,
            elapsed: chrono::Duration::zero(),
        }
    }
}

/// The resumable batch state machine
pub struct BatchOrchestrator {
    config: SpeechConfig,
    synthesizer: Arc<dyn Synthesizer>,
    pacing: Box<dyn PacingPolicy>,
    scanner: FrontmatterScanner,
    parser: BlockParser,
    store: ProgressStore,
    writer: UnitWriter,
}

impl BatchOrchestrator {
    /// Create an orchestrator writing under `output_dir`
    pub fn new(
        config: SpeechConfig,
        synthesizer: Arc<dyn Synthesizer>,
        pacing: Box<dyn PacingPolicy>,
        output_dir: &Path,
    ) -> Self {
        Self {
            config,
            synthesizer,
            pacing,
            scanner: FrontmatterScanner::new(),
            parser: BlockParser::new(),
            store: ProgressStore::new(output_dir),
            writer: UnitWriter::new(output_dir),
        }
    }

    /// Process the corpus to completion, resuming from any existing
    /// checkpoint. Safe to re-invoke at any time against a stable corpus.
    #[instrument(skip(self), fields(corpus = %corpus_path.display()))]
    pub async fn run(&mut self, corpus_path: &Path) -> Result<BatchReport> {
        let corpus = tokio::fs::read_to_string(corpus_path)
            .await
            .with_context(|| format!("Failed to read corpus: {}", corpus_path.display()))?;
        tokio::fs::create_dir_all(self.writer.output_dir())
            .await
            .context("Failed to create output directory")?;

        let candidates = self.collect_candidates(&corpus);
        let total = candidates.len();
        if total == 0 {
            info!("No question blocks found in corpus");
            return Ok(BatchReport::empty());
        }

        let mut record = self.load_or_init_record(&corpus).await;
        record.total_questions = total;
        if record.start_time.is_none() {
            record.start_time = Some(Utc::now());
        }

        info!(
            total,
            processed = record.processed_questions,
            "Starting batch processing"
        );

        let voice = resolve_voice(
            self.synthesizer.as_ref(),
            &self.config.voices,
            &self.config.locale,
        )
        .await
        .context("Failed to resolve a synthesis voice")?;
        info!(%voice, "Using voice");
        let strategy = RenderStrategy::from_config(&self.config);

        while record.processed_questions < total {
            let batch_size = self.pacing.batch_size().max(1);
            let remaining = total - record.processed_questions;
            let actual = batch_size.min(remaining);

            info!(
                batch = record.completed_batches + 1,
                from = record.processed_questions + 1,
                to = record.processed_questions + actual,
                total,
                "Processing batch"
            );

            for i in 0..actual {
                let ordinal = record.processed_questions + 1;
                let block = candidates[ordinal - 1];

                match self.process_unit(block, ordinal, &voice, &strategy).await {
                    Ok(()) => info!(ordinal, "Unit completed"),
                    Err(e) => {
                        warn!(ordinal, error = %e, "Unit failed");
                        record.record_failure(ordinal);
                    }
                }

                // checkpoint per unit: a crash loses at most the unit
                // that was in flight
                record.processed_questions = ordinal;
                self.store
                    .save(&record)
                    .await
                    .context("Failed to write progress checkpoint")?;

                if i + 1 < actual {
                    tokio::time::sleep(self.pacing.unit_delay()).await;
                }
            }

            record.completed_batches += 1;
            record.last_batch_time = Some(Utc::now());
            self.store
                .save(&record)
                .await
                .context("Failed to write progress checkpoint")?;

            if record.processed_questions < total {
                let delay = self.pacing.batch_delay();
                info!(delay_secs = delay.as_secs(), "Waiting before next batch");
                tokio::time::sleep(delay).await;
            }
        }

        let now = Utc::now();
        let elapsed = now - record.start_time.unwrap_or(now);
        if record.failed_questions.is_empty() {
            self.store
                .clear()
                .await
                .context("Failed to remove completed progress record")?;
        }
        // a record with failures stays on disk so `retry` can read the set

        info!(
            processed = record.processed_questions,
            failed = record.failed_questions.len(),
            "Batch processing complete"
        );

        Ok(BatchReport {
            total,
            processed: record.processed_questions,
            failed: record.failed_questions,
            batches: record.completed_batches,
            elapsed,
        })
    }

    /// Re-attempt only the ordinals currently recorded as failed,
    /// replacing the failed set with whichever still fail. Reuses the
    /// same scanner/parser pipeline as [`run`](Self::run) so the two
    /// paths can never disagree on block boundaries.
    #[instrument(skip(self), fields(corpus = %corpus_path.display()))]
    pub async fn retry_failed(&mut self, corpus_path: &Path) -> Result<BatchReport> {
        let mut record = match self.store.load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("No progress record found, nothing to retry");
                return Ok(BatchReport::empty());
            }
            Err(e) => {
                warn!(error = %e, "Progress record unreadable, nothing to retry");
                return Ok(BatchReport::empty());
            }
        };

        let failed = std::mem::take(&mut record.failed_questions);
        if failed.is_empty() {
            info!("No failed ordinals to retry");
            return Ok(BatchReport {
                total: record.total_questions,
                processed: 0,
                failed: Vec::new(),
                batches: 0,
                elapsed: chrono::Duration::zero(),
            });
        }

        let corpus = tokio::fs::read_to_string(corpus_path)
            .await
            .with_context(|| format!("Failed to read corpus: {}", corpus_path.display()))?;
        let candidates = self.collect_candidates(&corpus);

        let voice = resolve_voice(
            self.synthesizer.as_ref(),
            &self.config.voices,
            &self.config.locale,
        )
        .await
        .context("Failed to resolve a synthesis voice")?;
        let strategy = RenderStrategy::from_config(&self.config);

        info!(count = failed.len(), "Retrying failed ordinals");
        let started = Utc::now();
        let mut recovered = 0;

        for (i, &ordinal) in failed.iter().enumerate() {
            if ordinal == 0 || ordinal > candidates.len() {
                warn!(ordinal, "Failed ordinal is out of range for this corpus");
                record.record_failure(ordinal);
                continue;
            }

            let block = candidates[ordinal - 1];
            match self.process_unit(block, ordinal, &voice, &strategy).await {
                Ok(()) => {
                    info!(ordinal, "Retry succeeded");
                    recovered += 1;
                }
                Err(e) => {
                    warn!(ordinal, error = %e, "Retry failed");
                    record.record_failure(ordinal);
                }
            }

            if i + 1 < failed.len() {
                tokio::time::sleep(self.pacing.unit_delay()).await;
            }
        }

        if record.failed_questions.is_empty()
            && record.processed_questions >= record.total_questions
        {
            self.store
                .clear()
                .await
                .context("Failed to remove completed progress record")?;
        } else {
            self.store
                .save(&record)
                .await
                .context("Failed to write progress checkpoint")?;
        }

        info!(
            recovered,
            still_failed = record.failed_questions.len(),
            "Retry pass complete"
        );

        Ok(BatchReport {
            total: candidates.len(),
            processed: recovered,
            failed: record.failed_questions,
            batches: 0,
            elapsed: Utc::now() - started,
        })
    }

    /// Scan the corpus and keep the blocks worth an ordinal
    fn collect_candidates<'a>(&self, corpus: &'a str) -> Vec<&'a str> {
        self.scanner
            .scan(corpus)
            .iter()
            .map(|span| span.slice(corpus))
            .filter(|block| BlockParser::is_candidate(block))
            .map(str::trim)
            .collect()
    }

    /// Parse, synthesize and persist one ordinal. Every error returned
    /// here is converted into a failed-ordinal entry by the caller.
    async fn process_unit(
        &self,
        block: &str,
        ordinal: usize,
        voice: &str,
        strategy: &RenderStrategy,
    ) -> Result<()> {
        let question = self.parser.parse(block)?;
        let paths = self.writer.paths(ordinal, &question);
        tokio::fs::create_dir_all(&paths.dir)
            .await
            .with_context(|| format!("Failed to create {}", paths.dir.display()))?;

        let spans = [
            (&question.simple_answer, &paths.audio_simple),
            (&question.question, &paths.audio_question),
            (&question.detailed_analysis, &paths.audio_analysis),
        ];
        for (text, path) in spans {
            match strategy.render(text, voice) {
                Some(payload) => {
                    self.synthesizer
                        .synthesize(&payload, voice, path)
                        .await
                        .with_context(|| format!("Synthesis failed for {}", path.display()))?;
                }
                None => debug!(ordinal, path = %path.display(), "Skipping empty span"),
            }
        }

        self.writer.write_meta(&paths, &question).await?;
        Ok(())
    }

    /// Load the checkpoint, falling back to a fresh record, and warn when
    /// the corpus no longer matches the one the checkpoint was built from
    async fn load_or_init_record(&self, corpus: &str) -> ProgressRecord {
        let digest = corpus_digest(corpus);
        let mut record = match self.store.load().await {
            Ok(Some(record)) => {
                info!(
                    processed = record.processed_questions,
                    "Resuming from existing progress record"
                );
                record
            }
            Ok(None) => ProgressRecord::new(),
            Err(e) => {
                warn!(error = %e, "Progress record unreadable, starting fresh");
                ProgressRecord::new()
            }
        };

        match &record.corpus_digest {
            Some(stored) if *stored != digest => {
                warn!(
                    "Corpus has changed since the checkpoint was written; \
                     resuming against a mutated corpus is unsupported"
                );
            }
            Some(_) => {}
            None => record.corpus_digest = Some(digest),
        }
        record
    }
}

/// SHA-256 hex digest of the corpus text
fn corpus_digest(corpus: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(corpus.as_bytes());
    hex::encode(hasher.finalize())
}
