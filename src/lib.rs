//! quizvoice - resumable Q&A corpus to speech batch pipeline
//!
//! Ingests a concatenated markdown corpus of delimited Q&A records,
//! extracts a structured record per block, and drives per-record speech
//! synthesis to completion across process restarts while respecting an
//! external rate limit.
//!
//! # Architecture
//!
//! The system is built around a durable checkpoint:
//! - Block spans and parsed records are re-derived from the corpus on
//!   every run; only the progress record is persisted
//! - Progress is checkpointed after every unit, so a crash loses at most
//!   the unit that was in flight
//! - Per-unit failures are recorded as failed ordinals and never abort
//!   the batch loop
//!
//! # Modules
//!
//! - `corpus`: boundary scanning, block parsing, markdown cleanup
//! - `speech`: punctuation-paced and markup rendering strategies
//! - `adapters`: the external speech-synthesis engine (edge-tts)
//! - `core`: orchestration (BatchOrchestrator, ProgressStore, pacing)
//! - `domain`: data structures (BlockSpan, Metadata, ParsedQuestion)
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Process a corpus with the default pacing
//! quizvoice run questions.md output/
//!
//! # Custom batch sizing and intervals
//! quizvoice run questions.md output/ --batch-size 2-4 --interval 10-20
//!
//! # Re-attempt the ordinals that failed
//! quizvoice retry questions.md output/
//!
//! # Inspect a run in progress
//! quizvoice status output/
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod corpus;
pub mod domain;
pub mod speech;

// Re-export main types at crate root for convenience
pub use adapters::{EdgeTtsAdapter, SynthError, Synthesizer, VoiceInfo};
pub use config::{PacingConfig, SpeechConfig, Strategy};
pub use self::core::{
    BatchOrchestrator, BatchReport, FixedPacing, PacingPolicy, ProgressRecord, ProgressStore,
    RandomPacing, UnitWriter, PROGRESS_FILE,
};
pub use corpus::{BlockParser, FrontmatterScanner, MarkdownCleaner, ParseError};
pub use domain::{BlockSpan, MetaValue, Metadata, ParsedQuestion};
pub use speech::{MarkupRenderer, RenderStrategy, SpeechNormalizer, SpeechPayload};
