//! Core orchestration logic.
//!
//! This module contains:
//! - Orchestrator: the resumable batch state machine
//! - ProgressStore: the durable per-unit checkpoint
//! - Pacing: injectable batch-sizing and delay policies
//! - Artifacts: per-unit output layout and metadata record

pub mod artifacts;
pub mod orchestrator;
pub mod pacing;
pub mod progress;

// Re-export commonly used types
pub use artifacts::{ArtifactFiles, UnitPaths, UnitWriter};
pub use orchestrator::{BatchOrchestrator, BatchReport};
pub use pacing::{FixedPacing, PacingPolicy, RandomPacing};
pub use progress::{ProgressError, ProgressRecord, ProgressStore, PROGRESS_FILE};
