//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the external speech-synthesis
//! engine: synthesize one payload to an audio artifact, and list the
//! voices available for a locale.

pub mod edge;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::speech::SpeechPayload;

// Re-export the edge-tts adapter
pub use edge::EdgeTtsAdapter;

/// Errors from the synthesis collaborator
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Synthesis engine exited with code {code}: {stderr}")]
    Engine { code: i32, stderr: String },

    #[error("No voices available for locale {0}")]
    NoVoices(String),
}

/// One voice reported by the synthesis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Full voice name (e.g. "zh-CN-YunyangNeural")
    pub name: String,

    /// Reported gender
    pub gender: String,
}

impl VoiceInfo {
    /// The locale prefix embedded in the voice name
    pub fn locale(&self) -> &str {
        let mut dashes = 0;
        for (idx, ch) in self.name.char_indices() {
            if ch == '-' {
                dashes += 1;
                if dashes == 2 {
                    return &self.name[..idx];
                }
            }
        }
        &self.name
    }
}

/// Trait for speech-synthesis engines
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Human-readable engine name
    fn name(&self) -> &str;

    /// Produce an audio artifact for one payload at the target path
    async fn synthesize(
        &self,
        payload: &SpeechPayload,
        voice: &str,
        output: &Path,
    ) -> Result<(), SynthError>;

    /// List available voices whose name starts with the locale prefix
    async fn list_voices(&self, locale: &str) -> Result<Vec<VoiceInfo>, SynthError>;
}

/// Resolve the voice to use for a run: the first available preference,
/// then any voice under the locale, then the first preference as a last
/// resort when the engine cannot be queried at all.
pub async fn resolve_voice(
    synthesizer: &dyn Synthesizer,
    preferred: &[String],
    locale: &str,
) -> Result<String, SynthError> {
    let available = match synthesizer.list_voices(locale).await {
        Ok(voices) => voices,
        Err(e) => {
            warn!(error = %e, "Voice listing failed, falling back to first preference");
            return preferred
                .first()
                .cloned()
                .ok_or_else(|| SynthError::NoVoices(locale.to_string()));
        }
    };

    for voice in preferred {
        if available.iter().any(|v| v.name == *voice) {
            return Ok(voice.clone());
        }
    }

    if let Some(fallback) = available.first() {
        warn!(
            voice = %fallback.name,
            "No preferred voice available, using locale fallback"
        );
        return Ok(fallback.name.clone());
    }

    preferred
        .first()
        .cloned()
        .ok_or_else(|| SynthError::NoVoices(locale.to_string()))
}
