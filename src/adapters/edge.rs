//! edge-tts adapter.
//!
//! Shells out to the `edge-tts` CLI for synthesis and voice listing.
//! Input text goes through a temp file so long spans never hit argv
//! length limits.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::speech::SpeechPayload;

use super::{SynthError, Synthesizer, VoiceInfo};

/// edge-tts adapter using subprocess mode
pub struct EdgeTtsAdapter {
    /// Path to the edge-tts binary (default: "edge-tts")
    binary_path: String,
}

impl Default for EdgeTtsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeTtsAdapter {
    /// Create an adapter using `EDGE_TTS_PATH` or the binary on PATH
    pub fn new() -> Self {
        let binary_path =
            std::env::var("EDGE_TTS_PATH").unwrap_or_else(|_| "edge-tts".to_string());
        Self { binary_path }
    }

    /// Create an adapter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }
}

#[async_trait]
impl Synthesizer for EdgeTtsAdapter {
    fn name(&self) -> &str {
        "edge-tts"
    }

    async fn synthesize(
        &self,
        payload: &SpeechPayload,
        voice: &str,
        output: &Path,
    ) -> Result<(), SynthError> {
        let temp_dir = tempfile::tempdir()?;
        let text_path = temp_dir.path().join("input.txt");
        tokio::fs::write(&text_path, payload.content()).await?;

        let result = Command::new(&self.binary_path)
            .arg("--file")
            .arg(&text_path)
            .arg("--voice")
            .arg(voice)
            .arg("--write-media")
            .arg(output)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() {
            return Err(SynthError::Engine {
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }

    async fn list_voices(&self, locale: &str) -> Result<Vec<VoiceInfo>, SynthError> {
        let result = Command::new(&self.binary_path)
            .arg("--list-voices")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() {
            return Err(SynthError::Engine {
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&result.stdout);
        Ok(parse_voice_table(&stdout, locale))
    }
}

/// Parse the tabular `--list-voices` output: first column is the voice
/// name, second the gender; header and separator rows are skipped.
fn parse_voice_table(stdout: &str, locale: &str) -> Vec<VoiceInfo> {
    let mut voices = Vec::new();
    for line in stdout.lines() {
        let mut columns = line.split_whitespace();
        let Some(name) = columns.next() else {
            continue;
        };
        if name == "Name" || name.chars().all(|c| c == '-') {
            continue;
        }
        if !name.starts_with(locale) {
            continue;
        }
        let gender = columns.next().unwrap_or("").to_string();
        voices.push(VoiceInfo {
            name: name.to_string(),
            gender,
        });
    }
    voices
}
