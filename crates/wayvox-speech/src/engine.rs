//! TTS engine boundary and the espeak-backed implementation.

use crate::error::{SpeechError, SpeechResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Notify;

/// Core TTS engine interface.
///
/// `speak` resolves only when the utterance has finished (or was stopped);
/// the coordinator relies on that to serialize output.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Engine name/identifier
    fn name(&self) -> &str;

    /// Check if the engine is available on this system
    async fn is_available(&self) -> bool;

    /// Speak text aloud, resolving on completion.
    async fn speak(&self, text: &str) -> SpeechResult<()>;

    /// Cancel the current utterance, if any. The pending `speak` call
    /// resolves promptly after this.
    async fn stop(&self);
}

/// espeak/espeak-ng backed engine. One child process per utterance;
/// completion is process exit.
pub struct EspeakTts {
    command: String,
    voice: Option<String>,
    rate_wpm: Option<u32>,
    stop_signal: Arc<Notify>,
}

impl EspeakTts {
    pub fn new(voice: Option<String>, rate_wpm: Option<u32>) -> Self {
        Self {
            command: "espeak".to_string(),
            voice,
            rate_wpm,
            stop_signal: Arc::new(Notify::new()),
        }
    }

    /// Prefer espeak-ng when plain espeak is not installed.
    pub async fn detect(voice: Option<String>, rate_wpm: Option<u32>) -> SpeechResult<Self> {
        for candidate in ["espeak", "espeak-ng"] {
            if Command::new(candidate)
                .arg("--version")
                .output()
                .await
                .is_ok()
            {
                let mut engine = Self::new(voice, rate_wpm);
                engine.command = candidate.to_string();
                return Ok(engine);
            }
        }
        Err(SpeechError::EngineNotAvailable(
            "neither espeak nor espeak-ng found on PATH".into(),
        ))
    }

    fn build_args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        if let Some(rate) = self.rate_wpm {
            args.push("-s".to_string());
            args.push(rate.to_string());
        }
        args.push(text.to_string());
        args
    }
}

#[async_trait]
impl TtsEngine for EspeakTts {
    fn name(&self) -> &str {
        &self.command
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .is_ok()
    }

    async fn speak(&self, text: &str) -> SpeechResult<()> {
        let mut child = Command::new(&self.command)
            .args(self.build_args(text))
            .spawn()?;

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::EngineFailed(format!(
                        "{} exited with {}",
                        self.command, status
                    )))
                }
            }
            _ = self.stop_signal.notified() => {
                tracing::debug!("Stopping in-flight utterance");
                let _ = child.start_kill();
                let _ = child.wait().await;
                Ok(())
            }
        }
    }

    async fn stop(&self) {
        self.stop_signal.notify_waiters();
    }
}
