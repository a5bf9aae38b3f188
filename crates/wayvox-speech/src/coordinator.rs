//! Serializes spoken output: at most one utterance in flight, optional
//! best-effort translation before speaking.

use crate::engine::TtsEngine;
use crate::error::{SpeechError, SpeechResult};
use crate::translate::Translator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct TranslateConfig {
    pub source_lang: String,
    pub target_lang: String,
    /// Budget for one translation call; past this the original text is
    /// spoken instead.
    pub timeout: Duration,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            source_lang: "en".to_string(),
            target_lang: "th".to_string(),
            timeout: Duration::from_secs(3),
        }
    }
}

/// Held for the full duration of one accepted speak request. Dropping it
/// releases the speaking gate, including on error or cancellation.
struct SpeakPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for SpeakPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Guarantees at most one spoken utterance is active.
///
/// The speaking flag is the sole gate against overlapping speech: it is
/// acquired synchronously when a request is accepted and released only when
/// the utterance resolves. A request made while the flag is held is
/// rejected with [`SpeechError::Busy`], never queued.
pub struct SpeechCoordinator {
    engine: Arc<dyn TtsEngine>,
    translation: Option<(Arc<dyn Translator>, TranslateConfig)>,
    speaking: Arc<AtomicBool>,
}

impl SpeechCoordinator {
    pub fn new(engine: Arc<dyn TtsEngine>) -> Self {
        Self {
            engine,
            translation: None,
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_translator(
        engine: Arc<dyn TtsEngine>,
        translator: Arc<dyn Translator>,
        config: TranslateConfig,
    ) -> Self {
        Self {
            engine,
            translation: Some((translator, config)),
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    /// Speak one utterance, resolving when it finishes. Rejects with
    /// `Busy` if another utterance is in flight.
    pub async fn say(&self, text: &str) -> SpeechResult<()> {
        let permit = self.acquire()?;
        self.speak_holding(&permit, text).await
    }

    /// Accept a sequence of utterances now (the gate is taken before this
    /// returns) and speak them back-to-back on a background task. Used by
    /// the guidance engine, whose event loop must not block on audio.
    pub fn say_detached(self: &Arc<Self>, texts: Vec<String>) -> SpeechResult<()> {
        let permit = self.acquire()?;
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            for text in texts {
                if let Err(e) = coordinator.speak_holding(&permit, &text).await {
                    tracing::warn!("Utterance failed: {}", e);
                    break;
                }
            }
        });
        Ok(())
    }

    /// Cancel any in-flight utterance. The gate is released when the
    /// cancelled speak call resolves.
    pub async fn stop(&self) {
        self.engine.stop().await;
    }

    fn acquire(&self) -> SpeechResult<SpeakPermit> {
        if self.speaking.swap(true, Ordering::SeqCst) {
            return Err(SpeechError::Busy);
        }
        Ok(SpeakPermit {
            flag: Arc::clone(&self.speaking),
        })
    }

    async fn speak_holding(&self, _permit: &SpeakPermit, text: &str) -> SpeechResult<()> {
        let spoken = self.prepare(text).await;
        tracing::info!(text = %spoken, "Speaking started");
        let result = self.engine.speak(&spoken).await;
        match &result {
            Ok(()) => tracing::info!("Speaking finished"),
            Err(e) => tracing::warn!("Speaking finished with error: {}", e),
        }
        result
    }

    /// Translate if configured; any failure or timeout falls back to the
    /// original text.
    async fn prepare(&self, text: &str) -> String {
        let Some((translator, config)) = &self.translation else {
            return text.to_string();
        };

        match timeout(
            config.timeout,
            translator.translate(text, &config.source_lang, &config.target_lang),
        )
        .await
        {
            Ok(Ok(translated)) => translated,
            Ok(Err(e)) => {
                tracing::warn!("Translation failed, speaking original text: {}", e);
                text.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = config.timeout.as_millis() as u64,
                    "Translation timed out, speaking original text"
                );
                text.to_string()
            }
        }
    }
}
