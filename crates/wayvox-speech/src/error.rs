use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    /// An utterance is already in flight. Callers gate on `is_speaking()`,
    /// so hitting this is a sequencing bug, not a runtime condition.
    #[error("Speech coordinator is busy")]
    Busy,

    #[error("TTS engine failed: {0}")]
    EngineFailed(String),

    #[error("TTS engine not available: {0}")]
    EngineNotAvailable(String),

    /// Non-fatal: the coordinator recovers by speaking the original text.
    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpeechResult<T> = Result<T, SpeechError>;
