//! Speech output layer: engine boundary, best-effort translation, and the
//! coordinator that guarantees at most one utterance is in flight.

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod translate;

pub use coordinator::{SpeechCoordinator, TranslateConfig};
pub use engine::{EspeakTts, TtsEngine};
pub use error::{SpeechError, SpeechResult};
pub use translate::{LibreTranslateClient, Translator};
