//! Best-effort translation boundary. Failures here never fail a speak
//! call; the coordinator falls back to the original text.

use crate::error::SpeechError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://libretranslate.com/translate";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, SpeechError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate HTTP client.
#[derive(Debug, Clone)]
pub struct LibreTranslateClient {
    endpoint: String,
    client: reqwest::Client,
}

impl LibreTranslateClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("reqwest client with static configuration");
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

impl Default for LibreTranslateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, SpeechError> {
        let request = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::TranslationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::TranslationFailed(format!(
                "translation API returned HTTP {}",
                status
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::TranslationFailed(e.to_string()))?;
        Ok(body.translated_text)
    }
}
