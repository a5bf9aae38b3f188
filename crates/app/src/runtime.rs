//! Wires the configured components into a running guidance session.

use crate::config::AppConfig;
use crate::guidance::{GuidanceConfig, GuidanceEngine};
use crate::position::ScriptedWalk;
use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Duration;
use wayvox_foundation::{RealClock, ShutdownToken};
use wayvox_route::{GoogleDirectionsClient, RouteProvider};
use wayvox_speech::{
    EspeakTts, LibreTranslateClient, SpeechCoordinator, TranslateConfig,
};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.walk.path.is_empty() {
        bail!("no [walk] path configured; nothing would drive the session");
    }

    let shutdown = ShutdownToken::new();
    shutdown.listen_for_ctrl_c();

    let api: Arc<GoogleDirectionsClient> = Arc::new(match &config.directions.base_url {
        Some(base_url) => GoogleDirectionsClient::with_base_url(
            config.directions.api_key.as_str(),
            base_url.as_str(),
        ),
        None => GoogleDirectionsClient::new(config.directions.api_key.as_str()),
    });
    let provider = Arc::new(
        RouteProvider::new(
            api,
            config.destination.coordinate(),
            config.destination.name.clone(),
        )
        .context("building route provider")?,
    );

    let engine = EspeakTts::detect(config.speech.voice.clone(), config.speech.rate_wpm)
        .await
        .context("locating a TTS engine")?;
    let speech = if config.speech.translate {
        Arc::new(SpeechCoordinator::with_translator(
            Arc::new(engine),
            Arc::new(LibreTranslateClient::new()),
            TranslateConfig {
                source_lang: config.speech.source_lang.clone(),
                target_lang: config.speech.target_lang.clone(),
                timeout: Duration::from_secs(config.speech.translate_timeout_secs),
            },
        ))
    } else {
        Arc::new(SpeechCoordinator::new(Arc::new(engine)))
    };

    let (guidance, mut snapshots) = GuidanceEngine::new(
        GuidanceConfig::from(&config.guidance),
        provider,
        speech,
        Arc::new(RealClock::new()),
    );

    // Mirror snapshot updates into the log; a real UI would render these.
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow().clone();
            tracing::debug!(
                phase = ?snapshot.phase,
                instruction = ?snapshot.current_instruction,
                distance_to_destination_m = ?snapshot.distance_to_destination_m,
                "Session snapshot"
            );
        }
    });

    let fixes = ScriptedWalk::new(
        config.walk.coordinates(),
        Duration::from_secs(config.walk.interval_secs),
    )
    .subscribe();

    guidance.run(fixes, shutdown).await;
    Ok(())
}
