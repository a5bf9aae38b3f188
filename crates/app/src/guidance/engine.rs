//! The guidance state machine. Consumes position fixes, drives step
//! advancement, arrival detection, and off-route recovery, and hands every
//! spoken cue to the speech coordinator.
//!
//! Everything runs as discrete handler invocations on one event loop:
//! position fixes, route-fetch completions, and the arrival linger timer
//! are multiplexed with `select!`. Route fetches run on spawned tasks
//! guarded by a fetch-in-flight flag so overlapping samples never issue a
//! second concurrent fetch.

use super::session::{GuidanceSession, ProgressTracker};
use super::{GuidanceConfig, GuidancePhase, SessionSnapshot};
use crate::position::PositionFix;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use wayvox_foundation::{Clock, ShutdownToken};
use wayvox_geo::{haversine_m, Coordinate};
use wayvox_route::{Route, RouteError, RouteProvider};
use wayvox_speech::{SpeechCoordinator, SpeechError};

pub struct GuidanceEngine {
    config: GuidanceConfig,
    provider: Arc<RouteProvider>,
    speech: Arc<SpeechCoordinator>,
    clock: Arc<dyn Clock>,

    session: GuidanceSession,
    phase: GuidancePhase,
    fetch_in_flight: bool,
    last_fetch_failed_at: Option<Instant>,
    /// Utterances accepted by the engine but not yet handed to the
    /// coordinator because one is still in flight. The coordinator never
    /// queues; sequencing is our job.
    pending_speech: Vec<String>,

    route_tx: mpsc::Sender<Result<Route, RouteError>>,
    route_rx: mpsc::Receiver<Result<Route, RouteError>>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl GuidanceEngine {
    pub fn new(
        config: GuidanceConfig,
        provider: Arc<RouteProvider>,
        speech: Arc<SpeechCoordinator>,
        clock: Arc<dyn Clock>,
    ) -> (Self, watch::Receiver<SessionSnapshot>) {
        let (route_tx, route_rx) = mpsc::channel(1);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());
        (
            Self {
                config,
                provider,
                speech,
                clock,
                session: GuidanceSession::new(),
                phase: GuidancePhase::Idle,
                fetch_in_flight: false,
                last_fetch_failed_at: None,
                pending_speech: Vec::new(),
                route_tx,
                route_rx,
                snapshot_tx,
            },
            snapshot_rx,
        )
    }

    pub fn phase(&self) -> GuidancePhase {
        self.phase
    }

    /// Run until arrival, the position stream ends, or shutdown. Teardown
    /// stops in-flight speech and drops the position subscription; a route
    /// fetch still in flight completes into a closed channel and is
    /// discarded.
    pub async fn run(mut self, mut fixes: mpsc::Receiver<PositionFix>, shutdown: ShutdownToken) {
        tracing::info!(
            destination = %self.provider.destination_name(),
            "Guidance session started"
        );

        let mut linger: Option<Pin<Box<tokio::time::Sleep>>> = None;
        loop {
            tokio::select! {
                maybe_fix = fixes.recv() => {
                    match maybe_fix {
                        Some(fix) => self.handle_fix(fix),
                        None => {
                            tracing::warn!("Position stream ended");
                            break;
                        }
                    }
                }
                Some(result) = self.route_rx.recv() => {
                    self.handle_route_result(result);
                }
                _ = async { linger.as_mut().expect("guarded by is_some").await },
                        if linger.is_some() => {
                    self.transition(GuidancePhase::Arrived);
                    break;
                }
                _ = shutdown.wait() => {
                    tracing::info!("Guidance session cancelled");
                    break;
                }
            }

            if self.session.arrival_announced && linger.is_none() {
                linger = Some(Box::pin(tokio::time::sleep(self.config.arrival_linger)));
            }
        }

        self.speech.stop().await;
        self.publish_snapshot(None);
        tracing::info!(phase = ?self.phase, "Guidance session ended");
    }

    fn handle_fix(&mut self, fix: PositionFix) {
        let position = fix.coordinate();
        if !position.is_valid() {
            tracing::warn!(
                latitude = fix.latitude,
                longitude = fix.longitude,
                "Discarding invalid position fix"
            );
            return;
        }
        tracing::trace!(
            latitude = position.latitude,
            longitude = position.longitude,
            phase = ?self.phase,
            "Position fix"
        );

        self.flush_speech();

        match self.phase {
            GuidancePhase::Idle => {
                self.transition(GuidancePhase::Routing);
                self.begin_fetch(position);
            }
            GuidancePhase::Routing => {
                if !self.fetch_in_flight && self.retry_backoff_elapsed() {
                    self.begin_fetch(position);
                }
            }
            GuidancePhase::Guiding => self.guide(position),
            GuidancePhase::Arrived => {}
        }

        self.publish_snapshot(Some(position));
    }

    /// One guiding tick: step advancement, then arrival, then off-route
    /// dwell accounting. The order favors immediate feedback over
    /// re-routing decisions within the same sample.
    fn guide(&mut self, position: Coordinate) {
        let mut utterances = Vec::new();

        // Step advancement is skipped entirely while an utterance is in
        // flight or already accepted; never interrupt speech.
        if self.speech_gate_free() {
            if let Some((index, instruction)) = self.next_reached_step(position) {
                tracing::info!(step = index, %instruction, "Step reached");
                self.session.record_announcement(index);
                utterances.push(instruction);
            }
        }

        let Some(route) = self.session.route.as_ref() else {
            return;
        };
        let destination = route.destination;
        let destination_name = route.destination_name.clone();

        let distance_to_destination = haversine_m(position, destination);
        if distance_to_destination < self.config.arrival_threshold_m
            && !self.session.arrival_announced
        {
            tracing::info!(
                distance_m = distance_to_destination,
                "Arrival at destination"
            );
            self.session.arrival_announced = true;
            utterances.push(format!("You have arrived at {}", destination_name));
        }

        if !self.session.arrival_announced {
            let target = self
                .session
                .next_target()
                .unwrap_or(destination);
            let distance = haversine_m(position, target);
            let now = self.clock.now();
            let stalled = match self.session.progress.as_mut() {
                None => {
                    self.session.progress = Some(ProgressTracker::new(distance, now));
                    false
                }
                Some(tracker) => {
                    !tracker.observe(distance, now)
                        && tracker.stalled_for(now) >= self.config.off_route_dwell
                }
            };

            if stalled {
                tracing::warn!(
                    min_distance_m = ?self.session.progress.as_ref().map(|t| t.min_distance_m),
                    "No progress toward next step within dwell window, re-routing"
                );
                utterances.push("You seem to be off the route. Recalculating.".to_string());
                self.session.discard_route();
                self.transition(GuidancePhase::Routing);
                self.begin_fetch(position);
            }
        }

        if !utterances.is_empty() {
            self.enqueue_speech(utterances);
        }
    }

    /// Scan unannounced steps in index order; the first within the
    /// proximity threshold wins, even when a later step is closer.
    fn next_reached_step(&self, position: Coordinate) -> Option<(usize, String)> {
        let route = self.session.route.as_ref()?;
        let start = self.session.last_announced_step.map_or(0, |i| i + 1);
        for step in route.steps.iter().skip(start) {
            let distance = haversine_m(position, step.end_point);
            tracing::trace!(step = step.index, distance_m = distance, "Step proximity");
            if distance < self.config.proximity_threshold_m {
                return Some((step.index, step.instruction.clone()));
            }
        }
        None
    }

    fn begin_fetch(&mut self, origin: Coordinate) {
        self.fetch_in_flight = true;
        let provider = Arc::clone(&self.provider);
        let tx = self.route_tx.clone();
        tokio::spawn(async move {
            let result = provider.fetch_route(origin).await;
            // Engine gone means teardown; the result is discarded.
            let _ = tx.send(result).await;
        });
    }

    fn handle_route_result(&mut self, result: Result<Route, RouteError>) {
        self.fetch_in_flight = false;
        if self.phase != GuidancePhase::Routing {
            tracing::debug!(phase = ?self.phase, "Discarding route result outside Routing");
            return;
        }

        match result {
            Ok(route) => {
                // parse_directions rejects empty-step payloads, so this is
                // a provider contract violation, handled like NoRouteFound.
                let Some(first_step) = route.steps.first() else {
                    self.last_fetch_failed_at = Some(self.clock.now());
                    tracing::error!("Route arrived with zero steps");
                    return;
                };
                let greeting = format!("Navigating to {}", route.destination_name);
                let first_instruction = first_step.instruction.clone();
                self.session.install_route(route);
                self.session.record_announcement(0);
                self.last_fetch_failed_at = None;
                self.transition(GuidancePhase::Guiding);
                self.enqueue_speech(vec![greeting, first_instruction]);
            }
            Err(e) => {
                self.last_fetch_failed_at = Some(self.clock.now());
                tracing::warn!("Route fetch failed: {}", e);
                let notice = match e {
                    RouteError::NoRouteFound => "No walking route found. Still trying.",
                    _ => "Unable to fetch a route. Still trying.",
                };
                // Through the pending queue like any other cue: a busy
                // gate delays the notice, never drops it.
                self.enqueue_speech(vec![notice.to_string()]);
            }
        }
        self.publish_snapshot(None);
    }

    fn speech_gate_free(&self) -> bool {
        !self.speech.is_speaking() && self.pending_speech.is_empty()
    }

    fn enqueue_speech(&mut self, texts: Vec<String>) {
        self.pending_speech.extend(texts);
        self.flush_speech();
    }

    fn flush_speech(&mut self) {
        if self.pending_speech.is_empty() || self.speech.is_speaking() {
            return;
        }
        let texts: Vec<String> = self.pending_speech.drain(..).collect();
        match self.speech.say_detached(texts) {
            Ok(()) => {}
            Err(SpeechError::Busy) => {
                // Cannot happen from this single-threaded loop: the gate
                // was checked above and only this loop sets it.
                tracing::error!("Speech gate busy despite sequencing; dropping utterances");
            }
            Err(e) => tracing::warn!("Failed to hand utterances to coordinator: {}", e),
        }
    }

    fn retry_backoff_elapsed(&self) -> bool {
        match self.last_fetch_failed_at {
            None => true,
            Some(at) => {
                self.clock.now().saturating_duration_since(at) >= self.config.fetch_retry_backoff
            }
        }
    }

    fn transition(&mut self, next: GuidancePhase) {
        use GuidancePhase::*;
        let valid = matches!(
            (self.phase, next),
            (Idle, Routing) | (Routing, Guiding) | (Guiding, Routing) | (Guiding, Arrived)
        );
        if !valid {
            tracing::error!(from = ?self.phase, to = ?next, "Invalid guidance transition");
            return;
        }
        tracing::info!(from = ?self.phase, to = ?next, "Guidance transition");
        self.phase = next;
    }

    fn publish_snapshot(&self, position: Option<Coordinate>) {
        let snapshot = SessionSnapshot {
            phase: self.phase,
            current_instruction: self.session.current_instruction().map(str::to_string),
            distance_to_next_m: position
                .and_then(|p| self.session.next_target().map(|t| haversine_m(p, t))),
            distance_to_destination_m: position.and_then(|p| {
                self.session
                    .route
                    .as_ref()
                    .map(|r| haversine_m(p, r.destination))
            }),
            arrived: self.session.arrival_announced,
        };
        let _ = self.snapshot_tx.send(snapshot);
    }
}
