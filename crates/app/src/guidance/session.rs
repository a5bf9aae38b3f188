//! Mutable guidance session state. Owned and written only by the engine;
//! everything the UI sees goes through snapshots.

use std::time::{Duration, Instant};
use wayvox_geo::Coordinate;
use wayvox_route::Route;

/// Tracks the minimum observed distance to the current target and when it
/// last improved. Drives the off-route dwell heuristic.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    pub min_distance_m: f64,
    pub last_improved_at: Instant,
}

impl ProgressTracker {
    pub fn new(distance_m: f64, now: Instant) -> Self {
        Self {
            min_distance_m: distance_m,
            last_improved_at: now,
        }
    }

    /// Record an observation. Returns true when the distance improved on
    /// the tracked minimum.
    pub fn observe(&mut self, distance_m: f64, now: Instant) -> bool {
        if distance_m < self.min_distance_m {
            self.min_distance_m = distance_m;
            self.last_improved_at = now;
            true
        } else {
            false
        }
    }

    pub fn stalled_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_improved_at)
    }
}

/// Core session state for one destination.
#[derive(Debug, Default)]
pub struct GuidanceSession {
    pub route: Option<Route>,
    /// Index of the most recently announced step; `None` until the first
    /// announcement of the current route.
    pub last_announced_step: Option<usize>,
    /// Flips false -> true exactly once per session; survives re-routes.
    pub arrival_announced: bool,
    pub progress: Option<ProgressTracker>,
}

impl GuidanceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the route wholesale, resetting per-route progress. The
    /// arrival flag is deliberately left alone.
    pub fn install_route(&mut self, route: Route) {
        self.route = Some(route);
        self.last_announced_step = None;
        self.progress = None;
    }

    /// Drop the route and per-route progress ahead of a re-route.
    pub fn discard_route(&mut self) {
        self.route = None;
        self.last_announced_step = None;
        self.progress = None;
    }

    /// Record that `index` was announced. The progress tracker resets
    /// because the next target changed.
    pub fn record_announcement(&mut self, index: usize) {
        debug_assert!(
            self.route
                .as_ref()
                .is_some_and(|r| index < r.steps.len()),
            "announced step index out of range"
        );
        self.last_announced_step = Some(index);
        self.progress = None;
    }

    /// End point of the next unannounced step, or the destination when
    /// every step has been announced. `None` without a route.
    pub fn next_target(&self) -> Option<Coordinate> {
        let route = self.route.as_ref()?;
        let next = self.last_announced_step.map_or(0, |i| i + 1);
        Some(
            route
                .steps
                .get(next)
                .map(|s| s.end_point)
                .unwrap_or(route.destination),
        )
    }

    /// Instruction text of the most recently announced step.
    pub fn current_instruction(&self) -> Option<&str> {
        let route = self.route.as_ref()?;
        let index = self.last_announced_step?;
        route.steps.get(index).map(|s| s.instruction.as_str())
    }
}
