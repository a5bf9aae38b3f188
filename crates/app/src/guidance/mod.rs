//! Turn-by-turn guidance: the session state and the engine that turns a
//! position stream plus a fetched route into spoken navigation cues.

pub mod engine;
pub mod session;

pub use engine::GuidanceEngine;
pub use session::{GuidanceSession, ProgressTracker};

use std::time::Duration;

/// Guidance lifecycle phases.
///
/// `Arrived` is terminal for the destination. A re-route goes back through
/// `Routing` without leaving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuidancePhase {
    /// No route requested yet.
    #[default]
    Idle,
    /// Route fetch pending or retry-eligible; no steps to follow yet.
    Routing,
    /// Route present, advancing through steps.
    Guiding,
    /// Destination reached.
    Arrived,
}

#[derive(Debug, Clone)]
pub struct GuidanceConfig {
    /// A step is announced when the user is within this distance of its
    /// end point.
    pub proximity_threshold_m: f64,
    /// Arrival is declared within this distance of the destination.
    pub arrival_threshold_m: f64,
    /// Sustained non-improvement toward the next target for this long
    /// triggers a re-route.
    pub off_route_dwell: Duration,
    /// Minimum gap between route fetch attempts after a failure.
    pub fetch_retry_backoff: Duration,
    /// How long the session lingers after announcing arrival before the
    /// engine shuts down.
    pub arrival_linger: Duration,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_m: 20.0,
            arrival_threshold_m: 12.0,
            off_route_dwell: Duration::from_secs(300),
            fetch_retry_backoff: Duration::from_secs(15),
            arrival_linger: Duration::from_secs(3),
        }
    }
}

/// Read-only view of the session for display layers. Published on a watch
/// channel; the UI never mutates session state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub phase: GuidancePhase,
    /// Instruction of the most recently announced step.
    pub current_instruction: Option<String>,
    pub distance_to_next_m: Option<f64>,
    pub distance_to_destination_m: Option<f64>,
    pub arrived: bool,
}
