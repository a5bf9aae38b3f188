//! Position stream boundary. The guidance engine consumes an mpsc receiver
//! of fixes; dropping the receiver unsubscribes. Device GPS plumbing lives
//! outside this crate; `ScriptedWalk` replays a configured path so the
//! binary runs end-to-end without a sensor.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use wayvox_geo::Coordinate;

/// One device position sample.
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Utc::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Replays a fixed list of coordinates at a steady interval, mimicking a
/// GPS watch subscription.
pub struct ScriptedWalk {
    path: Vec<Coordinate>,
    interval: Duration,
}

impl ScriptedWalk {
    pub fn new(path: Vec<Coordinate>, interval: Duration) -> Self {
        Self { path, interval }
    }

    /// Start delivery. Delivery stops when the returned receiver is
    /// dropped or the scripted path runs out.
    pub fn subscribe(self) -> mpsc::Receiver<PositionFix> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for point in self.path {
                let fix = PositionFix::now(point.latitude, point.longitude);
                if tx.send(fix).await.is_err() {
                    tracing::debug!("Position subscriber dropped, stopping walk");
                    return;
                }
                tokio::time::sleep(self.interval).await;
            }
            tracing::info!("Scripted walk exhausted");
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_fixes_in_order_then_closes() {
        let walk = ScriptedWalk::new(
            vec![
                Coordinate::new(13.70, 100.50),
                Coordinate::new(13.71, 100.51),
            ],
            Duration::from_secs(3),
        );
        let mut rx = walk.subscribe();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.latitude, 13.70);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.latitude, 13.71);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_receiver_stops_delivery() {
        let walk = ScriptedWalk::new(vec![Coordinate::new(0.0, 0.0); 100], Duration::from_secs(3));
        let rx = walk.subscribe();
        drop(rx);
        // The sender task notices on its next send and exits.
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
}
