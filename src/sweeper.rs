//! Background sweep task — locks due pools and finalizes expired dispute
//! windows on a fixed interval.

use crate::client::Engine;
use crate::store::Store;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

/// Periodic runner around [`Engine::sweep_expired_disputes`] and
/// [`crate::domain::pool::client::Pools::lock_due`].
///
/// Stateless between ticks; every step is an idempotent conditional update,
/// so multiple instances may run the same schedule concurrently.
pub struct Sweeper<S> {
    engine: Engine<S>,
    interval: Duration,
}

impl<S: Store> Sweeper<S> {
    pub fn new(engine: Engine<S>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// One pass: auto-lock due pools, then finalize expired dispute windows.
    pub async fn tick(&self) {
        let now = Utc::now();

        match self.engine.pools().lock_due(now).await {
            Ok(locked) if !locked.is_empty() => {
                debug!(count = locked.len(), "auto-locked pools past cutoff");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "lock sweep failed; retrying next pass"),
        }

        match self.engine.sweep_expired_disputes(now).await {
            Ok(finalized) if !finalized.is_empty() => {
                debug!(count = finalized.len(), "finalized pools past dispute deadline");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "dispute sweep failed; retrying next pass"),
        }
    }

    /// Run forever on the configured interval. Spawn this onto the runtime;
    /// dropping the task stops the sweeps.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}
