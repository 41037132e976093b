//! High-level entry point — `Engine` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the injected store and configuration, and
//! the accessor methods.

use crate::config::{CommissionConfig, EngineConfig};
use crate::domain::commission::{
    self, MatchSplit, MembershipSplit, MembershipTier, PoolSplit, RevenueSplit, ShareRecipient,
};
use crate::domain::pool::client::Pools;
use crate::domain::resolution::client::Resolutions;
use crate::domain::revshare::client::Payouts;
use crate::domain::wallet::client::Wallets;
use crate::error::EngineError;
use crate::shared::{Credits, PoolId};
use crate::store::Store;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// The escrow wagering engine. Generic over the injected persistence
/// collaborator; all state lives in the store, so the engine itself is
/// cheap to clone and share across request-handling workers.
#[derive(Clone)]
pub struct Engine<S> {
    pub(crate) store: S,
    pub(crate) config: EngineConfig,
}

impl Engine<()> {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S: Store> Engine<S> {
    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn wallets(&self) -> Wallets<'_, S> {
        Wallets { engine: self }
    }

    pub fn pools(&self) -> Pools<'_, S> {
        Pools { engine: self }
    }

    pub fn resolutions(&self) -> Resolutions<'_, S> {
        Resolutions { engine: self }
    }

    pub fn payouts(&self) -> Payouts<'_, S> {
        Payouts { engine: self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Direct access to the injected store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Commission calculators (pure, read the configured tables) ────────

    pub fn match_commission(
        &self,
        stake: Credits,
        tier_a: MembershipTier,
        tier_b: MembershipTier,
    ) -> MatchSplit {
        commission::match_commission(&self.config.commission, stake, tier_a, tier_b)
    }

    pub fn pool_commission(&self, pool_amount: Credits) -> PoolSplit {
        commission::pool_commission(&self.config.commission, pool_amount)
    }

    pub fn membership_commission(&self, tier: MembershipTier) -> MembershipSplit {
        commission::membership_commission(&self.config.commission, tier)
    }

    pub fn revenue_split(&self, gross: Credits, recipients: &[ShareRecipient]) -> RevenueSplit {
        commission::revenue_split(gross, recipients)
    }

    // ── Dispute sweep ────────────────────────────────────────────────────

    /// Finalize every resolved, undisputed pool whose dispute window has
    /// elapsed. Payouts were already applied at resolution; finalization
    /// only closes the window.
    ///
    /// Safe to run concurrently from multiple instances: each finalization
    /// is a conditional update that matches at most once, so a duplicate
    /// sweep is a no-op. Per-pool errors are logged and retried on the next
    /// pass.
    pub async fn sweep_expired_disputes(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PoolId>, EngineError> {
        let ripe = self.store.pools_ripe_for_finalize(now).await?;
        let mut finalized = Vec::new();
        for pool_id in ripe {
            match self.store.pool_finalize(&pool_id, now).await {
                Ok(true) => {
                    info!(pool = %pool_id, "dispute window closed, pool finalized");
                    finalized.push(pool_id);
                }
                // Another sweep instance finalized it first.
                Ok(false) => {}
                Err(err) => {
                    warn!(pool = %pool_id, error = %err, "failed to finalize pool; retrying next pass");
                }
            }
        }
        Ok(finalized)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn commission(mut self, commission: CommissionConfig) -> Self {
        self.config.commission = commission;
        self
    }

    pub fn dispute_window_secs(mut self, secs: i64) -> Self {
        self.config.dispute_window_secs = secs;
        self
    }

    pub fn betting_window_secs(mut self, secs: i64) -> Self {
        self.config.betting_window_secs = secs;
        self
    }

    /// Inject the persistence collaborator and finish the build.
    pub fn store<S: Store>(self, store: S) -> EngineBuilderWithStore<S> {
        EngineBuilderWithStore {
            store,
            config: self.config,
        }
    }
}

pub struct EngineBuilderWithStore<S> {
    store: S,
    config: EngineConfig,
}

impl<S: Store> EngineBuilderWithStore<S> {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn commission(mut self, commission: CommissionConfig) -> Self {
        self.config.commission = commission;
        self
    }

    pub fn dispute_window_secs(mut self, secs: i64) -> Self {
        self.config.dispute_window_secs = secs;
        self
    }

    pub fn betting_window_secs(mut self, secs: i64) -> Self {
        self.config.betting_window_secs = secs;
        self
    }

    pub fn build(self) -> Engine<S> {
        Engine {
            store: self.store,
            config: self.config,
        }
    }
}
