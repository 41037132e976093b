//! Resolutions sub-client — finalize a pool's outcome and distribute the pot.

use super::{plan_payouts, Resolution, ResolveOutcome};
use crate::client::Engine;
use crate::domain::pool::{BetStatus, DisputeStatus, PoolStatus};
use crate::error::{EngineError, PoolError};
use crate::shared::{PoolId, ResolutionId, Side, UserId};
use crate::store::Store;
use chrono::{Duration, Utc};
use tracing::info;

/// Sub-client for pool resolution.
pub struct Resolutions<'a, S> {
    pub(crate) engine: &'a Engine<S>,
}

impl<'a, S: Store> Resolutions<'a, S> {
    /// The resolution recorded for a pool, if any.
    pub async fn get(&self, pool_id: &PoolId) -> Result<Option<Resolution>, EngineError> {
        Ok(self.engine.store.resolution(pool_id).await?)
    }

    /// Resolve a locked pool: record the winning side, release every funded
    /// stake and credit the winners their pro-rata share of the net pot.
    ///
    /// At most one resolution ever exists per pool — the conditional insert
    /// of the resolution row is the idempotency guard, taken before any
    /// balance is touched, so a concurrent or repeated call observes
    /// `AlreadyResolved` and changes nothing.
    pub async fn resolve(
        &self,
        pool_id: &PoolId,
        winner_side: Side,
        decided_by: &UserId,
        notes: Option<String>,
    ) -> Result<ResolveOutcome, EngineError> {
        let pool = self.engine.pools().get(pool_id).await?;
        match pool.status {
            PoolStatus::Locked => {}
            PoolStatus::Resolved | PoolStatus::Disputed => {
                return Err(PoolError::AlreadyResolved(pool_id.clone()).into());
            }
            status => {
                return Err(PoolError::NotLocked {
                    pool: pool_id.clone(),
                    status,
                }
                .into());
            }
        }

        let now = Utc::now();
        let resolution = Resolution {
            id: ResolutionId::generate(),
            pool_id: pool_id.clone(),
            winner_side,
            decided_by: decided_by.clone(),
            decided_at: now,
            notes,
        };
        if !self
            .engine
            .store
            .resolution_insert(resolution.clone())
            .await?
        {
            return Err(PoolError::AlreadyResolved(pool_id.clone()).into());
        }

        let bets = self.engine.store.bets_by_pool(pool_id).await?;
        let plan = plan_payouts(&bets, winner_side, pool.fee_bps);

        for payout in &plan.winners {
            self.engine
                .wallets()
                .release_win(
                    &payout.user_id,
                    payout.stake,
                    payout.winnings,
                    &payout.bet_id,
                    pool_id,
                )
                .await?;
            let mut bet = bets
                .iter()
                .find(|b| b.id == payout.bet_id)
                .cloned()
                .ok_or_else(|| {
                    EngineError::Validation(format!("planned payout for unknown bet {}", payout.bet_id))
                })?;
            bet.status = BetStatus::Paid;
            self.engine.store.bet_update(bet).await?;
        }

        for forfeit in &plan.losers {
            self.engine
                .wallets()
                .release_loss(&forfeit.user_id, forfeit.stake, &forfeit.bet_id, pool_id)
                .await?;
            let mut bet = bets
                .iter()
                .find(|b| b.id == forfeit.bet_id)
                .cloned()
                .ok_or_else(|| {
                    EngineError::Validation(format!("planned forfeit for unknown bet {}", forfeit.bet_id))
                })?;
            bet.status = BetStatus::Lost;
            self.engine.store.bet_update(bet).await?;
        }

        let mut resolved = pool;
        resolved.status = PoolStatus::Resolved;
        resolved.dispute_status = DisputeStatus::None;
        resolved.dispute_deadline_at =
            Some(now + Duration::seconds(self.engine.config.dispute_window_secs));
        self.engine
            .store
            .pool_update(resolved, PoolStatus::Locked)
            .await?;

        info!(
            pool = %pool_id,
            winner = %winner_side,
            total_pot = plan.total_pot,
            service_fee = plan.service_fee,
            winners = plan.winners.len(),
            "pool resolved"
        );

        Ok(ResolveOutcome {
            resolution,
            total_pot: plan.total_pot,
            service_fee: plan.service_fee,
            net_pot: plan.net_pot,
            platform_retained: plan.platform_retained(),
            payouts: plan.winners,
        })
    }

    /// Manual override closing a disputed pool. Payouts are not recomputed;
    /// only the dispute window is closed.
    pub async fn finalize_disputed(&self, pool_id: &PoolId) -> Result<(), EngineError> {
        let mut pool = self.engine.pools().get(pool_id).await?;
        if pool.status != PoolStatus::Disputed {
            return Err(PoolError::NotDisputed(pool_id.clone()).into());
        }
        pool.status = PoolStatus::Resolved;
        pool.auto_resolved_at = Some(Utc::now());
        if !self
            .engine
            .store
            .pool_update(pool, PoolStatus::Disputed)
            .await?
        {
            return Err(PoolError::NotDisputed(pool_id.clone()).into());
        }
        info!(pool = %pool_id, "disputed pool manually finalized");
        Ok(())
    }
}
