//! Pools sub-client — create, place bets, lock, cancel, dispute.

use super::{Bet, BetStatus, CreatePool, DisputeStatus, Pool, PoolStatus};
use crate::client::Engine;
use crate::error::{EngineError, PoolError};
use crate::shared::{BetId, Credits, PoolId, Side, UserId};
use crate::store::Store;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

/// Sub-client for pool lifecycle and bet placement.
pub struct Pools<'a, S> {
    pub(crate) engine: &'a Engine<S>,
}

impl<'a, S: Store> Pools<'a, S> {
    /// Create a pool in the open state.
    pub async fn create(&self, params: CreatePool) -> Result<Pool, EngineError> {
        if params.fee_bps > 10_000 {
            return Err(PoolError::InvalidFeeBps(params.fee_bps).into());
        }
        if params.side_a_label.trim().is_empty() || params.side_b_label.trim().is_empty() {
            return Err(PoolError::EmptySideLabel.into());
        }
        if params.stake_per_side < 0 {
            return Err(EngineError::Validation(format!(
                "stake_per_side must not be negative (got {})",
                params.stake_per_side
            )));
        }

        let now = Utc::now();
        let lock_cutoff_at = params
            .lock_cutoff_at
            .unwrap_or_else(|| now + Duration::seconds(self.engine.config.betting_window_secs));

        let pool = Pool {
            id: PoolId::generate(),
            match_id: params.match_id,
            creator_id: params.creator_id,
            side_a_label: params.side_a_label,
            side_b_label: params.side_b_label,
            stake_per_side: params.stake_per_side,
            fee_bps: params.fee_bps,
            status: PoolStatus::Open,
            lock_cutoff_at,
            dispute_deadline_at: None,
            dispute_status: DisputeStatus::None,
            auto_resolved_at: None,
            created_at: now,
        };
        self.engine.store.pool_insert(pool.clone()).await?;
        info!(pool = %pool.id, creator = %pool.creator_id, fee_bps = pool.fee_bps, "created pool");
        Ok(pool)
    }

    /// The pool, or `NotFound`.
    pub async fn get(&self, id: &PoolId) -> Result<Pool, EngineError> {
        self.engine
            .store
            .pool(id)
            .await?
            .ok_or_else(|| PoolError::NotFound(id.clone()).into())
    }

    /// Stake `amount` on `side` of an open pool.
    ///
    /// The wallet lock and the bet row are committed as a unit: the stake is
    /// locked first, then the bet is inserted conditionally on the pool
    /// still being open. If the pool moved on mid-flight, the lock is
    /// compensated (unlocked) before the error returns — no orphaned locked
    /// credits.
    pub async fn place_bet(
        &self,
        pool_id: &PoolId,
        user: &UserId,
        side: Side,
        amount: Credits,
    ) -> Result<Bet, EngineError> {
        if amount <= 0 {
            return Err(EngineError::Validation(format!(
                "bet amount must be greater than zero (got {amount})"
            )));
        }

        let pool = self.get(pool_id).await?;
        if pool.status != PoolStatus::Open {
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status: pool.status,
            }
            .into());
        }

        let bet_id = BetId::generate();
        self.engine.wallets().lock(user, amount, &bet_id).await?;

        let now = Utc::now();
        let bet = Bet {
            id: bet_id.clone(),
            pool_id: pool_id.clone(),
            user_id: user.clone(),
            side,
            amount,
            status: BetStatus::Funded,
            placed_at: now,
            funded_at: Some(now),
        };

        let inserted = match self
            .engine
            .store
            .bet_insert(bet.clone(), PoolStatus::Open)
            .await
        {
            Ok(inserted) => inserted,
            Err(err) => {
                // Persistence failed after the stake was locked: compensate.
                self.engine.wallets().unlock(user, amount, &bet_id).await?;
                return Err(err.into());
            }
        };
        if !inserted {
            // Pool locked (or vanished) while the stake was mid-flight.
            self.engine.wallets().unlock(user, amount, &bet_id).await?;
            let status = self
                .engine
                .store
                .pool(pool_id)
                .await?
                .map(|p| p.status)
                .ok_or_else(|| PoolError::NotFound(pool_id.clone()))?;
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status,
            }
            .into());
        }

        debug!(pool = %pool_id, user = %user, side = %side, amount, "bet placed");
        Ok(bet)
    }

    /// Transition an open pool to locked; no further bets accepted.
    pub async fn lock(&self, pool_id: &PoolId) -> Result<Pool, EngineError> {
        let mut pool = self.get(pool_id).await?;
        if pool.status != PoolStatus::Open {
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status: pool.status,
            }
            .into());
        }
        pool.status = PoolStatus::Locked;
        if !self
            .engine
            .store
            .pool_update(pool.clone(), PoolStatus::Open)
            .await?
        {
            // Lost a race; report the state that beat us.
            let status = self.get(pool_id).await?.status;
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status,
            }
            .into());
        }
        info!(pool = %pool_id, "pool locked");
        Ok(pool)
    }

    /// Lock every open pool whose betting cutoff has passed. Returns the
    /// pools locked by this pass.
    pub async fn lock_due(
        &self,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<PoolId>, EngineError> {
        let due = self.engine.store.pools_due_for_lock(now).await?;
        let mut locked = Vec::new();
        for pool_id in due {
            match self.lock(&pool_id).await {
                Ok(_) => locked.push(pool_id),
                // Already moved on — another instance got there first.
                Err(EngineError::Pool(PoolError::NotOpen { .. })) => {}
                Err(err) => {
                    warn!(pool = %pool_id, error = %err, "failed to auto-lock pool");
                }
            }
        }
        Ok(locked)
    }

    /// Cancel an open pool: every funded stake is unlocked back to its
    /// owner and the bets are marked refunded.
    pub async fn cancel(&self, pool_id: &PoolId) -> Result<Pool, EngineError> {
        let mut pool = self.get(pool_id).await?;
        if pool.status != PoolStatus::Open {
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status: pool.status,
            }
            .into());
        }
        pool.status = PoolStatus::Canceled;
        if !self
            .engine
            .store
            .pool_update(pool.clone(), PoolStatus::Open)
            .await?
        {
            let status = self.get(pool_id).await?.status;
            return Err(PoolError::NotOpen {
                pool: pool_id.clone(),
                status,
            }
            .into());
        }

        // The pool is canceled first, so no new bet can slip in while the
        // refunds run.
        for bet in self.engine.store.bets_by_pool(pool_id).await? {
            if bet.status != BetStatus::Funded {
                continue;
            }
            self.engine
                .wallets()
                .refund(&bet.user_id, bet.amount, &bet.id, pool_id)
                .await?;
            let mut refunded = bet;
            refunded.status = BetStatus::Refunded;
            self.engine.store.bet_update(refunded).await?;
        }

        info!(pool = %pool_id, "pool canceled, stakes refunded");
        Ok(pool)
    }

    /// Raise a dispute against a resolved pool before its deadline.
    /// Disputed pools are closed only by a manual override, never by the
    /// sweeper.
    pub async fn raise_dispute(&self, pool_id: &PoolId) -> Result<Pool, EngineError> {
        let mut pool = self.get(pool_id).await?;
        if pool.status != PoolStatus::Resolved {
            return Err(PoolError::NotResolved(pool_id.clone()).into());
        }
        if pool.dispute_status == DisputeStatus::Raised {
            return Err(PoolError::DisputeAlreadyRaised(pool_id.clone()).into());
        }
        let deadline = pool
            .dispute_deadline_at
            .ok_or_else(|| PoolError::NotResolved(pool_id.clone()))?;
        if Utc::now() > deadline {
            return Err(PoolError::DisputeWindowClosed(pool_id.clone()).into());
        }

        pool.status = PoolStatus::Disputed;
        pool.dispute_status = DisputeStatus::Raised;
        if !self
            .engine
            .store
            .pool_update(pool.clone(), PoolStatus::Resolved)
            .await?
        {
            return Err(PoolError::NotResolved(pool_id.clone()).into());
        }
        info!(pool = %pool_id, "dispute raised");
        Ok(pool)
    }
}
