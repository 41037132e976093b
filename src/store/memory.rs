//! In-memory store — tests and single-process deployments.
//!
//! One `RwLock` guards the whole state set, so every trait primitive runs as
//! a single atomic unit against a consistent snapshot.

use super::Store;
use crate::domain::ledger::LedgerEntry;
use crate::domain::pool::{Bet, DisputeStatus, Pool, PoolStatus};
use crate::domain::resolution::Resolution;
use crate::domain::revshare::TransferRecord;
use crate::domain::wallet::Wallet;
use crate::error::StoreError;
use crate::shared::{BetId, InvoiceId, PoolId, UserId};

use async_lock::RwLock;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct State {
    wallets: HashMap<UserId, Wallet>,
    pools: HashMap<PoolId, Pool>,
    bets: HashMap<BetId, Bet>,
    resolutions: HashMap<PoolId, Resolution>,
    ledger: Vec<LedgerEntry>,
    transfers: HashMap<(InvoiceId, UserId), TransferRecord>,
}

/// In-memory [`Store`] implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ledger entry ever appended, in append order.
    pub async fn ledger(&self) -> Vec<LedgerEntry> {
        self.state.read().await.ledger.clone()
    }
}

impl Store for MemoryStore {
    async fn wallet(&self, user: &UserId) -> Result<Option<Wallet>, StoreError> {
        Ok(self.state.read().await.wallets.get(user).cloned())
    }

    async fn wallet_swap(
        &self,
        expected: Option<&Wallet>,
        updated: Wallet,
        entry: LedgerEntry,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let current = state.wallets.get(&updated.user_id);
        if current != expected {
            return Ok(false);
        }
        state.wallets.insert(updated.user_id.clone(), updated);
        state.ledger.push(entry);
        Ok(true)
    }

    async fn pool_insert(&self, pool: Pool) -> Result<(), StoreError> {
        self.state.write().await.pools.insert(pool.id.clone(), pool);
        Ok(())
    }

    async fn pool(&self, id: &PoolId) -> Result<Option<Pool>, StoreError> {
        Ok(self.state.read().await.pools.get(id).cloned())
    }

    async fn pool_update(
        &self,
        updated: Pool,
        expected_status: PoolStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.pools.get(&updated.id) {
            Some(current) if current.status == expected_status => {
                state.pools.insert(updated.id.clone(), updated);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pools_due_for_lock(&self, now: DateTime<Utc>) -> Result<Vec<PoolId>, StoreError> {
        let state = self.state.read().await;
        let mut due: Vec<PoolId> = state
            .pools
            .values()
            .filter(|p| p.status == PoolStatus::Open && now >= p.lock_cutoff_at)
            .map(|p| p.id.clone())
            .collect();
        due.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(due)
    }

    async fn pools_ripe_for_finalize(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PoolId>, StoreError> {
        let state = self.state.read().await;
        let mut ripe: Vec<PoolId> = state
            .pools
            .values()
            .filter(|p| {
                p.status == PoolStatus::Resolved
                    && p.dispute_status == DisputeStatus::None
                    && p.auto_resolved_at.is_none()
                    && p.dispute_deadline_at.map(|d| now > d).unwrap_or(false)
            })
            .map(|p| p.id.clone())
            .collect();
        ripe.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ripe)
    }

    async fn pool_finalize(&self, id: &PoolId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.pools.get_mut(id) {
            Some(pool)
                if pool.status == PoolStatus::Resolved
                    && pool.dispute_status == DisputeStatus::None
                    && pool.auto_resolved_at.is_none() =>
            {
                pool.auto_resolved_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn bet_insert(
        &self,
        bet: Bet,
        require_pool_status: PoolStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.bets.get(&bet.id) {
            Some(_) => Err(StoreError::Conflict {
                entity: "bet",
                id: bet.id.to_string(),
            }),
            None => match state.pools.get(&bet.pool_id) {
                Some(pool) if pool.status == require_pool_status => {
                    state.bets.insert(bet.id.clone(), bet);
                    Ok(true)
                }
                _ => Ok(false),
            },
        }
    }

    async fn bets_by_pool(&self, pool: &PoolId) -> Result<Vec<Bet>, StoreError> {
        let state = self.state.read().await;
        let mut bets: Vec<Bet> = state
            .bets
            .values()
            .filter(|b| &b.pool_id == pool)
            .cloned()
            .collect();
        bets.sort_by(|a, b| {
            a.placed_at
                .cmp(&b.placed_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(bets)
    }

    async fn bet_update(&self, bet: Bet) -> Result<(), StoreError> {
        self.state.write().await.bets.insert(bet.id.clone(), bet);
        Ok(())
    }

    async fn resolution_insert(&self, resolution: Resolution) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if state.resolutions.contains_key(&resolution.pool_id) {
            return Ok(false);
        }
        state
            .resolutions
            .insert(resolution.pool_id.clone(), resolution);
        Ok(true)
    }

    async fn resolution(&self, pool: &PoolId) -> Result<Option<Resolution>, StoreError> {
        Ok(self.state.read().await.resolutions.get(pool).cloned())
    }

    async fn ledger_append(&self, entry: LedgerEntry) -> Result<(), StoreError> {
        self.state.write().await.ledger.push(entry);
        Ok(())
    }

    async fn ledger_by_user(&self, user: &UserId) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .ledger
            .iter()
            .filter(|e| &e.user_id == user)
            .cloned()
            .collect())
    }

    async fn transfer_record(
        &self,
        invoice: &InvoiceId,
        recipient: &UserId,
    ) -> Result<Option<TransferRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .transfers
            .get(&(invoice.clone(), recipient.clone()))
            .cloned())
    }

    async fn transfer_record_insert(&self, record: TransferRecord) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let key = (record.invoice_id.clone(), record.recipient_id.clone());
        if state.transfers.contains_key(&key) {
            return Ok(false);
        }
        state.transfers.insert(key, record);
        Ok(true)
    }
}
