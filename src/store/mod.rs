//! Persistence contract — the single shared mutable resource.
//!
//! The engine never holds global state; it drives every mutation through an
//! injected [`Store`]. All atomicity the engine relies on is expressed as
//! conditional primitives (wallet compare-and-swap, conditional bet insert,
//! unique resolution insert, conditional finalize), so a database-backed
//! implementation maps each primitive onto one transaction.

pub mod memory;

pub use memory::MemoryStore;

use crate::domain::ledger::LedgerEntry;
use crate::domain::pool::{Bet, Pool, PoolStatus};
use crate::domain::resolution::Resolution;
use crate::domain::revshare::TransferRecord;
use crate::domain::wallet::Wallet;
use crate::error::StoreError;
use crate::shared::{InvoiceId, PoolId, UserId};
use chrono::{DateTime, Utc};

/// CRUD + conditional-update operations over wallets, pools, bets,
/// resolutions, ledger entries and transfer records.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    // ── Wallets ──────────────────────────────────────────────────────────

    async fn wallet(&self, user: &UserId) -> Result<Option<Wallet>, StoreError>;

    /// Atomically replace `user`'s wallet row with `updated` and append
    /// `entry` in the same atomic unit, iff the stored row still matches
    /// `expected` (`None` = no row yet). Returns `false` — writing nothing —
    /// when a concurrent mutation got there first.
    async fn wallet_swap(
        &self,
        expected: Option<&Wallet>,
        updated: Wallet,
        entry: LedgerEntry,
    ) -> Result<bool, StoreError>;

    // ── Pools ────────────────────────────────────────────────────────────

    async fn pool_insert(&self, pool: Pool) -> Result<(), StoreError>;

    async fn pool(&self, id: &PoolId) -> Result<Option<Pool>, StoreError>;

    /// Replace the pool row iff its current status is `expected_status`
    /// (compare-and-swap on the state machine).
    async fn pool_update(
        &self,
        updated: Pool,
        expected_status: PoolStatus,
    ) -> Result<bool, StoreError>;

    /// Open pools whose lock cutoff has passed.
    async fn pools_due_for_lock(&self, now: DateTime<Utc>) -> Result<Vec<PoolId>, StoreError>;

    /// Resolved, undisputed pools whose dispute deadline has elapsed and
    /// which have not been finalized yet.
    async fn pools_ripe_for_finalize(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PoolId>, StoreError>;

    /// Stamp `auto_resolved_at = now` iff the pool is resolved, undisputed
    /// and not already finalized. Idempotent: a duplicate call returns
    /// `false` and changes nothing.
    async fn pool_finalize(&self, id: &PoolId, now: DateTime<Utc>) -> Result<bool, StoreError>;

    // ── Bets ─────────────────────────────────────────────────────────────

    /// Insert the bet iff its pool currently has `require_pool_status`,
    /// atomically with that check. Returns `false` when the pool moved on
    /// (or does not exist) — the caller must compensate any wallet lock.
    async fn bet_insert(
        &self,
        bet: Bet,
        require_pool_status: PoolStatus,
    ) -> Result<bool, StoreError>;

    /// All bets placed into a pool, oldest first.
    async fn bets_by_pool(&self, pool: &PoolId) -> Result<Vec<Bet>, StoreError>;

    async fn bet_update(&self, bet: Bet) -> Result<(), StoreError>;

    // ── Resolutions ──────────────────────────────────────────────────────

    /// Insert iff no resolution exists for the pool yet — at most one
    /// resolution per pool, the idempotency guard against double payout.
    async fn resolution_insert(&self, resolution: Resolution) -> Result<bool, StoreError>;

    async fn resolution(&self, pool: &PoolId) -> Result<Option<Resolution>, StoreError>;

    // ── Ledger ───────────────────────────────────────────────────────────

    /// Append-only; entries are never mutated or deleted.
    async fn ledger_append(&self, entry: LedgerEntry) -> Result<(), StoreError>;

    async fn ledger_by_user(&self, user: &UserId) -> Result<Vec<LedgerEntry>, StoreError>;

    // ── Transfer records ─────────────────────────────────────────────────

    async fn transfer_record(
        &self,
        invoice: &InvoiceId,
        recipient: &UserId,
    ) -> Result<Option<TransferRecord>, StoreError>;

    /// Insert iff no record exists for `(invoice, recipient)` — at most one
    /// transfer per recipient per invoice, even under retried invocations.
    async fn transfer_record_insert(&self, record: TransferRecord) -> Result<bool, StoreError>;
}
