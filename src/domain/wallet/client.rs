//! Wallets sub-client — credit, lock, unlock.
//!
//! Every balance mutation runs as a compare-and-swap retry loop against the
//! store: read the wallet row, apply the pure transition, swap iff the row
//! is unchanged. The matching ledger entry is written in the same atomic
//! unit as the swap, so a balance change without its audit record (or the
//! reverse) cannot exist. Two concurrent locks on one wallet linearize:
//! the loser of the swap re-reads and re-checks the available balance.

use super::{apply, Wallet, WalletOp};
use crate::client::Engine;
use crate::domain::ledger::LedgerEntry;
use crate::error::EngineError;
use crate::shared::{BetId, Credits, PoolId, UserId};
use crate::store::Store;
use chrono::Utc;
use tracing::debug;

/// Sub-client for wallet operations.
pub struct Wallets<'a, S> {
    pub(crate) engine: &'a Engine<S>,
}

impl<'a, S: Store> Wallets<'a, S> {
    /// The user's wallet, if one has been created by a credit yet.
    pub async fn get(&self, user: &UserId) -> Result<Option<Wallet>, EngineError> {
        Ok(self.engine.store.wallet(user).await?)
    }

    /// The user's full audit trail, oldest first.
    pub async fn ledger(&self, user: &UserId) -> Result<Vec<LedgerEntry>, EngineError> {
        Ok(self.engine.store.ledger_by_user(user).await?)
    }

    /// Increase the available balance. Creates the wallet lazily on first
    /// credit; always succeeds for a positive amount.
    pub async fn credit(&self, user: &UserId, amount: Credits) -> Result<Wallet, EngineError> {
        let wallet = self
            .mutate(user, WalletOp::Credit { amount }, |u, at| {
                LedgerEntry::credit(u, amount, at)
            })
            .await?;
        debug!(user = %user, amount, "credited wallet");
        Ok(wallet)
    }

    /// Move `amount` from available to locked for the bet `bet_ref`.
    pub async fn lock(
        &self,
        user: &UserId,
        amount: Credits,
        bet_ref: &BetId,
    ) -> Result<Wallet, EngineError> {
        self.mutate(user, WalletOp::Lock { amount }, |u, at| {
            LedgerEntry::lock(u, amount, bet_ref, at)
        })
        .await
    }

    /// Reverse a lock: move `amount` from locked back to available.
    pub async fn unlock(
        &self,
        user: &UserId,
        amount: Credits,
        bet_ref: &BetId,
    ) -> Result<Wallet, EngineError> {
        self.mutate(user, WalletOp::Unlock { amount }, |u, at| {
            LedgerEntry::unlock(u, amount, bet_ref, at)
        })
        .await
    }

    /// Pool-cancellation refund: an unlock recorded with the refund kind.
    pub(crate) async fn refund(
        &self,
        user: &UserId,
        amount: Credits,
        bet_ref: &BetId,
        pool: &PoolId,
    ) -> Result<Wallet, EngineError> {
        self.mutate(user, WalletOp::Unlock { amount }, |u, at| {
            LedgerEntry::refund(u, amount, bet_ref, pool, at)
        })
        .await
    }

    /// Resolution of a winning bet: release the locked stake into the pot
    /// and credit the winnings in one step.
    pub(crate) async fn release_win(
        &self,
        user: &UserId,
        stake: Credits,
        winnings: Credits,
        bet_ref: &BetId,
        pool: &PoolId,
    ) -> Result<Wallet, EngineError> {
        self.mutate(user, WalletOp::ReleaseWin { stake, winnings }, |u, at| {
            LedgerEntry::pool_release_win(u, winnings, stake, bet_ref, pool, at)
        })
        .await
    }

    /// Resolution of a losing bet: the locked stake is forfeit to the pot.
    pub(crate) async fn release_loss(
        &self,
        user: &UserId,
        stake: Credits,
        bet_ref: &BetId,
        pool: &PoolId,
    ) -> Result<Wallet, EngineError> {
        self.mutate(user, WalletOp::ReleaseLoss { stake }, |u, at| {
            LedgerEntry::pool_release_loss(u, stake, bet_ref, pool, at)
        })
        .await
    }

    /// CAS retry loop: read → apply pure transition → swap. The domain check
    /// re-runs on every retry, so a failure after a lost race reflects the
    /// freshest balances and the wallet is never left partially updated.
    async fn mutate<F>(
        &self,
        user: &UserId,
        op: WalletOp,
        make_entry: F,
    ) -> Result<Wallet, EngineError>
    where
        F: Fn(&UserId, chrono::DateTime<Utc>) -> LedgerEntry,
    {
        loop {
            let current = self.engine.store.wallet(user).await?;
            let snapshot = current
                .clone()
                .unwrap_or_else(|| Wallet::empty(user.clone()));
            let updated = apply(snapshot, op)?;
            let entry = make_entry(user, Utc::now());
            if self
                .engine
                .store
                .wallet_swap(current.as_ref(), updated.clone(), entry)
                .await?
            {
                return Ok(updated);
            }
        }
    }
}
