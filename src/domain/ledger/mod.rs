//! Append-only audit ledger — one entry per balance-affecting event.
//!
//! Entries are never mutated or deleted; wallet balances must reconcile
//! against them. `amount` is the signed change to the user's *available*
//! credits, with one exception: [`EntryKind::PoolReleaseLoss`] records the
//! (negative) change to *locked* credits, since a forfeited stake never
//! touches the available balance. Win entries carry the original stake in
//! their metadata so locked balances reconcile from the ledger alone.

use crate::shared::{BetId, Credits, EntryId, InvoiceId, PoolId, TransferId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of balance-affecting event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Funds added to the available balance.
    Credit,
    /// Available credits moved into the locked balance (stake placed).
    Lock,
    /// Locked credits returned to the available balance.
    Unlock,
    /// Locked stake returned on pool cancellation.
    Refund,
    /// Winning bet released: stake leaves the locked balance, winnings land
    /// in the available balance.
    PoolReleaseWin,
    /// Losing bet released: the stake leaves the locked balance, forfeit to
    /// the pot.
    PoolReleaseLoss,
    /// Revenue-share payout executed by the external payment processor.
    RevShare,
}

/// A single immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub kind: EntryKind,
    /// Signed amount; see the module docs for the sign convention per kind.
    pub amount: Credits,
    /// Correlates the entry to a bet, pool or invoice.
    pub ref_id: Option<String>,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    fn new(
        user_id: &UserId,
        kind: EntryKind,
        amount: Credits,
        ref_id: Option<String>,
        meta: serde_json::Value,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            user_id: user_id.clone(),
            kind,
            amount,
            ref_id,
            meta,
            created_at: at,
        }
    }

    pub fn credit(user: &UserId, amount: Credits, at: DateTime<Utc>) -> Self {
        Self::new(user, EntryKind::Credit, amount, None, serde_json::Value::Null, at)
    }

    pub fn lock(user: &UserId, amount: Credits, bet: &BetId, at: DateTime<Utc>) -> Self {
        Self::new(
            user,
            EntryKind::Lock,
            -amount,
            Some(bet.to_string()),
            serde_json::Value::Null,
            at,
        )
    }

    pub fn unlock(user: &UserId, amount: Credits, bet: &BetId, at: DateTime<Utc>) -> Self {
        Self::new(
            user,
            EntryKind::Unlock,
            amount,
            Some(bet.to_string()),
            serde_json::Value::Null,
            at,
        )
    }

    pub fn refund(user: &UserId, amount: Credits, bet: &BetId, pool: &PoolId, at: DateTime<Utc>) -> Self {
        Self::new(
            user,
            EntryKind::Refund,
            amount,
            Some(bet.to_string()),
            serde_json::json!({ "pool_id": pool }),
            at,
        )
    }

    pub fn pool_release_win(
        user: &UserId,
        winnings: Credits,
        original_stake: Credits,
        bet: &BetId,
        pool: &PoolId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            user,
            EntryKind::PoolReleaseWin,
            winnings,
            Some(bet.to_string()),
            serde_json::json!({
                "pool_id": pool,
                "winnings": winnings,
                "original_stake": original_stake,
            }),
            at,
        )
    }

    pub fn pool_release_loss(
        user: &UserId,
        stake: Credits,
        bet: &BetId,
        pool: &PoolId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            user,
            EntryKind::PoolReleaseLoss,
            -stake,
            Some(bet.to_string()),
            serde_json::json!({ "pool_id": pool, "original_stake": stake }),
            at,
        )
    }

    pub fn rev_share(
        recipient: &UserId,
        amount: Credits,
        bps: u16,
        invoice: &InvoiceId,
        transfer: &TransferId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            recipient,
            EntryKind::RevShare,
            amount,
            Some(invoice.to_string()),
            serde_json::json!({
                "invoice_id": invoice,
                "transfer_id": transfer,
                "bps": bps,
            }),
            at,
        )
    }
}
