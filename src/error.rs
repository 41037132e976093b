//! Unified engine error types.

use crate::domain::pool::PoolStatus;
use crate::shared::{Credits, PoolId, UserId};
use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Wallet-balance failures. Always recoverable by the caller (retry with a
/// smaller amount); the wallet is left unchanged on every failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Credits,
        requested: Credits,
    },

    #[error("Insufficient locked funds: locked {locked}, requested {requested}")]
    InsufficientLockedFunds { locked: Credits, requested: Credits },

    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Credits),
}

/// Pool state-machine violations. Surfaced to the caller, never retried
/// automatically. `AlreadyResolved` is a success-equivalent no-op for callers
/// that retry resolution requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool not found: {0}")]
    NotFound(PoolId),

    #[error("Pool {pool} is not open for betting (status: {status})")]
    NotOpen { pool: PoolId, status: PoolStatus },

    #[error("Pool {pool} is not locked (status: {status})")]
    NotLocked { pool: PoolId, status: PoolStatus },

    #[error("Pool {0} has already been resolved")]
    AlreadyResolved(PoolId),

    #[error("Fee basis points must be <= 10000 (got {0})")]
    InvalidFeeBps(u16),

    #[error("Side labels must not be empty")]
    EmptySideLabel,

    #[error("Pool {0} is not resolved; nothing to dispute")]
    NotResolved(PoolId),

    #[error("Dispute window for pool {0} has closed")]
    DisputeWindowClosed(PoolId),

    #[error("A dispute has already been raised for pool {0}")]
    DisputeAlreadyRaised(PoolId),

    #[error("Pool {0} is not disputed")]
    NotDisputed(PoolId),
}

/// Persistence collaborator failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage I/O failure: {0}")]
    Io(String),

    #[error("Conflicting concurrent update on {entity} {id}")]
    Conflict { entity: &'static str, id: String },
}

/// External payment transfer failures. Logged; the ledger entry for the
/// underlying payout is withheld until the transfer succeeds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Transfer to {recipient} failed: {reason}")]
    Failed { recipient: UserId, reason: String },

    #[error("Transfer to {recipient} still failing after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        recipient: UserId,
        attempts: u32,
        last_error: String,
    },
}
