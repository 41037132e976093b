//! Wallet domain — per-user available/locked credit balances.
//!
//! Balance transitions are pure functions over an owned snapshot
//! ([`apply`]); the engine drives them through the store's wallet
//! compare-and-swap so that concurrent mutations of the same wallet are
//! linearized per user.

pub mod client;

use crate::error::WalletError;
use crate::shared::{Credits, UserId};
use serde::{Deserialize, Serialize};

/// Per-user credit balances. Created lazily on first credit, never deleted.
///
/// Both balances are always non-negative; `balance_locked_credits` equals the
/// sum of the user's funded bets in pools not yet in a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub balance_credits: Credits,
    pub balance_locked_credits: Credits,
}

impl Wallet {
    /// A fresh, empty wallet.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            balance_credits: 0,
            balance_locked_credits: 0,
        }
    }
}

/// A single balance transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOp {
    /// Increase the available balance.
    Credit { amount: Credits },
    /// Move `amount` from available to locked (stake placed).
    Lock { amount: Credits },
    /// Move `amount` from locked back to available (cancellation, refund,
    /// compensation).
    Unlock { amount: Credits },
    /// Resolution of a winning bet: the stake leaves the locked balance
    /// (it stays in the pot) and `winnings` land in the available balance.
    ReleaseWin { stake: Credits, winnings: Credits },
    /// Resolution of a losing bet: the stake leaves the locked balance,
    /// forfeit to the pot.
    ReleaseLoss { stake: Credits },
}

/// Apply `op` to a wallet snapshot, returning the updated wallet.
///
/// Fails without side effects; the caller persists the result atomically
/// together with the matching ledger entry.
pub fn apply(mut wallet: Wallet, op: WalletOp) -> Result<Wallet, WalletError> {
    match op {
        WalletOp::Credit { amount } => {
            ensure_positive(amount)?;
            wallet.balance_credits += amount;
        }
        WalletOp::Lock { amount } => {
            ensure_positive(amount)?;
            if wallet.balance_credits < amount {
                return Err(WalletError::InsufficientFunds {
                    available: wallet.balance_credits,
                    requested: amount,
                });
            }
            wallet.balance_credits -= amount;
            wallet.balance_locked_credits += amount;
        }
        WalletOp::Unlock { amount } => {
            ensure_positive(amount)?;
            if wallet.balance_locked_credits < amount {
                return Err(WalletError::InsufficientLockedFunds {
                    locked: wallet.balance_locked_credits,
                    requested: amount,
                });
            }
            wallet.balance_locked_credits -= amount;
            wallet.balance_credits += amount;
        }
        WalletOp::ReleaseWin { stake, winnings } => {
            ensure_positive(stake)?;
            if winnings < 0 {
                return Err(WalletError::NonPositiveAmount(winnings));
            }
            if wallet.balance_locked_credits < stake {
                return Err(WalletError::InsufficientLockedFunds {
                    locked: wallet.balance_locked_credits,
                    requested: stake,
                });
            }
            wallet.balance_locked_credits -= stake;
            wallet.balance_credits += winnings;
        }
        WalletOp::ReleaseLoss { stake } => {
            ensure_positive(stake)?;
            if wallet.balance_locked_credits < stake {
                return Err(WalletError::InsufficientLockedFunds {
                    locked: wallet.balance_locked_credits,
                    requested: stake,
                });
            }
            wallet.balance_locked_credits -= stake;
        }
    }
    Ok(wallet)
}

fn ensure_positive(amount: Credits) -> Result<(), WalletError> {
    if amount <= 0 {
        return Err(WalletError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(available: Credits, locked: Credits) -> Wallet {
        Wallet {
            user_id: UserId::from("u-1"),
            balance_credits: available,
            balance_locked_credits: locked,
        }
    }

    #[test]
    fn test_credit_increases_available() {
        let w = apply(wallet(0, 0), WalletOp::Credit { amount: 10_000 }).unwrap();
        assert_eq!(w.balance_credits, 10_000);
        assert_eq!(w.balance_locked_credits, 0);
    }

    #[test]
    fn test_lock_moves_available_to_locked() {
        let w = apply(wallet(10_000, 0), WalletOp::Lock { amount: 6_000 }).unwrap();
        assert_eq!(w.balance_credits, 4_000);
        assert_eq!(w.balance_locked_credits, 6_000);
    }

    #[test]
    fn test_lock_beyond_available_fails_unchanged() {
        let err = apply(wallet(4_000, 6_000), WalletOp::Lock { amount: 5_000 }).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientFunds {
                available: 4_000,
                requested: 5_000
            }
        );
    }

    #[test]
    fn test_unlock_reverses_lock() {
        let w = apply(wallet(4_000, 6_000), WalletOp::Unlock { amount: 6_000 }).unwrap();
        assert_eq!(w.balance_credits, 10_000);
        assert_eq!(w.balance_locked_credits, 0);
    }

    #[test]
    fn test_unlock_beyond_locked_fails() {
        let err = apply(wallet(0, 100), WalletOp::Unlock { amount: 200 }).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientLockedFunds {
                locked: 100,
                requested: 200
            }
        );
    }

    #[test]
    fn test_release_win_pays_without_returning_stake() {
        // Stake 1000 stays in the pot; winnings 2070 include the pro-rata
        // share of the net pot.
        let w = apply(
            wallet(0, 1_000),
            WalletOp::ReleaseWin {
                stake: 1_000,
                winnings: 2_070,
            },
        )
        .unwrap();
        assert_eq!(w.balance_credits, 2_070);
        assert_eq!(w.balance_locked_credits, 0);
    }

    #[test]
    fn test_release_win_accepts_zero_winnings() {
        let w = apply(
            wallet(0, 1_000),
            WalletOp::ReleaseWin {
                stake: 1_000,
                winnings: 0,
            },
        )
        .unwrap();
        assert_eq!(w.balance_credits, 0);
        assert_eq!(w.balance_locked_credits, 0);
    }

    #[test]
    fn test_release_loss_forfeits_stake() {
        let w = apply(wallet(500, 5_000), WalletOp::ReleaseLoss { stake: 5_000 }).unwrap();
        assert_eq!(w.balance_credits, 500);
        assert_eq!(w.balance_locked_credits, 0);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        assert!(apply(wallet(10, 0), WalletOp::Credit { amount: 0 }).is_err());
        assert!(apply(wallet(10, 0), WalletOp::Lock { amount: -5 }).is_err());
    }
}
