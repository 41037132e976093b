//! Resolution domain — the one-time determination of a pool's winning side
//! and the pure payout math distributing the pot.

pub mod client;

use crate::domain::pool::{Bet, BetStatus};
use crate::shared::{bps_of, BetId, Credits, PoolId, ResolutionId, Side, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authoritative, one-time determination of a pool's winning side.
/// Immutable once created; at most one per pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: ResolutionId,
    pub pool_id: PoolId,
    pub winner_side: Side,
    pub decided_by: UserId,
    pub decided_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// One winning bet's computed payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPayout {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub stake: Credits,
    pub winnings: Credits,
}

/// One losing bet's forfeited stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedForfeit {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub stake: Credits,
}

/// The full payout computation for a pool, before any balance is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutPlan {
    pub total_pot: Credits,
    pub service_fee: Credits,
    pub net_pot: Credits,
    pub total_winner_stake: Credits,
    pub winners: Vec<PlannedPayout>,
    pub losers: Vec<PlannedForfeit>,
    /// Per-winner floor rounding leaves `net_pot - Σ winnings` behind; at
    /// most one minor unit per winner. Retained by the platform.
    pub rounding_residual: Credits,
}

impl PayoutPlan {
    /// Everything the platform keeps from this pool: the service fee, the
    /// rounding residual, and — when nobody bet the winning side — the whole
    /// net pot.
    pub fn platform_retained(&self) -> Credits {
        if self.winners.is_empty() {
            self.service_fee + self.net_pot
        } else {
            self.service_fee + self.rounding_residual
        }
    }
}

/// Compute the payout plan for a pool's funded bets.
///
/// `total_pot` is the sum of all funded stakes; the service fee is
/// `fee_bps` of it, floored; each winner receives their pro-rata floor share
/// of the net pot. When no one bet the winning side the net pot accrues to
/// the platform — an explicit policy, not a silent loss.
pub fn plan_payouts(bets: &[Bet], winner_side: Side, fee_bps: u16) -> PayoutPlan {
    let funded: Vec<&Bet> = bets.iter().filter(|b| b.status == BetStatus::Funded).collect();

    let total_pot: Credits = funded.iter().map(|b| b.amount).sum();
    let service_fee = bps_of(total_pot, fee_bps);
    let net_pot = total_pot - service_fee;

    let total_winner_stake: Credits = funded
        .iter()
        .filter(|b| b.side == winner_side)
        .map(|b| b.amount)
        .sum();

    let mut winners = Vec::new();
    let mut losers = Vec::new();
    for bet in funded {
        if bet.side == winner_side && total_winner_stake > 0 {
            let winnings =
                ((bet.amount as i128 * net_pot as i128) / total_winner_stake as i128) as Credits;
            winners.push(PlannedPayout {
                bet_id: bet.id.clone(),
                user_id: bet.user_id.clone(),
                stake: bet.amount,
                winnings,
            });
        } else {
            losers.push(PlannedForfeit {
                bet_id: bet.id.clone(),
                user_id: bet.user_id.clone(),
                stake: bet.amount,
            });
        }
    }

    let paid: Credits = winners.iter().map(|w| w.winnings).sum();
    let rounding_residual = if winners.is_empty() { 0 } else { net_pot - paid };

    PayoutPlan {
        total_pot,
        service_fee,
        net_pot,
        total_winner_stake,
        winners,
        losers,
        rounding_residual,
    }
}

/// Result of resolving a pool: the resolution row plus the applied payout
/// plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveOutcome {
    pub resolution: Resolution,
    pub total_pot: Credits,
    pub service_fee: Credits,
    pub net_pot: Credits,
    pub payouts: Vec<PlannedPayout>,
    /// Service fee + rounding residual, plus the whole net pot when no one
    /// bet the winning side.
    pub platform_retained: Credits,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(id: &str, user: &str, side: Side, amount: Credits, status: BetStatus) -> Bet {
        Bet {
            id: BetId::from(id),
            pool_id: PoolId::from("p-1"),
            user_id: UserId::from(user),
            side,
            amount,
            status,
            placed_at: Utc::now(),
            funded_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_plan_two_winners_one_loser() {
        // 8% fee; A receives 1000 + 3000, B receives 5000. A wins.
        let bets = vec![
            bet("b-1", "alice", Side::A, 1_000, BetStatus::Funded),
            bet("b-2", "bob", Side::A, 3_000, BetStatus::Funded),
            bet("b-3", "carol", Side::B, 5_000, BetStatus::Funded),
        ];
        let plan = plan_payouts(&bets, Side::A, 800);
        assert_eq!(plan.total_pot, 9_000);
        assert_eq!(plan.service_fee, 720);
        assert_eq!(plan.net_pot, 8_280);
        assert_eq!(plan.total_winner_stake, 4_000);
        assert_eq!(plan.winners.len(), 2);
        assert_eq!(plan.winners[0].winnings, 2_070);
        assert_eq!(plan.winners[1].winnings, 6_210);
        assert_eq!(plan.losers.len(), 1);
        assert_eq!(plan.losers[0].stake, 5_000);
        // Divides exactly here: no rounding loss.
        assert_eq!(plan.rounding_residual, 0);
        assert_eq!(plan.platform_retained(), 720);
    }

    #[test]
    fn test_rounding_residual_is_retained() {
        // Net pot 1000 across three equal winners: 333 each, 1 left over.
        let bets = vec![
            bet("b-1", "u1", Side::A, 100, BetStatus::Funded),
            bet("b-2", "u2", Side::A, 100, BetStatus::Funded),
            bet("b-3", "u3", Side::A, 100, BetStatus::Funded),
            bet("b-4", "u4", Side::B, 700, BetStatus::Funded),
        ];
        let plan = plan_payouts(&bets, Side::A, 0);
        assert_eq!(plan.net_pot, 1_000);
        for winner in &plan.winners {
            assert_eq!(winner.winnings, 333);
        }
        assert_eq!(plan.rounding_residual, 1);
        assert_eq!(plan.platform_retained(), 1);
        let paid: Credits = plan.winners.iter().map(|w| w.winnings).sum();
        assert!(paid <= plan.net_pot);
    }

    #[test]
    fn test_no_winners_accrues_net_pot_to_platform() {
        let bets = vec![
            bet("b-1", "u1", Side::B, 2_000, BetStatus::Funded),
            bet("b-2", "u2", Side::B, 3_000, BetStatus::Funded),
        ];
        let plan = plan_payouts(&bets, Side::A, 1_000);
        assert_eq!(plan.total_pot, 5_000);
        assert_eq!(plan.service_fee, 500);
        assert!(plan.winners.is_empty());
        assert_eq!(plan.losers.len(), 2);
        assert_eq!(plan.platform_retained(), 5_000);
    }

    #[test]
    fn test_non_funded_bets_are_excluded() {
        let bets = vec![
            bet("b-1", "u1", Side::A, 1_000, BetStatus::Funded),
            bet("b-2", "u2", Side::A, 9_000, BetStatus::Refunded),
            bet("b-3", "u3", Side::B, 1_000, BetStatus::Pending),
        ];
        let plan = plan_payouts(&bets, Side::A, 0);
        assert_eq!(plan.total_pot, 1_000);
        assert_eq!(plan.winners.len(), 1);
        assert!(plan.losers.is_empty());
    }

    #[test]
    fn test_full_fee_leaves_nothing_to_distribute() {
        let bets = vec![
            bet("b-1", "u1", Side::A, 1_000, BetStatus::Funded),
            bet("b-2", "u2", Side::B, 1_000, BetStatus::Funded),
        ];
        let plan = plan_payouts(&bets, Side::A, 10_000);
        assert_eq!(plan.service_fee, 2_000);
        assert_eq!(plan.net_pot, 0);
        assert_eq!(plan.winners[0].winnings, 0);
    }
}
