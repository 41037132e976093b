//! Commission calculator — pure basis-point splits, no side effects.
//!
//! All division rounds down; the post-floor remainder stays with the
//! platform in every split.

use crate::config::CommissionConfig;
use crate::shared::{bps_of, Credits, UserId};
use serde::{Deserialize, Serialize};

// ─── Membership tiers ────────────────────────────────────────────────────────

/// Membership tiers, ordered cheapest-commission first: Pro < Basic < None.
///
/// The derived ordering is what "better tier" means everywhere — no string
/// comparison, the variant order is the contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Pro,
    Basic,
    None,
}

impl MembershipTier {
    /// The cheaper (lower-commission) of two tiers.
    pub fn better(self, other: MembershipTier) -> MembershipTier {
        self.min(other)
    }
}

/// Platform/operator basis-point rates for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRates {
    pub platform_bps: u16,
    pub operator_bps: u16,
}

/// Fixed membership price and operator cut for one tier, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPricing {
    pub price: Credits,
    pub operator_cut: Credits,
}

// ─── Splits ──────────────────────────────────────────────────────────────────

/// Result of splitting a match stake between platform, operator and prize
/// pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSplit {
    /// The tier whose rates were applied (the cheaper of the two parties).
    pub tier_applied: MembershipTier,
    pub platform_amount: Credits,
    pub operator_amount: Credits,
    pub prize_pool_amount: Credits,
}

/// Result of the escrow commission on a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSplit {
    pub applied_bps: u16,
    pub fee: Credits,
    pub net: Credits,
}

/// Result of splitting a membership price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSplit {
    pub price: Credits,
    pub operator_amount: Credits,
    pub platform_amount: Credits,
}

/// One recipient's basis-point share of a gross amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecipient {
    pub id: UserId,
    pub bps: u16,
}

/// A computed non-zero share owed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub recipient: UserId,
    pub bps: u16,
    pub amount: Credits,
}

/// Result of a revenue-share split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSplit {
    pub shares: Vec<Share>,
    /// Post-floor remainder, retained by the platform.
    pub remainder: Credits,
}

// ─── Calculators ─────────────────────────────────────────────────────────────

/// Split a match stake by the better (cheaper) of the two parties' tiers.
pub fn match_commission(
    config: &CommissionConfig,
    stake: Credits,
    tier_a: MembershipTier,
    tier_b: MembershipTier,
) -> MatchSplit {
    let tier = tier_a.better(tier_b);
    let rates = config.match_rates(tier);
    let platform_amount = bps_of(stake, rates.platform_bps);
    let operator_amount = bps_of(stake, rates.operator_bps);
    MatchSplit {
        tier_applied: tier,
        platform_amount,
        operator_amount,
        prize_pool_amount: stake - platform_amount - operator_amount,
    }
}

/// Escrow commission on a pool's total amount.
///
/// Pools at or above the high-volume threshold pay the flat high-volume
/// rate; smaller pools pay double the base rate. The two rates are
/// configured independently.
// TODO: confirm with product whether small pools doubling the base rate is
// intended, or whether both sizes should share one schedule.
pub fn pool_commission(config: &CommissionConfig, pool_amount: Credits) -> PoolSplit {
    let applied_bps = if pool_amount >= config.pool_high_volume_threshold {
        config.pool_high_volume_fee_bps
    } else {
        config.pool_base_fee_bps * 2
    };
    let fee = bps_of(pool_amount, applied_bps);
    PoolSplit {
        applied_bps,
        fee,
        net: pool_amount - fee,
    }
}

/// Split a membership price between operator and platform.
pub fn membership_commission(
    config: &CommissionConfig,
    tier: MembershipTier,
) -> MembershipSplit {
    let pricing = config.membership_pricing(tier);
    MembershipSplit {
        price: pricing.price,
        operator_amount: pricing.operator_cut,
        platform_amount: pricing.price - pricing.operator_cut,
    }
}

/// Split a gross amount across recipients by basis points.
///
/// Recipients whose floored amount is zero are skipped; the remainder after
/// all floors is retained by the platform.
pub fn revenue_split(gross: Credits, recipients: &[ShareRecipient]) -> RevenueSplit {
    let mut shares = Vec::with_capacity(recipients.len());
    let mut distributed: Credits = 0;
    for recipient in recipients {
        let amount = bps_of(gross, recipient.bps);
        if amount == 0 {
            continue;
        }
        distributed += amount;
        shares.push(Share {
            recipient: recipient.id.clone(),
            bps: recipient.bps,
            amount,
        });
    }
    RevenueSplit {
        shares,
        remainder: gross - distributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CommissionConfig {
        CommissionConfig::default()
    }

    #[test]
    fn test_tier_order_pro_is_cheapest() {
        assert!(MembershipTier::Pro < MembershipTier::Basic);
        assert!(MembershipTier::Basic < MembershipTier::None);
        assert_eq!(
            MembershipTier::None.better(MembershipTier::Pro),
            MembershipTier::Pro
        );
        assert_eq!(
            MembershipTier::Basic.better(MembershipTier::Basic),
            MembershipTier::Basic
        );
    }

    #[test]
    fn test_match_commission_uses_better_tier() {
        let split = match_commission(
            &config(),
            10_000,
            MembershipTier::None,
            MembershipTier::Pro,
        );
        assert_eq!(split.tier_applied, MembershipTier::Pro);
        // Pro: 300 bps platform, 200 bps operator.
        assert_eq!(split.platform_amount, 300);
        assert_eq!(split.operator_amount, 200);
        assert_eq!(split.prize_pool_amount, 9_500);
    }

    #[test]
    fn test_match_commission_floors_each_component() {
        let split = match_commission(&config(), 333, MembershipTier::Basic, MembershipTier::None);
        // Basic: 500/300 bps. 333*0.05 = 16.65 → 16; 333*0.03 = 9.99 → 9.
        assert_eq!(split.platform_amount, 16);
        assert_eq!(split.operator_amount, 9);
        assert_eq!(split.prize_pool_amount, 333 - 16 - 9);
    }

    #[test]
    fn test_small_pools_pay_double_base_rate() {
        let split = pool_commission(&config(), 10_000);
        assert_eq!(split.applied_bps, 500); // 250 * 2
        assert_eq!(split.fee, 500);
        assert_eq!(split.net, 9_500);
    }

    #[test]
    fn test_high_volume_pools_pay_flat_rate() {
        let split = pool_commission(&config(), 50_000);
        assert_eq!(split.applied_bps, 200);
        assert_eq!(split.fee, 1_000);
        assert_eq!(split.net, 49_000);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let below = pool_commission(&config(), 49_999);
        let at = pool_commission(&config(), 50_000);
        assert_eq!(below.applied_bps, 500);
        assert_eq!(at.applied_bps, 200);
    }

    #[test]
    fn test_membership_platform_is_price_minus_operator_cut() {
        let split = membership_commission(&config(), MembershipTier::Pro);
        assert_eq!(split.price, 2_999);
        assert_eq!(split.operator_amount, 999);
        assert_eq!(split.platform_amount, 2_000);
    }

    #[test]
    fn test_free_tier_membership_is_zero() {
        let split = membership_commission(&config(), MembershipTier::None);
        assert_eq!(split.price, 0);
        assert_eq!(split.platform_amount, 0);
    }

    #[test]
    fn test_revenue_split_skips_zero_amounts_and_keeps_remainder() {
        let recipients = vec![
            ShareRecipient {
                id: UserId::from("staff-1"),
                bps: 4_000,
            },
            ShareRecipient {
                id: UserId::from("staff-2"),
                bps: 5,
            },
        ];
        // 4000 bps of 999 = 399.6 → 399; 5 bps of 999 = 0.4995 → 0 (skipped).
        let split = revenue_split(999, &recipients);
        assert_eq!(split.shares.len(), 1);
        assert_eq!(split.shares[0].amount, 399);
        assert_eq!(split.remainder, 600);
    }

    #[test]
    fn test_revenue_split_remainder_is_retained_not_redistributed() {
        let recipients: Vec<ShareRecipient> = (0..3)
            .map(|i| ShareRecipient {
                id: UserId::from(format!("r-{i}").as_str()),
                bps: 3_333,
            })
            .collect();
        let split = revenue_split(10_000, &recipients);
        let total: Credits = split.shares.iter().map(|s| s.amount).sum();
        assert_eq!(total, 9_999);
        assert_eq!(split.remainder, 1);
    }
}
