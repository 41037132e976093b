//! Engine configuration — commission tables, betting and dispute windows.

use crate::domain::commission::{MatchRates, MembershipPricing, MembershipTier};
use crate::shared::Credits;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration. Constructed once and injected through the
/// engine builder; all operations read it, none mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub commission: CommissionConfig,

    /// Betting window applied when a pool is created without an explicit
    /// lock cutoff: `lock_cutoff_at = created_at + betting_window_secs`.
    pub betting_window_secs: i64,

    /// Dispute window opened at resolution:
    /// `dispute_deadline_at = decided_at + dispute_window_secs`.
    pub dispute_window_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commission: CommissionConfig::default(),
            betting_window_secs: 3_600,
            dispute_window_secs: 86_400,
        }
    }
}

/// Commission rate tables, all in basis points over integer minor units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    /// Match commission rates per membership tier. The cheaper tier of the
    /// two participants is applied.
    pub match_rates_pro: MatchRates,
    pub match_rates_basic: MatchRates,
    pub match_rates_none: MatchRates,

    /// Base escrow rate; pools below the high-volume threshold pay double
    /// this rate.
    pub pool_base_fee_bps: u16,

    /// Flat rate for pools at or above the high-volume threshold.
    pub pool_high_volume_fee_bps: u16,

    /// Total-pool size (minor units) at which the flat high-volume rate
    /// applies.
    pub pool_high_volume_threshold: Credits,

    /// Fixed membership price / operator cut per paid tier.
    pub membership_pro: MembershipPricing,
    pub membership_basic: MembershipPricing,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            match_rates_pro: MatchRates {
                platform_bps: 300,
                operator_bps: 200,
            },
            match_rates_basic: MatchRates {
                platform_bps: 500,
                operator_bps: 300,
            },
            match_rates_none: MatchRates {
                platform_bps: 800,
                operator_bps: 400,
            },
            pool_base_fee_bps: 250,
            pool_high_volume_fee_bps: 200,
            // $500 equivalent in minor units.
            pool_high_volume_threshold: 50_000,
            membership_pro: MembershipPricing {
                price: 2_999,
                operator_cut: 999,
            },
            membership_basic: MembershipPricing {
                price: 1_499,
                operator_cut: 499,
            },
        }
    }
}

impl CommissionConfig {
    /// Match rates for a tier.
    pub fn match_rates(&self, tier: MembershipTier) -> MatchRates {
        match tier {
            MembershipTier::Pro => self.match_rates_pro,
            MembershipTier::Basic => self.match_rates_basic,
            MembershipTier::None => self.match_rates_none,
        }
    }

    /// Membership pricing for a tier. The free tier has no membership
    /// product, so its pricing is zero.
    pub fn membership_pricing(&self, tier: MembershipTier) -> MembershipPricing {
        match tier {
            MembershipTier::Pro => self.membership_pro,
            MembershipTier::Basic => self.membership_basic,
            MembershipTier::None => MembershipPricing {
                price: 0,
                operator_cut: 0,
            },
        }
    }
}
