//! Pool domain — two-sided wager pools and the bets staked into them.

pub mod client;

use crate::shared::{BetId, Credits, MatchId, PoolId, Side, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Pool lifecycle status. Transitions only move forward:
/// Open → Locked → Resolved (→ finalized once the dispute window elapses),
/// Open → Canceled, Resolved → Disputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    Open,
    Locked,
    Resolved,
    Disputed,
    Canceled,
}

impl PoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::Open => "open",
            PoolStatus::Locked => "locked",
            PoolStatus::Resolved => "resolved",
            PoolStatus::Disputed => "disputed",
            PoolStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a dispute has been raised against a resolved pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeStatus {
    None,
    Raised,
}

// ─── Pool ────────────────────────────────────────────────────────────────────

/// A two-sided wager container. Users stake credits into one of the two
/// sides while the pool is open; an authority resolves the winning side once
/// the contest settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    /// Link to an external real-world contest, when there is one.
    pub match_id: Option<MatchId>,
    pub creator_id: UserId,
    pub side_a_label: String,
    pub side_b_label: String,
    /// Reference/display amount; actual stakes are carried by the bets.
    pub stake_per_side: Credits,
    /// Commission rate withheld from the pot at resolution.
    pub fee_bps: u16,
    pub status: PoolStatus,
    /// No further bets once this passes; the pool can be locked.
    pub lock_cutoff_at: DateTime<Utc>,
    /// Set at resolution: end of the dispute window.
    pub dispute_deadline_at: Option<DateTime<Utc>>,
    pub dispute_status: DisputeStatus,
    /// Set when the dispute window closes without a dispute (or a disputed
    /// pool is manually closed). A resolved pool with this stamp is terminal.
    pub auto_resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Pool {
    /// Terminal pools are immutable: canceled, or resolved with the dispute
    /// window closed.
    pub fn is_terminal(&self) -> bool {
        match self.status {
            PoolStatus::Canceled => true,
            PoolStatus::Resolved => self.auto_resolved_at.is_some(),
            _ => false,
        }
    }

    /// The label shown for a side.
    pub fn side_label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.side_a_label,
            Side::B => &self.side_b_label,
        }
    }
}

/// Parameters for creating a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePool {
    pub creator_id: UserId,
    pub side_a_label: String,
    pub side_b_label: String,
    pub stake_per_side: Credits,
    pub fee_bps: u16,
    /// Optional link to an external contest.
    pub match_id: Option<MatchId>,
    /// Explicit betting cutoff; defaults to the configured betting window
    /// from creation time.
    pub lock_cutoff_at: Option<DateTime<Utc>>,
}

// ─── Bet ─────────────────────────────────────────────────────────────────────

/// Bet lifecycle. Terminal statuses are set only by resolution or
/// cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Funded,
    Paid,
    Lost,
    Refunded,
}

/// One user's stake into one side of a pool. One row per stake event; a user
/// may place multiple bets on the same pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub pool_id: PoolId,
    pub user_id: UserId,
    pub side: Side,
    pub amount: Credits,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub funded_at: Option<DateTime<Utc>>,
}
