//! Shared newtypes and utilities used across all domain modules.
//!
//! The ID types are serialization-transparent: they serialize/deserialize as
//! plain strings, so they can be stored and queried without conversion
//! overhead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Credit amount in integer minor units (e.g. cents).
///
/// All balances, stakes and payouts are integers; basis-point math widens to
/// `i128` before multiplying and floors on division.
pub type Credits = i64;

/// Basis points: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// `floor(amount * bps / 10_000)`, computed in `i128` to avoid overflow.
///
/// The single source of basis-point math: commission, service fees and
/// revenue shares all round down through here.
pub fn bps_of(amount: Credits, bps: u16) -> Credits {
    ((amount as i128 * bps as i128) / BPS_DENOMINATOR) as Credits
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// A fresh random (v4) identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self(s))
            }
        }
    };
}

string_id!(
    /// Owner key of a wallet; one wallet per user.
    UserId
);
string_id!(
    /// Identifier of a two-sided wager pool.
    PoolId
);
string_id!(
    /// Identifier of a single stake event into a pool.
    BetId
);
string_id!(
    /// Identifier of an append-only ledger entry.
    EntryId
);
string_id!(
    /// Identifier of a pool resolution.
    ResolutionId
);
string_id!(
    /// Identifier of a recurring payout invoice.
    InvoiceId
);
string_id!(
    /// Identifier returned by the external payment processor for a transfer.
    TransferId
);
string_id!(
    /// Link to an external real-world contest.
    MatchId
);

// ─── Side ────────────────────────────────────────────────────────────────────

/// The two sides of a wager pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }

    /// The opposing side.
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
