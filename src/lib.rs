//! # wagerpool
//!
//! An escrow-based wagering economy core: users fund internal credit
//! wallets, stake credits into two-sided pools tied to real-world contests,
//! an authority resolves the winning side, and the engine distributes the
//! pot proportionally to winners after deducting a commission.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Shared newtypes, domain models, pure commission/payout math
//! 2. **Store** — The injected persistence contract and its in-memory
//!    implementation; every atomicity requirement is a conditional store
//!    primitive
//! 3. **Engine** — `Engine` with nested sub-clients driving wallet, pool,
//!    resolution and payout operations through the store
//! 4. **Sweeper** — Periodic background task locking due pools and closing
//!    expired dispute windows
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wagerpool::prelude::*;
//!
//! let engine = Engine::builder().store(MemoryStore::new()).build();
//!
//! engine.wallets().credit(&user, 10_000).await?;
//! let pool = engine.pools().create(params).await?;
//! let bet = engine.pools().place_bet(&pool.id, &user, Side::A, 1_000).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, pure logic, sub-clients.
pub mod domain;

/// Unified engine error types.
pub mod error;

/// Commission tables, betting and dispute windows.
pub mod config;

// ── Layer 2: Store ───────────────────────────────────────────────────────────

/// Persistence contract + in-memory implementation.
pub mod store;

// ── Layer 3: Engine ──────────────────────────────────────────────────────────

/// `Engine` — the primary entry point.
pub mod client;

// ── Layer 4: Sweeper ─────────────────────────────────────────────────────────

/// Periodic lock/finalize sweeps.
pub mod sweeper;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{
        bps_of, BetId, Credits, EntryId, InvoiceId, MatchId, PoolId, ResolutionId, Side,
        TransferId, UserId,
    };

    // Domain types — wallet + ledger
    pub use crate::domain::ledger::{EntryKind, LedgerEntry};
    pub use crate::domain::wallet::{Wallet, WalletOp};

    // Domain types — pool
    pub use crate::domain::pool::{Bet, BetStatus, CreatePool, DisputeStatus, Pool, PoolStatus};

    // Domain types — commission
    pub use crate::domain::commission::{
        MatchSplit, MembershipSplit, MembershipTier, PoolSplit, RevenueSplit, Share,
        ShareRecipient,
    };

    // Domain types — resolution
    pub use crate::domain::resolution::{PayoutPlan, PlannedPayout, Resolution, ResolveOutcome};

    // Domain types — revenue share
    pub use crate::domain::revshare::{
        PaymentProcessor, RetryConfig, Transfer, TransferRecord,
    };

    // Errors
    pub use crate::error::{EngineError, PoolError, StoreError, TransferError, WalletError};

    // Configuration
    pub use crate::config::{CommissionConfig, EngineConfig};

    // Engine + store
    pub use crate::client::{Engine, EngineBuilder};
    pub use crate::store::{MemoryStore, Store};

    // Sweeper
    pub use crate::sweeper::Sweeper;
}
