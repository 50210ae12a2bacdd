//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use woosh_execution::prelude::*;
//! ```

// Allowance gating
pub use crate::allowance::{AllowanceGate, Approval, UNLIMITED_ALLOWANCE};

// Errors
pub use crate::error::ExecutionError;

// Intents
pub use crate::intent::{
    add_liquidity_intent, approve_intent, remove_liquidity_intent, swap_intent, IntentKind,
    PendingIntent, DEADLINE_SECS, LIQUIDITY_PROTECTION_BPS,
};

// Lifecycle
pub use crate::lifecycle::{TxLifecycle, TxPhase};

// Polling
pub use crate::poller::{
    ReservePoller, ReserveUpdate, LIQUIDITY_POLL_INTERVAL, SWAP_POLL_INTERVAL,
};

// Sessions
pub use crate::session::{
    LiquiditySession, LiquidityView, RemovalView, SubmitAvailability, SwapSession, SwapView,
};
