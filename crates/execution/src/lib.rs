//! Client execution engine: polling reads, approval gating, transaction
//! intents and the per-screen sessions.
//!
//! This crate turns UI state (selected tokens, typed amounts, slippage)
//! into epoch-guarded chain reads and fully-formed router calls:
//! - Reserve polling with stale-result discard
//! - Allowance gating ahead of any monetary write
//! - Intent building (slippage minimums, deadlines)
//! - Single-flight operation lifecycle
//! - Swap and liquidity screen sessions

/// Prelude module for convenient imports.
pub mod prelude;

/// Allowance gating.
pub mod allowance;
/// Crate errors.
pub mod error;
/// Transaction intent building.
pub mod intent;
/// Operation lifecycle and the single pending-transaction slot.
pub mod lifecycle;
/// Reserve polling with epoch guards.
pub mod poller;
/// Screen sessions (swap, add/remove liquidity).
pub mod session;

pub use error::ExecutionError;
