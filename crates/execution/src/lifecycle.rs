//! Single-flight operation lifecycle.
//!
//! Each session owns one [`TxLifecycle`]. At most one write (approve,
//! swap, add or remove) may be in flight at a time; a second submission
//! attempt fails fast with [`ExecutionError::Busy`] instead of queueing.
//!
//! Phases: `Idle → Quoted → AwaitingApproval → Quoted →
//! AwaitingConfirmation → Idle`. A rejection or revert falls back to
//! `Quoted` so the user's typed inputs survive; a confirmed success
//! returns to `Idle` and the session clears its form.

use crate::error::ExecutionError;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    /// A valid estimate is on screen and inputs are held.
    Quoted,
    /// An approval transaction is with the wallet or pending on chain.
    AwaitingApproval,
    /// The main transaction is with the wallet or pending on chain.
    AwaitingConfirmation,
}

impl TxPhase {
    /// True while a write is outstanding and further submissions must
    /// be refused.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::AwaitingApproval | Self::AwaitingConfirmation)
    }
}

#[derive(Debug, Default)]
pub struct TxLifecycle {
    phase: TxPhase,
}

impl TxLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TxPhase {
        self.phase
    }

    /// Records that a fresh estimate is available. No-op while a write
    /// is in flight: the quote on screen stays pinned to what was
    /// submitted.
    pub fn quoted(&mut self) {
        if !self.phase.is_in_flight() {
            self.transition(TxPhase::Quoted);
        }
    }

    /// Drops the current quote, e.g. when inputs are cleared or the
    /// selected pair changes.
    pub fn reset(&mut self) {
        if !self.phase.is_in_flight() {
            self.transition(TxPhase::Idle);
        }
    }

    /// Claims the flight slot for an approval transaction.
    pub fn begin_approval(&mut self) -> Result<(), ExecutionError> {
        self.claim(TxPhase::AwaitingApproval)
    }

    /// Claims the flight slot for the main transaction.
    pub fn begin_confirmation(&mut self) -> Result<(), ExecutionError> {
        self.claim(TxPhase::AwaitingConfirmation)
    }

    /// Settles a completed approval. Success or failure, the operation
    /// returns to `Quoted`: the user still has to submit the main
    /// transaction.
    pub fn approval_settled(&mut self) {
        if self.phase == TxPhase::AwaitingApproval {
            self.transition(TxPhase::Quoted);
        }
    }

    /// The main transaction confirmed; inputs are consumed.
    pub fn confirmed(&mut self) {
        if self.phase == TxPhase::AwaitingConfirmation {
            self.transition(TxPhase::Idle);
        }
    }

    /// The main transaction was rejected in the wallet or reverted on
    /// chain. Inputs and the quote are preserved for a retry.
    pub fn failed(&mut self) {
        if self.phase == TxPhase::AwaitingConfirmation {
            self.transition(TxPhase::Quoted);
        }
    }

    fn claim(&mut self, target: TxPhase) -> Result<(), ExecutionError> {
        if self.phase.is_in_flight() {
            return Err(ExecutionError::Busy);
        }
        self.transition(target);
        Ok(())
    }

    fn transition(&mut self, to: TxPhase) {
        if self.phase != to {
            debug!(from = ?self.phase, to = ?to, "lifecycle transition");
            self.phase = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_submission_is_busy() {
        let mut lifecycle = TxLifecycle::new();
        lifecycle.quoted();
        lifecycle.begin_confirmation().unwrap();
        assert!(matches!(
            lifecycle.begin_confirmation(),
            Err(ExecutionError::Busy)
        ));
        assert!(matches!(
            lifecycle.begin_approval(),
            Err(ExecutionError::Busy)
        ));
    }

    #[test]
    fn failure_returns_to_quoted() {
        let mut lifecycle = TxLifecycle::new();
        lifecycle.quoted();
        lifecycle.begin_confirmation().unwrap();
        lifecycle.failed();
        assert_eq!(lifecycle.phase(), TxPhase::Quoted);
        // Slot is free again.
        lifecycle.begin_confirmation().unwrap();
    }

    #[test]
    fn confirmation_clears_to_idle() {
        let mut lifecycle = TxLifecycle::new();
        lifecycle.quoted();
        lifecycle.begin_confirmation().unwrap();
        lifecycle.confirmed();
        assert_eq!(lifecycle.phase(), TxPhase::Idle);
    }

    #[test]
    fn approval_cycles_back_to_quoted() {
        let mut lifecycle = TxLifecycle::new();
        lifecycle.quoted();
        lifecycle.begin_approval().unwrap();
        lifecycle.approval_settled();
        assert_eq!(lifecycle.phase(), TxPhase::Quoted);
        lifecycle.begin_confirmation().unwrap();
        assert_eq!(lifecycle.phase(), TxPhase::AwaitingConfirmation);
    }

    #[test]
    fn requoting_while_in_flight_is_ignored() {
        let mut lifecycle = TxLifecycle::new();
        lifecycle.quoted();
        lifecycle.begin_confirmation().unwrap();
        lifecycle.quoted();
        lifecycle.reset();
        assert_eq!(lifecycle.phase(), TxPhase::AwaitingConfirmation);
    }
}
