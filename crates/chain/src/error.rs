use thiserror::Error;

/// Failures at the chain boundary.
///
/// All of these are scoped to a single read or write: polling retries
/// through `Rpc` errors, and `UserRejected`/`Reverted` return the
/// operation to its pre-submission state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Transport or node failure on a read; transient and retry-eligible.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The wallet declined to sign. Non-fatal, dismissible.
    #[error("transaction rejected in wallet")]
    UserRejected,

    /// The transaction was mined but reverted, with the chain-provided
    /// reason when available.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// A read returned a shape the caller could not interpret.
    #[error("unexpected return value: {0}")]
    Decode(String),
}
