use thiserror::Error;
use woosh_chain::ChainError;
use woosh_domain::DomainError;

/// Failures while assembling or submitting an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A required input (token, amount, account) is missing; the submit
    /// action should have been disabled.
    #[error("incomplete intent: {0}")]
    IncompleteIntent(&'static str),

    /// Another write operation is already in flight. Only one approve /
    /// swap / add / remove may be outstanding at a time.
    #[error("another transaction is pending")]
    Busy,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
