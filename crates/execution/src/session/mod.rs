//! Per-screen reactive sessions.
//!
//! A session is the engine-side counterpart of one UI screen: it holds
//! the user's selections and typed amounts, folds in epoch-checked
//! reserve updates, and derives everything the screen renders: the
//! estimate, approval state and whether the submit action is live.

pub mod liquidity;
pub mod swap;

pub use liquidity::{LiquiditySession, LiquidityView, RemovalView};
pub use swap::{SwapSession, SwapView};

use crate::intent::PendingIntent;
use std::sync::Arc;
use tracing::info;
use woosh_chain::client::{ChainClient, Receipt};
use woosh_chain::{ChainError, DexContracts};

/// Whether the screen's primary action is currently actionable, with the
/// reason shown when it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAvailability {
    Ready,
    Disabled(&'static str),
}

impl SubmitAvailability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::Disabled(reason) => Some(reason),
        }
    }
}

/// Resolves an intent to its contract call, submits it and waits for the
/// receipt. Shared by every session submit path.
pub(crate) async fn send_intent(
    client: &Arc<dyn ChainClient>,
    contracts: &DexContracts,
    intent: &PendingIntent,
) -> Result<Receipt, ChainError> {
    let (target, signature, args) = intent.as_call(contracts);
    info!(kind = intent.kind_name(), id = %intent.id, target = %target, "submitting transaction");
    let tx = client.write(&target, signature, &args).await?;
    let receipt = client.wait_for_receipt(&tx).await?;
    info!(tx = %receipt.tx_hash.0, block = receipt.block_number, "transaction confirmed");
    Ok(receipt)
}

/// Wall-clock seconds for transaction deadlines.
pub(crate) fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
