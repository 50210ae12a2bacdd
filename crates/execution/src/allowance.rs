//! ERC-20 approval gating.
//!
//! A monetary write must never be submitted while the allowance covering
//! it is unknown: an unfetched read maps to [`Approval::Unknown`], which
//! callers treat as "hold submission", not as either yes or no.

use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use woosh_chain::reader::PairReader;
use woosh_chain::ChainError;
use woosh_domain::{Address, Token};

/// The sentinel amount requested by approve intents: effectively
/// unlimited, matching the client's historical behavior.
pub const UNLIMITED_ALLOWANCE: U256 = U256::MAX;

/// Outcome of an approval check for a pending amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    /// The existing allowance covers the amount (or the token is the
    /// native currency, which has no allowance concept).
    NotRequired,
    /// An approve transaction must confirm before the operation.
    Required,
    /// Allowance not yet fetched; submission must wait for the read.
    Unknown,
}

/// Caches (owner, token) → allowance toward the router and answers
/// approval checks. Records are invalidated after any state-changing
/// transaction and re-read on demand.
pub struct AllowanceGate {
    reader: Arc<PairReader>,
    records: RwLock<HashMap<(Address, Address), U256>>,
}

impl AllowanceGate {
    pub fn new(reader: Arc<PairReader>) -> Self {
        Self {
            reader,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Pure gate: `Required` iff the pending amount exceeds the cached
    /// allowance; an exactly-equal allowance is sufficient.
    pub fn evaluate(cached: Option<U256>, pending: U256) -> Approval {
        match cached {
            None => Approval::Unknown,
            Some(allowance) if pending > allowance => Approval::Required,
            Some(_) => Approval::NotRequired,
        }
    }

    /// Approval state for a registry token. Native currency short-circuits
    /// to `NotRequired` without consulting the cache.
    pub async fn check_token(&self, token: &Token, owner: &Address, pending: U256) -> Approval {
        if token.is_native() {
            return Approval::NotRequired;
        }
        self.check_address(&token.address, owner, pending).await
    }

    /// Approval state for a raw contract address (e.g. an LP token).
    pub async fn check_address(
        &self,
        token: &Address,
        owner: &Address,
        pending: U256,
    ) -> Approval {
        let cached = self
            .records
            .read()
            .await
            .get(&(owner.clone(), token.clone()))
            .copied();
        Self::evaluate(cached, pending)
    }

    /// Re-reads the allowance from chain and caches it.
    pub async fn refresh(&self, token: &Address, owner: &Address) -> Result<U256, ChainError> {
        let allowance = self.reader.allowance(token, owner).await?;
        debug!(token = %token, owner = %owner, %allowance, "allowance refreshed");
        self.records
            .write()
            .await
            .insert((owner.clone(), token.clone()), allowance);
        Ok(allowance)
    }

    /// Drops the cached record so the next check reports `Unknown` until
    /// a refresh lands. Called after approvals confirm and after reverts.
    pub async fn invalidate(&self, token: &Address, owner: &Address) {
        self.records
            .write()
            .await
            .remove(&(owner.clone(), token.clone()));
    }
}
