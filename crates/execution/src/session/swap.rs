//! Swap screen session.

use crate::allowance::{AllowanceGate, Approval};
use crate::error::ExecutionError;
use crate::intent::{approve_intent, swap_intent};
use crate::lifecycle::{TxLifecycle, TxPhase};
use crate::poller::ReserveUpdate;
use crate::session::{send_intent, unix_now, SubmitAvailability};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;
use woosh_chain::client::{ChainClient, Receipt};
use woosh_chain::DexContracts;
use woosh_domain::math::constant_product::{self, SwapQuote, BLOCK_IMPACT_BPS};
use woosh_domain::pool::ReserveSnapshot;
use woosh_domain::value_objects::units::{to_base_units, to_decimal_string};
use woosh_domain::{Address, BasisPoints, Token};

/// Slippage settings above 5% get a front-running warning in the view.
pub const HIGH_SLIPPAGE_WARN_BPS: u32 = 500;

/// Default slippage tolerance: 0.5%.
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Everything the swap screen renders, derived from current state.
#[derive(Debug, Clone)]
pub struct SwapView {
    pub phase: TxPhase,
    pub quote: Option<SwapQuote>,
    /// Estimated output formatted in the output token's decimals.
    pub amount_out: Option<String>,
    pub spot_price: Option<Decimal>,
    pub il_advisory: bool,
    pub high_slippage: bool,
    pub approval: Approval,
    pub submit: SubmitAvailability,
}

/// State behind the swap screen: token pair, typed input amount,
/// slippage setting and the latest reserve snapshot.
pub struct SwapSession {
    client: Arc<dyn ChainClient>,
    gate: Arc<AllowanceGate>,
    contracts: DexContracts,
    account: Option<Address>,
    token_in: Option<Token>,
    token_out: Option<Token>,
    amount_in_text: String,
    slippage: BasisPoints,
    epoch: u64,
    snapshot: Option<ReserveSnapshot>,
    lifecycle: TxLifecycle,
}

impl SwapSession {
    pub fn new(
        client: Arc<dyn ChainClient>,
        gate: Arc<AllowanceGate>,
        contracts: DexContracts,
    ) -> Self {
        Self {
            client,
            gate,
            contracts,
            account: None,
            token_in: None,
            token_out: None,
            amount_in_text: String::new(),
            slippage: BasisPoints(DEFAULT_SLIPPAGE_BPS),
            epoch: 0,
            snapshot: None,
            lifecycle: TxLifecycle::new(),
        }
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
    }

    /// Selects the input token. Picking the token already on the output
    /// side switches the two selections instead of duplicating them.
    pub fn select_input(&mut self, token: Token) {
        if self.token_out.as_ref() == Some(&token) {
            self.token_out = self.token_in.take();
        }
        self.token_in = Some(token);
        self.snapshot = None;
        self.sync_phase();
    }

    /// Selects the output token, with the same switch-on-duplicate rule.
    pub fn select_output(&mut self, token: Token) {
        if self.token_in.as_ref() == Some(&token) {
            self.token_in = self.token_out.take();
        }
        self.token_out = Some(token);
        self.snapshot = None;
        self.sync_phase();
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.amount_in_text = text.into();
        self.sync_phase();
    }

    /// Sets the slippage tolerance. Anything above 100% is capped; a
    /// raw bps value from the outside must not inflate the minimum
    /// past the quote.
    pub fn set_slippage(&mut self, slippage: BasisPoints) {
        self.slippage = slippage.min(BasisPoints::MAX);
    }

    /// The pair to poll: both sides selected and both ERC-20 contracts.
    /// Native currency has no pair leg, so a native selection yields no
    /// pollable pair and the screen shows it as unavailable.
    pub fn pair_tokens(&self) -> Option<(Address, Address)> {
        let token_in = self.token_in.as_ref()?;
        let token_out = self.token_out.as_ref()?;
        if token_in.is_native() || token_out.is_native() {
            return None;
        }
        Some((token_in.address.clone(), token_out.address.clone()))
    }

    /// Records the poll epoch for the current selection. Updates stamped
    /// with any other epoch are discarded.
    pub fn track(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.snapshot = None;
    }

    /// Folds in a completed poll. Returns false when the update belongs
    /// to a superseded selection; a transient read error keeps the last
    /// good snapshot on screen.
    pub fn apply_update(&mut self, update: ReserveUpdate) -> bool {
        if update.epoch != self.epoch {
            return false;
        }
        match update.result {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(error) => warn!(%error, "swap reserve refresh failed; keeping last snapshot"),
        }
        self.sync_phase();
        true
    }

    pub fn phase(&self) -> TxPhase {
        self.lifecycle.phase()
    }

    /// Recomputes the estimate from scratch. None whenever any input is
    /// missing, unparseable or the pool has no liquidity.
    pub fn quote(&self) -> Option<SwapQuote> {
        let token_in = self.token_in.as_ref()?;
        let snapshot = self.snapshot.as_ref().filter(|s| s.has_liquidity())?;
        let amount_in = to_base_units(self.amount_in_text.trim(), token_in.decimals).ok()?;
        if amount_in.is_zero() {
            return None;
        }
        let (reserve_in, reserve_out) = snapshot.oriented(&token_in.address);
        constant_product::quote_exact_in(amount_in.into(), reserve_in, reserve_out).ok()
    }

    /// Derived screen state. Async because the approval check consults
    /// the allowance cache.
    pub async fn view(&self) -> SwapView {
        let quote = self.quote();
        let amount_out = match (&quote, &self.token_out) {
            (Some(q), Some(token)) => Some(to_decimal_string(q.amount_out.0, token.decimals)),
            _ => None,
        };
        let spot_price = self.spot_price();
        let approval = self.approval(&quote).await;
        SwapView {
            phase: self.lifecycle.phase(),
            il_advisory: quote.as_ref().is_some_and(SwapQuote::il_advisory),
            high_slippage: self.slippage.0 > HIGH_SLIPPAGE_WARN_BPS,
            submit: self.availability(&quote, approval),
            quote,
            amount_out,
            spot_price,
            approval,
        }
    }

    fn spot_price(&self) -> Option<Decimal> {
        let token_in = self.token_in.as_ref()?;
        let snapshot = self.snapshot.as_ref().filter(|s| s.has_liquidity())?;
        let (reserve_in, reserve_out) = snapshot.oriented(&token_in.address);
        constant_product::spot_price(reserve_in, reserve_out).ok()
    }

    async fn approval(&self, quote: &Option<SwapQuote>) -> Approval {
        let (Some(token_in), Some(account), Some(quote)) =
            (&self.token_in, &self.account, quote)
        else {
            return Approval::Unknown;
        };
        self.gate
            .check_token(token_in, account, quote.amount_in.0)
            .await
    }

    fn availability(&self, quote: &Option<SwapQuote>, approval: Approval) -> SubmitAvailability {
        use SubmitAvailability::Disabled;

        if self.lifecycle.phase().is_in_flight() {
            return Disabled("transaction pending");
        }
        if self.account.is_none() {
            return Disabled("connect a wallet");
        }
        if self.token_in.is_none() || self.token_out.is_none() {
            return Disabled("select tokens");
        }
        if self.pair_tokens().is_none() {
            return Disabled("pair unavailable for the native token");
        }
        let Some(quote) = quote else {
            if self.snapshot.is_none() {
                return Disabled("loading reserves");
            }
            if !self.snapshot.as_ref().is_some_and(ReserveSnapshot::has_liquidity) {
                return Disabled("no liquidity");
            }
            return Disabled("enter an amount");
        };
        if quote.impact_bps > BLOCK_IMPACT_BPS {
            return Disabled("price impact too high");
        }
        if approval == Approval::Unknown {
            return Disabled("checking allowance");
        }
        SubmitAvailability::Ready
    }

    /// Fetches the input token's allowance into the gate cache.
    pub async fn refresh_allowance(&self) -> Result<(), ExecutionError> {
        if let (Some(token), Some(account)) = (&self.token_in, &self.account) {
            if !token.is_native() {
                self.gate.refresh(&token.address, account).await?;
            }
        }
        Ok(())
    }

    /// Submits an unlimited approval for the input token, then re-reads
    /// the allowance so the gate reflects it.
    pub async fn approve(&mut self) -> Result<Receipt, ExecutionError> {
        let account = self
            .account
            .clone()
            .ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
        let token = self
            .token_in
            .clone()
            .filter(|t| !t.is_native())
            .ok_or(ExecutionError::IncompleteIntent("nothing to approve"))?;

        self.lifecycle.begin_approval()?;
        let intent = approve_intent(&token.address);
        let result = send_intent(&self.client, &self.contracts, &intent).await;
        self.lifecycle.approval_settled();

        match result {
            Ok(receipt) => {
                self.gate.invalidate(&token.address, &account).await;
                if let Err(error) = self.gate.refresh(&token.address, &account).await {
                    warn!(%error, "allowance re-read failed after approval");
                }
                Ok(receipt)
            }
            Err(error) => {
                warn!(%error, "approval did not confirm");
                Err(error.into())
            }
        }
    }

    /// Submits the swap. On confirmation the typed amount is cleared;
    /// a wallet rejection or revert preserves it for a retry.
    pub async fn submit(&mut self) -> Result<Receipt, ExecutionError> {
        let quote = self.quote();
        let approval = self.approval(&quote).await;
        if let SubmitAvailability::Disabled(reason) = self.availability(&quote, approval) {
            return Err(ExecutionError::IncompleteIntent(reason));
        }
        if approval != Approval::NotRequired {
            return Err(ExecutionError::IncompleteIntent("approval required"));
        }

        let intent = swap_intent(
            self.account.as_ref(),
            self.token_in.as_ref(),
            self.token_out.as_ref(),
            quote.as_ref(),
            self.slippage,
            unix_now(),
        )?;

        self.lifecycle.begin_confirmation()?;
        match send_intent(&self.client, &self.contracts, &intent).await {
            Ok(receipt) => {
                self.lifecycle.confirmed();
                self.amount_in_text.clear();
                if let (Some(token), Some(account)) = (&self.token_in, &self.account) {
                    self.gate.invalidate(&token.address, account).await;
                }
                Ok(receipt)
            }
            Err(error) => {
                self.lifecycle.failed();
                // The allowance may have been consumed before the revert;
                // drop the record so the next check re-reads it.
                if let (Some(token), Some(account)) = (&self.token_in, &self.account) {
                    self.gate.invalidate(&token.address, account).await;
                }
                warn!(%error, "swap did not confirm; inputs preserved");
                Err(error.into())
            }
        }
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_in_text
    }

    fn sync_phase(&mut self) {
        if self.quote().is_some() {
            self.lifecycle.quoted();
        } else {
            self.lifecycle.reset();
        }
    }
}
