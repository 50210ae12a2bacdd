//! Liquidity screen session: proportional deposits and withdrawals.

use crate::allowance::{AllowanceGate, Approval};
use crate::error::ExecutionError;
use crate::intent::{add_liquidity_intent, approve_intent, remove_liquidity_intent};
use crate::lifecycle::{TxLifecycle, TxPhase};
use crate::poller::ReserveUpdate;
use crate::session::{send_intent, unix_now, SubmitAvailability};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;
use woosh_chain::client::{ChainClient, Receipt};
use woosh_chain::reader::PairReader;
use woosh_chain::DexContracts;
use woosh_domain::math::liquidity::{matching_deposit, removal_amounts, RemovalAmounts};
use woosh_domain::pool::ReserveSnapshot;
use woosh_domain::position::LiquidityPosition;
use woosh_domain::value_objects::units::{to_base_units, to_decimal_string};
use woosh_domain::{Address, Token, TokenAmount};

/// Which deposit field the user touched last. The other side is derived
/// from it whenever the pool has a ratio to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditedSide {
    A,
    B,
}

/// Derived state for the add-liquidity form.
#[derive(Debug, Clone)]
pub struct LiquidityView {
    pub phase: TxPhase,
    /// False until the pair lookup has settled at the current epoch.
    pub loaded: bool,
    /// True when the pair exists and holds reserves; the deposit ratio
    /// is then fixed and the second field is derived.
    pub pool_exists: bool,
    pub approval_a: Approval,
    pub approval_b: Approval,
    pub submit: SubmitAvailability,
}

/// Derived state for the remove-liquidity form.
#[derive(Debug, Clone)]
pub struct RemovalView {
    pub phase: TxPhase,
    pub percent: u8,
    pub preview: Option<RemovalAmounts>,
    /// Withdrawal amounts formatted in each token's decimals.
    pub amount_a: Option<String>,
    pub amount_b: Option<String>,
    /// The user's share of the pool, as a percentage.
    pub share_percent: Option<Decimal>,
    /// Approval state of the pair's LP token toward the router.
    pub lp_approval: Approval,
    pub submit: SubmitAvailability,
}

/// State behind the liquidity screen. One session serves both the add
/// and remove forms; they share the pair selection, the polled snapshot
/// and the single pending-transaction slot.
pub struct LiquiditySession {
    client: Arc<dyn ChainClient>,
    reader: Arc<PairReader>,
    gate: Arc<AllowanceGate>,
    contracts: DexContracts,
    account: Option<Address>,
    token_a: Option<Token>,
    token_b: Option<Token>,
    amount_a_text: String,
    amount_b_text: String,
    last_edited: Option<EditedSide>,
    remove_percent: u8,
    epoch: u64,
    loaded: bool,
    snapshot: Option<ReserveSnapshot>,
    lp_balance: Option<TokenAmount>,
    lifecycle: TxLifecycle,
}

impl LiquiditySession {
    pub fn new(
        client: Arc<dyn ChainClient>,
        reader: Arc<PairReader>,
        gate: Arc<AllowanceGate>,
        contracts: DexContracts,
    ) -> Self {
        Self {
            client,
            reader,
            gate,
            contracts,
            account: None,
            token_a: None,
            token_b: None,
            amount_a_text: String::new(),
            amount_b_text: String::new(),
            last_edited: None,
            remove_percent: 50,
            epoch: 0,
            loaded: false,
            snapshot: None,
            lp_balance: None,
            lifecycle: TxLifecycle::new(),
        }
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
        self.lp_balance = None;
    }

    /// Selects token A. Unlike the swap screen, picking the token already
    /// on the other side clears that side rather than switching.
    pub fn select_token_a(&mut self, token: Token) {
        if self.token_b.as_ref() == Some(&token) {
            self.token_b = None;
        }
        self.token_a = Some(token);
        self.clear_pair_state();
    }

    pub fn select_token_b(&mut self, token: Token) {
        if self.token_a.as_ref() == Some(&token) {
            self.token_a = None;
        }
        self.token_b = Some(token);
        self.clear_pair_state();
    }

    pub fn set_amount_a(&mut self, text: impl Into<String>) {
        self.amount_a_text = text.into();
        self.last_edited = Some(EditedSide::A);
        self.rebalance();
        self.sync_phase();
    }

    pub fn set_amount_b(&mut self, text: impl Into<String>) {
        self.amount_b_text = text.into();
        self.last_edited = Some(EditedSide::B);
        self.rebalance();
        self.sync_phase();
    }

    /// Slider position for the remove form, clamped to 0–100.
    pub fn set_remove_percent(&mut self, percent: u8) {
        self.remove_percent = percent.min(100);
    }

    /// The pair to poll, if both sides are selected ERC-20 contracts.
    pub fn pair_tokens(&self) -> Option<(Address, Address)> {
        let token_a = self.token_a.as_ref()?;
        let token_b = self.token_b.as_ref()?;
        if token_a.is_native() || token_b.is_native() {
            return None;
        }
        Some((token_a.address.clone(), token_b.address.clone()))
    }

    /// Records the poll epoch for the current selection.
    pub fn track(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.loaded = false;
        self.snapshot = None;
    }

    /// Folds in a completed poll; stale epochs are discarded.
    pub fn apply_update(&mut self, update: ReserveUpdate) -> bool {
        if update.epoch != self.epoch {
            return false;
        }
        match update.result {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.loaded = true;
                self.rebalance();
            }
            Err(error) => warn!(%error, "liquidity reserve refresh failed; keeping last snapshot"),
        }
        self.sync_phase();
        true
    }

    /// Reads the connected account's LP balance for the current pair.
    pub async fn refresh_position(&mut self) -> Result<(), ExecutionError> {
        let (Some(account), Some(snapshot)) = (&self.account, &self.snapshot) else {
            self.lp_balance = None;
            return Ok(());
        };
        let balance = self.reader.balance_of(&snapshot.pair, account).await?;
        self.lp_balance = Some(TokenAmount(balance));
        Ok(())
    }

    /// Fetches allowances for both deposit tokens and the LP token.
    pub async fn refresh_allowances(&self) -> Result<(), ExecutionError> {
        let Some(account) = &self.account else {
            return Ok(());
        };
        for token in [&self.token_a, &self.token_b].into_iter().flatten() {
            if !token.is_native() {
                self.gate.refresh(&token.address, account).await?;
            }
        }
        if let Some(snapshot) = &self.snapshot {
            self.gate.refresh(&snapshot.pair, account).await?;
        }
        Ok(())
    }

    pub fn phase(&self) -> TxPhase {
        self.lifecycle.phase()
    }

    /// True when the pair exists and has reserves on both sides.
    pub fn pool_exists(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(ReserveSnapshot::has_liquidity)
    }

    /// Oriented reserves for the selected (A, B) token order.
    fn oriented_reserves(&self) -> Option<(TokenAmount, TokenAmount)> {
        let token_a = self.token_a.as_ref()?;
        let snapshot = self.snapshot.as_ref().filter(|s| s.has_liquidity())?;
        Some(snapshot.oriented(&token_a.address))
    }

    /// Both deposit amounts parsed to base units, each positive.
    fn parsed_amounts(&self) -> Option<(primitive_types::U256, primitive_types::U256)> {
        let token_a = self.token_a.as_ref()?;
        let token_b = self.token_b.as_ref()?;
        let amount_a = to_base_units(self.amount_a_text.trim(), token_a.decimals).ok()?;
        let amount_b = to_base_units(self.amount_b_text.trim(), token_b.decimals).ok()?;
        if amount_a.is_zero() || amount_b.is_zero() {
            return None;
        }
        Some((amount_a, amount_b))
    }

    /// The user's position in the current pool, once both the snapshot
    /// and the LP balance have been read.
    pub fn position(&self) -> Option<LiquidityPosition> {
        let (reserve_a, reserve_b) = self.oriented_reserves()?;
        let snapshot = self.snapshot.as_ref()?;
        Some(LiquidityPosition {
            lp_balance: self.lp_balance?,
            total_supply: snapshot.total_supply,
            reserve_a,
            reserve_b,
        })
    }

    /// Withdrawal preview at the current slider percentage.
    pub fn removal_preview(&self) -> Option<RemovalAmounts> {
        let (reserve_a, reserve_b) = self.oriented_reserves()?;
        let snapshot = self.snapshot.as_ref()?;
        removal_amounts(
            self.lp_balance?,
            self.remove_percent,
            snapshot.total_supply,
            reserve_a,
            reserve_b,
        )
        .ok()
    }

    /// Derived add-form state.
    pub async fn add_view(&self) -> LiquidityView {
        let amounts = self.parsed_amounts();
        let (approval_a, approval_b) = self.deposit_approvals(&amounts).await;
        LiquidityView {
            phase: self.lifecycle.phase(),
            loaded: self.loaded,
            pool_exists: self.pool_exists(),
            approval_a,
            approval_b,
            submit: self.add_availability(&amounts, approval_a, approval_b),
        }
    }

    /// Derived remove-form state.
    pub async fn remove_view(&self) -> RemovalView {
        let preview = self.removal_preview();
        let lp_approval = self.lp_approval(&preview).await;
        let (amount_a, amount_b) = match (&preview, &self.token_a, &self.token_b) {
            (Some(p), Some(a), Some(b)) => (
                Some(to_decimal_string(p.amount_a.0, a.decimals)),
                Some(to_decimal_string(p.amount_b.0, b.decimals)),
            ),
            _ => (None, None),
        };
        RemovalView {
            phase: self.lifecycle.phase(),
            percent: self.remove_percent,
            share_percent: self.position().and_then(|p| p.share_percent()),
            lp_approval,
            submit: self.remove_availability(&preview, lp_approval),
            preview,
            amount_a,
            amount_b,
        }
    }

    async fn deposit_approvals(
        &self,
        amounts: &Option<(primitive_types::U256, primitive_types::U256)>,
    ) -> (Approval, Approval) {
        let (Some(account), Some(token_a), Some(token_b), Some((amount_a, amount_b))) =
            (&self.account, &self.token_a, &self.token_b, amounts)
        else {
            return (Approval::Unknown, Approval::Unknown);
        };
        (
            self.gate.check_token(token_a, account, *amount_a).await,
            self.gate.check_token(token_b, account, *amount_b).await,
        )
    }

    async fn lp_approval(&self, preview: &Option<RemovalAmounts>) -> Approval {
        let (Some(account), Some(snapshot), Some(preview)) =
            (&self.account, &self.snapshot, preview)
        else {
            return Approval::Unknown;
        };
        self.gate
            .check_address(&snapshot.pair, account, preview.liquidity.0)
            .await
    }

    fn add_availability(
        &self,
        amounts: &Option<(primitive_types::U256, primitive_types::U256)>,
        approval_a: Approval,
        approval_b: Approval,
    ) -> SubmitAvailability {
        use SubmitAvailability::Disabled;

        if self.lifecycle.phase().is_in_flight() {
            return Disabled("transaction pending");
        }
        if self.account.is_none() {
            return Disabled("connect a wallet");
        }
        if self.token_a.is_none() || self.token_b.is_none() {
            return Disabled("select tokens");
        }
        if self.pair_tokens().is_none() {
            return Disabled("pair unavailable for the native token");
        }
        if !self.loaded {
            return Disabled("loading reserves");
        }
        if amounts.is_none() {
            return Disabled("enter amounts");
        }
        if approval_a == Approval::Unknown || approval_b == Approval::Unknown {
            return Disabled("checking allowance");
        }
        SubmitAvailability::Ready
    }

    fn remove_availability(
        &self,
        preview: &Option<RemovalAmounts>,
        lp_approval: Approval,
    ) -> SubmitAvailability {
        use SubmitAvailability::Disabled;

        if self.lifecycle.phase().is_in_flight() {
            return Disabled("transaction pending");
        }
        if self.account.is_none() {
            return Disabled("connect a wallet");
        }
        if self.pair_tokens().is_none() {
            return Disabled("select tokens");
        }
        if !self.loaded {
            return Disabled("loading reserves");
        }
        if !self.pool_exists() {
            return Disabled("no liquidity");
        }
        if self.lp_balance.is_none() {
            return Disabled("loading position");
        }
        match preview {
            Some(p) if !p.liquidity.is_zero() => {}
            _ => return Disabled("nothing to remove"),
        }
        if lp_approval == Approval::Unknown {
            return Disabled("checking allowance");
        }
        SubmitAvailability::Ready
    }

    /// Approves one deposit token toward the router.
    pub async fn approve_token(&mut self, token: Token) -> Result<Receipt, ExecutionError> {
        if token.is_native() {
            return Err(ExecutionError::IncompleteIntent("nothing to approve"));
        }
        let account = self
            .account
            .clone()
            .ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
        self.run_approval(&token.address, &account).await
    }

    /// Approves the pair's LP token toward the router (needed before
    /// removal).
    pub async fn approve_lp(&mut self) -> Result<Receipt, ExecutionError> {
        let account = self
            .account
            .clone()
            .ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
        let pair = self
            .snapshot
            .as_ref()
            .map(|s| s.pair.clone())
            .ok_or(ExecutionError::IncompleteIntent("no pool selected"))?;
        self.run_approval(&pair, &account).await
    }

    async fn run_approval(
        &mut self,
        token: &Address,
        account: &Address,
    ) -> Result<Receipt, ExecutionError> {
        self.lifecycle.begin_approval()?;
        let intent = approve_intent(token);
        let result = send_intent(&self.client, &self.contracts, &intent).await;
        self.lifecycle.approval_settled();

        match result {
            Ok(receipt) => {
                self.gate.invalidate(token, account).await;
                if let Err(error) = self.gate.refresh(token, account).await {
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

    /// Submits the deposit. A confirmed transaction clears both amount
    /// fields; rejection or revert preserves them.
    pub async fn submit_add(&mut self) -> Result<Receipt, ExecutionError> {
        let amounts = self.parsed_amounts();
        let (approval_a, approval_b) = self.deposit_approvals(&amounts).await;
        if let SubmitAvailability::Disabled(reason) =
            self.add_availability(&amounts, approval_a, approval_b)
        {
            return Err(ExecutionError::IncompleteIntent(reason));
        }
        if approval_a != Approval::NotRequired || approval_b != Approval::NotRequired {
            return Err(ExecutionError::IncompleteIntent("approval required"));
        }
        let (amount_a, amount_b) =
            amounts.ok_or(ExecutionError::IncompleteIntent("enter amounts"))?;

        let intent = add_liquidity_intent(
            self.account.as_ref(),
            self.token_a.as_ref(),
            self.token_b.as_ref(),
            amount_a,
            amount_b,
            self.pool_exists(),
            unix_now(),
        )?;

        self.lifecycle.begin_confirmation()?;
        match send_intent(&self.client, &self.contracts, &intent).await {
            Ok(receipt) => {
                self.lifecycle.confirmed();
                self.amount_a_text.clear();
                self.amount_b_text.clear();
                self.last_edited = None;
                self.invalidate_after_write().await;
                Ok(receipt)
            }
            Err(error) => {
                self.lifecycle.failed();
                self.invalidate_after_write().await;
                warn!(%error, "deposit did not confirm; inputs preserved");
                Err(error.into())
            }
        }
    }

    /// Submits the withdrawal at the current slider percentage.
    pub async fn submit_remove(&mut self) -> Result<Receipt, ExecutionError> {
        let preview = self.removal_preview();
        let lp_approval = self.lp_approval(&preview).await;
        if let SubmitAvailability::Disabled(reason) =
            self.remove_availability(&preview, lp_approval)
        {
            return Err(ExecutionError::IncompleteIntent(reason));
        }
        if lp_approval != Approval::NotRequired {
            return Err(ExecutionError::IncompleteIntent("approval required"));
        }

        let intent = remove_liquidity_intent(
            self.account.as_ref(),
            self.token_a.as_ref(),
            self.token_b.as_ref(),
            preview.as_ref(),
            unix_now(),
        )?;

        self.lifecycle.begin_confirmation()?;
        match send_intent(&self.client, &self.contracts, &intent).await {
            Ok(receipt) => {
                self.lifecycle.confirmed();
                // Position changed on chain; force a re-read before the
                // next preview.
                self.lp_balance = None;
                self.invalidate_after_write().await;
                Ok(receipt)
            }
            Err(error) => {
                self.lifecycle.failed();
                self.invalidate_after_write().await;
                warn!(%error, "withdrawal did not confirm; inputs preserved");
                Err(error.into())
            }
        }
    }

    pub fn amount_a_text(&self) -> &str {
        &self.amount_a_text
    }

    pub fn amount_b_text(&self) -> &str {
        &self.amount_b_text
    }

    /// Recomputes the derived deposit field from the last edited one,
    /// whenever the pool dictates a ratio.
    fn rebalance(&mut self) {
        let Some(edited) = self.last_edited else {
            return;
        };
        let (Some(token_a), Some(token_b)) = (&self.token_a, &self.token_b) else {
            return;
        };
        let Some((reserve_a, reserve_b)) = self.oriented_reserves() else {
            return;
        };

        let (edited_text, edited_decimals, other_decimals, reserve_edited, reserve_other) =
            match edited {
                EditedSide::A => (
                    &self.amount_a_text,
                    token_a.decimals,
                    token_b.decimals,
                    reserve_a,
                    reserve_b,
                ),
                EditedSide::B => (
                    &self.amount_b_text,
                    token_b.decimals,
                    token_a.decimals,
                    reserve_b,
                    reserve_a,
                ),
            };

        let derived = to_base_units(edited_text.trim(), edited_decimals)
            .ok()
            .filter(|v| !v.is_zero())
            .and_then(|amount| {
                matching_deposit(TokenAmount(amount), reserve_edited, reserve_other).ok()
            })
            .map(|amount| to_decimal_string(amount.0, other_decimals))
            .unwrap_or_default();

        match edited {
            EditedSide::A => self.amount_b_text = derived,
            EditedSide::B => self.amount_a_text = derived,
        }
    }

    fn clear_pair_state(&mut self) {
        self.loaded = false;
        self.snapshot = None;
        self.lp_balance = None;
        self.sync_phase();
    }

    async fn invalidate_after_write(&self) {
        let Some(account) = &self.account else {
            return;
        };
        for token in [&self.token_a, &self.token_b].into_iter().flatten() {
            if !token.is_native() {
                self.gate.invalidate(&token.address, account).await;
            }
        }
        if let Some(snapshot) = &self.snapshot {
            self.gate.invalidate(&snapshot.pair, account).await;
        }
    }

    fn sync_phase(&mut self) {
        if self.parsed_amounts().is_some() || self.removal_preview().is_some() {
            self.lifecycle.quoted();
        } else {
            self.lifecycle.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use woosh_chain::contracts::{ROUTER_ADD_LIQUIDITY, ROUTER_REMOVE_LIQUIDITY};
    use woosh_chain::mock::MockChain;
    use woosh_chain::ChainError;
    use woosh_domain::registry::TokenRegistry;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    struct Harness {
        chain: Arc<MockChain>,
        session: LiquiditySession,
        usdc: Token,
        eurc: Token,
        account: Address,
        pair: Address,
    }

    fn harness() -> Harness {
        let chain = Arc::new(MockChain::new());
        let contracts = DexContracts::arc_testnet();
        let reader = Arc::new(PairReader::new(chain.clone(), contracts.clone()));
        let gate = Arc::new(AllowanceGate::new(reader.clone()));
        let session = LiquiditySession::new(chain.clone(), reader, gate, contracts);

        let registry = TokenRegistry::default();
        Harness {
            chain,
            session,
            usdc: registry.by_symbol("USDC").unwrap().clone(),
            eurc: registry.by_symbol("EURC").unwrap().clone(),
            account: addr("0x5A52E96BAcdaBb82fd05763E25335261B270Efcb"),
            pair: addr("0x33d3c9DC1D84613FCc9356353435c35C3c08ea63"),
        }
    }

    fn wired(h: &mut Harness) {
        let (usdc, eurc, account) = (h.usdc.clone(), h.eurc.clone(), h.account.clone());
        h.session.set_account(Some(account));
        h.session.select_token_a(usdc);
        h.session.select_token_b(eurc);
    }

    fn snapshot_update(
        h: &Harness,
        reserve0: U256,
        reserve1: U256,
        total_supply: U256,
    ) -> ReserveUpdate {
        ReserveUpdate {
            epoch: 0,
            token_a: h.usdc.address.clone(),
            token_b: h.eurc.address.clone(),
            result: Ok(Some(ReserveSnapshot {
                pair: h.pair.clone(),
                token0: h.usdc.address.clone(),
                reserve0: reserve0.into(),
                reserve1: reserve1.into(),
                total_supply: total_supply.into(),
                fetched_at: 0,
            })),
        }
    }

    #[tokio::test]
    async fn editing_one_side_derives_the_other() {
        let mut h = harness();
        wired(&mut h);
        // 1:4 pool ratio.
        let r_a = U256::exp10(18) * U256::from(500u64);
        let r_b = U256::exp10(18) * U256::from(2_000u64);
        h.session
            .apply_update(snapshot_update(&h, r_a, r_b, U256::exp10(18)));

        h.session.set_amount_a("10");
        assert_eq!(h.session.amount_b_text(), "40");

        h.session.set_amount_b("100");
        assert_eq!(h.session.amount_a_text(), "25");
    }

    #[tokio::test]
    async fn first_provider_edits_both_sides_freely() {
        let mut h = harness();
        wired(&mut h);
        // Pair lookup settled: the pool does not exist.
        h.session.apply_update(ReserveUpdate {
            epoch: 0,
            token_a: h.usdc.address.clone(),
            token_b: h.eurc.address.clone(),
            result: Ok(None),
        });

        h.session.set_amount_a("10");
        h.session.set_amount_b("7");
        assert_eq!(h.session.amount_a_text(), "10");
        assert_eq!(h.session.amount_b_text(), "7");
        assert!(!h.session.pool_exists());
    }

    #[tokio::test]
    async fn deposit_submits_router_call() {
        let mut h = harness();
        wired(&mut h);
        let contracts = DexContracts::arc_testnet();
        h.chain
            .set_allowance(&contracts, &h.usdc.address, &h.account, U256::MAX);
        h.chain
            .set_allowance(&contracts, &h.eurc.address, &h.account, U256::MAX);
        h.chain
            .set_allowance(&contracts, &h.pair, &h.account, U256::zero());
        let r = U256::exp10(18) * U256::from(1_000u64);
        h.session
            .apply_update(snapshot_update(&h, r, r, U256::exp10(18)));
        h.session.set_amount_a("10");
        h.session.refresh_allowances().await.unwrap();

        let view = h.session.add_view().await;
        assert!(view.submit.is_ready());

        h.session.submit_add().await.unwrap();
        assert_eq!(h.session.phase(), TxPhase::Idle);
        assert!(h.session.amount_a_text().is_empty());
        assert!(h.session.amount_b_text().is_empty());

        let writes = h.chain.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].signature, ROUTER_ADD_LIQUIDITY);
        assert_eq!(writes[0].target, contracts.router);
    }

    #[tokio::test]
    async fn removal_preview_matches_share_math() {
        let mut h = harness();
        wired(&mut h);
        h.session.apply_update(snapshot_update(
            &h,
            U256::from(200u64),
            U256::from(800u64),
            U256::from(1_000u64),
        ));
        h.chain
            .set_balance(&h.pair, &h.account, U256::from(500u64));
        h.session.refresh_position().await.unwrap();
        h.session.set_remove_percent(50);

        let preview = h.session.removal_preview().unwrap();
        assert_eq!(preview.liquidity.0, U256::from(250u64));
        assert_eq!(preview.amount_a.0, U256::from(50u64));
        assert_eq!(preview.amount_b.0, U256::from(200u64));

        let position = h.session.position().unwrap();
        assert_eq!(position.share_percent(), Some(Decimal::from(50u32)));
    }

    #[tokio::test]
    async fn removal_requires_lp_approval() {
        let mut h = harness();
        wired(&mut h);
        let contracts = DexContracts::arc_testnet();
        h.session.apply_update(snapshot_update(
            &h,
            U256::from(200u64),
            U256::from(800u64),
            U256::from(1_000u64),
        ));
        h.chain
            .set_balance(&h.pair, &h.account, U256::from(500u64));
        h.session.refresh_position().await.unwrap();
        h.chain
            .set_allowance(&contracts, &h.usdc.address, &h.account, U256::MAX);
        h.chain
            .set_allowance(&contracts, &h.eurc.address, &h.account, U256::MAX);
        // LP allowance below the 250 LP the slider would burn.
        h.chain
            .set_allowance(&contracts, &h.pair, &h.account, U256::from(100u64));
        h.session.refresh_allowances().await.unwrap();

        let view = h.session.remove_view().await;
        assert_eq!(view.lp_approval, Approval::Required);
        assert!(matches!(
            h.session.submit_remove().await,
            Err(ExecutionError::IncompleteIntent("approval required"))
        ));

        h.chain
            .set_allowance(&contracts, &h.pair, &h.account, U256::MAX);
        h.session.approve_lp().await.unwrap();
        h.session.submit_remove().await.unwrap();

        let writes = h.chain.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].signature, ROUTER_REMOVE_LIQUIDITY);
    }

    #[tokio::test]
    async fn revert_preserves_deposit_inputs() {
        let mut h = harness();
        wired(&mut h);
        let contracts = DexContracts::arc_testnet();
        h.chain
            .set_allowance(&contracts, &h.usdc.address, &h.account, U256::MAX);
        h.chain
            .set_allowance(&contracts, &h.eurc.address, &h.account, U256::MAX);
        h.chain
            .set_allowance(&contracts, &h.pair, &h.account, U256::MAX);
        let r = U256::exp10(18) * U256::from(1_000u64);
        h.session
            .apply_update(snapshot_update(&h, r, r, U256::exp10(18)));
        h.session.set_amount_a("10");
        h.session.refresh_allowances().await.unwrap();
        assert_eq!(h.session.add_view().await.approval_a, Approval::NotRequired);

        h.chain.revert_next_receipt("INSUFFICIENT_B_AMOUNT");
        assert!(matches!(
            h.session.submit_remove().await,
            Err(ExecutionError::IncompleteIntent(_))
        ));
        assert!(matches!(
            h.session.submit_add().await,
            Err(ExecutionError::Chain(ChainError::Reverted(_)))
        ));
        assert_eq!(h.session.amount_a_text(), "10");
        assert_eq!(h.session.phase(), TxPhase::Quoted);

        // The revert also drops the cached allowances for a re-read.
        let view = h.session.add_view().await;
        assert_eq!(view.approval_a, Approval::Unknown);
        assert_eq!(view.approval_b, Approval::Unknown);
        h.session.refresh_allowances().await.unwrap();
        assert_eq!(h.session.add_view().await.approval_a, Approval::NotRequired);
    }

    #[tokio::test]
    async fn duplicate_selection_clears_the_other_side() {
        let mut h = harness();
        wired(&mut h);
        h.session.select_token_b(h.usdc.clone());
        assert!(h.session.token_a.is_none());
        assert_eq!(h.session.token_b.as_ref(), Some(&h.usdc));
    }
}
