//! Transaction intent building.
//!
//! An intent is the fully resolved argument set for one router or ERC-20
//! write: amounts, slippage-adjusted minimums and the deadline. Intents
//! are created immediately before submission and never persisted.

use crate::allowance::UNLIMITED_ALLOWANCE;
use crate::error::ExecutionError;
use primitive_types::{U256, U512};
use uuid::Uuid;
use woosh_chain::client::CallValue;
use woosh_chain::contracts::{
    DexContracts, ERC20_APPROVE, ROUTER_ADD_LIQUIDITY, ROUTER_REMOVE_LIQUIDITY,
    ROUTER_SWAP_EXACT_TOKENS,
};
use woosh_domain::math::constant_product::SwapQuote;
use woosh_domain::math::liquidity::RemovalAmounts;
use woosh_domain::{Address, BasisPoints, Token};

/// Transaction deadline: 20 minutes from submission. Fixed by design;
/// the UI does not expose it.
pub const DEADLINE_SECS: u64 = 20 * 60;

/// Flat 0.5% minimum-amount protection for add/remove liquidity. This is
/// deliberately independent of the user's swap slippage setting.
pub const LIQUIDITY_PROTECTION_BPS: u32 = 50;

/// Applies a downward tolerance: `amount * (10000 - bps) / 10000`.
/// A tolerance at or beyond 100% floors the minimum at zero.
fn apply_tolerance(amount: U256, bps: u32) -> U256 {
    let factor = U256::from(BasisPoints::MAX.0.saturating_sub(bps));
    // Quotient is <= amount, so the narrowing always succeeds.
    U256::try_from(amount.full_mul(factor) / U512::from(BasisPoints::MAX.0))
        .unwrap_or(amount)
}

/// A fully resolved write operation, ready for the wallet layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIntent {
    pub id: Uuid,
    pub kind: IntentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentKind {
    /// Unlimited ERC-20 (or LP token) approval toward the router.
    Approve { token: Address, amount: U256 },
    Swap {
        amount_in: U256,
        min_amount_out: U256,
        path: Vec<Address>,
        recipient: Address,
        deadline: u64,
    },
    AddLiquidity {
        token_a: Address,
        token_b: Address,
        amount_a_desired: U256,
        amount_b_desired: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        recipient: Address,
        deadline: u64,
    },
    RemoveLiquidity {
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        amount_a_min: U256,
        amount_b_min: U256,
        recipient: Address,
        deadline: u64,
    },
}

impl PendingIntent {
    fn new(kind: IntentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    /// A short label for logging and UI status.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            IntentKind::Approve { .. } => "approve",
            IntentKind::Swap { .. } => "swap",
            IntentKind::AddLiquidity { .. } => "add_liquidity",
            IntentKind::RemoveLiquidity { .. } => "remove_liquidity",
        }
    }

    /// The exact contract call this intent resolves to:
    /// `(target, function signature, arguments)`.
    pub fn as_call(&self, contracts: &DexContracts) -> (Address, &'static str, Vec<CallValue>) {
        match &self.kind {
            IntentKind::Approve { token, amount } => (
                token.clone(),
                ERC20_APPROVE,
                vec![contracts.router.clone().into(), (*amount).into()],
            ),
            IntentKind::Swap {
                amount_in,
                min_amount_out,
                path,
                recipient,
                deadline,
            } => (
                contracts.router.clone(),
                ROUTER_SWAP_EXACT_TOKENS,
                vec![
                    (*amount_in).into(),
                    (*min_amount_out).into(),
                    CallValue::AddressArray(path.clone()),
                    recipient.clone().into(),
                    U256::from(*deadline).into(),
                ],
            ),
            IntentKind::AddLiquidity {
                token_a,
                token_b,
                amount_a_desired,
                amount_b_desired,
                amount_a_min,
                amount_b_min,
                recipient,
                deadline,
            } => (
                contracts.router.clone(),
                ROUTER_ADD_LIQUIDITY,
                vec![
                    token_a.clone().into(),
                    token_b.clone().into(),
                    (*amount_a_desired).into(),
                    (*amount_b_desired).into(),
                    (*amount_a_min).into(),
                    (*amount_b_min).into(),
                    recipient.clone().into(),
                    U256::from(*deadline).into(),
                ],
            ),
            IntentKind::RemoveLiquidity {
                token_a,
                token_b,
                liquidity,
                amount_a_min,
                amount_b_min,
                recipient,
                deadline,
            } => (
                contracts.router.clone(),
                ROUTER_REMOVE_LIQUIDITY,
                vec![
                    token_a.clone().into(),
                    token_b.clone().into(),
                    (*liquidity).into(),
                    (*amount_a_min).into(),
                    (*amount_b_min).into(),
                    recipient.clone().into(),
                    U256::from(*deadline).into(),
                ],
            ),
        }
    }
}

/// Unlimited approval for a token (or LP pair) toward the router.
pub fn approve_intent(token: &Address) -> PendingIntent {
    PendingIntent::new(IntentKind::Approve {
        token: token.clone(),
        amount: UNLIMITED_ALLOWANCE,
    })
}

/// Builds a swap intent from a quote, applying the user's slippage
/// tolerance to the quoted output.
pub fn swap_intent(
    account: Option<&Address>,
    token_in: Option<&Token>,
    token_out: Option<&Token>,
    quote: Option<&SwapQuote>,
    slippage: BasisPoints,
    now_unix: u64,
) -> Result<PendingIntent, ExecutionError> {
    let account = account.ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
    let token_in = token_in.ok_or(ExecutionError::IncompleteIntent("input token not selected"))?;
    let token_out =
        token_out.ok_or(ExecutionError::IncompleteIntent("output token not selected"))?;
    let quote = quote.ok_or(ExecutionError::IncompleteIntent("no quote available"))?;
    if quote.amount_in.is_zero() {
        return Err(ExecutionError::IncompleteIntent("amount is zero"));
    }

    let min_amount_out = apply_tolerance(quote.amount_out.0, slippage.0);
    Ok(PendingIntent::new(IntentKind::Swap {
        amount_in: quote.amount_in.0,
        min_amount_out,
        path: vec![token_in.address.clone(), token_out.address.clone()],
        recipient: account.clone(),
        deadline: now_unix + DEADLINE_SECS,
    }))
}

/// Builds an add-liquidity intent. When the pool does not exist yet the
/// minimums are zero: the first deposit sets the ratio and there is no
/// existing price to protect.
#[allow(clippy::too_many_arguments)]
pub fn add_liquidity_intent(
    account: Option<&Address>,
    token_a: Option<&Token>,
    token_b: Option<&Token>,
    amount_a: U256,
    amount_b: U256,
    pool_exists: bool,
    now_unix: u64,
) -> Result<PendingIntent, ExecutionError> {
    let account = account.ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
    let token_a = token_a.ok_or(ExecutionError::IncompleteIntent("token A not selected"))?;
    let token_b = token_b.ok_or(ExecutionError::IncompleteIntent("token B not selected"))?;
    if amount_a.is_zero() || amount_b.is_zero() {
        return Err(ExecutionError::IncompleteIntent("amount is zero"));
    }

    let (amount_a_min, amount_b_min) = if pool_exists {
        (
            apply_tolerance(amount_a, LIQUIDITY_PROTECTION_BPS),
            apply_tolerance(amount_b, LIQUIDITY_PROTECTION_BPS),
        )
    } else {
        (U256::zero(), U256::zero())
    };

    Ok(PendingIntent::new(IntentKind::AddLiquidity {
        token_a: token_a.address.clone(),
        token_b: token_b.address.clone(),
        amount_a_desired: amount_a,
        amount_b_desired: amount_b,
        amount_a_min,
        amount_b_min,
        recipient: account.clone(),
        deadline: now_unix + DEADLINE_SECS,
    }))
}

/// Builds a remove-liquidity intent from computed withdrawal amounts.
pub fn remove_liquidity_intent(
    account: Option<&Address>,
    token_a: Option<&Token>,
    token_b: Option<&Token>,
    removal: Option<&RemovalAmounts>,
    now_unix: u64,
) -> Result<PendingIntent, ExecutionError> {
    let account = account.ok_or(ExecutionError::IncompleteIntent("no connected account"))?;
    let token_a = token_a.ok_or(ExecutionError::IncompleteIntent("token A not selected"))?;
    let token_b = token_b.ok_or(ExecutionError::IncompleteIntent("token B not selected"))?;
    let removal = removal.ok_or(ExecutionError::IncompleteIntent("no removal quoted"))?;
    if removal.liquidity.is_zero() {
        return Err(ExecutionError::IncompleteIntent("nothing to remove"));
    }

    Ok(PendingIntent::new(IntentKind::RemoveLiquidity {
        token_a: token_a.address.clone(),
        token_b: token_b.address.clone(),
        liquidity: removal.liquidity.0,
        amount_a_min: apply_tolerance(removal.amount_a.0, LIQUIDITY_PROTECTION_BPS),
        amount_b_min: apply_tolerance(removal.amount_b.0, LIQUIDITY_PROTECTION_BPS),
        recipient: account.clone(),
        deadline: now_unix + DEADLINE_SECS,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use woosh_domain::TokenAmount;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn token(address: &str, symbol: &str) -> Token {
        Token::new(addr(address), symbol, symbol, 18, true)
    }

    fn fixture() -> (Address, Token, Token, SwapQuote) {
        (
            addr("0x5A52E96BAcdaBb82fd05763E25335261B270Efcb"),
            token("0x3600000000000000000000000000000000000000", "USDC"),
            token("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a", "EURC"),
            SwapQuote {
                amount_in: TokenAmount::from(1_000u64),
                amount_out: TokenAmount::from(10_000u64),
                impact_bps: 9,
            },
        )
    }

    #[test]
    fn swap_applies_slippage_to_quoted_output() {
        let (account, usdc, eurc, quote) = fixture();
        let intent = swap_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            Some(&quote),
            BasisPoints(50),
            1_000,
        )
        .unwrap();

        let IntentKind::Swap {
            min_amount_out,
            deadline,
            ref path,
            ..
        } = intent.kind
        else {
            panic!("expected swap intent");
        };
        // 10_000 * 9950 / 10000 = 9950.
        assert_eq!(min_amount_out, U256::from(9_950u64));
        assert_eq!(deadline, 1_000 + DEADLINE_SECS);
        assert_eq!(path, &[usdc.address.clone(), eurc.address.clone()]);
    }

    #[test]
    fn overrange_slippage_floors_the_minimum_at_zero() {
        let (account, usdc, eurc, quote) = fixture();
        let intent = swap_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            Some(&quote),
            BasisPoints(15_000),
            0,
        )
        .unwrap();

        let IntentKind::Swap { min_amount_out, .. } = intent.kind else {
            panic!("expected swap intent");
        };
        assert_eq!(min_amount_out, U256::zero());
    }

    #[test]
    fn swap_requires_every_input() {
        let (account, usdc, eurc, quote) = fixture();
        assert!(matches!(
            swap_intent(None, Some(&usdc), Some(&eurc), Some(&quote), BasisPoints(50), 0),
            Err(ExecutionError::IncompleteIntent(_))
        ));
        assert!(matches!(
            swap_intent(Some(&account), None, Some(&eurc), Some(&quote), BasisPoints(50), 0),
            Err(ExecutionError::IncompleteIntent(_))
        ));
        assert!(matches!(
            swap_intent(Some(&account), Some(&usdc), Some(&eurc), None, BasisPoints(50), 0),
            Err(ExecutionError::IncompleteIntent(_))
        ));
    }

    #[test]
    fn add_liquidity_mins_are_protected_or_zero() {
        let (account, usdc, eurc, _) = fixture();
        let existing = add_liquidity_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            U256::from(10_000u64),
            U256::from(40_000u64),
            true,
            0,
        )
        .unwrap();
        let IntentKind::AddLiquidity {
            amount_a_min,
            amount_b_min,
            ..
        } = existing.kind
        else {
            panic!("expected add intent");
        };
        assert_eq!(amount_a_min, U256::from(9_950u64));
        assert_eq!(amount_b_min, U256::from(39_800u64));

        // First provider: no ratio to protect, zero minimums.
        let first = add_liquidity_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            U256::from(10_000u64),
            U256::from(40_000u64),
            false,
            0,
        )
        .unwrap();
        let IntentKind::AddLiquidity {
            amount_a_min,
            amount_b_min,
            ..
        } = first.kind
        else {
            panic!("expected add intent");
        };
        assert!(amount_a_min.is_zero());
        assert!(amount_b_min.is_zero());
    }

    #[test]
    fn remove_liquidity_protects_both_sides() {
        let (account, usdc, eurc, _) = fixture();
        let removal = RemovalAmounts {
            liquidity: TokenAmount::from(250u64),
            amount_a: TokenAmount::from(10_000u64),
            amount_b: TokenAmount::from(2_000u64),
        };
        let intent = remove_liquidity_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            Some(&removal),
            500,
        )
        .unwrap();
        let IntentKind::RemoveLiquidity {
            liquidity,
            amount_a_min,
            amount_b_min,
            deadline,
            ..
        } = intent.kind
        else {
            panic!("expected remove intent");
        };
        assert_eq!(liquidity, U256::from(250u64));
        assert_eq!(amount_a_min, U256::from(9_950u64));
        assert_eq!(amount_b_min, U256::from(1_990u64));
        assert_eq!(deadline, 500 + DEADLINE_SECS);
    }

    #[test]
    fn approve_requests_unlimited() {
        let token = addr("0x3600000000000000000000000000000000000000");
        let intent = approve_intent(&token);
        let contracts = DexContracts::arc_testnet();
        let (target, signature, args) = intent.as_call(&contracts);
        assert_eq!(target, token);
        assert_eq!(signature, ERC20_APPROVE);
        assert_eq!(args[0], contracts.router.clone().into());
        assert_eq!(args[1], UNLIMITED_ALLOWANCE.into());
    }

    #[test]
    fn swap_call_signature_and_argument_order() {
        let (account, usdc, eurc, quote) = fixture();
        let intent = swap_intent(
            Some(&account),
            Some(&usdc),
            Some(&eurc),
            Some(&quote),
            BasisPoints::ZERO,
            0,
        )
        .unwrap();
        let contracts = DexContracts::arc_testnet();
        let (target, signature, args) = intent.as_call(&contracts);
        assert_eq!(target, contracts.router);
        assert_eq!(
            signature,
            "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)"
        );
        assert_eq!(args.len(), 5);
        // Zero slippage: minimum equals the quoted output exactly.
        assert_eq!(args[1], U256::from(10_000u64).into());
    }
}
