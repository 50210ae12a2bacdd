//! Deployed contract addresses and the function signatures the core is
//! allowed to call. Signatures are part of the contract interface and
//! must be used verbatim.

use serde::{Deserialize, Serialize};
use woosh_domain::Address;

// Factory
pub const FACTORY_GET_PAIR: &str = "getPair(address,address)";
pub const FACTORY_ALL_PAIRS: &str = "allPairs(uint256)";
pub const FACTORY_ALL_PAIRS_LENGTH: &str = "allPairsLength()";
pub const FACTORY_CREATE_PAIR: &str = "createPair(address,address)";

// Pair
pub const PAIR_GET_RESERVES: &str = "getReserves()";
pub const PAIR_TOKEN0: &str = "token0()";
pub const PAIR_TOKEN1: &str = "token1()";
pub const PAIR_TOTAL_SUPPLY: &str = "totalSupply()";
pub const PAIR_BALANCE_OF: &str = "balanceOf(address)";

// Router
pub const ROUTER_ADD_LIQUIDITY: &str =
    "addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)";
pub const ROUTER_REMOVE_LIQUIDITY: &str =
    "removeLiquidity(address,address,uint256,uint256,uint256,address,uint256)";
pub const ROUTER_SWAP_EXACT_TOKENS: &str =
    "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)";

// ERC-20
pub const ERC20_BALANCE_OF: &str = "balanceOf(address)";
pub const ERC20_APPROVE: &str = "approve(address,uint256)";
pub const ERC20_ALLOWANCE: &str = "allowance(address,address)";
pub const ERC20_SYMBOL: &str = "symbol()";
pub const ERC20_DECIMALS: &str = "decimals()";

/// The DEX deployment the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexContracts {
    pub factory: Address,
    pub router: Address,
}

impl DexContracts {
    /// The Arc Testnet deployment.
    pub fn arc_testnet() -> Self {
        Self {
            factory: "0x8FA75F65Aa434d87a21435A64B3a54b2F70F9CDD"
                .parse()
                .expect("factory address is valid"),
            router: "0x01426dDCd7CFf512C331e56794A12D955D64c263"
                .parse()
                .expect("router address is valid"),
        }
    }
}
