//! Static token registry for the target network.

use crate::token::Token;
use crate::value_objects::address::Address;

/// The curated token list shipped with the client.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Looks a token up by address, case-insensitively.
    pub fn by_address(&self, address: &Address) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.address == address)
    }

    /// Token matching a symbol. Symbols are not unique (the native
    /// currency and its ERC-20 twin share one); the contract-backed token
    /// wins, since that is the one that can sit in a pair.
    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol == symbol && !t.is_native())
            .or_else(|| self.tokens.iter().find(|t| t.symbol == symbol))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        let parse = |s: &str| s.parse::<Address>().expect("registry address is valid");
        Self::new(vec![
            Token::new(Address::native(), "USDC", "USD Coin (Native)", 18, true),
            Token::new(
                parse("0x3600000000000000000000000000000000000000"),
                "USDC",
                "USD Coin",
                18,
                true,
            ),
            Token::new(
                parse("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a"),
                "EURC",
                "Euro Coin",
                18,
                true,
            ),
            Token::new(
                parse("0xe9185F0c5F296Ed1797AaE4238D26CCaBEadb86C"),
                "USYC",
                "US Yield Coin",
                18,
                true,
            ),
            Token::new(
                parse("0xC5124C846c6e6307986988dFb7e743327aA05F19"),
                "SYN",
                "Synthra",
                18,
                true,
            ),
            Token::new(
                parse("0x911b4000D3422F482F4062a913885f7b035382Df"),
                "WUSDC",
                "Wrapped USDC",
                18,
                true,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = TokenRegistry::default();
        let addr: Address = "0x89b50855aa3be2f677cd6303cec089b5f319d72a".parse().unwrap();
        assert_eq!(registry.by_address(&addr).unwrap().symbol, "EURC");
    }

    #[test]
    fn symbol_lookup_prefers_the_contract_token() {
        let registry = TokenRegistry::default();
        let usdc = registry.by_symbol("USDC").unwrap();
        assert!(!usdc.is_native());
        assert_eq!(
            usdc.address,
            "0x3600000000000000000000000000000000000000".parse().unwrap()
        );
    }

    #[test]
    fn native_token_present() {
        let registry = TokenRegistry::default();
        let native = registry.by_address(&Address::native()).unwrap();
        assert!(native.is_native());
        assert_eq!(native.decimals, 18);
    }
}
