//! Static token metadata table.
//!
//! Every token the exchange front end can trade, keyed by display
//! symbol. `address` is the on-chain module implementing the token's
//! fungible interface; `precision` is the fixed number of decimal
//! places its ledger representation supports. All amounts must be
//! truncated to `precision` before they enter a request.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    /// On-chain module path, e.g. `coin` or `shoal.tokens.prl`.
    pub address: &'static str,
    /// Ledger decimal precision for this token.
    pub precision: u32,
}

/// Tokens known to the front end. The native coin lives at `coin`;
/// everything else is a module under the `shoal.tokens` namespace.
pub const TOKENS: &[TokenInfo] = &[
    TokenInfo {
        symbol: "SHL",
        name: "Shoal Coin",
        address: "coin",
        precision: 12,
    },
    TokenInfo {
        symbol: "sUSD",
        name: "Shoal Dollar",
        address: "shoal.tokens.susd",
        precision: 6,
    },
    TokenInfo {
        symbol: "FLN",
        name: "Flounder",
        address: "shoal.tokens.fln",
        precision: 12,
    },
    TokenInfo {
        symbol: "PRL",
        name: "Pearl",
        address: "shoal.tokens.prl",
        precision: 8,
    },
];

/// Look up a token by its display symbol (case-sensitive).
pub fn token_by_symbol(symbol: &str) -> Option<&'static TokenInfo> {
    TOKENS.iter().find(|t| t.symbol == symbol)
}

/// Look up a token by its on-chain module address.
pub fn token_by_address(address: &str) -> Option<&'static TokenInfo> {
    TOKENS.iter().find(|t| t.address == address)
}

/// One side of a trading pair: a token plus its quoted display amount.
#[derive(Debug, Clone)]
pub struct SwapLeg {
    pub token: &'static TokenInfo,
    pub amount: Decimal,
}

impl SwapLeg {
    pub fn new(token: &'static TokenInfo, amount: Decimal) -> Self {
        Self { token, amount }
    }
}
