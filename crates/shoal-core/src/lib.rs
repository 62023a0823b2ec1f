// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SHOAL - CORE MODULE
//
// Client-side primitives for the on-chain exchange: token metadata,
// decimal amount truncation and slippage bounds, transaction settings,
// and the exec-command wire model submitted to a chain node.
// All amount arithmetic uses fixed-precision decimals (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{SystemTime, UNIX_EPOCH};

pub mod amounts;
pub mod command;
pub mod config;
pub mod settings;
pub mod tokens;

pub use amounts::{exact_amount, max_input, min_output, truncate, AmountError};
pub use command::{
    Capability, ExecCmd, ExecData, ExecPayload, Keyset, SigEntry, SignedCmd, Signer, SigningMode,
    SwapDirection, TxMeta,
};
pub use config::NodeConfig;
pub use settings::{SettingsHandle, SwapSettings, SLIPPAGE_PRESETS};
pub use tokens::{token_by_address, token_by_symbol, SwapLeg, TokenInfo, TOKENS};

/// Gas price attached to every exchange command (in native coin units).
pub const GAS_PRICE: f64 = 0.000_000_000_001;

/// Gas limit for a swap or pair-lookup command.
pub const GAS_LIMIT: u64 = 3000;

/// Creation-time skew subtracted from the wall clock so a command is
/// never rejected as "from the future" by a node whose clock lags ours.
pub const CLOCK_SKEW_SECS: u64 = 10;

/// Default command ttl (10 minutes).
pub const DEFAULT_TTL_SECS: u64 = 600;

/// On-chain exchange module. Swap and pair entry points live under it.
pub const EXCHANGE_MODULE: &str = "shoal.exchange";

/// Gas-station capability granted on sponsored-gas swaps.
pub const GAS_STATION_CAP: &str = "shoal.gas-station.GAS_PAYER";

/// Sender account used when the gas station pays fees.
pub const GAS_STATION_ACCOUNT: &str = "shoal-free-gas";

/// Command creation time: wall clock minus [`CLOCK_SKEW_SECS`].
/// The effective deadline of a command is `creation_time() + ttl`.
pub fn creation_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .saturating_sub(CLOCK_SKEW_SECS)
}
