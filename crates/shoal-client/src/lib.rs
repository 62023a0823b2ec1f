// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SHOAL - CLIENT MODULE
//
// Async HTTP plumbing for the exchange front end: the chain-node exec
// API client, the external wallet signing agent client, and the swap
// provider that assembles, signs, and submits exchange commands under
// one of three signing modes.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod node;
pub mod prompt;
pub mod swap;
pub mod wallet;

pub use node::NodeClient;
pub use prompt::{PasswordPrompt, SigningKeySource};
pub use swap::{Execution, SwapPhase, SwapProvider};
pub use wallet::{classify_wallet_failure, SigningRequest, WalletCap, WalletClient, WalletFailure};

use shoal_core::AmountError;
use shoal_crypto::CryptoError;

/// Everything that can end a swap attempt. Failures never propagate
/// past the provider: the CLI (or any other caller) observes them at
/// the attempt boundary and the provider's status flags record them.
#[derive(Debug)]
pub enum SwapError {
    /// A decrypted signing key was not 64 hex chars. Raised before any
    /// network traffic — the validation sentinel of the sponsored path.
    InvalidKeyLength(usize),
    /// Amount computation rejected an input (non-positive result).
    Amount(AmountError),
    /// The pair settlement account could not be resolved.
    PairUnavailable,
    /// Transport-level failure talking to the node.
    Http(reqwest::Error),
    /// The node answered outside 2xx; body is the plain response text.
    Node { status: u16, body: String },
    /// The password prompt collaborator failed or was dismissed.
    Prompt(String),
    /// Key handling or signing failed.
    Crypto(CryptoError),
    /// The wallet agent path failed, already classified for display.
    Wallet(WalletFailure),
    /// Command serialization failed.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for SwapError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SwapError::InvalidKeyLength(len) => {
                write!(f, "Decrypted key has invalid length {} (expected 64)", len)
            }
            SwapError::Amount(e) => write!(f, "Amount error: {}", e),
            SwapError::PairUnavailable => write!(f, "Pair account could not be resolved"),
            SwapError::Http(e) => write!(f, "Network error: {}", e),
            SwapError::Node { status, body } => {
                write!(f, "Node returned HTTP {}: {}", status, body)
            }
            SwapError::Prompt(msg) => write!(f, "Password prompt failed: {}", msg),
            SwapError::Crypto(e) => write!(f, "Crypto error: {}", e),
            SwapError::Wallet(failure) => write!(f, "{}: {}", failure.title(), failure.message()),
            SwapError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for SwapError {}

impl From<AmountError> for SwapError {
    fn from(e: AmountError) -> Self {
        SwapError::Amount(e)
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(e: reqwest::Error) -> Self {
        SwapError::Http(e)
    }
}

impl From<CryptoError> for SwapError {
    fn from(e: CryptoError) -> Self {
        SwapError::Crypto(e)
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(e: serde_json::Error) -> Self {
        SwapError::Serialize(e)
    }
}

impl From<WalletFailure> for SwapError {
    fn from(e: WalletFailure) -> Self {
        SwapError::Wallet(e)
    }
}
