//! External wallet signing agent client.
//!
//! The agent is an injected, browser-level signer reachable on a local
//! HTTP endpoint. One call: `sign(request)`. It either returns a fully
//! signed command or fails — and the failure is classified into
//! exactly two user-facing cases: the agent was unreachable ("No
//! Wallet"), or it declined / produced an invalid signature ("Wallet
//! Signing Failure").

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shoal_core::command::{Capability, SignedCmd};

/// Default signing endpoint exposed by the desktop wallet agent.
pub const DEFAULT_WALLET_ENDPOINT: &str = "http://127.0.0.1:9467";

/// The two user-facing wallet failure classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletFailure {
    /// Transport failure reaching the agent.
    Unavailable,
    /// The agent answered but declined or returned garbage.
    Rejected(String),
}

impl WalletFailure {
    pub fn title(&self) -> &'static str {
        match self {
            WalletFailure::Unavailable => "No Wallet",
            WalletFailure::Rejected(_) => "Wallet Signing Failure",
        }
    }

    pub fn message(&self) -> String {
        match self {
            WalletFailure::Unavailable => {
                "Please make sure you open and login to your wallet.".to_string()
            }
            WalletFailure::Rejected(detail) => format!(
                "You cancelled the transaction or did not sign it correctly. \
                 Make sure you sign with the keys of the linked account. ({})",
                detail
            ),
        }
    }
}

impl std::fmt::Display for WalletFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl std::error::Error for WalletFailure {}

/// Classify a transport-failure text. Connection-level markers mean
/// the agent was never reached; everything else is a signing failure.
pub fn classify_wallet_failure(detail: &str) -> WalletFailure {
    let lowered = detail.to_lowercase();
    const UNREACHABLE_MARKERS: &[&str] = &[
        "failed to fetch",
        "error sending request",
        "connection refused",
        "connect error",
        "dns error",
    ];
    if UNREACHABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
        WalletFailure::Unavailable
    } else {
        WalletFailure::Rejected(detail.to_string())
    }
}

/// A capability presented to the wallet for interactive approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletCap {
    pub role: String,
    pub description: String,
    pub cap: Capability,
}

impl WalletCap {
    pub fn new(role: &str, description: &str, cap: Capability) -> Self {
        Self {
            role: role.to_string(),
            description: description.to_string(),
            cap,
        }
    }
}

/// Unsigned signing request handed to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub code: String,
    pub caps: Vec<WalletCap>,
    pub sender: String,
    pub gas_limit: u64,
    pub gas_price: f64,
    pub chain_id: String,
    pub ttl: u64,
    pub env_data: Map<String, Value>,
    pub signing_pub_key: String,
    pub network_id: String,
}

pub struct WalletClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for WalletClient {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET_ENDPOINT)
    }
}

impl WalletClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn sign_url(&self) -> String {
        format!("{}/v1/sign", self.endpoint)
    }

    /// Hand the request to the agent for interactive signing. The user
    /// approves (or declines) inside the wallet; this resolves when
    /// they do.
    pub async fn sign(&self, request: &SigningRequest) -> Result<SignedCmd, WalletFailure> {
        let resp = self
            .http
            .post(self.sign_url())
            .json(request)
            .send()
            .await
            .map_err(|e| classify_wallet_failure(&e.to_string()))?;

        if !resp.status().is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(WalletFailure::Rejected(detail));
        }

        let value: Value = resp
            .json()
            .await
            .map_err(|e| WalletFailure::Rejected(e.to_string()))?;
        serde_json::from_value(value["body"].clone())
            .map_err(|_| WalletFailure::Rejected("malformed signing response".to_string()))
    }
}
