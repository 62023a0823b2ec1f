//! Exec-command wire model.
//!
//! A command is built as a serde struct tree, serialized once into its
//! canonical JSON string, hashed into a request key, and signed over
//! the hash. The node consumes the `{hash, sigs, cmd}` envelope on
//! `/api/v1/local` and a `{cmds: [...]}` batch on `/api/v1/send`.
//!
//! Amounts are serialized as decimal strings (`"247.995"`): the chain
//! reads them back through `read-decimal`, and the string form keeps
//! payloads byte-stable across platforms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use shoal_crypto::{sign_command, CryptoError, KeyPair};

use crate::{EXCHANGE_MODULE, GAS_STATION_ACCOUNT, GAS_STATION_CAP};

/// Swap direction: which side's amount is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Input amount fixed; output bounded below by slippage.
    ExactIn,
    /// Output amount fixed; input bounded above by slippage.
    ExactOut,
}

impl SwapDirection {
    pub fn is_exact_in(&self) -> bool {
        matches!(self, SwapDirection::ExactIn)
    }
}

/// How a swap command gets its signature.
pub enum SigningMode {
    /// Raw session keypair signs locally; the user account pays gas.
    DirectKey { keypair: KeyPair },
    /// Resolved (possibly just decrypted) keypair signs locally; the
    /// gas station pays fees and a GAS_PAYER grant is attached.
    SponsoredGas { keypair: KeyPair },
    /// An external wallet agent signs interactively; only the public
    /// key is known here.
    WalletDelegated { public_key: String },
}

impl SigningMode {
    pub fn public_key(&self) -> &str {
        match self {
            SigningMode::DirectKey { keypair } | SigningMode::SponsoredGas { keypair } => {
                &keypair.public_key
            }
            SigningMode::WalletDelegated { public_key } => public_key,
        }
    }

    /// Whether the capability list carries the gas-station grant.
    pub fn sponsored(&self) -> bool {
        !matches!(self, SigningMode::DirectKey { .. })
    }

    /// The `meta.sender` account: the user pays for direct-key swaps,
    /// the gas station for everything else.
    pub fn sender(&self, user_account: &str) -> String {
        if self.sponsored() {
            GAS_STATION_ACCOUNT.to_string()
        } else {
            user_account.to_string()
        }
    }
}

/// A single authorization grant attached to a signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub args: Vec<Value>,
}

impl Capability {
    /// `<token>.TRANSFER(from, to, amount)` — authorizes moving the
    /// already-truncated amount from the user to the pair account.
    pub fn transfer(token_address: &str, from: &str, to: &str, amount: Decimal) -> Self {
        Self {
            name: format!("{}.TRANSFER", token_address),
            args: vec![
                Value::String(from.to_string()),
                Value::String(to.to_string()),
                Value::String(amount.to_string()),
            ],
        }
    }

    /// Gas-station grant letting the sponsor account pay fees.
    pub fn gas_payer() -> Self {
        Self {
            name: GAS_STATION_CAP.to_string(),
            args: vec![json!("free-gas"), json!({"int": 1}), json!(1.0)],
        }
    }
}

/// Single-key keyset guarding the user's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyset {
    pub keys: Vec<String>,
    pub pred: String,
}

impl Keyset {
    pub fn single(public_key: &str) -> Self {
        Self {
            keys: vec![public_key.to_string()],
            pred: "keys-all".to_string(),
        }
    }
}

/// Command metadata. `creation_time + ttl` is the effective deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxMeta {
    pub creation_time: u64,
    pub ttl: u64,
    pub gas_limit: u64,
    pub chain_id: String,
    pub gas_price: f64,
    pub sender: String,
}

impl TxMeta {
    pub fn new(sender: &str, chain_id: &str, creation_time: u64, ttl: u64) -> Self {
        Self {
            creation_time,
            ttl,
            gas_limit: crate::GAS_LIMIT,
            chain_id: chain_id.to_string(),
            gas_price: crate::GAS_PRICE,
            sender: sender.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signer {
    #[serde(rename = "pubKey")]
    pub pub_key: String,
    pub clist: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecData {
    pub data: Map<String, Value>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub exec: ExecData,
}

/// The full exec command, serialized once into its canonical string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecCmd {
    #[serde(rename = "networkId")]
    pub network_id: String,
    pub payload: ExecPayload,
    pub signers: Vec<Signer>,
    pub meta: TxMeta,
    pub nonce: String,
}

impl ExecCmd {
    /// The canonical JSON string: what gets hashed and signed.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigEntry {
    pub sig: String,
}

/// Submission envelope: request key, signatures, canonical command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedCmd {
    pub hash: String,
    pub sigs: Vec<SigEntry>,
    pub cmd: String,
}

impl SignedCmd {
    /// Unsigned envelope — accepted by `local` for read-only queries.
    pub fn unsigned(cmd: String) -> Self {
        Self {
            hash: shoal_crypto::request_key(&cmd),
            sigs: Vec::new(),
            cmd,
        }
    }

    /// Sign the canonical command with a local keypair.
    pub fn signed(cmd: String, keypair: &KeyPair) -> Result<Self, CryptoError> {
        let signed = sign_command(&cmd, &keypair.secret_key)?;
        Ok(Self {
            hash: signed.request_key,
            sigs: vec![SigEntry { sig: signed.sig }],
            cmd,
        })
    }
}

/// Swap entry point call for one direction. Reads its amounts back out
/// of the command's env data, so the code string itself carries only
/// the pair, the account, and the keyset reference.
pub fn swap_code(
    direction: SwapDirection,
    token0_address: &str,
    token1_address: &str,
    account: &str,
) -> String {
    match direction {
        SwapDirection::ExactIn => format!(
            "({}.swap-exact-in (read-decimal 'token0Amount) (read-decimal 'token1AmountWithSlippage) [{} {}] \"{}\" \"{}\" (read-keyset 'user-ks))",
            EXCHANGE_MODULE, token0_address, token1_address, account, account
        ),
        SwapDirection::ExactOut => format!(
            "({}.swap-exact-out (read-decimal 'token1Amount) (read-decimal 'token0AmountWithSlippage) [{} {}] \"{}\" \"{}\" (read-keyset 'user-ks))",
            EXCHANGE_MODULE, token0_address, token1_address, account, account
        ),
    }
}

/// Read-only pair lookup: the settlement account of a pair.
pub fn pair_account_code(token0_address: &str, token1_address: &str) -> String {
    format!(
        "(at 'account ({}.get-pair {} {}))",
        EXCHANGE_MODULE, token0_address, token1_address
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shoal_crypto::generate_keypair;

    #[test]
    fn test_transfer_cap_shape() {
        let cap = Capability::transfer("coin", "k:aa", "pair-acct", dec!(12.5));
        assert_eq!(cap.name, "coin.TRANSFER");
        assert_eq!(cap.args[0], json!("k:aa"));
        assert_eq!(cap.args[1], json!("pair-acct"));
        assert_eq!(cap.args[2], json!("12.5"));
    }

    #[test]
    fn test_gas_payer_cap_shape() {
        let cap = Capability::gas_payer();
        assert_eq!(cap.name, "shoal.gas-station.GAS_PAYER");
        assert_eq!(cap.args, vec![json!("free-gas"), json!({"int": 1}), json!(1.0)]);
    }

    #[test]
    fn test_signing_mode_sender() {
        let kp = generate_keypair();
        let direct = SigningMode::DirectKey {
            keypair: kp.clone(),
        };
        assert_eq!(direct.sender("k:user"), "k:user");
        assert!(!direct.sponsored());

        let sponsored = SigningMode::SponsoredGas { keypair: kp };
        assert_eq!(sponsored.sender("k:user"), GAS_STATION_ACCOUNT);
        assert!(sponsored.sponsored());

        let wallet = SigningMode::WalletDelegated {
            public_key: "ab".into(),
        };
        assert_eq!(wallet.sender("k:user"), GAS_STATION_ACCOUNT);
        assert!(wallet.sponsored());
        assert_eq!(wallet.public_key(), "ab");
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = TxMeta::new("k:user", "0", 1_700_000_000, 600);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["creationTime"], json!(1_700_000_000u64));
        assert_eq!(value["ttl"], json!(600));
        assert_eq!(value["gasLimit"], json!(crate::GAS_LIMIT));
        assert_eq!(value["chainId"], json!("0"));
        assert_eq!(value["sender"], json!("k:user"));
    }

    #[test]
    fn test_swap_code_directions() {
        let code_in = swap_code(SwapDirection::ExactIn, "coin", "shoal.tokens.prl", "k:aa");
        assert!(code_in.starts_with("(shoal.exchange.swap-exact-in"));
        assert!(code_in.contains("[coin shoal.tokens.prl]"));
        assert!(code_in.contains("\"k:aa\" \"k:aa\""));
        assert!(code_in.contains("'token1AmountWithSlippage"));

        let code_out = swap_code(SwapDirection::ExactOut, "coin", "shoal.tokens.prl", "k:aa");
        assert!(code_out.starts_with("(shoal.exchange.swap-exact-out"));
        assert!(code_out.contains("'token0AmountWithSlippage"));
    }

    #[test]
    fn test_pair_account_code() {
        assert_eq!(
            pair_account_code("coin", "shoal.tokens.prl"),
            "(at 'account (shoal.exchange.get-pair coin shoal.tokens.prl))"
        );
    }

    #[test]
    fn test_canonical_json_is_stable() {
        let cmd = ExecCmd {
            network_id: "testnet01".into(),
            payload: ExecPayload {
                exec: ExecData {
                    data: Map::new(),
                    code: "(+ 1 2)".into(),
                },
            },
            signers: vec![Signer {
                pub_key: "ab".into(),
                clist: vec![Capability::gas_payer()],
            }],
            meta: TxMeta::new("k:user", "0", 1_700_000_000, 600),
            nonce: "1700000000".into(),
        };
        let first = cmd.to_canonical_json().unwrap();
        let second = cmd.to_canonical_json().unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("{\"networkId\":\"testnet01\""));
        assert!(first.contains("\"pubKey\":\"ab\""));
    }

    #[test]
    fn test_signed_envelope_verifies() {
        let kp = generate_keypair();
        let cmd = "{\"networkId\":\"testnet01\"}".to_string();
        let envelope = SignedCmd::signed(cmd.clone(), &kp).unwrap();
        assert_eq!(envelope.hash, shoal_crypto::request_key(&cmd));
        assert_eq!(envelope.sigs.len(), 1);
        assert!(
            shoal_crypto::verify_command(&cmd, &envelope.sigs[0].sig, &kp.public_key).is_ok()
        );

        let unsigned = SignedCmd::unsigned(cmd.clone());
        assert!(unsigned.sigs.is_empty());
        assert_eq!(unsigned.hash, envelope.hash);
    }
}
