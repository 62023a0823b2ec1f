//! Swap command assembly and submission.
//!
//! One builder, three signing modes. Every attempt follows the same
//! sequence: snapshot the settings, resolve the pair's settlement
//! account, compute the truncated and slippage-bounded amounts, build
//! the exec command, sign it (locally or via the wallet agent), and
//! submit. Any step failing short-circuits the rest of the attempt;
//! nothing is retried and partial state is simply not acted upon.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use shoal_core::command::{
    swap_code, Capability, ExecCmd, ExecData, ExecPayload, Keyset, SignedCmd, Signer, SigningMode,
    SwapDirection, TxMeta,
};
use shoal_core::{
    creation_time, exact_amount, max_input, min_output, SettingsHandle, SwapLeg, SwapSettings,
    GAS_STATION_ACCOUNT,
};
use shoal_crypto::{account_for, keypair_from_secret, KeyPair, SECRET_KEY_HEX_LEN};

use crate::wallet::{SigningRequest, WalletCap};
use crate::{NodeClient, PasswordPrompt, SigningKeySource, SwapError, WalletClient, WalletFailure};

/// Whether a locally signed command is simulated or committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Simulate via `/api/v1/local`; returns result + status.
    Local,
    /// Commit via `/api/v1/send`; returns the request key.
    Send,
}

/// Submission-path state machine of the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPhase {
    Idle,
    Building,
    AwaitingAuthorization,
    Submitted,
    Succeeded,
    Failed,
}

/// The four request amounts, already truncated to token precision.
struct SwapAmounts {
    exact0: Decimal,
    exact1: Decimal,
    with_slip0: Decimal,
    with_slip1: Decimal,
}

fn swap_amounts(
    token0: &SwapLeg,
    token1: &SwapLeg,
    slippage: Decimal,
) -> Result<SwapAmounts, SwapError> {
    Ok(SwapAmounts {
        exact0: exact_amount(token0.amount, token0.token.precision)?,
        exact1: exact_amount(token1.amount, token1.token.precision)?,
        // input side is bounded above, output side below
        with_slip0: max_input(token0.amount, slippage, token0.token.precision)?,
        with_slip1: min_output(token1.amount, slippage, token1.token.precision)?,
    })
}

impl SwapAmounts {
    /// Amount the TRANSFER capability authorizes: the exact input for
    /// exact-in, the slippage-bounded maximum input for exact-out.
    fn transfer_amount(&self, direction: SwapDirection) -> Decimal {
        if direction.is_exact_in() {
            self.exact0
        } else {
            self.with_slip0
        }
    }

    fn env_data(&self, public_key: &str) -> Result<Map<String, Value>, SwapError> {
        let mut data = Map::new();
        data.insert(
            "user-ks".to_string(),
            serde_json::to_value(Keyset::single(public_key))?,
        );
        data.insert(
            "token0Amount".to_string(),
            Value::String(self.exact0.to_string()),
        );
        data.insert(
            "token1Amount".to_string(),
            Value::String(self.exact1.to_string()),
        );
        data.insert(
            "token0AmountWithSlippage".to_string(),
            Value::String(self.with_slip0.to_string()),
        );
        data.insert(
            "token1AmountWithSlippage".to_string(),
            Value::String(self.with_slip1.to_string()),
        );
        Ok(data)
    }
}

/// Builds, signs, and submits swap commands; tracks the UI-facing
/// status of the last attempt.
pub struct SwapProvider {
    node: NodeClient,
    wallet: WalletClient,
    settings: SettingsHandle,
    account: String,
    public_key: String,
    phase: SwapPhase,
    awaiting_wallet_auth: bool,
    wallet_success: bool,
    wallet_error: Option<WalletFailure>,
    last_cmd: Option<Value>,
    last_result: Option<Value>,
}

impl SwapProvider {
    pub fn new(
        node: NodeClient,
        wallet: WalletClient,
        settings: SettingsHandle,
        public_key: &str,
    ) -> Self {
        Self {
            node,
            wallet,
            settings,
            account: account_for(public_key),
            public_key: public_key.to_string(),
            phase: SwapPhase::Idle,
            awaiting_wallet_auth: false,
            wallet_success: false,
            wallet_error: None,
            last_cmd: None,
            last_result: None,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    pub fn awaiting_wallet_auth(&self) -> bool {
        self.awaiting_wallet_auth
    }

    pub fn wallet_success(&self) -> bool {
        self.wallet_success
    }

    pub fn wallet_error(&self) -> Option<&WalletFailure> {
        self.wallet_error.as_ref()
    }

    /// Last submitted envelope, for observability. Overwritten per attempt.
    pub fn last_cmd(&self) -> Option<&Value> {
        self.last_cmd.as_ref()
    }

    /// Last node response. Overwritten per attempt.
    pub fn last_result(&self) -> Option<&Value> {
        self.last_result.as_ref()
    }

    /// Resolve the pair's settlement account. Absence means failure.
    pub async fn pair_account(&self, token0: &SwapLeg, token1: &SwapLeg) -> Option<String> {
        self.node
            .pair_account(token0.token.address, token1.token.address)
            .await
    }

    /// Direct-key swap: the session's raw keypair signs, the user
    /// account pays gas. `execution` picks simulate vs commit.
    pub async fn swap_direct(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
        keypair: KeyPair,
        execution: Execution,
    ) -> Result<Value, SwapError> {
        self.begin();
        let result = self
            .signed_attempt(
                token0,
                token1,
                direction,
                SigningMode::DirectKey { keypair },
                execution,
            )
            .await;
        self.finish(result)
    }

    /// Sponsored-gas swap: resolve the signing key (possibly through
    /// the password prompt), then simulate with the gas station paying
    /// fees. A decrypted key of the wrong length fails the attempt
    /// before any network traffic.
    pub async fn swap_sponsored(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
        key: &SigningKeySource,
        prompt: &dyn PasswordPrompt,
    ) -> Result<Value, SwapError> {
        self.begin();
        let result = self
            .sponsored_attempt(token0, token1, direction, key, prompt)
            .await;
        self.finish(result)
    }

    async fn sponsored_attempt(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
        key: &SigningKeySource,
        prompt: &dyn PasswordPrompt,
    ) -> Result<Value, SwapError> {
        let secret = key.resolve(prompt)?;
        if secret.len() != SECRET_KEY_HEX_LEN {
            return Err(SwapError::InvalidKeyLength(secret.len()));
        }
        let keypair = keypair_from_secret(&secret)?;
        self.signed_attempt(
            token0,
            token1,
            direction,
            SigningMode::SponsoredGas { keypair },
            Execution::Local,
        )
        .await
    }

    /// Wallet-delegated swap: the external agent signs interactively,
    /// then the signed command is simulated on the node.
    pub async fn swap_wallet(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
    ) -> Result<Value, SwapError> {
        self.begin();
        let result = self.wallet_attempt(token0, token1, direction).await;
        self.awaiting_wallet_auth = false;
        if let Err(SwapError::Wallet(failure)) = &result {
            self.wallet_error = Some(failure.clone());
        }
        self.finish(result)
    }

    async fn wallet_attempt(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
    ) -> Result<Value, SwapError> {
        let settings = self.settings.snapshot();
        let pair = self
            .pair_account(token0, token1)
            .await
            .ok_or(SwapError::PairUnavailable)?;

        let amounts = swap_amounts(token0, token1, settings.slippage)?;
        let config = self.node.config();
        let request = SigningRequest {
            code: swap_code(
                direction,
                token0.token.address,
                token1.token.address,
                &self.account,
            ),
            caps: vec![
                WalletCap::new("Gas Station", "free gas", Capability::gas_payer()),
                WalletCap::new(
                    "Transfer",
                    "transfer token in",
                    Capability::transfer(
                        token0.token.address,
                        &self.account,
                        &pair,
                        amounts.transfer_amount(direction),
                    ),
                ),
            ],
            sender: GAS_STATION_ACCOUNT.to_string(),
            gas_limit: config.gas_limit,
            gas_price: config.gas_price,
            chain_id: config.chain_id.clone(),
            ttl: settings.ttl_secs,
            env_data: amounts.env_data(&self.public_key)?,
            signing_pub_key: self.public_key.clone(),
            network_id: config.network_id.clone(),
        };

        self.phase = SwapPhase::AwaitingAuthorization;
        self.awaiting_wallet_auth = true;
        let signed = self.wallet.sign(&request).await;
        self.awaiting_wallet_auth = false;
        let envelope = signed.map_err(SwapError::Wallet)?;
        self.wallet_success = true;

        self.last_cmd = Some(serde_json::to_value(&envelope)?);
        self.phase = SwapPhase::Submitted;
        self.node.local(&envelope).await
    }

    async fn signed_attempt(
        &mut self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
        mode: SigningMode,
        execution: Execution,
    ) -> Result<Value, SwapError> {
        let settings = self.settings.snapshot();
        let ct = creation_time();
        let pair = self
            .pair_account(token0, token1)
            .await
            .ok_or(SwapError::PairUnavailable)?;

        let cmd = self.build_swap_cmd(token0, token1, direction, &mode, &pair, settings, ct)?;
        let canonical = cmd.to_canonical_json()?;
        let envelope = match &mode {
            SigningMode::DirectKey { keypair } | SigningMode::SponsoredGas { keypair } => {
                SignedCmd::signed(canonical, keypair)?
            }
            SigningMode::WalletDelegated { .. } => {
                return Err(SwapError::Wallet(WalletFailure::Rejected(
                    "wallet-delegated signing goes through swap_wallet".to_string(),
                )))
            }
        };

        self.last_cmd = Some(serde_json::to_value(&envelope)?);
        self.phase = SwapPhase::Submitted;
        match execution {
            Execution::Local => self.node.local(&envelope).await,
            Execution::Send => self.node.send(std::slice::from_ref(&envelope)).await,
        }
    }

    /// Assemble the exec command for any signing mode. Deterministic
    /// for fixed inputs and a pinned creation time.
    pub fn build_swap_cmd(
        &self,
        token0: &SwapLeg,
        token1: &SwapLeg,
        direction: SwapDirection,
        mode: &SigningMode,
        pair_account: &str,
        settings: SwapSettings,
        creation_time: u64,
    ) -> Result<ExecCmd, SwapError> {
        let amounts = swap_amounts(token0, token1, settings.slippage)?;

        let mut clist = Vec::new();
        if mode.sponsored() {
            clist.push(Capability::gas_payer());
        }
        clist.push(Capability::transfer(
            token0.token.address,
            &self.account,
            pair_account,
            amounts.transfer_amount(direction),
        ));

        let config = self.node.config();
        Ok(ExecCmd {
            network_id: config.network_id.clone(),
            payload: ExecPayload {
                exec: ExecData {
                    data: amounts.env_data(&self.public_key)?,
                    code: swap_code(
                        direction,
                        token0.token.address,
                        token1.token.address,
                        &self.account,
                    ),
                },
            },
            signers: vec![Signer {
                pub_key: mode.public_key().to_string(),
                clist,
            }],
            meta: TxMeta::new(
                &mode.sender(&self.account),
                &config.chain_id,
                creation_time,
                settings.ttl_secs,
            ),
            nonce: creation_time.to_string(),
        })
    }

    fn begin(&mut self) {
        self.phase = SwapPhase::Building;
        self.awaiting_wallet_auth = false;
        self.wallet_success = false;
        self.wallet_error = None;
        self.last_result = None;
    }

    fn finish(&mut self, result: Result<Value, SwapError>) -> Result<Value, SwapError> {
        match &result {
            Ok(value) => {
                self.last_result = Some(value.clone());
                let succeeded = if value.get("result").is_some() {
                    value["result"]["status"] == "success"
                } else {
                    value.get("requestKeys").is_some()
                };
                self.phase = if succeeded {
                    SwapPhase::Succeeded
                } else {
                    SwapPhase::Failed
                };
            }
            Err(_) => self.phase = SwapPhase::Failed,
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shoal_core::{token_by_symbol, NodeConfig};
    use shoal_crypto::generate_keypair;

    fn provider() -> (SwapProvider, KeyPair) {
        let kp = generate_keypair();
        let node = NodeClient::new(NodeConfig::new(
            "testnet01",
            "0",
            // closed port: any accidental network use fails fast
            Some("http://127.0.0.1:9/pact".into()),
        ));
        let provider = SwapProvider::new(
            node,
            WalletClient::new("http://127.0.0.1:9"),
            SettingsHandle::default(),
            &kp.public_key,
        );
        (provider, kp)
    }

    fn legs() -> (SwapLeg, SwapLeg) {
        (
            SwapLeg::new(token_by_symbol("SHL").unwrap(), dec!(100)),
            SwapLeg::new(token_by_symbol("sUSD").unwrap(), dec!(250.5)),
        )
    }

    #[test]
    fn test_build_is_deterministic_for_pinned_creation_time() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let mode = SigningMode::SponsoredGas { keypair: kp };
        let settings = provider.settings.snapshot();

        let first = provider
            .build_swap_cmd(&t0, &t1, SwapDirection::ExactIn, &mode, "pair-acct", settings, 1_700_000_000)
            .unwrap();
        let second = provider
            .build_swap_cmd(&t0, &t1, SwapDirection::ExactIn, &mode, "pair-acct", settings, 1_700_000_000)
            .unwrap();
        assert_eq!(
            first.to_canonical_json().unwrap(),
            second.to_canonical_json().unwrap()
        );
    }

    #[test]
    fn test_env_data_carries_all_four_amounts() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let mode = SigningMode::SponsoredGas { keypair: kp };
        let cmd = provider
            .build_swap_cmd(
                &t0,
                &t1,
                SwapDirection::ExactIn,
                &mode,
                "pair-acct",
                SwapSettings {
                    slippage: dec!(0.01),
                    ttl_secs: 600,
                },
                1_700_000_000,
            )
            .unwrap();

        let data = &cmd.payload.exec.data;
        assert_eq!(data["token0Amount"], "100");
        assert_eq!(data["token1Amount"], "250.5");
        // sUSD precision is 6: 250.5 * 0.99 = 247.995
        assert_eq!(data["token1AmountWithSlippage"], "247.995");
        // SHL precision is 12: 100 * 1.01 = 101
        assert_eq!(data["token0AmountWithSlippage"], "101.00");
        assert_eq!(data["user-ks"]["pred"], "keys-all");
    }

    #[test]
    fn test_direct_mode_caps_and_sender() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let settings = provider.settings.snapshot();
        let mode = SigningMode::DirectKey { keypair: kp };
        let cmd = provider
            .build_swap_cmd(&t0, &t1, SwapDirection::ExactIn, &mode, "pair-acct", settings, 1)
            .unwrap();

        let clist = &cmd.signers[0].clist;
        assert_eq!(clist.len(), 1);
        assert_eq!(clist[0].name, "coin.TRANSFER");
        assert_eq!(cmd.meta.sender, provider.account());
    }

    #[test]
    fn test_sponsored_mode_adds_gas_cap_and_station_sender() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let settings = provider.settings.snapshot();
        let mode = SigningMode::SponsoredGas { keypair: kp };
        let cmd = provider
            .build_swap_cmd(&t0, &t1, SwapDirection::ExactIn, &mode, "pair-acct", settings, 1)
            .unwrap();

        let clist = &cmd.signers[0].clist;
        assert_eq!(clist.len(), 2);
        assert_eq!(clist[0].name, "shoal.gas-station.GAS_PAYER");
        assert_eq!(clist[1].name, "coin.TRANSFER");
        assert_eq!(cmd.meta.sender, GAS_STATION_ACCOUNT);
        assert_eq!(cmd.meta.ttl, 600);
    }

    #[test]
    fn test_exact_out_transfer_amount_is_slippage_bounded() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let mode = SigningMode::DirectKey { keypair: kp };
        let cmd = provider
            .build_swap_cmd(
                &t0,
                &t1,
                SwapDirection::ExactOut,
                &mode,
                "pair-acct",
                SwapSettings {
                    slippage: dec!(0.01),
                    ttl_secs: 600,
                },
                1,
            )
            .unwrap();

        let transfer = &cmd.signers[0].clist[0];
        assert_eq!(transfer.args[2], serde_json::json!("101.00"));
        assert!(cmd.payload.exec.code.starts_with("(shoal.exchange.swap-exact-out"));
    }

    #[test]
    fn test_settings_snapshot_isolates_inflight_builds() {
        let (provider, kp) = provider();
        let (t0, t1) = legs();
        let mode = SigningMode::SponsoredGas { keypair: kp };

        let snapshot = provider.settings.snapshot();
        provider.settings.set_slippage(dec!(0.01));

        // the old snapshot still builds with the old slippage
        let stale = provider
            .build_swap_cmd(&t0, &t1, SwapDirection::ExactIn, &mode, "p", snapshot, 1)
            .unwrap();
        assert_eq!(stale.payload.exec.data["token1AmountWithSlippage"], "249.2475");

        let fresh = provider
            .build_swap_cmd(
                &t0,
                &t1,
                SwapDirection::ExactIn,
                &mode,
                "p",
                provider.settings.snapshot(),
                1,
            )
            .unwrap();
        assert_eq!(fresh.payload.exec.data["token1AmountWithSlippage"], "247.995");
    }

    #[tokio::test]
    async fn test_short_decrypted_key_fails_before_network() {
        let (mut provider, _) = provider();
        let (t0, t1) = legs();

        struct NoPrompt;
        impl PasswordPrompt for NoPrompt {
            fn password(&self) -> Result<String, String> {
                Ok("irrelevant".to_string())
            }
        }

        // 8 hex chars instead of 64: the sentinel fires before the
        // (unreachable) node would have produced PairUnavailable.
        let key = SigningKeySource::Raw("deadbeef".to_string());
        let result = provider
            .swap_sponsored(&t0, &t1, SwapDirection::ExactIn, &key, &NoPrompt)
            .await;
        assert!(matches!(result, Err(SwapError::InvalidKeyLength(8))));
        assert_eq!(provider.phase(), SwapPhase::Failed);
        assert!(provider.last_cmd().is_none());
    }

    #[tokio::test]
    async fn test_encrypted_short_key_fails_with_sentinel() {
        let (mut provider, _) = provider();
        let (t0, t1) = legs();

        struct FixedPrompt;
        impl PasswordPrompt for FixedPrompt {
            fn password(&self) -> Result<String, String> {
                Ok("hunter2hunter2".to_string())
            }
        }

        let enc = shoal_crypto::encrypt_private_key("deadbeef", "hunter2hunter2").unwrap();
        let key = SigningKeySource::Encrypted(enc);
        let result = provider
            .swap_sponsored(&t0, &t1, SwapDirection::ExactIn, &key, &FixedPrompt)
            .await;
        assert!(matches!(result, Err(SwapError::InvalidKeyLength(8))));
    }

    #[tokio::test]
    async fn test_unreachable_node_yields_pair_unavailable() {
        let (mut provider, kp) = provider();
        let (t0, t1) = legs();
        let result = provider
            .swap_direct(&t0, &t1, SwapDirection::ExactIn, kp, Execution::Local)
            .await;
        assert!(matches!(result, Err(SwapError::PairUnavailable)));
        assert_eq!(provider.phase(), SwapPhase::Failed);
    }
}
