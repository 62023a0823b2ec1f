//! Chain-node exec API client.
//!
//! Two logical operations: `local` (simulate, returns result + status)
//! and `send` (commit, returns request keys). Successful HTTP
//! responses are JSON; anything outside 2xx is read back as plain text
//! and surfaced in the error.

use serde_json::{json, Value};

use shoal_core::command::{pair_account_code, ExecCmd, ExecData, ExecPayload, SignedCmd, TxMeta};
use shoal_core::{creation_time, NodeConfig};

use crate::SwapError;

pub struct NodeClient {
    http: reqwest::Client,
    config: NodeConfig,
}

impl NodeClient {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    fn local_url(&self) -> String {
        format!("{}/api/v1/local", self.config.endpoint)
    }

    fn send_url(&self) -> String {
        format!("{}/api/v1/send", self.config.endpoint)
    }

    /// Simulate a command. The node answers
    /// `{"result": {"status": "success" | "failure", "data": ...}}`.
    pub async fn local(&self, cmd: &SignedCmd) -> Result<Value, SwapError> {
        let resp = self.http.post(self.local_url()).json(cmd).send().await?;
        parse_response(resp).await
    }

    /// Commit one or more commands. The node answers the request keys.
    pub async fn send(&self, cmds: &[SignedCmd]) -> Result<Value, SwapError> {
        let resp = self
            .http
            .post(self.send_url())
            .json(&json!({ "cmds": cmds }))
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Resolve the settlement account of a trading pair with a
    /// read-only local query. Any failure is logged and yields no
    /// result — the caller treats absence as failure.
    pub async fn pair_account(&self, token0: &str, token1: &str) -> Option<String> {
        let cmd = self.pair_lookup_cmd(token0, token1)?;
        let envelope = SignedCmd::unsigned(cmd);

        match self.local(&envelope).await {
            Ok(value) => {
                if value["result"]["status"] == "success" {
                    value["result"]["data"].as_str().map(|s| s.to_string())
                } else {
                    log::warn!(
                        "pair lookup for {}/{} rejected: {}",
                        token0,
                        token1,
                        value["result"]["error"]
                    );
                    None
                }
            }
            Err(e) => {
                log::warn!("pair lookup for {}/{} failed: {}", token0, token1, e);
                None
            }
        }
    }

    fn pair_lookup_cmd(&self, token0: &str, token1: &str) -> Option<String> {
        let ct = creation_time();
        let cmd = ExecCmd {
            network_id: self.config.network_id.clone(),
            payload: ExecPayload {
                exec: ExecData {
                    data: serde_json::Map::new(),
                    code: pair_account_code(token0, token1),
                },
            },
            signers: Vec::new(),
            meta: TxMeta::new("", &self.config.chain_id, ct, shoal_core::DEFAULT_TTL_SECS),
            nonce: ct.to_string(),
        };
        match cmd.to_canonical_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("pair lookup command failed to serialize: {}", e);
                None
            }
        }
    }
}

/// 2xx bodies parse as JSON; anything else is plain text.
async fn parse_response(resp: reqwest::Response) -> Result<Value, SwapError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json().await?)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(SwapError::Node {
            status: status.as_u16(),
            body,
        })
    }
}
