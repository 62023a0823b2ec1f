use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use shoal_client::PasswordPrompt;
use shoal_core::{NodeConfig, SwapSettings};
use shoal_crypto::EncryptedKey;

/// Resolve the config directory: CLI override, else `~/.shoal`.
pub fn config_dir(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shoal")
    })
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

/// Settings from disk, or the defaults when none were saved yet.
pub fn load_settings(config_dir: &Path) -> SwapSettings {
    let path = settings_path(config_dir);
    if path.exists() {
        SwapSettings::load_from_file(&path).unwrap_or_default()
    } else {
        SwapSettings::default()
    }
}

/// Node config from the environment, endpoint overridden by `--node`.
pub fn node_config(node_override: Option<String>) -> NodeConfig {
    let mut config = NodeConfig::from_env();
    if let Some(endpoint) = node_override {
        config.endpoint = endpoint;
    }
    config
}

/// On-disk wallet file: `{config_dir}/wallets/{name}.json`.
#[derive(Serialize, Deserialize)]
pub struct WalletFile {
    pub name: String,
    pub account: String,
    pub public_key: String,
    pub encrypted_key: EncryptedKey,
    pub created_at: u64,
}

pub fn wallet_path(name: &str, config_dir: &Path) -> PathBuf {
    config_dir.join("wallets").join(format!("{}.json", name))
}

pub fn load_wallet(name: &str, config_dir: &Path) -> Result<WalletFile, Box<dyn std::error::Error>> {
    let wallet_file = wallet_path(name, config_dir);
    if !wallet_file.exists() {
        return Err(format!(
            "Wallet '{}' not found at {}",
            name,
            wallet_file.display()
        )
        .into());
    }
    let data = std::fs::read_to_string(&wallet_file)?;
    let wallet: WalletFile = serde_json::from_str(&data)?;
    Ok(wallet)
}

/// Password from env var (for automation/scripting) or interactive prompt.
pub fn resolve_password(prompt_text: &str) -> Result<String, String> {
    match std::env::var("SHOAL_WALLET_PASSWORD") {
        Ok(p) if !p.is_empty() => Ok(p),
        _ => rpassword::prompt_password(prompt_text).map_err(|e| e.to_string()),
    }
}

/// The interactive password collaborator handed to the swap provider.
pub struct CliPasswordPrompt;

impl PasswordPrompt for CliPasswordPrompt {
    fn password(&self) -> Result<String, String> {
        resolve_password("Enter wallet password: ")
    }
}
