use crate::commands::common::{self, CliPasswordPrompt};
use crate::{print_error, print_info, print_success, SigningModeArg, SwapArgs};
use colored::*;
use serde_json::Value;
use shoal_client::{
    Execution, NodeClient, SigningKeySource, SwapError, SwapProvider, WalletClient,
};
use shoal_core::command::SwapDirection;
use shoal_core::{token_by_symbol, SettingsHandle, SwapLeg};
use shoal_crypto::keypair_from_secret;
use std::path::Path;

/// Every failure of a swap attempt is absorbed here: printed, recorded
/// on the provider's flags, never propagated further.
pub async fn handle(
    args: SwapArgs,
    node_override: Option<String>,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let token0 = token_by_symbol(&args.from).ok_or_else(|| format!("Unknown token: {}", args.from))?;
    let token1 = token_by_symbol(&args.to).ok_or_else(|| format!("Unknown token: {}", args.to))?;
    let t0 = SwapLeg::new(token0, args.from_amount);
    let t1 = SwapLeg::new(token1, args.to_amount);
    let direction = if args.exact_out {
        SwapDirection::ExactOut
    } else {
        SwapDirection::ExactIn
    };

    let wallet_file = common::load_wallet(&args.wallet, config_dir)?;
    let settings = SettingsHandle::new(common::load_settings(config_dir));
    let node = NodeClient::new(common::node_config(node_override));
    let agent = WalletClient::new(&args.agent);
    let mut provider = SwapProvider::new(node, agent, settings, &wallet_file.public_key);

    print_info(&format!(
        "Swapping {} {} for {} {} ({})...",
        args.from_amount,
        token0.symbol,
        args.to_amount,
        token1.symbol,
        if args.exact_out { "exact out" } else { "exact in" }
    ));

    let result = match args.mode {
        SigningModeArg::Direct => {
            let key = SigningKeySource::Encrypted(wallet_file.encrypted_key.clone());
            match key.resolve(&CliPasswordPrompt) {
                Ok(secret) => match keypair_from_secret(&secret) {
                    Ok(keypair) => {
                        let execution = if args.commit {
                            Execution::Send
                        } else {
                            Execution::Local
                        };
                        provider
                            .swap_direct(&t0, &t1, direction, keypair, execution)
                            .await
                    }
                    Err(e) => Err(SwapError::Crypto(e)),
                },
                Err(e) => Err(e),
            }
        }
        SigningModeArg::Sponsored => {
            let key = SigningKeySource::Encrypted(wallet_file.encrypted_key.clone());
            provider
                .swap_sponsored(&t0, &t1, direction, &key, &CliPasswordPrompt)
                .await
        }
        SigningModeArg::Wallet => {
            print_info("Waiting for wallet authorization...");
            provider.swap_wallet(&t0, &t1, direction).await
        }
    };

    match result {
        Ok(value) => print_node_response(&value, &provider),
        Err(SwapError::Wallet(failure)) => {
            print_error(&format!("{}: {}", failure.title(), failure.message()));
        }
        Err(e) => print_error(&format!("Swap failed: {}", e)),
    }

    Ok(())
}

fn print_node_response(value: &Value, provider: &SwapProvider) {
    if let Some(keys) = value.get("requestKeys").and_then(|k| k.as_array()) {
        println!();
        print_success("Swap submitted!");
        for key in keys {
            println!(
                "  {} {}",
                "Request Key:".bold(),
                key.as_str().unwrap_or("?").green()
            );
        }
        return;
    }

    if value["result"]["status"] == "success" {
        println!();
        print_success("Swap simulation succeeded!");
        println!("  {} {}", "Result:".bold(), value["result"]["data"]);
        if let Some(cmd) = provider.last_cmd() {
            println!(
                "  {} {}",
                "Request Key:".bold(),
                cmd["hash"].as_str().unwrap_or("?").dimmed()
            );
        }
    } else {
        let detail = value["result"]["error"]["message"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| value["result"].to_string());
        print_error(&format!("Swap rejected by the node: {}", detail));
    }
}
