use crate::commands::common;
use crate::{print_error, print_info};
use colored::*;
use shoal_client::NodeClient;
use shoal_core::token_by_symbol;

pub async fn handle(
    token0: &str,
    token1: &str,
    node_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let t0 = token_by_symbol(token0).ok_or_else(|| format!("Unknown token: {}", token0))?;
    let t1 = token_by_symbol(token1).ok_or_else(|| format!("Unknown token: {}", token1))?;

    print_info(&format!("Resolving pair {} / {}...", t0.symbol, t1.symbol));

    let client = NodeClient::new(common::node_config(node_override));
    match client.pair_account(t0.address, t1.address).await {
        Some(account) => {
            println!();
            println!("{}", "Trading Pair".cyan().bold());
            println!("{}", "─".repeat(50));
            println!("  {} {} / {}", "Pair:".bold(), t0.symbol.green(), t1.symbol.green());
            println!("  {} {}", "Settlement Account:".bold(), account.yellow());
        }
        None => {
            print_error(&format!(
                "Pair {} / {} could not be resolved. Is the node reachable?",
                t0.symbol, t1.symbol
            ));
        }
    }

    Ok(())
}
