// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SHOAL CLI - Command Line Interface for the Exchange Front End
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "shoal-cli")]
#[command(about = "Shoal CLI - Token Swaps & Wallet Management", long_about = None)]
#[command(version)]
struct Cli {
    /// Node exec API base URL (reads SHOAL_NODE_URL env var, or
    /// defaults to the public testnet endpoint)
    #[arg(short, long, env = "SHOAL_NODE_URL")]
    node: Option<String>,

    /// Config directory (default: ~/.shoal)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet management
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Transaction settings (slippage tolerance, deadline)
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    /// Look up the settlement account of a trading pair
    Pair {
        /// First token symbol
        token0: String,
        /// Second token symbol
        token1: String,
    },

    /// Execute a token swap
    Swap(SwapArgs),
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create new wallet
    New {
        /// Wallet name
        #[arg(short, long)]
        name: String,
    },

    /// List all wallets
    List,

    /// Export wallet (encrypted)
    Export {
        /// Wallet name
        name: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import wallet
    Import {
        /// Input file path
        input: PathBuf,

        /// Wallet name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,

    /// Update settings (validated, persisted explicitly)
    Set {
        /// Slippage tolerance in percent, 0-100 (e.g. 0.5)
        #[arg(long)]
        slippage: Option<Decimal>,

        /// Transaction deadline in minutes
        #[arg(long)]
        deadline: Option<u64>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SigningModeArg {
    /// Sign with the wallet's decrypted key; user account pays gas
    Direct,
    /// Sign with the wallet's decrypted key; gas station pays fees
    Sponsored,
    /// Delegate signing to the external wallet agent
    Wallet,
}

#[derive(Args)]
struct SwapArgs {
    /// Token to sell (symbol)
    #[arg(long)]
    from: String,

    /// Token to buy (symbol)
    #[arg(long)]
    to: String,

    /// Amount of the sell side
    #[arg(long)]
    from_amount: Decimal,

    /// Quoted amount of the buy side
    #[arg(long)]
    to_amount: Decimal,

    /// Fix the output amount instead of the input
    #[arg(long)]
    exact_out: bool,

    /// How the command gets signed
    #[arg(long, value_enum, default_value_t = SigningModeArg::Sponsored)]
    mode: SigningModeArg,

    /// Commit via send instead of simulating (direct mode only)
    #[arg(long)]
    commit: bool,

    /// Wallet name holding the signing key
    #[arg(short, long)]
    wallet: String,

    /// Wallet agent signing endpoint
    #[arg(
        long,
        env = "SHOAL_WALLET_AGENT",
        default_value = shoal_client::wallet::DEFAULT_WALLET_ENDPOINT
    )]
    agent: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config_dir = commands::common::config_dir(cli.config_dir.clone());

    let result = match cli.command {
        Commands::Wallet { action } => commands::wallet::handle(action, &config_dir),
        Commands::Settings { action } => commands::settings::handle(action, &config_dir),
        Commands::Pair { token0, token1 } => {
            commands::pair::handle(&token0, &token1, cli.node).await
        }
        Commands::Swap(args) => commands::swap::handle(args, cli.node, &config_dir).await,
    };

    if let Err(e) = result {
        print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

// Colored output helpers
#[allow(dead_code)]
fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

#[allow(dead_code)]
fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

#[allow(dead_code)]
fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_wallet_new() {
        let cli = Cli::try_parse_from(["shoal-cli", "wallet", "new", "--name", "test_wallet"]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Wallet {
                action: WalletCommands::New { name },
            } => assert_eq!(name, "test_wallet"),
            _ => panic!("Expected Wallet::New"),
        }
    }

    #[test]
    fn test_cli_wallet_list() {
        let cli = Cli::try_parse_from(["shoal-cli", "wallet", "list"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Wallet {
                action: WalletCommands::List,
            } => {}
            _ => panic!("Expected Wallet::List"),
        }
    }

    #[test]
    fn test_cli_settings_set_slippage() {
        let cli = Cli::try_parse_from(["shoal-cli", "settings", "set", "--slippage", "0.5"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Settings {
                action: SettingsCommands::Set { slippage, deadline },
            } => {
                assert_eq!(slippage, Some("0.5".parse().unwrap()));
                assert_eq!(deadline, None);
            }
            _ => panic!("Expected Settings::Set"),
        }
    }

    #[test]
    fn test_cli_settings_set_deadline() {
        let cli = Cli::try_parse_from(["shoal-cli", "settings", "set", "--deadline", "10"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Settings {
                action: SettingsCommands::Set { slippage, deadline },
            } => {
                assert_eq!(slippage, None);
                assert_eq!(deadline, Some(10));
            }
            _ => panic!("Expected Settings::Set"),
        }
    }

    #[test]
    fn test_cli_pair() {
        let cli = Cli::try_parse_from(["shoal-cli", "pair", "SHL", "sUSD"]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Pair { token0, token1 } => {
                assert_eq!(token0, "SHL");
                assert_eq!(token1, "sUSD");
            }
            _ => panic!("Expected Pair"),
        }
    }

    #[test]
    fn test_cli_swap_defaults_to_sponsored_exact_in() {
        let cli = Cli::try_parse_from([
            "shoal-cli",
            "swap",
            "--from",
            "SHL",
            "--to",
            "sUSD",
            "--from-amount",
            "100",
            "--to-amount",
            "250.5",
            "--wallet",
            "w1",
        ]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Swap(args) => {
                assert_eq!(args.from, "SHL");
                assert_eq!(args.to, "sUSD");
                assert_eq!(args.from_amount, "100".parse().unwrap());
                assert!(!args.exact_out);
                assert!(!args.commit);
                assert!(args.mode == SigningModeArg::Sponsored);
                assert_eq!(args.agent, shoal_client::wallet::DEFAULT_WALLET_ENDPOINT);
            }
            _ => panic!("Expected Swap"),
        }
    }

    #[test]
    fn test_cli_swap_wallet_mode() {
        let cli = Cli::try_parse_from([
            "shoal-cli",
            "swap",
            "--from",
            "SHL",
            "--to",
            "PRL",
            "--from-amount",
            "1.5",
            "--to-amount",
            "30",
            "--exact-out",
            "--mode",
            "wallet",
            "--wallet",
            "w1",
        ]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Swap(args) => {
                assert!(args.exact_out);
                assert!(args.mode == SigningModeArg::Wallet);
            }
            _ => panic!("Expected Swap"),
        }
    }
}
