//! TipLink CLI - create, fund and claim TipLinks, and run email escrows

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod vault;


use commands::*;

#[derive(Parser)]
#[command(name = "tiplink")]
#[command(version = "0.1.0")]
#[command(about = "TipLink for Solana - send crypto with a link")]
#[command(long_about = r#"
A TipLink is a URL that holds a Solana wallet. Whoever has the link
owns what is sent to it, so a link can be shared like cash.

Quick Start:
  1. tiplink create --save               Make a new link
  2. tiplink fund <LINK> --amount 0.1    Put SOL on it
  3. tiplink claim <LINK> --to <ADDR>    Sweep it as the recipient

Escrow TipLinks park funds until the emailed recipient claims them:
  tiplink escrow deposit --to-email friend@example.com --amount 0.1
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Solana RPC URL
    #[arg(
        long,
        global = true,
        env = "TIPLINK_RPC_URL",
        default_value = "https://api.mainnet-beta.solana.com"
    )]
    rpc_url: String,

    /// Path to keypair file
    #[arg(long, global = true, env = "TIPLINK_KEYPAIR")]
    keypair: Option<String>,

    /// Path to a JSON TipLink configuration file
    #[arg(long, global = true, env = "TIPLINK_CONFIG")]
    config: Option<String>,

    /// Log library activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new TipLink
    Create {
        /// Link version (0 = legacy 12-byte secret, 1 = 16-byte secret)
        #[arg(long, default_value_t = 0)]
        link_version: u8,

        /// Store the link in the encrypted vault
        #[arg(short, long)]
        save: bool,
    },

    /// Show the version and address behind a link
    Inspect {
        /// TipLink URL
        link: String,
    },

    /// Show the SOL balance held by a link
    Balance {
        /// TipLink URL
        link: String,
    },

    /// Send SOL from your wallet to a link
    Fund {
        /// TipLink URL
        link: String,

        /// Amount of SOL to send
        #[arg(short, long)]
        amount: f64,
    },

    /// Sweep a link's SOL to another address
    Claim {
        /// TipLink URL
        link: String,

        /// Destination address (default: your main wallet)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Manage saved links
    #[command(subcommand)]
    Vault(VaultCommands),

    /// Escrow funds for an email recipient
    #[command(subcommand)]
    Escrow(EscrowCommands),

    /// Show configuration and wallet info
    Info,
}

#[derive(Subcommand)]
enum VaultCommands {
    /// Decrypt and list saved links
    List {
        /// Print full link URLs (they grant control of the funds)
        #[arg(long)]
        show_urls: bool,
    },
}

#[derive(Subcommand)]
enum EscrowCommands {
    /// Deposit into a new escrow for an email recipient
    Deposit {
        /// Recipient email
        #[arg(long)]
        to_email: String,

        /// Amount in SOL, or in whole tokens with --mint
        #[arg(short, long)]
        amount: f64,

        /// SPL token mint (default: native SOL)
        #[arg(long)]
        mint: Option<String>,

        /// Email the recipient once the deposit lands
        #[arg(long)]
        notify: bool,
    },

    /// Show a deposited escrow
    Show {
        /// Escrow PDA
        pda: String,
    },

    /// Withdraw an escrow as depositor or as the claimant link
    Withdraw {
        /// Escrow PDA
        pda: String,

        /// Destination address (default: the withdrawing signer)
        #[arg(short, long)]
        to: Option<String>,

        /// Sign with this TipLink instead of your wallet
        #[arg(long)]
        link: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::load_config(cli.config.as_deref())?;
    tracing::debug!(rpc_url = %cli.rpc_url, enclave = %settings.enclave_endpoint, "Loaded configuration");

    match cli.command {
        Commands::Create { link_version, save } => {
            create::run(&settings, link_version, save)?;
        }
        Commands::Inspect { link } => {
            inspect::run(&link)?;
        }
        Commands::Balance { link } => {
            balance::run(&cli.rpc_url, &link).await?;
        }
        Commands::Fund { link, amount } => {
            fund::run(&cli.rpc_url, cli.keypair.as_deref(), &link, amount).await?;
        }
        Commands::Claim { link, to } => {
            claim::run(&cli.rpc_url, cli.keypair.as_deref(), &link, to.as_deref()).await?;
        }
        Commands::Vault(VaultCommands::List { show_urls }) => {
            commands::vault::list(show_urls)?;
        }
        Commands::Escrow(EscrowCommands::Deposit {
            to_email,
            amount,
            mint,
            notify,
        }) => {
            escrow::deposit(
                &cli.rpc_url,
                cli.keypair.as_deref(),
                &settings,
                escrow::DepositOptions {
                    to_email,
                    amount,
                    mint,
                    notify,
                },
            )
            .await?;
        }
        Commands::Escrow(EscrowCommands::Show { pda }) => {
            escrow::show(&cli.rpc_url, &settings, &pda).await?;
        }
        Commands::Escrow(EscrowCommands::Withdraw { pda, to, link }) => {
            escrow::withdraw(
                &cli.rpc_url,
                cli.keypair.as_deref(),
                &settings,
                &pda,
                to.as_deref(),
                link.as_deref(),
            )
            .await?;
        }
        Commands::Info => {
            info::run(&cli.rpc_url, &settings, cli.config.as_deref()).await?;
        }
    }

    Ok(())
}
