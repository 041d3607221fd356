//! Show configuration and wallet info

use anyhow::Result;
use colored::Colorize;
use solana_sdk::signer::Signer;
use tiplink::TipLinkConfig;

use crate::config::{
    default_config_file, default_keypair_path, format_sol, load_solana_keypair, rpc_client,
    tiplink_dir,
};
use crate::vault::LinkVault;

pub async fn run(rpc_url: &str, config: &TipLinkConfig, config_path: Option<&str>) -> Result<()> {
    println!();
    println!("{}", "TipLink Configuration".yellow().bold());
    println!();

    println!("{}:", "Config File".cyan());
    match config_path {
        Some(path) => println!("  {}", path),
        None => {
            let default = default_config_file()?;
            if default.exists() {
                println!("  {}", default.display());
            } else {
                println!("  {}", "(built-in defaults)".dimmed());
            }
        }
    }
    println!();

    println!("{}:", "Links".cyan());
    println!("  Base:    {}", config.link_base());
    println!("  Enclave: {}", config.enclave_endpoint);
    println!();

    println!("{}:", "Escrow".cyan());
    println!("  Program:  {}", config.escrow_program_id);
    println!("  Treasury: {}", config.treasury);
    println!("  Manage:   {}", config.deposit_url_base);
    println!();

    println!("{}:", "Solana Wallet".cyan());
    if let Ok(keypair) = load_solana_keypair(None) {
        println!("  Address: {}", keypair.pubkey());

        let client = rpc_client(rpc_url);
        if let Ok(balance) = client.get_balance(&keypair.pubkey()).await {
            println!("  Balance: {} SOL", format_sol(balance));
        }
    } else {
        println!("  {}", "NOT CONFIGURED".red());
        println!("  Run 'solana-keygen new' to create a wallet");
    }
    println!();

    println!("{}:", "RPC Endpoint".cyan());
    println!("  {}", rpc_url);
    println!();

    println!("{}:", "File Locations".cyan());
    println!("  State:  {}", tiplink_dir()?.display());
    let vault = LinkVault::open_default()?;
    let vault_state = if vault.exists() {
        "".normal()
    } else {
        "(not created)".dimmed()
    };
    println!("  Vault:  {} {}", vault.path().display(), vault_state);
    println!("  Wallet: {}", default_keypair_path()?.display());

    Ok(())
}
