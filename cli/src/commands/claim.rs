//! Sweep a link's SOL to a destination

use anyhow::{bail, Context, Result};
use colored::Colorize;
use solana_sdk::{pubkey::Pubkey, signer::Signer, system_instruction, transaction::Transaction};
use tiplink::TipLink;

use crate::config::{format_sol, load_solana_keypair, parse_address, rpc_client};

/// Signature fee paid by the link itself
const FEE_LAMPORTS: u64 = 5_000;

pub async fn run(
    rpc_url: &str,
    keypair_path: Option<&str>,
    link: &str,
    to_address: Option<&str>,
) -> Result<()> {
    println!("{}", "Preparing claim...".cyan());

    let tiplink = TipLink::from_link(link).context("Not a valid TipLink")?;
    let source = tiplink.public_key();

    let destination: Pubkey = match to_address {
        Some(addr) => parse_address(addr, "destination")?,
        None => load_solana_keypair(keypair_path)?.pubkey(),
    };
    if destination == source {
        bail!("Destination is the link itself");
    }

    let client = rpc_client(rpc_url);
    let balance = client.get_balance(&source).await?;
    println!("Link balance: {} SOL", format_sol(balance));

    if balance == 0 {
        println!("{}", "Nothing to claim.".yellow());
        return Ok(());
    }
    if balance <= FEE_LAMPORTS {
        bail!("Balance too low to cover transaction fee");
    }
    let amount = balance - FEE_LAMPORTS;

    let instruction = system_instruction::transfer(&source, &destination, amount);
    let recent_blockhash = client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&source),
        &[tiplink.keypair()],
        recent_blockhash,
    );

    println!("Claiming {} SOL to {}...", format_sol(amount), destination);
    let signature = client
        .send_and_confirm_transaction(&transaction)
        .await
        .context("Failed to send claim transaction")?;

    println!();
    println!("{}", "Claimed!".green().bold());
    println!();
    println!("Transaction: {}", signature);
    println!("Amount:      {} SOL", format_sol(amount));
    println!("From:        {}", source);
    println!("To:          {}", destination);

    Ok(())
}
