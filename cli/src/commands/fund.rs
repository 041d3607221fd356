//! Send SOL from the wallet to a link

use anyhow::{bail, Context, Result};
use colored::Colorize;
use solana_sdk::{signer::Signer, system_instruction, transaction::Transaction};
use tiplink::TipLink;

use crate::config::{format_sol, load_solana_keypair, rpc_client, to_base_units, SOL_DECIMALS};

/// Headroom for the transfer fee
const FEE_RESERVE_LAMPORTS: u64 = 5_000;

pub async fn run(
    rpc_url: &str,
    keypair_path: Option<&str>,
    link: &str,
    amount_sol: f64,
) -> Result<()> {
    let tiplink = TipLink::from_link(link).context("Not a valid TipLink")?;
    let lamports = to_base_units(amount_sol, SOL_DECIMALS)?;

    let payer = load_solana_keypair(keypair_path)?;
    let client = rpc_client(rpc_url);

    let balance = client.get_balance(&payer.pubkey()).await?;
    if balance < lamports + FEE_RESERVE_LAMPORTS {
        bail!(
            "Insufficient balance. Have {} SOL, need {} SOL + fees",
            format_sol(balance),
            format_sol(lamports)
        );
    }

    let instruction = system_instruction::transfer(&payer.pubkey(), &tiplink.public_key(), lamports);
    let recent_blockhash = client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[&payer],
        recent_blockhash,
    );

    println!("Sending {} SOL to {}...", format_sol(lamports), tiplink.public_key());
    let signature = client
        .send_and_confirm_transaction(&transaction)
        .await
        .context("Failed to send transaction")?;

    println!();
    println!("{}", "TipLink funded!".green().bold());
    println!();
    println!("Transaction: {}", signature);
    println!("Amount:      {} SOL", format_sol(lamports));
    println!("Address:     {}", tiplink.public_key());

    Ok(())
}
