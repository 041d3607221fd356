//! Show the SOL held by a link

use anyhow::{Context, Result};
use colored::Colorize;
use tiplink::TipLink;

use crate::config::{format_sol, rpc_client};

pub async fn run(rpc_url: &str, link: &str) -> Result<()> {
    let tiplink = TipLink::from_link(link).context("Not a valid TipLink")?;
    let client = rpc_client(rpc_url);

    let balance = client
        .get_balance(&tiplink.public_key())
        .await
        .context("Failed to fetch balance")?;

    println!();
    println!("Address: {}", tiplink.public_key());
    println!("Balance: {} SOL", format_sol(balance).green());

    if balance == 0 {
        println!();
        println!("{}", "This link is empty or has been claimed.".dimmed());
    }

    Ok(())
}
