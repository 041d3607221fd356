//! List links saved in the vault

use anyhow::{Context, Result};
use colored::Colorize;

use crate::vault::{prompt_password, LinkVault};

pub fn list(show_urls: bool) -> Result<()> {
    let vault = LinkVault::open_default()?;
    if !vault.exists() {
        println!("{}", "No saved links. Use 'tiplink create --save'.".yellow());
        return Ok(());
    }

    let password = prompt_password("Vault password: ")?;
    let data = vault
        .load(&password)
        .context("Failed to open vault. Wrong password?")?;

    println!();
    println!(
        "{} ({})",
        "Saved TipLinks".yellow().bold(),
        data.entries.len()
    );
    println!();

    for (i, entry) in data.entries.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.public_key.green());
        println!("     Created: {}", entry.created_at.dimmed());
        if show_urls {
            println!("     Link:    {}", entry.url);
        }
    }

    if !show_urls && !data.entries.is_empty() {
        println!();
        println!("{}", "Use --show-urls to print the links.".dimmed());
    }

    Ok(())
}
