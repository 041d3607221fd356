//! Generate a new TipLink

use anyhow::{Context, Result};
use colored::Colorize;
use tiplink::{KdfContext, TipLink, TipLinkConfig};

use crate::vault::{prompt_new_password, prompt_password, LinkVault, VaultEntry};

pub fn run(config: &TipLinkConfig, link_version: u8, save: bool) -> Result<()> {
    println!("{}", "Generating TipLink...".cyan());

    let ctx = KdfContext::shared()?;
    let tiplink = TipLink::create_with(ctx, config, link_version)
        .context("Failed to create TipLink")?;

    println!();
    println!("{}", "TipLink created!".green().bold());
    println!();
    println!("Link:    {}", tiplink.url().as_str().yellow());
    println!("Address: {}", tiplink.public_key());
    println!("Version: {}", tiplink.version());
    println!();
    println!(
        "{}",
        "Anyone with the link controls its funds. Share it like cash.".dimmed()
    );

    if save {
        save_to_vault(&tiplink)?;
    }

    Ok(())
}

fn save_to_vault(tiplink: &TipLink) -> Result<()> {
    let vault = LinkVault::open_default()?;

    println!();
    let password = if vault.exists() {
        prompt_password("Vault password: ")?
    } else {
        println!("{}", "Creating link vault. Choose a strong password.".cyan());
        println!(
            "{}",
            "Requirements: 8+ chars, uppercase, lowercase, and numbers".dimmed()
        );
        prompt_new_password("Enter password: ")?
    };

    let count = vault
        .append(VaultEntry::from_tiplink(tiplink), &password)
        .context("Failed to save link. Wrong password?")?;

    println!(
        "{} ({} saved in {})",
        "Link saved.".green(),
        count,
        vault.path().display()
    );
    Ok(())
}
