//! Show what a link decodes to

use anyhow::{Context, Result};
use colored::Colorize;
use tiplink::TipLink;

pub fn run(link: &str) -> Result<()> {
    let tiplink = TipLink::from_link(link).context("Not a valid TipLink")?;

    println!();
    println!("{}", "TipLink".yellow().bold());
    println!();
    println!("Version: {}", tiplink.version());
    println!("Address: {}", tiplink.public_key().to_string().green());
    println!("Host:    {}", tiplink.url().host_str().unwrap_or("-"));

    Ok(())
}
