//! Configuration, wallet loading and amount formatting for the TipLink CLI

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use tiplink::TipLinkConfig;

/// Directory for CLI state
const TIPLINK_DIR: &str = ".tiplink";
const CONFIG_FILE: &str = "config.json";

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: u8 = 9;

/// Get the TipLink directory path
pub fn tiplink_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(TIPLINK_DIR))
}

/// Default configuration file location
pub fn default_config_file() -> Result<PathBuf> {
    Ok(tiplink_dir()?.join(CONFIG_FILE))
}

/// Load the library configuration.
///
/// An explicit path must exist; the default location is optional and
/// falls back to built-in settings.
pub fn load_config(path: Option<&str>) -> Result<TipLinkConfig> {
    match path {
        Some(p) => TipLinkConfig::load(p).with_context(|| format!("Failed to load config {p}")),
        None => {
            let default = default_config_file()?;
            if default.exists() {
                TipLinkConfig::load(&default)
                    .with_context(|| format!("Failed to load config {}", default.display()))
            } else {
                Ok(TipLinkConfig::default())
            }
        }
    }
}

/// Default Solana keypair location
pub fn default_keypair_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".config").join("solana").join("id.json"))
}

/// Load Solana keypair from file or default location
pub fn load_solana_keypair(path: Option<&str>) -> Result<Keypair> {
    let keypair_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_keypair_path()?,
    };

    if !keypair_path.exists() {
        bail!(
            "Solana keypair not found at {:?}. Generate one with 'solana-keygen new' or specify path with --keypair",
            keypair_path
        );
    }

    let keypair_bytes = fs::read_to_string(&keypair_path)?;
    let bytes: Vec<u8> = serde_json::from_str(&keypair_bytes)
        .with_context(|| format!("Keypair file {:?} is not a JSON byte array", keypair_path))?;
    let keypair = Keypair::from_bytes(&bytes)?;

    Ok(keypair)
}

/// RPC client at confirmed commitment
pub fn rpc_client(rpc_url: &str) -> RpcClient {
    RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed())
}

pub fn parse_address(input: &str, what: &str) -> Result<Pubkey> {
    input
        .parse()
        .with_context(|| format!("Invalid {what} address: {input}"))
}

/// Convert a decimal amount into base units of an asset with `decimals`.
pub fn to_base_units(amount: f64, decimals: u8) -> Result<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be a positive number, got {amount}");
    }

    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled < 1.0 {
        bail!("Amount {amount} is below the smallest unit (10^-{decimals})");
    }
    if scaled >= u64::MAX as f64 {
        bail!("Amount {amount} is too large");
    }

    Ok(scaled as u64)
}

/// Render base units as a decimal string, trailing zeros trimmed.
pub fn format_units(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    // Left-pad so there is always at least one whole digit
    let width = decimals as usize + 1;
    let digits = format!("{:0width$}", amount, width = width);
    let (whole, frac) = digits.split_at(digits.len() - decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

pub fn format_sol(lamports: u64) -> String {
    format_units(lamports, SOL_DECIMALS)
}
