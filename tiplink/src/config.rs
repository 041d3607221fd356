//! Endpoints and on-chain identifiers used by links and escrows.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::error::{Result, TipLinkError};

/// Origin every generated link points at.
pub const TIPLINK_ORIGIN: &str = "https://tiplink.io";

/// Path of the claim page on the link origin.
pub const TIPLINK_PATH: &str = "/i";

/// Enclave that stores email <-> TipLink mappings and relays mail.
pub const ENCLAVE_ENDPOINT: &str = "https://mailer.tiplink.io";

/// Escrow program.
pub const ESCROW_PROGRAM_ID: &str = "8TqqugH88U3fDEWeKHqBSxZKeqoRrXkdpy3ciX5GAruK";

/// Fee recipient registered on deposit.
pub const TREASURY_PUBLIC_KEY: &str = "GUua2QL7guU2RjQJXyZt6ePHVWrhEW5PcRcuU1t2mmQF";

/// Page the depositor uses to manage a deposited escrow.
pub const DEPOSIT_URL_BASE: &str = "https://tiplink-mailer.onrender.com/escrow-withdraw";

/// Default HTTP timeout for enclave requests.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Library configuration. Missing fields deserialize to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TipLinkConfig {
    /// Scheme and host of generated links
    pub link_origin: String,
    /// Path of generated links
    pub link_path: String,
    /// Base URL of the enclave service
    pub enclave_endpoint: String,
    /// Escrow program id (base58)
    pub escrow_program_id: String,
    /// Treasury fee recipient (base58)
    pub treasury: String,
    /// Base of the depositor management URL
    pub deposit_url_base: String,
    /// Enclave request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for TipLinkConfig {
    fn default() -> Self {
        Self {
            link_origin: TIPLINK_ORIGIN.to_string(),
            link_path: TIPLINK_PATH.to_string(),
            enclave_endpoint: ENCLAVE_ENDPOINT.to_string(),
            escrow_program_id: ESCROW_PROGRAM_ID.to_string(),
            treasury: TREASURY_PUBLIC_KEY.to_string(),
            deposit_url_base: DEPOSIT_URL_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl TipLinkConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TipLinkError::Serialization(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TipLinkError::Serialization(format!("Invalid config: {e}")))
    }

    pub fn with_enclave_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.enclave_endpoint = endpoint.into();
        self
    }

    pub fn with_link_base(mut self, origin: impl Into<String>, path: impl Into<String>) -> Self {
        self.link_origin = origin.into();
        self.link_path = path.into();
        self
    }

    pub fn with_escrow_program(mut self, program_id: &Pubkey, treasury: &Pubkey) -> Self {
        self.escrow_program_id = program_id.to_string();
        self.treasury = treasury.to_string();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// `origin + path`, the part of a link before `#`.
    pub fn link_base(&self) -> String {
        format!("{}{}", self.link_origin.trim_end_matches('/'), self.link_path)
    }

    pub fn escrow_program_id(&self) -> Result<Pubkey> {
        parse_pubkey(&self.escrow_program_id)
    }

    pub fn treasury(&self) -> Result<Pubkey> {
        parse_pubkey(&self.treasury)
    }
}

pub(crate) fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).map_err(|e| TipLinkError::InvalidPublicKey(format!("{s}: {e}")))
}
