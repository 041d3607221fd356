//! Error types for the TipLink library.

use thiserror::Error;

/// Result type alias using `TipLinkError`.
pub type Result<T> = std::result::Result<T, TipLinkError>;

/// Every failure a TipLink or escrow operation can surface to its caller.
#[derive(Debug, Error)]
pub enum TipLinkError {
    // ========================================================================
    // Link decoding and derivation
    // ========================================================================
    /// A base58 payload contained characters outside the alphabet.
    #[error("Invalid base58 character(s): \"{chars}\"")]
    InvalidCharacter { chars: String },

    /// A link fragment or version tag named a version this library does not know.
    #[error("Unsupported link version: {0}")]
    UnsupportedVersion(String),

    /// `create` was asked for a version outside {0, 1}.
    #[error("Invalid link version: {0}")]
    InvalidVersion(u8),

    /// The input to `from_link` is not an absolute URL.
    #[error("Malformed link: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// A secret did not have the length its version requires.
    #[error("Invalid secret length: expected {expected} bytes, got {actual}")]
    InvalidSecretLength { expected: usize, actual: usize },

    /// The KDF or keypair construction rejected its input.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // ========================================================================
    // Escrow lifecycle
    // ========================================================================
    /// Deposit was requested on an escrow that already has a PDA.
    #[error("Escrow can only be deposited once")]
    AlreadyDeposited,

    /// An operation needing the PDA ran before deposit.
    #[error("Escrow has not been deposited")]
    NotDeposited,

    /// A token escrow operation ran without a mint.
    #[error("Attempted a token escrow operation without a mint")]
    MissingMint,

    /// No bump produced an off-curve escrow address.
    #[error("Unable to find a viable program address bump")]
    AddressDerivationFailed,

    /// An account expected to hold an SPL mint could not be decoded as one.
    #[error("Invalid mint account: {0}")]
    InvalidMint(String),

    // ========================================================================
    // Transport
    // ========================================================================
    /// An enclave request or ledger RPC call failed.
    #[error("Transport error{}: {context}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        context: String,
    },

    /// A remote service returned a public key that does not parse.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Instruction or request body serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TipLinkError {
    /// Transport failure without an HTTP status (network, RPC, body decoding).
    pub(crate) fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            context: context.into(),
        }
    }
}

impl From<reqwest::Error> for TipLinkError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            context: err.to_string(),
        }
    }
}

impl From<solana_client::client_error::ClientError> for TipLinkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::transport(err.to_string())
    }
}
