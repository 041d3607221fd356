//! Link versions.
//!
//! Each version fixes a secret length, a seed derivation and a fragment
//! marker. `kdf::derive_seed`, `link::encode` and `link::decode` are the only
//! places that dispatch on it.

use std::fmt;

use crate::error::TipLinkError;

/// Secret length for version 0 links.
pub const V0_SECRET_LEN: usize = 12;

/// Secret length for version 1 links.
pub const V1_SECRET_LEN: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkVersion {
    /// Argon2id-stretched 12-byte secret, bare fragment.
    #[default]
    V0,
    /// Padded 16-byte secret, fragment prefixed with the version delimiter.
    V1,
}

impl LinkVersion {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    /// Number of random bytes a secret of this version carries.
    pub const fn secret_len(self) -> usize {
        match self {
            Self::V0 => V0_SECRET_LEN,
            Self::V1 => V1_SECRET_LEN,
        }
    }
}

impl TryFrom<u8> for LinkVersion {
    type Error = TipLinkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            other => Err(TipLinkError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for LinkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}
