//! Seed derivation from link secrets.
//!
//! Version 0 stretches the secret with Argon2id using libsodium's
//! `crypto_pwhash` INTERACTIVE profile and an all-zero salt, so the seed is a
//! pure function of the secret. Version 1 skips the KDF and pads the secret
//! to seed length with ISO/IEC 7816-4 padding (`sodium_pad`).

use std::sync::OnceLock;

use argon2::{Algorithm, Argon2, Params, Version};
use solana_sdk::signature::Keypair;
use solana_sdk::signer::keypair::keypair_from_seed;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Result, TipLinkError};
use crate::version::LinkVersion;

/// Ed25519 seed length (`crypto_sign_SEEDBYTES`).
pub const SEED_LEN: usize = 32;

/// Argon2 salt length (`crypto_pwhash_SALTBYTES`).
pub const SALT_LEN: usize = 16;

/// Marker byte that starts ISO/IEC 7816-4 padding.
const PAD_MARKER: u8 = 0x80;

/// Argon2id cost profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub m_cost: u32,
    /// Iterations
    pub t_cost: u32,
    /// Lanes
    pub p_cost: u32,
}

impl KdfParams {
    /// `crypto_pwhash_OPSLIMIT_INTERACTIVE` / `MEMLIMIT_INTERACTIVE` (64 MiB).
    pub const INTERACTIVE: Self = Self {
        m_cost: 65_536,
        t_cost: 2,
        p_cost: 1,
    };
}

static SHARED: OnceLock<std::result::Result<KdfContext, String>> = OnceLock::new();

/// Configured KDF handle, built once and reused for every derivation.
pub struct KdfContext {
    argon2: Argon2<'static>,
}

impl KdfContext {
    pub fn new(params: KdfParams) -> Result<Self> {
        let params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(SEED_LEN))
            .map_err(|e| TipLinkError::KeyDerivation(format!("Argon2 params error: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Process-wide context with the interactive profile.
    ///
    /// Built exactly once; concurrent first callers block until it is ready.
    pub fn shared() -> Result<&'static KdfContext> {
        SHARED
            .get_or_init(|| KdfContext::new(KdfParams::INTERACTIVE).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| TipLinkError::KeyDerivation(e.clone()))
    }

    /// Derive the 32-byte signing seed for `secret` under `version`.
    pub fn derive_seed(&self, version: LinkVersion, secret: &[u8]) -> Result<Zeroizing<[u8; SEED_LEN]>> {
        match version {
            LinkVersion::V0 => self.stretch(secret),
            LinkVersion::V1 => pad_seed(secret),
        }
    }

    /// Derive the signing keypair for `secret` under `version`.
    pub fn derive_keypair(&self, version: LinkVersion, secret: &[u8]) -> Result<Keypair> {
        let seed = self.derive_seed(version, secret)?;
        keypair_from_seed(&seed[..])
            .map_err(|e| TipLinkError::KeyDerivation(format!("Keypair from seed failed: {e}")))
    }

    fn stretch(&self, secret: &[u8]) -> Result<Zeroizing<[u8; SEED_LEN]>> {
        let salt = [0u8; SALT_LEN];
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        self.argon2
            .hash_password_into(secret, &salt, &mut seed[..])
            .map_err(|e| TipLinkError::KeyDerivation(format!("Argon2 failed: {e}")))?;
        Ok(seed)
    }
}

/// ISO/IEC 7816-4 padding to the next multiple of `block_size`.
///
/// A full extra block is appended when the input is already aligned.
pub fn pad(input: &[u8], block_size: usize) -> Vec<u8> {
    let padded_len = (input.len() / block_size + 1) * block_size;
    let mut out = Vec::with_capacity(padded_len);
    out.extend_from_slice(input);
    out.push(PAD_MARKER);
    out.resize(padded_len, 0);
    out
}

fn pad_seed(secret: &[u8]) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let expected = LinkVersion::V1.secret_len();
    if secret.len() != expected {
        return Err(TipLinkError::InvalidSecretLength {
            expected,
            actual: secret.len(),
        });
    }

    let mut padded = pad(secret, SEED_LEN);
    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    seed.copy_from_slice(&padded[..SEED_LEN]);
    padded.zeroize();
    Ok(seed)
}
