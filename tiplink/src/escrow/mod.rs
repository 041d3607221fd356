//! Enclave-mediated escrows.
//!
//! A depositor funds a program-derived account that either the depositor or
//! a TipLink generated by the enclave (and mailed to the recipient) can
//! withdraw from. The depositor never learns the TipLink.

pub mod address;
pub mod instructions;
pub mod state;
pub mod tiplink;

pub use address::{find_associated_token_address, find_escrow_address, PDA_SEED};
pub use instructions::EscrowProgram;
pub use state::{read_escrow, fetch_mint, EscrowAccount, EscrowLamports, EscrowSpl, MintInfo};
pub use tiplink::EscrowTipLink;

use sha2::{Digest, Sha256};

/// First 8 bytes of `sha256("<namespace>:<name>")`, the Anchor discriminator.
pub(crate) fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let hash = Sha256::new()
        .chain_update(namespace.as_bytes())
        .chain_update(b":")
        .chain_update(name.as_bytes())
        .finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}
