//! TipLink - claim links for Solana
//!
//! A TipLink is a URL whose fragment deterministically encodes an ed25519
//! keypair. Anyone holding the URL controls whatever is sent to the
//! keypair's address. Escrow TipLinks park funds in a program-derived
//! account that either the depositor or an enclave-generated TipLink mailed
//! to the recipient can withdraw.
//!
//! ```no_run
//! use tiplink::TipLink;
//!
//! let link = TipLink::create(0)?;
//! let same = TipLink::from_link(link.url().as_str())?;
//! assert_eq!(link.public_key(), same.public_key());
//! # Ok::<(), tiplink::TipLinkError>(())
//! ```

pub mod base58;
pub mod config;
pub mod enclave;
pub mod error;
pub mod escrow;
pub mod kdf;
pub mod ledger;
pub mod link;
pub mod tiplink;
pub mod version;

pub use config::TipLinkConfig;
pub use enclave::{EnclaveClient, MailOptions, TipLinkDirectory};
pub use error::{Result, TipLinkError};
pub use escrow::{EscrowProgram, EscrowTipLink, MintInfo};
pub use kdf::{KdfContext, KdfParams};
pub use ledger::LedgerReader;
pub use tiplink::TipLink;
pub use version::LinkVersion;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod test_vectors;
