//! Base58 codec for link secrets.
//!
//! Uses the Bitcoin alphabet. Leading zero bytes map one-for-one to leading
//! `1` characters so short secrets that begin with zeros round-trip exactly.

use crate::error::{Result, TipLinkError};

/// The 58-symbol alphabet (no `0`, `O`, `I` or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn in_alphabet(c: char) -> bool {
    c.is_ascii() && ALPHABET.contains(&(c as u8))
}

/// Encode bytes as a base58 string.
pub fn encode(input: &[u8]) -> String {
    bs58::encode(input).into_string()
}

/// Decode a base58 string into bytes.
///
/// Every character is validated before conversion; the error lists all
/// offending characters in input order.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let invalid: String = input.chars().filter(|&c| !in_alphabet(c)).collect();
    if !invalid.is_empty() {
        return Err(TipLinkError::InvalidCharacter { chars: invalid });
    }

    bs58::decode(input)
        .into_vec()
        .map_err(|e| TipLinkError::InvalidCharacter {
            chars: e.to_string(),
        })
}
