//! Link codec.
//!
//! Only the fragment carries key material:
//!
//! ```text
//! v0: <origin><path>#<base58(secret)>
//! v1: <origin><path>#_<base58(secret)>
//! ```
//!
//! The version token is whatever precedes the delimiter. An empty token
//! means version 1; no other token is defined.

use url::Url;
use zeroize::Zeroizing;

use crate::base58;
use crate::error::{Result, TipLinkError};
use crate::version::LinkVersion;

/// Separates the version token from the payload. Never a base58 character.
pub const VERSION_DELIMITER: char = '_';

/// Fragment for `secret` under `version`.
pub fn encode_fragment(version: LinkVersion, secret: &[u8]) -> String {
    let payload = base58::encode(secret);
    match version {
        LinkVersion::V0 => payload,
        LinkVersion::V1 => format!("{VERSION_DELIMITER}{payload}"),
    }
}

/// Build a link under `base` (origin + path) carrying `secret`.
pub fn encode(base: &str, version: LinkVersion, secret: &[u8]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.set_fragment(Some(&encode_fragment(version, secret)));
    Ok(url)
}

/// Split a fragment into its version and raw secret.
pub fn decode_fragment(fragment: &str) -> Result<(LinkVersion, Zeroizing<Vec<u8>>)> {
    let (version, payload) = match fragment.split_once(VERSION_DELIMITER) {
        Some(("", rest)) => (LinkVersion::V1, rest),
        Some((token, _)) => return Err(TipLinkError::UnsupportedVersion(token.to_string())),
        None => (LinkVersion::V0, fragment),
    };

    let secret = Zeroizing::new(base58::decode(payload)?);
    Ok((version, secret))
}

/// Recover `(version, secret)` from a link. A missing fragment is an empty v0 payload.
pub fn decode(url: &Url) -> Result<(LinkVersion, Zeroizing<Vec<u8>>)> {
    decode_fragment(url.fragment().unwrap_or_default())
}
