//! The `TipLink` aggregate: a link and the keypair it encodes.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use crate::config::TipLinkConfig;
use crate::error::{Result, TipLinkError};
use crate::kdf::KdfContext;
use crate::link;
use crate::version::LinkVersion;

/// A shareable URL together with the keypair derived from its fragment.
///
/// Whoever holds the URL controls the keypair. Only constructed through
/// `create`, `from_url` and `from_link`.
pub struct TipLink {
    url: Url,
    keypair: Keypair,
    version: LinkVersion,
}

impl TipLink {
    fn new(url: Url, keypair: Keypair, version: LinkVersion) -> Self {
        Self {
            url,
            keypair,
            version,
        }
    }

    /// Generate a fresh link under the default origin.
    pub fn create(version: u8) -> Result<Self> {
        Self::create_with(KdfContext::shared()?, &TipLinkConfig::default(), version)
    }

    /// Generate a fresh link with an explicit KDF context and link base.
    ///
    /// The version is validated before any randomness is drawn.
    pub fn create_with(ctx: &KdfContext, config: &TipLinkConfig, version: u8) -> Result<Self> {
        let version =
            LinkVersion::try_from(version).map_err(|_| TipLinkError::InvalidVersion(version))?;

        let mut secret = Zeroizing::new(vec![0u8; version.secret_len()]);
        OsRng.fill_bytes(&mut secret[..]);

        let tiplink = Self::from_secret_with(ctx, &config.link_base(), version, &secret)?;
        debug!(%version, pubkey = %tiplink.public_key(), "Created TipLink");
        Ok(tiplink)
    }

    /// Build the link for a known secret under the default origin.
    pub fn from_secret(version: LinkVersion, secret: &[u8]) -> Result<Self> {
        Self::from_secret_with(
            KdfContext::shared()?,
            &TipLinkConfig::default().link_base(),
            version,
            secret,
        )
    }

    /// Build the link for a known secret. Deterministic.
    pub fn from_secret_with(
        ctx: &KdfContext,
        base: &str,
        version: LinkVersion,
        secret: &[u8],
    ) -> Result<Self> {
        let keypair = ctx.derive_keypair(version, secret)?;
        let url = link::encode(base, version, secret)?;
        Ok(Self::new(url, keypair, version))
    }

    /// Recover the keypair encoded in `url`.
    pub fn from_url(url: Url) -> Result<Self> {
        Self::from_url_with(KdfContext::shared()?, url)
    }

    pub fn from_url_with(ctx: &KdfContext, url: Url) -> Result<Self> {
        let (version, secret) = link::decode(&url)?;
        let keypair = ctx.derive_keypair(version, &secret)?;
        Ok(Self::new(url, keypair, version))
    }

    /// Parse `link` as an absolute URL and recover its keypair.
    pub fn from_link(link: &str) -> Result<Self> {
        Self::from_link_with(KdfContext::shared()?, link)
    }

    pub fn from_link_with(ctx: &KdfContext, link: &str) -> Result<Self> {
        let url = Url::parse(link)?;
        Self::from_url_with(ctx, url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn public_key(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn version(&self) -> LinkVersion {
        self.version
    }
}

impl fmt::Display for TipLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

// The URL is the secret; keep it out of debug output
impl fmt::Debug for TipLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipLink")
            .field("version", &self.version)
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_unknown_version() {
        for version in [2u8, 7, 255] {
            assert!(matches!(
                TipLink::create(version),
                Err(TipLinkError::InvalidVersion(v)) if v == version
            ));
        }
    }

    #[test]
    fn test_from_link_rejects_relative_url() {
        assert!(matches!(
            TipLink::from_link("/i#5jC3aFcBJR4g4BQ5D"),
            Err(TipLinkError::MalformedUrl(_))
        ));
        assert!(matches!(
            TipLink::from_link("not a url"),
            Err(TipLinkError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_debug_hides_fragment() {
        let ctx = KdfContext::shared().unwrap();
        let tiplink =
            TipLink::from_secret_with(ctx, "https://tiplink.io/i", LinkVersion::V1, &[4u8; 16])
                .unwrap();
        let fragment = tiplink.url().fragment().unwrap().to_string();
        let debug = format!("{tiplink:?}");
        assert!(!debug.contains(&fragment[1..]));
        assert!(debug.contains(&tiplink.public_key().to_string()));
        assert_eq!(tiplink.to_string(), tiplink.url().as_str());
    }
}
