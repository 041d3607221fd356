//! Fixed vectors shared with the web implementation.
//!
//! A link minted by any implementation must redeem to the same keypair
//! everywhere, so these values must never change.

#[cfg(test)]
mod link_test_vectors {
    use crate::base58;
    use crate::link;
    use crate::version::LinkVersion;
    use crate::{KdfContext, TipLink};
    use solana_sdk::signer::Signer;

    /// Link minted by tiplink.io, version 0.
    const WEBSITE_LINK: &str = "https://tiplink.io/i#5jC3aFcBJR4g4BQ5D";
    const WEBSITE_PUBKEY: &str = "6xcGWYuk9HMCPiEeu1AtHAZdEpFt97Qi6JCuKCVyph4";

    #[test]
    fn test_vector_website_link_v0() {
        let tiplink = TipLink::from_link(WEBSITE_LINK).expect("website link should decode");

        assert_eq!(tiplink.url().fragment(), Some("5jC3aFcBJR4g4BQ5D"));
        assert_eq!(tiplink.version(), LinkVersion::V0);
        assert_eq!(tiplink.public_key().to_string(), WEBSITE_PUBKEY);
        assert_eq!(tiplink.keypair().pubkey().to_string(), WEBSITE_PUBKEY);
    }

    #[test]
    fn test_vector_website_secret_is_twelve_bytes() {
        let (version, secret) = link::decode_fragment("5jC3aFcBJR4g4BQ5D").unwrap();
        assert_eq!(version, LinkVersion::V0);
        assert_eq!(secret.len(), 12);
        assert_eq!(base58::encode(&secret), "5jC3aFcBJR4g4BQ5D");
    }

    #[test]
    fn test_vector_from_secret_rebuilds_website_link() {
        let (_, secret) = link::decode_fragment("5jC3aFcBJR4g4BQ5D").unwrap();
        let tiplink = TipLink::from_secret(LinkVersion::V0, &secret).unwrap();
        assert_eq!(tiplink.url().as_str(), WEBSITE_LINK);
        assert_eq!(tiplink.public_key().to_string(), WEBSITE_PUBKEY);
    }

    /// Leading zero bytes survive as leading `1`s.
    #[test]
    fn test_vector_leading_zero_secret() {
        let secret: [u8; 12] = [0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let fragment = link::encode_fragment(LinkVersion::V0, &secret);
        assert!(fragment.starts_with("11"));
        assert_ne!(fragment.as_bytes()[2], b'1');

        let (version, decoded) = link::decode_fragment(&fragment).unwrap();
        assert_eq!(version, LinkVersion::V0);
        assert_eq!(decoded.as_slice(), &secret);
    }

    #[test]
    fn test_vector_v1_create_then_redeem() {
        let created = TipLink::create(1).unwrap();
        let fragment = created.url().fragment().unwrap();
        assert!(fragment.starts_with('_'));
        assert!(!fragment[1..].contains('_'));

        let redeemed = TipLink::from_link(created.url().as_str()).unwrap();
        assert_eq!(redeemed.version(), LinkVersion::V1);
        assert_eq!(redeemed.public_key(), created.public_key());
    }

    /// The v1 seed is the secret followed by `sodium_pad` bytes.
    #[test]
    fn test_vector_v1_seed_layout() {
        let secret: Vec<u8> = (0x10..0x20).collect();
        let ctx = KdfContext::shared().unwrap();
        let seed = ctx.derive_seed(LinkVersion::V1, &secret).unwrap();

        let mut expected = [0u8; 32];
        expected[..16].copy_from_slice(&secret);
        expected[16] = 0x80;
        assert_eq!(*seed, expected);
    }

    /// Stripping the v1 marker must not silently redeem the same key.
    #[test]
    fn test_vector_misdetected_version_changes_key() {
        let secret = [0x5au8; 16];
        let v1 = TipLink::from_secret_with(
            KdfContext::shared().unwrap(),
            "https://tiplink.io/i",
            LinkVersion::V1,
            &secret,
        )
        .unwrap();

        let stripped = v1.url().as_str().replacen("#_", "#", 1);
        let as_v0 = TipLink::from_link(&stripped).unwrap();
        assert_eq!(as_v0.version(), LinkVersion::V0);
        assert_ne!(as_v0.public_key(), v1.public_key());
    }
}
