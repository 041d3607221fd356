//! Flow tests for the TipLink library
//!
//! Tests cover:
//! - Link creation and redemption for both versions
//! - Determinism across contexts
//! - Error surfaces of the public entry points

#[cfg(test)]
mod tiplink_tests {
    use crate::base58;
    use crate::config::TipLinkConfig;
    use crate::version::LinkVersion;
    use crate::{KdfContext, KdfParams, TipLink, TipLinkError};
    use solana_sdk::signer::Signer;
    use url::Url;

    #[test]
    fn test_create_v0_round_trip() {
        let created = TipLink::create(0).unwrap();
        assert_eq!(created.version(), LinkVersion::V0);
        assert!(created.url().as_str().starts_with("https://tiplink.io/i#"));

        let fragment = created.url().fragment().unwrap();
        assert!(!fragment.contains('_'));
        assert_eq!(base58::decode(fragment).unwrap().len(), 12);

        let redeemed = TipLink::from_url(created.url().clone()).unwrap();
        assert_eq!(redeemed.public_key(), created.public_key());
    }

    #[test]
    fn test_create_v1_secret_length() {
        let created = TipLink::create(1).unwrap();
        let fragment = created.url().fragment().unwrap();
        assert_eq!(base58::decode(&fragment[1..]).unwrap().len(), 16);
    }

    #[test]
    fn test_created_links_are_unique() {
        let a = TipLink::create(1).unwrap();
        let b = TipLink::create(1).unwrap();
        assert_ne!(a.url(), b.url());
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_from_url_is_deterministic() {
        let url = Url::parse("https://tiplink.io/i#_Ro4equ4VJPYp2bxfQBzKLS").unwrap();
        let a = TipLink::from_url(url.clone()).unwrap();
        let b = TipLink::from_url(url).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.keypair().to_bytes(), b.keypair().to_bytes());
    }

    #[test]
    fn test_separate_contexts_agree() {
        let own = KdfContext::new(KdfParams::INTERACTIVE).unwrap();
        let shared = KdfContext::shared().unwrap();
        let secret = [0x11u8; 12];

        let a = own.derive_keypair(LinkVersion::V0, &secret).unwrap();
        let b = shared.derive_keypair(LinkVersion::V0, &secret).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn test_custom_link_base() {
        let config = TipLinkConfig::default().with_link_base("http://localhost:3000", "/claim");
        let created = TipLink::create_with(KdfContext::shared().unwrap(), &config, 1).unwrap();
        assert!(created
            .url()
            .as_str()
            .starts_with("http://localhost:3000/claim#_"));

        // Host and path are cosmetic; only the fragment derives the key
        let moved = created
            .url()
            .as_str()
            .replace("http://localhost:3000/claim", "https://tiplink.io/i");
        assert_eq!(
            TipLink::from_link(&moved).unwrap().public_key(),
            created.public_key()
        );
    }

    #[test]
    fn test_invalid_character_in_fragment() {
        match TipLink::from_link("https://tiplink.io/i#5jC3aFcBJR4g4BQ5O") {
            Err(TipLinkError::InvalidCharacter { chars }) => assert_eq!(chars, "O"),
            other => panic!("expected InvalidCharacter, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_version_token_in_link() {
        assert!(matches!(
            TipLink::from_link("https://tiplink.io/i#2_5jC3aFcBJR4g4BQ5D"),
            Err(TipLinkError::UnsupportedVersion(token)) if token == "2"
        ));
    }

    #[test]
    fn test_v1_link_with_wrong_payload_length() {
        // 12-byte payload behind the v1 marker
        assert!(matches!(
            TipLink::from_link("https://tiplink.io/i#_5jC3aFcBJR4g4BQ5D"),
            Err(TipLinkError::InvalidSecretLength { expected: 16, actual: 12 })
        ));
    }

    #[test]
    fn test_derived_keypair_signs_for_address() {
        let tiplink = TipLink::create(1).unwrap();
        let message = b"claim";
        let signature = tiplink.keypair().sign_message(message);
        assert!(signature.verify(tiplink.public_key().as_ref(), message));
    }
}
