//! Program-derived addresses for escrows and their token accounts.

use solana_sdk::pubkey::Pubkey;

use crate::error::{Result, TipLinkError};

/// Domain separator for escrow PDAs.
pub const PDA_SEED: &[u8] = b"escrow";

/// SPL associated-token-account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// SPL token program.
pub fn token_program_id() -> Pubkey {
    Pubkey::new_from_array(spl_token::id().to_bytes())
}

/// Escrow PDA for a single-use `escrow_id` nonce and `depositor`.
///
/// Seeds: `["escrow", escrow_id, depositor]`. The bump is searched from 255
/// down until the hash lands off the ed25519 curve.
pub fn find_escrow_address(
    program_id: &Pubkey,
    escrow_id: &Pubkey,
    depositor: &Pubkey,
) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(
        &[PDA_SEED, escrow_id.as_ref(), depositor.as_ref()],
        program_id,
    )
    .ok_or(TipLinkError::AddressDerivationFailed)
}

/// Associated token account of `owner` for `mint`. `owner` may be off-curve (a PDA).
pub fn find_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let token_program = token_program_id();
    Pubkey::try_find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
    .ok_or(TipLinkError::AddressDerivationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn program_id() -> Pubkey {
        Pubkey::from_str(crate::config::ESCROW_PROGRAM_ID).unwrap()
    }

    #[test]
    fn test_escrow_address_is_deterministic_and_off_curve() {
        let escrow_id = Pubkey::new_unique();
        let depositor = Pubkey::new_unique();

        let (a, bump_a) = find_escrow_address(&program_id(), &escrow_id, &depositor).unwrap();
        let (b, bump_b) = find_escrow_address(&program_id(), &escrow_id, &depositor).unwrap();

        assert_eq!(a, b);
        assert_eq!(bump_a, bump_b);
        assert!(!a.is_on_curve());
    }

    #[test]
    fn test_escrow_address_matches_sdk_derivation() {
        let escrow_id = Pubkey::new_unique();
        let depositor = Pubkey::new_unique();

        let expected = Pubkey::find_program_address(
            &[b"escrow", escrow_id.as_ref(), depositor.as_ref()],
            &program_id(),
        );
        assert_eq!(
            find_escrow_address(&program_id(), &escrow_id, &depositor).unwrap(),
            expected
        );
    }

    #[test]
    fn test_fresh_nonce_gives_fresh_address() {
        let depositor = Pubkey::new_unique();
        let (a, _) = find_escrow_address(&program_id(), &Pubkey::new_unique(), &depositor).unwrap();
        let (b, _) = find_escrow_address(&program_id(), &Pubkey::new_unique(), &depositor).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_associated_token_address_is_per_owner() {
        let usdc = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let owner = Pubkey::new_unique();
        let a = find_associated_token_address(&owner, &usdc).unwrap();
        let b = find_associated_token_address(&owner, &usdc).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, find_associated_token_address(&Pubkey::new_unique(), &usdc).unwrap());
    }
}
