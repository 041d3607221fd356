//! On-chain escrow account layouts and the tagged reader over them.
//!
//! Escrow accounts are Anchor accounts: an 8-byte discriminator
//! (`sha256("account:<Name>")[..8]`) followed by the borsh-encoded struct.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;
use tracing::{debug, instrument, warn};

use super::address::token_program_id;
use super::anchor_discriminator;
use crate::error::{Result, TipLinkError};
use crate::ledger::LedgerReader;

const DISCRIMINATOR_LEN: usize = 8;

/// Native SOL escrow account - MUST match on-chain definition exactly
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct EscrowLamports {
    /// TipLink allowed to withdraw besides the depositor
    pub tiplink: [u8; 32],
    /// Escrowed lamports
    pub amount: u64,
    pub depositor: [u8; 32],
}

/// SPL token escrow account - MUST match on-chain definition exactly
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct EscrowSpl {
    pub tiplink: [u8; 32],
    /// Escrowed token base units
    pub amount: u64,
    pub depositor: [u8; 32],
    pub mint: [u8; 32],
}

/// A decoded escrow account, tagged by asset kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EscrowAccount {
    Lamports(EscrowLamports),
    Spl(EscrowSpl),
}

impl EscrowAccount {
    pub const LAMPORTS_ACCOUNT_NAME: &'static str = "EscrowLamports";
    pub const SPL_ACCOUNT_NAME: &'static str = "EscrowSpl";

    /// Decode raw account data against each known layout.
    ///
    /// `None` means the data matches neither layout.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return None;
        }
        let (discriminator, mut body) = data.split_at(DISCRIMINATOR_LEN);

        if discriminator == anchor_discriminator("account", Self::LAMPORTS_ACCOUNT_NAME) {
            EscrowLamports::deserialize(&mut body).ok().map(Self::Lamports)
        } else if discriminator == anchor_discriminator("account", Self::SPL_ACCOUNT_NAME) {
            EscrowSpl::deserialize(&mut body).ok().map(Self::Spl)
        } else {
            None
        }
    }

    /// Account data as the program writes it.
    pub fn to_account_data(&self) -> Result<Vec<u8>> {
        let (name, body) = match self {
            Self::Lamports(escrow) => (Self::LAMPORTS_ACCOUNT_NAME, escrow.try_to_vec()),
            Self::Spl(escrow) => (Self::SPL_ACCOUNT_NAME, escrow.try_to_vec()),
        };
        let body = body.map_err(|e| TipLinkError::Serialization(e.to_string()))?;

        let mut data = anchor_discriminator("account", name).to_vec();
        data.extend_from_slice(&body);
        Ok(data)
    }

    pub fn tiplink(&self) -> Pubkey {
        match self {
            Self::Lamports(escrow) => Pubkey::new_from_array(escrow.tiplink),
            Self::Spl(escrow) => Pubkey::new_from_array(escrow.tiplink),
        }
    }

    pub fn depositor(&self) -> Pubkey {
        match self {
            Self::Lamports(escrow) => Pubkey::new_from_array(escrow.depositor),
            Self::Spl(escrow) => Pubkey::new_from_array(escrow.depositor),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Self::Lamports(escrow) => escrow.amount,
            Self::Spl(escrow) => escrow.amount,
        }
    }

    /// Mint of a token escrow.
    pub fn mint(&self) -> Option<Pubkey> {
        match self {
            Self::Lamports(_) => None,
            Self::Spl(escrow) => Some(Pubkey::new_from_array(escrow.mint)),
        }
    }
}

/// The parts of an SPL mint an escrow needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintInfo {
    pub address: Pubkey,
    pub decimals: u8,
    pub supply: u64,
}

impl MintInfo {
    pub fn from_account(address: Pubkey, account: &Account) -> Result<Self> {
        if account.owner != token_program_id() {
            return Err(TipLinkError::InvalidMint(format!(
                "{address} is owned by {}, not the token program",
                account.owner
            )));
        }

        let mint = spl_token::state::Mint::unpack(&account.data)
            .map_err(|e| TipLinkError::InvalidMint(format!("{address}: {e}")))?;

        Ok(Self {
            address,
            decimals: mint.decimals,
            supply: mint.supply,
        })
    }
}

/// Fetch and decode an SPL mint.
#[instrument(skip(ledger))]
pub async fn fetch_mint(ledger: &dyn LedgerReader, address: &Pubkey) -> Result<MintInfo> {
    let account = ledger
        .get_account(address)
        .await?
        .ok_or_else(|| TipLinkError::InvalidMint(format!("{address} does not exist")))?;
    MintInfo::from_account(*address, &account)
}

/// Read the escrow at `pda`.
///
/// Returns `None` when no account exists or its data matches neither layout.
/// A never-deposited escrow and a withdrawn (closed) one look the same here.
#[instrument(skip(ledger))]
pub async fn read_escrow(
    ledger: &dyn LedgerReader,
    program_id: &Pubkey,
    pda: &Pubkey,
) -> Result<Option<EscrowAccount>> {
    let Some(account) = ledger.get_account(pda).await? else {
        debug!("No account at escrow address");
        return Ok(None);
    };

    if account.owner != *program_id {
        warn!(owner = %account.owner, "Escrow address is not owned by the escrow program");
        return Ok(None);
    }

    let decoded = EscrowAccount::decode(&account.data);
    if decoded.is_none() {
        debug!(len = account.data.len(), "Account matches no escrow layout");
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamports() -> EscrowAccount {
        EscrowAccount::Lamports(EscrowLamports {
            tiplink: [1; 32],
            amount: 20_000,
            depositor: [2; 32],
        })
    }

    fn spl() -> EscrowAccount {
        EscrowAccount::Spl(EscrowSpl {
            tiplink: [1; 32],
            amount: 1,
            depositor: [2; 32],
            mint: [3; 32],
        })
    }

    #[test]
    fn test_decode_tags_each_layout() {
        for account in [lamports(), spl()] {
            let data = account.to_account_data().unwrap();
            assert_eq!(EscrowAccount::decode(&data), Some(account));
        }
    }

    #[test]
    fn test_lamports_layout_size() {
        let data = lamports().to_account_data().unwrap();
        assert_eq!(data.len(), 8 + 32 + 8 + 32);
        assert_eq!(&data[..8], &[211, 187, 9, 165, 156, 217, 61, 104]);
    }

    #[test]
    fn test_decode_tolerates_trailing_bytes() {
        let mut data = spl().to_account_data().unwrap();
        data.extend_from_slice(&[0u8; 16]);
        assert_eq!(EscrowAccount::decode(&data), Some(spl()));
    }

    #[test]
    fn test_decode_rejects_unknown_or_short_data() {
        assert_eq!(EscrowAccount::decode(&[]), None);
        assert_eq!(EscrowAccount::decode(&[0u8; 7]), None);
        assert_eq!(EscrowAccount::decode(&[0u8; 100]), None);

        // Right discriminator, truncated body
        let data = spl().to_account_data().unwrap();
        assert_eq!(EscrowAccount::decode(&data[..40]), None);
    }

    #[test]
    fn test_accessors() {
        let account = spl();
        assert_eq!(account.tiplink(), Pubkey::new_from_array([1; 32]));
        assert_eq!(account.depositor(), Pubkey::new_from_array([2; 32]));
        assert_eq!(account.mint(), Some(Pubkey::new_from_array([3; 32])));
        assert_eq!(lamports().mint(), None);
        assert_eq!(lamports().amount(), 20_000);
    }

    #[test]
    fn test_mint_info_requires_token_program_owner() {
        let account = Account {
            lamports: 1,
            data: vec![0; spl_token::state::Mint::LEN],
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        };
        assert!(matches!(
            MintInfo::from_account(Pubkey::new_unique(), &account),
            Err(TipLinkError::InvalidMint(_))
        ));
    }
}
