//! Escrow TipLinks.

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument};
use url::Url;

use super::instructions::EscrowProgram;
use super::state::{fetch_mint, read_escrow, EscrowAccount, MintInfo};
use crate::enclave::TipLinkDirectory;
use crate::error::{Result, TipLinkError};
use crate::ledger::LedgerReader;

/// An escrow withdrawable by its depositor or by a TipLink the enclave
/// generated and mailed to `to_email`.
///
/// The asset kind is fixed at construction: with a mint it is a token
/// escrow, without one a native SOL escrow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowTipLink {
    to_email: String,
    tiplink_public_key: Pubkey,
    amount: u64,
    depositor: Pubkey,
    pda: Option<Pubkey>,
    mint: Option<MintInfo>,
}

impl EscrowTipLink {
    pub(crate) fn new(
        to_email: String,
        tiplink_public_key: Pubkey,
        amount: u64,
        depositor: Pubkey,
        pda: Option<Pubkey>,
        mint: Option<MintInfo>,
    ) -> Self {
        Self {
            to_email,
            tiplink_public_key,
            amount,
            depositor,
            pda,
            mint,
        }
    }

    /// Register `to_email` with the enclave and return an escrow ready to deposit.
    #[instrument(skip(directory))]
    pub async fn create(
        directory: &dyn TipLinkDirectory,
        amount: u64,
        to_email: &str,
        depositor: Pubkey,
        mint: Option<MintInfo>,
    ) -> Result<Self> {
        let tiplink = directory.create_generated_tiplink(to_email).await?;
        debug!(%tiplink, "Enclave generated escrow TipLink");
        Ok(Self::new(
            to_email.to_string(),
            tiplink,
            amount,
            depositor,
            None,
            mint,
        ))
    }

    /// Reconstruct a deposited escrow from the ledger and the enclave.
    ///
    /// `Ok(None)` when nothing decodable lives at `pda`, which covers both
    /// never-deposited and already-withdrawn escrows.
    #[instrument(skip(ledger, directory, program))]
    pub async fn get(
        ledger: &dyn LedgerReader,
        directory: &dyn TipLinkDirectory,
        program: &EscrowProgram,
        pda: Pubkey,
    ) -> Result<Option<Self>> {
        let Some(account) = read_escrow(ledger, &program.program_id, &pda).await? else {
            return Ok(None);
        };

        let mint = match &account {
            EscrowAccount::Lamports(_) => None,
            EscrowAccount::Spl(escrow) => {
                let address = Pubkey::new_from_array(escrow.mint);
                Some(fetch_mint(ledger, &address).await?)
            }
        };

        let tiplink = account.tiplink();
        let to_email = directory.generated_tiplink_email(&tiplink).await?;

        Ok(Some(Self::new(
            to_email,
            tiplink,
            account.amount(),
            account.depositor(),
            Some(pda),
            mint,
        )))
    }

    /// `<base>?pda=<pda>`, the link the depositor keeps to manage the escrow.
    pub fn deposit_url(&self, base: &str) -> Result<Url> {
        let pda = self.pda.ok_or(TipLinkError::NotDeposited)?;
        let mut url = Url::parse(base)?;
        url.query_pairs_mut().append_pair("pda", &pda.to_string());
        Ok(url)
    }

    pub(crate) fn set_pda(&mut self, pda: Pubkey) {
        self.pda = Some(pda);
    }

    pub fn to_email(&self) -> &str {
        &self.to_email
    }

    pub fn tiplink_public_key(&self) -> Pubkey {
        self.tiplink_public_key
    }

    /// Amount in the asset's smallest unit.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn depositor(&self) -> Pubkey {
        self.depositor
    }

    /// Escrow address, set once a deposit has been built.
    pub fn pda(&self) -> Option<Pubkey> {
        self.pda
    }

    pub fn mint(&self) -> Option<MintInfo> {
        self.mint
    }

    pub fn is_token(&self) -> bool {
        self.mint.is_some()
    }
}
