//! Deposit and withdraw transactions for the escrow program.
//!
//! Transactions are returned unsigned with a default blockhash; the caller
//! sets a recent blockhash, signs and submits.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction;
use tracing::{debug, instrument};

use super::address::{
    find_associated_token_address, find_escrow_address, token_program_id,
    ASSOCIATED_TOKEN_PROGRAM_ID,
};
use super::anchor_discriminator;
use super::tiplink::EscrowTipLink;
use crate::config::TipLinkConfig;
use crate::error::{Result, TipLinkError};

const INITIALIZE_LAMPORT: &str = "initialize_lamport";
const INITIALIZE_SPL: &str = "initialize_spl";
const WITHDRAW_LAMPORT: &str = "withdraw_lamport";
const WITHDRAW_SPL: &str = "withdraw_spl";

/// Arguments shared by both initialize instructions.
#[derive(BorshSerialize)]
struct InitializeArgs {
    amount: u64,
    escrow_id: [u8; 32],
}

/// Instruction data: `sha256("global:<name>")[..8]` followed by borsh args.
fn instruction_data(name: &str, args: Option<&InitializeArgs>) -> Result<Vec<u8>> {
    let mut data = anchor_discriminator("global", name).to_vec();
    if let Some(args) = args {
        let encoded = args
            .try_to_vec()
            .map_err(|e| TipLinkError::Serialization(e.to_string()))?;
        data.extend_from_slice(&encoded);
    }
    Ok(data)
}

/// The escrow program and the treasury it charges fees to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscrowProgram {
    pub program_id: Pubkey,
    pub treasury: Pubkey,
}

impl EscrowProgram {
    pub fn new(program_id: Pubkey, treasury: Pubkey) -> Self {
        Self {
            program_id,
            treasury,
        }
    }

    pub fn from_config(config: &TipLinkConfig) -> Result<Self> {
        Ok(Self::new(config.escrow_program_id()?, config.treasury()?))
    }

    /// PDA for an escrow nonce and depositor under this program.
    pub fn find_escrow_address(&self, escrow_id: &Pubkey, depositor: &Pubkey) -> Result<(Pubkey, u8)> {
        find_escrow_address(&self.program_id, escrow_id, depositor)
    }

    /// Build the deposit for `escrow` with a fresh throwaway nonce.
    ///
    /// Records the PDA on `escrow`; the deposit only takes effect once the
    /// caller lands the transaction.
    pub fn deposit_tx(&self, escrow: &mut EscrowTipLink) -> Result<Transaction> {
        if escrow.pda().is_some() {
            return Err(TipLinkError::AlreadyDeposited);
        }
        // Only the public key is used; the secret half is dropped here
        let escrow_id = Keypair::new().pubkey();
        self.deposit_tx_with_nonce(escrow, escrow_id)
    }

    #[instrument(skip(self, escrow), fields(depositor = %escrow.depositor(), amount = escrow.amount()))]
    pub fn deposit_tx_with_nonce(
        &self,
        escrow: &mut EscrowTipLink,
        escrow_id: Pubkey,
    ) -> Result<Transaction> {
        if escrow.pda().is_some() {
            return Err(TipLinkError::AlreadyDeposited);
        }

        let (pda, _bump) = self.find_escrow_address(&escrow_id, &escrow.depositor())?;
        let instruction = self.deposit_instruction(escrow, &escrow_id, &pda)?;
        let transaction = Transaction::new_with_payer(&[instruction], Some(&escrow.depositor()));

        escrow.set_pda(pda);
        debug!(%pda, %escrow_id, "Built escrow deposit");
        Ok(transaction)
    }

    /// Initialize instruction for `escrow` at `pda`, chosen by asset kind.
    pub fn deposit_instruction(
        &self,
        escrow: &EscrowTipLink,
        escrow_id: &Pubkey,
        pda: &Pubkey,
    ) -> Result<Instruction> {
        let args = InitializeArgs {
            amount: escrow.amount(),
            escrow_id: escrow_id.to_bytes(),
        };
        let depositor = escrow.depositor();

        match escrow.mint() {
            None => Ok(Instruction {
                program_id: self.program_id,
                accounts: vec![
                    AccountMeta::new(depositor, true),                             // depositor
                    AccountMeta::new(*pda, false),                                 // pda
                    AccountMeta::new(self.treasury, false),                        // treasury
                    AccountMeta::new_readonly(escrow.tiplink_public_key(), false), // tiplink
                    AccountMeta::new_readonly(system_program::id(), false),
                ],
                data: instruction_data(INITIALIZE_LAMPORT, Some(&args))?,
            }),
            Some(mint) => {
                let pda_ata = find_associated_token_address(pda, &mint.address)?;
                let depositor_ata = find_associated_token_address(&depositor, &mint.address)?;

                Ok(Instruction {
                    program_id: self.program_id,
                    accounts: vec![
                        AccountMeta::new(depositor, true),                             // depositor
                        AccountMeta::new(depositor_ata, false),                        // depositor_ta
                        AccountMeta::new(*pda, false),                                 // pda
                        AccountMeta::new(pda_ata, false),                              // pda_ata
                        AccountMeta::new_readonly(escrow.tiplink_public_key(), false), // tiplink
                        AccountMeta::new(self.treasury, false),                        // treasury
                        AccountMeta::new_readonly(mint.address, false),                // mint
                        AccountMeta::new_readonly(system_program::id(), false),
                        AccountMeta::new_readonly(token_program_id(), false),
                        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                    ],
                    data: instruction_data(INITIALIZE_SPL, Some(&args))?,
                })
            }
        }
    }

    /// Build the withdrawal of everything in `escrow` to `destination`.
    ///
    /// `authority` must be the depositor or the escrow's TipLink; the program
    /// enforces that, not this builder.
    #[instrument(skip(self, escrow))]
    pub fn withdraw_tx(
        &self,
        escrow: &EscrowTipLink,
        authority: &Pubkey,
        destination: &Pubkey,
    ) -> Result<Transaction> {
        let instruction = match escrow.mint() {
            None => self.withdraw_lamport_instruction(escrow, authority, destination)?,
            Some(_) => self.withdraw_spl_instruction(escrow, authority, destination)?,
        };
        Ok(Transaction::new_with_payer(&[instruction], Some(authority)))
    }

    pub fn withdraw_lamport_instruction(
        &self,
        escrow: &EscrowTipLink,
        authority: &Pubkey,
        destination: &Pubkey,
    ) -> Result<Instruction> {
        let pda = escrow.pda().ok_or(TipLinkError::NotDeposited)?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*authority, true),    // authority
                AccountMeta::new(*destination, false), // destination
                AccountMeta::new(pda, false),          // pda
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            data: instruction_data(WITHDRAW_LAMPORT, None)?,
        })
    }

    pub fn withdraw_spl_instruction(
        &self,
        escrow: &EscrowTipLink,
        authority: &Pubkey,
        destination: &Pubkey,
    ) -> Result<Instruction> {
        let pda = escrow.pda().ok_or(TipLinkError::NotDeposited)?;
        let mint = escrow.mint().ok_or(TipLinkError::MissingMint)?;

        // Recomputed rather than stored on the escrow
        let pda_ata = find_associated_token_address(&pda, &mint.address)?;
        let destination_ata = find_associated_token_address(destination, &mint.address)?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*authority, true),             // authority
                AccountMeta::new(*destination, false),          // destination
                AccountMeta::new(destination_ata, false),       // destination_ata
                AccountMeta::new(pda, false),                   // pda
                AccountMeta::new(pda_ata, false),               // pda_ata
                AccountMeta::new_readonly(mint.address, false), // mint
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(token_program_id(), false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            ],
            data: instruction_data(WITHDRAW_SPL, None)?,
        })
    }
}

impl Default for EscrowProgram {
    fn default() -> Self {
        Self::new(
            solana_sdk::pubkey!("8TqqugH88U3fDEWeKHqBSxZKeqoRrXkdpy3ciX5GAruK"),
            solana_sdk::pubkey!("GUua2QL7guU2RjQJXyZt6ePHVWrhEW5PcRcuU1t2mmQF"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escrow::MintInfo;

    fn native_escrow() -> EscrowTipLink {
        EscrowTipLink::new(
            "example@email.com".into(),
            Pubkey::new_unique(),
            20_000,
            Pubkey::new_unique(),
            None,
            None,
        )
    }

    fn token_escrow() -> EscrowTipLink {
        let mint = MintInfo {
            address: Pubkey::new_unique(),
            decimals: 6,
            supply: 1_000_000,
        };
        EscrowTipLink::new(
            "example@email.com".into(),
            Pubkey::new_unique(),
            1,
            Pubkey::new_unique(),
            None,
            Some(mint),
        )
    }

    #[test]
    fn test_native_deposit_layout() {
        let program = EscrowProgram::default();
        let mut escrow = native_escrow();
        let escrow_id = Pubkey::new_unique();

        let tx = program.deposit_tx_with_nonce(&mut escrow, escrow_id).unwrap();
        let (expected_pda, _) = program
            .find_escrow_address(&escrow_id, &escrow.depositor())
            .unwrap();
        assert_eq!(escrow.pda(), Some(expected_pda));

        let message = &tx.message;
        assert_eq!(message.instructions.len(), 1);
        assert_eq!(message.account_keys[0], escrow.depositor());
        assert!(message.account_keys.contains(&expected_pda));
        assert!(message.account_keys.contains(&program.treasury));
        assert!(message.account_keys.contains(&escrow.tiplink_public_key()));

        let data = &message.instructions[0].data;
        assert_eq!(&data[..8], &[127, 176, 6, 64, 63, 24, 23, 213]);
        assert_eq!(&data[8..16], &20_000u64.to_le_bytes());
        assert_eq!(&data[16..48], escrow_id.as_ref());
        assert_eq!(data.len(), 48);

        // Unsigned: the caller owns key custody
        assert!(tx.signatures.iter().all(|s| *s == Default::default()));
    }

    #[test]
    fn test_token_deposit_uses_associated_accounts() {
        let program = EscrowProgram::default();
        let mut escrow = token_escrow();
        let escrow_id = Pubkey::new_unique();
        let (pda, _) = program
            .find_escrow_address(&escrow_id, &escrow.depositor())
            .unwrap();

        let ix = program.deposit_instruction(&escrow, &escrow_id, &pda).unwrap();
        let mint = escrow.mint().unwrap().address;
        assert_eq!(ix.accounts[0].pubkey, escrow.depositor());
        assert_eq!(
            ix.accounts[1].pubkey,
            find_associated_token_address(&escrow.depositor(), &mint).unwrap()
        );
        assert_eq!(ix.accounts[2].pubkey, pda);
        assert_eq!(
            ix.accounts[3].pubkey,
            find_associated_token_address(&pda, &mint).unwrap()
        );
        assert_eq!(ix.accounts[6].pubkey, mint);
        assert_eq!(&ix.data[..8], &anchor_discriminator("global", "initialize_spl"));

        program.deposit_tx_with_nonce(&mut escrow, escrow_id).unwrap();
        assert_eq!(escrow.pda(), Some(pda));
    }

    #[test]
    fn test_second_deposit_is_rejected() {
        let program = EscrowProgram::default();
        let mut escrow = native_escrow();

        program.deposit_tx(&mut escrow).unwrap();
        let first_pda = escrow.pda();
        assert!(matches!(
            program.deposit_tx(&mut escrow),
            Err(TipLinkError::AlreadyDeposited)
        ));
        assert_eq!(escrow.pda(), first_pda);
    }

    #[test]
    fn test_withdraw_requires_deposit() {
        let program = EscrowProgram::default();
        let escrow = native_escrow();
        let authority = escrow.depositor();
        assert!(matches!(
            program.withdraw_tx(&escrow, &authority, &authority),
            Err(TipLinkError::NotDeposited)
        ));
    }

    #[test]
    fn test_token_withdraw_requires_mint() {
        let program = EscrowProgram::default();
        let mut escrow = native_escrow();
        program.deposit_tx(&mut escrow).unwrap();

        let authority = escrow.depositor();
        assert!(matches!(
            program.withdraw_spl_instruction(&escrow, &authority, &authority),
            Err(TipLinkError::MissingMint)
        ));
    }

    #[test]
    fn test_withdraw_follows_asset_kind() {
        let program = EscrowProgram::default();
        let destination = Pubkey::new_unique();

        let mut native = native_escrow();
        program.deposit_tx(&mut native).unwrap();
        let tx = program
            .withdraw_tx(&native, &native.tiplink_public_key(), &destination)
            .unwrap();
        assert_eq!(tx.message.account_keys[0], native.tiplink_public_key());
        assert_eq!(
            &tx.message.instructions[0].data[..],
            &anchor_discriminator("global", "withdraw_lamport")
        );

        let mut token = token_escrow();
        program.deposit_tx(&mut token).unwrap();
        let tx = program
            .withdraw_tx(&token, &token.depositor(), &destination)
            .unwrap();
        let mint = token.mint().unwrap().address;
        assert!(tx
            .message
            .account_keys
            .contains(&find_associated_token_address(&destination, &mint).unwrap()));
        assert_eq!(
            &tx.message.instructions[0].data[..],
            &anchor_discriminator("global", "withdraw_spl")
        );
    }

    #[test]
    fn test_default_matches_config() {
        let from_config = EscrowProgram::from_config(&TipLinkConfig::default()).unwrap();
        assert_eq!(from_config, EscrowProgram::default());
    }
}
