//! Read access to ledger accounts.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use tracing::instrument;

use crate::error::Result;

/// Source of account data. `Ok(None)` means the account does not exist.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;
}

#[async_trait]
impl LedgerReader for RpcClient {
    #[instrument(skip(self))]
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value)
    }
}
