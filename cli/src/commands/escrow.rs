//! Email escrows: deposit for a recipient, inspect, withdraw

use anyhow::{bail, Context, Result};
use colored::Colorize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{signature::Keypair, signer::Signer, transaction::Transaction};
use tiplink::escrow::fetch_mint;
use tiplink::{
    EnclaveClient, EscrowProgram, EscrowTipLink, MailOptions, TipLink, TipLinkConfig,
};

use crate::config::{
    format_units, load_solana_keypair, parse_address, rpc_client, to_base_units, SOL_DECIMALS,
};

/// Options for an escrow deposit
pub struct DepositOptions {
    pub to_email: String,
    /// Decimal amount in SOL or whole tokens
    pub amount: f64,
    pub mint: Option<String>,
    pub notify: bool,
}

fn asset_decimals(escrow: &EscrowTipLink) -> u8 {
    escrow.mint().map(|m| m.decimals).unwrap_or(SOL_DECIMALS)
}

fn asset_label(escrow: &EscrowTipLink) -> String {
    match escrow.mint() {
        Some(mint) => format!("tokens of {}", mint.address),
        None => "SOL".to_string(),
    }
}

async fn sign_and_send(
    client: &RpcClient,
    mut transaction: Transaction,
    signer: &Keypair,
) -> Result<solana_sdk::signature::Signature> {
    let recent_blockhash = client.get_latest_blockhash().await?;
    transaction
        .try_sign(&[signer], recent_blockhash)
        .context("Failed to sign transaction")?;

    client
        .send_and_confirm_transaction(&transaction)
        .await
        .context("Failed to send transaction")
}

pub async fn deposit(
    rpc_url: &str,
    keypair_path: Option<&str>,
    config: &TipLinkConfig,
    options: DepositOptions,
) -> Result<()> {
    println!("{}", "Preparing escrow deposit...".cyan());

    let depositor = load_solana_keypair(keypair_path)?;
    let client = rpc_client(rpc_url);
    let enclave = EnclaveClient::new(config)?;
    let program = EscrowProgram::from_config(config)?;

    let mint = match options.mint.as_deref() {
        Some(address) => {
            let address = parse_address(address, "mint")?;
            Some(fetch_mint(&client, &address).await.context("Failed to load mint")?)
        }
        None => None,
    };
    let decimals = mint.map(|m| m.decimals).unwrap_or(SOL_DECIMALS);
    let amount = to_base_units(options.amount, decimals)?;

    let mut escrow = EscrowTipLink::create(
        &enclave,
        amount,
        &options.to_email,
        depositor.pubkey(),
        mint,
    )
    .await
    .context("Enclave failed to register the recipient")?;

    let transaction = program.deposit_tx(&mut escrow)?;
    let pda = escrow.pda().context("Deposit did not produce an escrow address")?;

    println!(
        "Depositing {} {} for {}...",
        format_units(amount, decimals),
        asset_label(&escrow),
        escrow.to_email()
    );
    let signature = sign_and_send(&client, transaction, &depositor).await?;
    let deposit_url = escrow.deposit_url(&config.deposit_url_base)?;

    println!();
    println!("{}", "Escrow deposited!".green().bold());
    println!();
    println!("Transaction: {}", signature);
    println!("Escrow PDA:  {}", pda.to_string().yellow());
    println!("Manage at:   {}", deposit_url);
    println!();

    if options.notify {
        enclave
            .mail_escrow(&escrow, &config.deposit_url_base, &MailOptions::default())
            .await
            .context("Deposit landed but the notification email failed")?;
        println!("{}", format!("Notified {}.", escrow.to_email()).green());
    } else {
        println!(
            "{}",
            "Keep the PDA: it is the only way to find this escrow again.".dimmed()
        );
    }

    Ok(())
}

pub async fn show(rpc_url: &str, config: &TipLinkConfig, pda: &str) -> Result<()> {
    let pda = parse_address(pda, "escrow")?;
    let client = rpc_client(rpc_url);
    let enclave = EnclaveClient::new(config)?;
    let program = EscrowProgram::from_config(config)?;

    let Some(escrow) = EscrowTipLink::get(&client, &enclave, &program, pda).await? else {
        println!(
            "{}",
            "No escrow at this address. It was never deposited or has been withdrawn.".yellow()
        );
        return Ok(());
    };

    println!();
    println!("{}", "Escrow TipLink".yellow().bold());
    println!();
    println!("PDA:       {}", pda);
    println!(
        "Amount:    {} {}",
        format_units(escrow.amount(), asset_decimals(&escrow)).green(),
        asset_label(&escrow)
    );
    println!("Recipient: {}", escrow.to_email());
    println!("Depositor: {}", escrow.depositor());
    println!("TipLink:   {}", escrow.tiplink_public_key());

    Ok(())
}

pub async fn withdraw(
    rpc_url: &str,
    keypair_path: Option<&str>,
    config: &TipLinkConfig,
    pda: &str,
    to_address: Option<&str>,
    link: Option<&str>,
) -> Result<()> {
    println!("{}", "Preparing escrow withdrawal...".cyan());

    let pda = parse_address(pda, "escrow")?;
    let client = rpc_client(rpc_url);
    let enclave = EnclaveClient::new(config)?;
    let program = EscrowProgram::from_config(config)?;

    let escrow = EscrowTipLink::get(&client, &enclave, &program, pda)
        .await?
        .context("No escrow at this address. It was never deposited or has been withdrawn.")?;

    let tiplink = link
        .map(TipLink::from_link)
        .transpose()
        .context("Not a valid TipLink")?;
    let wallet;
    let signer: &Keypair = match &tiplink {
        Some(tiplink) => tiplink.keypair(),
        None => {
            wallet = load_solana_keypair(keypair_path)?;
            &wallet
        }
    };
    let authority = signer.pubkey();

    if authority != escrow.depositor() && authority != escrow.tiplink_public_key() {
        bail!(
            "{} can not withdraw this escrow.\n\
             Only the depositor ({}) or its TipLink ({}) may withdraw.",
            authority,
            escrow.depositor(),
            escrow.tiplink_public_key()
        );
    }

    let destination = match to_address {
        Some(addr) => parse_address(addr, "destination")?,
        None => authority,
    };

    let transaction = program.withdraw_tx(&escrow, &authority, &destination)?;
    println!(
        "Withdrawing {} {} to {}...",
        format_units(escrow.amount(), asset_decimals(&escrow)),
        asset_label(&escrow),
        destination
    );
    let signature = sign_and_send(&client, transaction, signer).await?;

    println!();
    println!("{}", "Withdrawal successful!".green().bold());
    println!();
    println!("Transaction: {}", signature);
    println!("To:          {}", destination);

    Ok(())
}
