//! Client for the enclave that generates escrow TipLinks and sends mail.
//!
//! The enclave keeps the email <-> TipLink mapping so that depositors never
//! see the link that can claim their escrow.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument};

use crate::config::{parse_pubkey, TipLinkConfig};
use crate::error::{Result, TipLinkError};
use crate::escrow::EscrowTipLink;
use crate::tiplink::TipLink;

/// Email <-> generated TipLink registry.
#[async_trait]
pub trait TipLinkDirectory: Send + Sync {
    /// Generate and store a TipLink for `email`, returning its public key.
    async fn create_generated_tiplink(&self, email: &str) -> Result<Pubkey>;

    /// Email registered for a generated TipLink.
    async fn generated_tiplink_email(&self, public_key: &Pubkey) -> Result<String>;
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyData {
    public_key: String,
}

#[derive(Deserialize)]
struct EmailData {
    email: String,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MailRequest<'a> {
    to_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_name: Option<&'a str>,
    tiplink_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MailEscrowRequest<'a> {
    to_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_name: Option<&'a str>,
    depositor_url: String,
    tiplink_public_key: String,
}

/// Optional sender details attached to outgoing mail.
#[derive(Clone, Debug, Default)]
pub struct MailOptions {
    pub to_name: Option<String>,
    pub reply_email: Option<String>,
    pub reply_name: Option<String>,
}

/// HTTP client for the enclave.
pub struct EnclaveClient {
    endpoint: String,
    http_client: reqwest::Client,
}

impl EnclaveClient {
    pub fn new(config: &TipLinkConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.enclave_endpoint.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Email a TipLink to `to_email`.
    #[instrument(skip(self, tiplink, options))]
    pub async fn mail(&self, tiplink: &TipLink, to_email: &str, options: &MailOptions) -> Result<()> {
        let body = MailRequest {
            to_email,
            to_name: options.to_name.as_deref(),
            reply_email: options.reply_email.as_deref(),
            reply_name: options.reply_name.as_deref(),
            tiplink_url: tiplink.url().as_str(),
        };

        let response = self
            .http_client
            .post(self.url("/api/v1/email/send"))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;

        debug!("TipLink sent");
        Ok(())
    }

    /// Email a deposited escrow's claim notice to its recipient.
    ///
    /// Fails with `NotDeposited` before any request if the escrow has no PDA.
    #[instrument(skip(self, escrow, options), fields(to_email = escrow.to_email()))]
    pub async fn mail_escrow(
        &self,
        escrow: &EscrowTipLink,
        deposit_url_base: &str,
        options: &MailOptions,
    ) -> Result<()> {
        let depositor_url = escrow.deposit_url(deposit_url_base)?;

        let body = MailEscrowRequest {
            to_email: escrow.to_email(),
            to_name: options.to_name.as_deref(),
            reply_email: options.reply_email.as_deref(),
            reply_name: options.reply_name.as_deref(),
            depositor_url: depositor_url.to_string(),
            tiplink_public_key: escrow.tiplink_public_key().to_string(),
        };

        let response = self
            .http_client
            .post(self.url("/api/v1/email/send/escrow"))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;

        debug!("Escrow TipLink sent");
        Ok(())
    }
}

#[async_trait]
impl TipLinkDirectory for EnclaveClient {
    #[instrument(skip(self))]
    async fn create_generated_tiplink(&self, email: &str) -> Result<Pubkey> {
        let response = self
            .http_client
            .post(self.url("/api/v1/generated-tiplinks/create"))
            .json(&CreateRequest { email })
            .send()
            .await?;

        let envelope: DataEnvelope<PublicKeyData> = ensure_success(response).await?.json().await?;
        parse_pubkey(&envelope.data.public_key)
    }

    #[instrument(skip(self))]
    async fn generated_tiplink_email(&self, public_key: &Pubkey) -> Result<String> {
        let path = format!("/api/v1/generated-tiplinks/{public_key}/email");
        let response = self.http_client.get(self.url(&path)).send().await?;

        let envelope: DataEnvelope<EmailData> = ensure_success(response).await?.json().await?;
        Ok(envelope.data.email)
    }
}

/// Map non-2xx responses to `Transport` carrying the status and body.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(TipLinkError::Transport {
        status: Some(status.as_u16()),
        context: format!("HTTP error, status: {status}: {text}"),
    })
}
