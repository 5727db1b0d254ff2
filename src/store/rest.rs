use anyhow::Context;
use reqwest::Client;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;

use crate::configuration::RestStoreSettings;
use crate::domain::WaitlistEntry;
use crate::waitlist::StoreError;
use crate::waitlist::WaitlistStore;

/// A hosted database reached over its PostgREST-style HTTP API (e.g.
/// Supabase): `POST {base_url}/rest/v1/{table}` with a JSON array of rows.
pub struct RestWaitlistStore {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    table: String,
}

/// Error body returned by PostgREST; `code` is the SQLSTATE when the failure
/// came from Postgres
#[derive(Deserialize)]
struct RestErrorBody {
    code: Option<String>,
}

impl RestWaitlistStore {
    /// `timeout` applies to the whole request, not just connecting
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        table: String,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client for waitlist store")?;
        Ok(Self {
            http_client,
            base_url,
            api_key,
            table,
        })
    }

    pub fn from_settings(cfg: &RestStoreSettings) -> Result<Self, anyhow::Error> {
        Self::new(
            cfg.base_url.clone(),
            cfg.api_key.clone(),
            cfg.table.clone(),
            cfg.timeout(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}

impl WaitlistStore for RestWaitlistStore {
    #[tracing::instrument(name = "Inserting waitlist entry via REST", skip_all)]
    async fn insert(
        &self,
        entry: &WaitlistEntry,
    ) -> Result<(), StoreError> {
        let key = self.api_key.expose_secret();
        let resp = self
            .http_client
            .post(self.endpoint())
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(&[entry])
            .send()
            .await
            .context("Failed to reach waitlist store")?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp
            .text()
            .await
            .context("Failed to read waitlist store response")?;
        let code = serde_json::from_str::<RestErrorBody>(&body)
            .ok()
            .and_then(|b| b.code);
        let error = anyhow::anyhow!("Waitlist store responded with {status}: {body}");

        match code {
            Some(code) => Err(StoreError::from_sql_state(Some(&code), error)),
            // some proxies strip the body but keep the status
            None if status == StatusCode::CONFLICT => Err(StoreError::Duplicate),
            None => Err(StoreError::Other(error)),
        }
    }
}
