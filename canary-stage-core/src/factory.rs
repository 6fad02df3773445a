//! reqwest client for the Canary token factory API.
//!
//! Every tenant has its own console at `https://{domain}.canary.tools`. Setting
//! `CANARY_FACTORY_BASE_URL` pins all requests to one base instead, which is
//! how staging consoles and the wiremock tests are reached.
//!
//! No retries and no explicit timeout: a stalled console stalls the row.

use async_trait::async_trait;
use std::env;
use tracing::{debug, info};

use crate::contract::{
    CreateTokenRequest, CreatedToken, DownloadTokenRequest, TokenFactory, KNOWN_TOKEN_KINDS,
};
use crate::error::FactoryError;

pub const BASE_URL_ENV: &str = "CANARY_FACTORY_BASE_URL";

const FACTORY_PATH: &str = "/api/v1/canarytoken/factory";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    /// `https://{domain}.canary.tools`
    PerTenant,
    /// Fixed base URL, domain ignored.
    Fixed(String),
}

pub struct CanaryFactoryClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl Default for CanaryFactoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CanaryFactoryClient {
    /// Client addressing each row's own tenant console.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: Endpoint::PerTenant,
        }
    }

    /// Client sending every request to `base_url`, whatever the row's domain.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            endpoint: Endpoint::Fixed(base),
        }
    }

    /// Honours `CANARY_FACTORY_BASE_URL` when it is set and non-empty.
    pub fn from_env() -> Self {
        match env::var(BASE_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                info!(base_url = %base, "Using fixed Canary factory base URL from environment");
                Self::with_base_url(base)
            }
            _ => Self::new(),
        }
    }

    /// Factory URL (`.../canarytoken/factory`) for the given tenant.
    pub fn factory_url(&self, domain: &str) -> String {
        match &self.endpoint {
            Endpoint::PerTenant => format!("https://{domain}.canary.tools{FACTORY_PATH}"),
            Endpoint::Fixed(base) => format!("{base}{FACTORY_PATH}"),
        }
    }
}

#[async_trait]
impl TokenFactory for CanaryFactoryClient {
    async fn create_token(&self, request: CreateTokenRequest) -> Result<CreatedToken, FactoryError> {
        let url = format!("{}/create", self.factory_url(&request.domain));
        let memo = request.reminder.to_memo().map_err(FactoryError::Encode)?;

        if !KNOWN_TOKEN_KINDS.contains(&request.kind.as_str()) {
            debug!(kind = %request.kind, "Token kind not in the known list, sending anyway");
        }

        info!(
            url = %url,
            factory_auth = %request.auth_token.masked(),
            memo = %memo,
            kind = %request.kind,
            flock_id = %request.flock_id,
            "> Creating token"
        );

        let form = [
            ("factory_auth", request.auth_token.expose()),
            ("memo", memo.as_str()),
            ("kind", request.kind.as_str()),
            ("flock_id", request.flock_id.as_str()),
        ];
        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = status.as_u16(), body = %body, "> Create response");

        serde_json::from_str::<CreatedToken>(&body)
            .map_err(|source| FactoryError::Decode { source, body })
    }

    async fn download_token(&self, request: DownloadTokenRequest) -> Result<Vec<u8>, FactoryError> {
        let url = format!("{}/download", self.factory_url(&request.domain));
        info!(token_id = %request.token_id, "> Downloading token");

        // reqwest follows redirects by default, which the download endpoint relies on.
        let response = self
            .http
            .get(&url)
            .query(&[
                ("factory_auth", request.auth_token.expose()),
                ("canarytoken", request.token_id.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactoryError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!(token_id = %request.token_id, size = bytes.len(), "Downloaded token artifact");
        Ok(bytes.to_vec())
    }
}

/// The download URL carries `factory_auth` in its query, so it is stripped
/// before the error can reach any log line.
fn transport(err: reqwest::Error) -> FactoryError {
    FactoryError::Transport(err.without_url())
}
