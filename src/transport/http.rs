use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::config::ConnectionConfig;
use crate::errors::WhiskError;
use crate::transport::{BoxFuture, Transport};

const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP transport to the platform API, backed by reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    authorization: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &ConnectionConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| WhiskError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, client))
    }

    /// Use a preconfigured reqwest client. Its TLS settings take precedence
    /// over the ones in `config`. The call timeout is enforced by
    /// [`WhiskClient`](crate::WhiskClient), not by the transport.
    pub fn with_client(config: &ConnectionConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.api_host.base_url(),
            client,
            authorization: basic_authorization(&config.auth_key),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn do_post(&self, path: &str, body: Vec<u8>) -> crate::Result<Vec<u8>> {
        let url = self.url(path);
        tracing::debug!(url = %url, bytes = body.len(), "posting to platform API");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(AUTHORIZATION, &self.authorization)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "platform API returned an error status");
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

impl Transport for HttpTransport {
    fn post(&self, path: &str, body: Vec<u8>) -> BoxFuture<'_, crate::Result<Vec<u8>>> {
        let path = path.to_string();
        Box::pin(async move { self.do_post(&path, body).await })
    }
}

fn basic_authorization(auth_key: &str) -> String {
    format!("Basic {}", BASE64.encode(auth_key.as_bytes()))
}
