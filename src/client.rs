use std::time::Duration;

use crate::bridge;
use crate::config::{ApiHost, ConnectionConfig};
use crate::errors::WhiskError;
use crate::json;
use crate::name::QualifiedName;
use crate::transport::DynTransport;
use crate::Dictionary;

// ---------------------------------------------------------------------------
// Client builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`WhiskClient`].
#[derive(Default)]
pub struct WhiskClientBuilder {
    connection: Option<ConnectionConfig>,
    api_host: Option<String>,
    auth_key: Option<String>,
    timeout: Option<Duration>,
    accept_invalid_certs: Option<bool>,
    transport: Option<DynTransport>,
}

impl WhiskClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Start from a complete connection config. Individual setters called
    /// afterwards override its fields.
    pub fn connection(mut self, config: ConnectionConfig) -> Self {
        self.connection = Some(config);
        self
    }

    /// Set the API host, e.g. `https://openwhisk.example.com` or `http://172.17.0.1:3233`.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = Some(key.into());
        self
    }

    /// Bound every outbound call. Applies to the blocking primitives as well
    /// as to the HTTP request itself.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = Some(accept);
        self
    }

    /// Route calls through a custom transport instead of HTTP.
    pub fn transport(mut self, transport: DynTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> crate::Result<WhiskClient> {
        let connection = match (self.api_host, self.connection) {
            (Some(host), Some(config)) => Some(ConnectionConfig {
                api_host: ApiHost::parse(&host)?,
                ..config
            }),
            (Some(host), None) => Some(ConnectionConfig::new(ApiHost::parse(&host)?)),
            (None, config) => config,
        };

        let connection = connection.map(|mut config| {
            if let Some(key) = self.auth_key {
                config.auth_key = key;
            }
            if let Some(timeout) = self.timeout {
                config.timeout = Some(timeout);
            }
            if let Some(accept) = self.accept_invalid_certs {
                config.accept_invalid_certs = accept;
            }
            config
        });

        let timeout = match &connection {
            Some(config) => config.timeout,
            None => self.timeout,
        };

        let transport = match (self.transport, &connection) {
            (Some(transport), _) => transport,
            (None, Some(config)) => default_transport(config)?,
            (None, None) => return Err(WhiskError::Builder("api host is required".into())),
        };

        Ok(WhiskClient { transport, timeout })
    }
}

#[cfg(feature = "reqwest-transport")]
fn default_transport(config: &ConnectionConfig) -> crate::Result<DynTransport> {
    Ok(std::sync::Arc::new(crate::transport::HttpTransport::new(config)?))
}

#[cfg(not(feature = "reqwest-transport"))]
fn default_transport(_config: &ConnectionConfig) -> crate::Result<DynTransport> {
    Err(WhiskError::Builder(
        "no transport configured and the reqwest-transport feature is disabled".into(),
    ))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the two callback primitives: invoking another action and
/// firing a trigger.
///
/// Both come in an async flavour and a blocking flavour. The blocking
/// methods run the async call through [`bridge::call_blocking`], so they
/// can be used from plain synchronous action code.
///
/// # Example
///
/// ```rust,no_run
/// use whisk::{Dictionary, WhiskClient};
///
/// let client = WhiskClient::builder()
///     .api_host("http://172.17.0.1:3233")
///     .auth_key("user:secret")
///     .build()?;
///
/// let reply = client.invoke("/whisk.system/utils/echo", &Dictionary::new())?;
/// println!("{:?}", reply.get("activationId"));
/// # Ok::<(), whisk::WhiskError>(())
/// ```
#[derive(Clone, Debug)]
pub struct WhiskClient {
    transport: DynTransport,
    timeout: Option<Duration>,
}

impl WhiskClient {
    pub fn builder() -> WhiskClientBuilder {
        WhiskClientBuilder::new()
    }

    /// Build a client from `__OW_API_HOST`, `__OW_API_KEY` and friends.
    pub fn from_env() -> crate::Result<Self> {
        Self::builder()
            .connection(ConnectionConfig::from_env()?)
            .build()
    }

    // -----------------------------------------------------------------------
    // Async primitives
    // -----------------------------------------------------------------------

    /// Invoke an action and wait for its activation result.
    pub async fn invoke_async(&self, action: &str, params: &Dictionary) -> crate::Result<Dictionary> {
        let name = QualifiedName::parse(action);
        self.post(&name, name.action_path(), params).await
    }

    /// Fire a trigger.
    pub async fn trigger_async(&self, event: &str, params: &Dictionary) -> crate::Result<Dictionary> {
        let name = QualifiedName::parse(event);
        self.post(&name, name.trigger_path(), params).await
    }

    async fn post(
        &self,
        name: &QualifiedName,
        path: String,
        params: &Dictionary,
    ) -> crate::Result<Dictionary> {
        let body = serde_json::to_vec(params)
            .map_err(|e| WhiskError::InvalidParameters(e.to_string()))?;

        tracing::debug!(entity = %name, path = %path, "calling platform API");
        let request = self.transport.post(&path, body);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| WhiskError::Timeout(limit))??,
            None => request.await?,
        };

        json::response_to_dictionary(&response).map_err(|e| {
            tracing::warn!(entity = %name, error = %e, "unusable response from platform API");
            e
        })
    }

    // -----------------------------------------------------------------------
    // Blocking primitives
    // -----------------------------------------------------------------------

    /// Blocking form of [`invoke_async`](Self::invoke_async).
    pub fn invoke(&self, action: &str, params: &Dictionary) -> crate::Result<Dictionary> {
        let client = self.clone();
        let action = action.to_string();
        let params = params.clone();
        bridge::call_blocking(self.timeout, move || async move {
            client.invoke_async(&action, &params).await
        })?
    }

    /// Blocking form of [`trigger_async`](Self::trigger_async).
    pub fn trigger(&self, event: &str, params: &Dictionary) -> crate::Result<Dictionary> {
        let client = self.clone();
        let event = event.to_string();
        let params = params.clone();
        bridge::call_blocking(self.timeout, move || async move {
            client.trigger_async(&event, &params).await
        })?
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// Entry points for action code.
///
/// Configuration comes from the environment the platform starts the action
/// with. Each call returns exactly one dictionary: the platform's answer, or
/// `{"error": "..."}` describing why there is none.
///
/// ```rust,no_run
/// use serde_json::json;
/// use whisk::{Dictionary, Whisk};
///
/// fn main_action(args: Dictionary) -> Dictionary {
///     let mut params = Dictionary::new();
///     params.insert("payload".into(), json!("hello"));
///     Whisk::invoke("/whisk.system/utils/echo", params)
/// }
/// ```
pub struct Whisk;

impl Whisk {
    pub fn invoke(action: &str, params: Dictionary) -> Dictionary {
        fold(WhiskClient::from_env().and_then(|client| client.invoke(action, &params)))
    }

    pub fn trigger(event: &str, params: Dictionary) -> Dictionary {
        fold(WhiskClient::from_env().and_then(|client| client.trigger(event, &params)))
    }
}

fn fold(result: crate::Result<Dictionary>) -> Dictionary {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "platform call failed");
        e.to_dictionary()
    })
}
