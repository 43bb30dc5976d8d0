use std::fmt;
use std::time::Duration;

use crate::errors::{WhiskError, MSG_MISSING_API_HOST};
use crate::json::QuoteEscaping;
use crate::runner::DEFAULT_ENTRY_POINT;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const ENV_API_HOST: &str = "__OW_API_HOST";
pub const ENV_API_KEY: &str = "__OW_API_KEY";
pub const ENV_INPUT: &str = "WHISK_INPUT";
pub const ENV_CALL_TIMEOUT_MS: &str = "WHISK_CALL_TIMEOUT_MS";
pub const ENV_VERIFY_TLS: &str = "WHISK_VERIFY_TLS";
pub const ENV_LEGACY_ESCAPING: &str = "WHISK_LEGACY_ESCAPING";
pub const ENV_MAIN: &str = "WHISK_MAIN";

/// Auth key sent when `__OW_API_KEY` is absent.
pub const DEFAULT_AUTH_KEY: &str = "authKey";

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1" | "true" | "TRUE" | "True" | "yes")
    )
}

// ---------------------------------------------------------------------------
// API host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// The platform API endpoint, as given by `__OW_API_HOST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiHost {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl ApiHost {
    /// Parse `[http://|https://]host[:port]`. A missing scheme means https.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let (scheme, rest) = if let Some(rest) = text.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = text.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            (Scheme::Https, text)
        };

        let components: Vec<&str> = rest.split(':').collect();
        let host = components[0].to_string();
        if host.is_empty() {
            return Err(WhiskError::Config(format!(
                "no host in {}: {:?}",
                ENV_API_HOST, text
            )));
        }

        let port = if components.len() == 2 {
            components[1].parse::<u16>().map_err(|_| {
                WhiskError::Config(format!(
                    "invalid port in {}: {:?}",
                    ENV_API_HOST, components[1]
                ))
            })?
        } else {
            scheme.default_port()
        };

        Ok(Self { scheme, host, port })
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }
}

impl fmt::Display for ApiHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

// ---------------------------------------------------------------------------
// Connection config
// ---------------------------------------------------------------------------

/// Connection settings for the platform API.
///
/// # Example
///
/// ```rust
/// use whisk::{ApiHost, ConnectionConfig};
///
/// let config = ConnectionConfig::new(ApiHost::parse("http://localhost:3233").unwrap())
///     .auth_key("user:secret")
///     .timeout(std::time::Duration::from_secs(10));
///
/// assert_eq!(config.api_host.port, 3233);
/// ```
#[derive(Clone)]
pub struct ConnectionConfig {
    pub api_host: ApiHost,
    /// Credentials sent as HTTP Basic auth.
    pub auth_key: String,
    /// Upper bound for one outbound call. `None` waits until the platform
    /// answers or kills the activation.
    pub timeout: Option<Duration>,
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_host", &self.api_host)
            .field("auth_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(api_host: ApiHost) -> Self {
        Self {
            api_host,
            auth_key: DEFAULT_AUTH_KEY.to_string(),
            timeout: None,
            accept_invalid_certs: true,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_API_HOST)
            .ok_or_else(|| WhiskError::Config(MSG_MISSING_API_HOST.to_string()))?;
        let mut config = Self::new(ApiHost::parse(&host)?);

        if let Some(key) = lookup(ENV_API_KEY) {
            config.auth_key = key;
        }

        if let Some(raw) = lookup(ENV_CALL_TIMEOUT_MS) {
            let millis = raw.trim().parse::<u64>().ok().filter(|ms| *ms > 0).ok_or_else(|| {
                WhiskError::Config(format!("invalid {}: {:?}", ENV_CALL_TIMEOUT_MS, raw))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        if flag(lookup(ENV_VERIFY_TLS)) {
            config.accept_invalid_certs = false;
        }

        Ok(config)
    }

    pub fn auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = key.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

// ---------------------------------------------------------------------------
// Runner config
// ---------------------------------------------------------------------------

/// Input and output settings for [`Runner`](crate::Runner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Raw JSON payload handed to the action.
    pub input: String,
    pub escaping: QuoteEscaping,
    /// Entry point picked by [`run_actions`](crate::run_actions).
    pub main: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            input: "{}".to_string(),
            escaping: QuoteEscaping::Standard,
            main: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let escaping = if flag(lookup(ENV_LEGACY_ESCAPING)) {
            QuoteEscaping::Legacy
        } else {
            QuoteEscaping::Standard
        };

        Self {
            input: lookup(ENV_INPUT).unwrap_or_else(|| "{}".to_string()),
            escaping,
            main: lookup(ENV_MAIN)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string()),
        }
    }

    pub fn escaping(mut self, escaping: QuoteEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn main(mut self, name: impl Into<String>) -> Self {
        self.main = name.into();
        self
    }
}
