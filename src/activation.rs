//! Activation metadata exchanged between the platform's action proxy and
//! the action process.
//!
//! The proxy receives a run message per activation and starts the action
//! with an environment derived from it ([`ActivationMessage::environment`]).
//! Inside the action, [`ActivationContext`] reads that environment back.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ENV_API_HOST, ENV_API_KEY, ENV_INPUT};

pub const ENV_NAMESPACE: &str = "__OW_NAMESPACE";
pub const ENV_ACTION_NAME: &str = "__OW_ACTION_NAME";
pub const ENV_ACTIVATION_ID: &str = "__OW_ACTIVATION_ID";
pub const ENV_DEADLINE: &str = "__OW_DEADLINE";

// ---------------------------------------------------------------------------
// Action side
// ---------------------------------------------------------------------------

/// What the running action knows about its own activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationContext {
    pub namespace: Option<String>,
    pub action_name: Option<String>,
    pub activation_id: Option<String>,
    /// Epoch milliseconds after which the platform kills the activation.
    pub deadline: Option<i64>,
    pub api_host: Option<String>,
}

impl ActivationContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let deadline = lookup(ENV_DEADLINE).and_then(|raw| match raw.trim().parse::<i64>() {
            Ok(millis) => Some(millis),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "ignoring malformed activation deadline");
                None
            }
        });

        Self {
            namespace: lookup(ENV_NAMESPACE),
            action_name: lookup(ENV_ACTION_NAME),
            activation_id: lookup(ENV_ACTIVATION_ID),
            deadline,
            api_host: lookup(ENV_API_HOST),
        }
    }

    /// Time left before the deadline. Zero once it has passed, `None` when
    /// the platform gave no deadline.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.remaining_time_at(chrono::Utc::now().timestamp_millis())
    }

    fn remaining_time_at(&self, now_millis: i64) -> Option<Duration> {
        self.deadline.map(|deadline| {
            let left = deadline.saturating_sub(now_millis).max(0);
            Duration::from_millis(left as u64)
        })
    }
}

// ---------------------------------------------------------------------------
// Proxy side
// ---------------------------------------------------------------------------

/// The per-activation run message the action proxy receives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivationMessage {
    /// Action parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_id: Option<String>,

    /// Epoch milliseconds, sent as a string or a number depending on the
    /// platform version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<serde_json::Value>,
}

impl ActivationMessage {
    /// Environment variables the action process is started with.
    ///
    /// `WHISK_INPUT` always holds the JSON of `value` (`{}` when absent);
    /// the `__OW_*` variables are set only for fields that are present.
    pub fn environment(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        let input = match &self.value {
            Some(value) => value.to_string(),
            None => "{}".to_string(),
        };
        env.insert(ENV_INPUT.to_string(), input);

        let fields = [
            (ENV_API_KEY, &self.api_key),
            (ENV_NAMESPACE, &self.namespace),
            (ENV_ACTION_NAME, &self.action_name),
            (ENV_ACTIVATION_ID, &self.activation_id),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                env.insert(key.to_string(), value.clone());
            }
        }

        match &self.deadline {
            Some(serde_json::Value::String(s)) => {
                env.insert(ENV_DEADLINE.to_string(), s.clone());
            }
            Some(serde_json::Value::Number(n)) => {
                env.insert(ENV_DEADLINE.to_string(), n.to_string());
            }
            Some(other) => {
                tracing::warn!(deadline = %other, "ignoring deadline of unexpected type");
            }
            None => {}
        }

        env
    }
}
