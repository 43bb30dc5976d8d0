use serde_json::Value;

use crate::Dictionary;

// ---------------------------------------------------------------------------
// Messages surfaced to action code through `{"error": ...}` dictionaries
// ---------------------------------------------------------------------------

pub const MSG_NO_RESPONSE: &str = "Did not receive a response.";
pub const MSG_ARRAY_RESPONSE: &str = "Response is an array, expecting dictionary.";
pub const MSG_UNPARSEABLE_RESPONSE: &str = "Could not parse a valid JSON response.";
pub const MSG_INVALID_PARAMETERS: &str = "Could not parse parameters.";
pub const MSG_INVALID_INPUT: &str = "Error: couldn't parse JSON input.";
pub const MSG_MISSING_API_HOST: &str = "__OW_API_HOST environment variable was not set.";

// ---------------------------------------------------------------------------
// Main error type
// ---------------------------------------------------------------------------

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WhiskError {
    /// Missing or malformed configuration (environment or builder input).
    #[error("{0}")]
    Config(String),

    /// Builder misconfiguration.
    #[error("builder error: {0}")]
    Builder(String),

    /// The request never produced a response: connection failure, a dead
    /// worker thread, or a callback that was dropped without firing.
    #[error("Did not receive a response.")]
    NoResponse(String),

    /// The platform answered with a JSON array instead of an object.
    #[error("Response is an array, expecting dictionary.")]
    ArrayResponse,

    /// The platform answered with something that is not a JSON object or array.
    #[error("Could not parse a valid JSON response.")]
    UnparseableResponse,

    /// Parameters could not be turned into a request body.
    #[error("Could not parse parameters.")]
    InvalidParameters(String),

    /// The outbound call did not finish within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The action input payload is not a JSON object.
    #[error("Error: couldn't parse JSON input.")]
    Input(String),

    /// The action result cannot be represented as a JSON object.
    #[error("Cannot serialize response: {0}")]
    NotADictionary(String),

    /// Generic serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No entry point registered under the requested name.
    #[error("no entry point named: {0}")]
    NoEntryPoint(String),

    /// Writing to stdout or stderr failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WhiskError {
    /// Render the error the way callback primitives report failures to
    /// action code: a single-entry dictionary keyed by `"error"`.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("error".to_string(), Value::String(self.to_string()));
        dict
    }

    /// Returns `true` if the call failed before the platform produced any body.
    pub fn is_no_response(&self) -> bool {
        matches!(self, WhiskError::NoResponse(_) | WhiskError::Timeout(_))
    }
}

#[cfg(feature = "reqwest-transport")]
impl From<reqwest::Error> for WhiskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WhiskError::NoResponse(format!("timed out: {}", err))
        } else {
            WhiskError::NoResponse(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WhiskError {
    fn from(err: serde_json::Error) -> Self {
        WhiskError::Serialization(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Result type alias
// ---------------------------------------------------------------------------

pub type Result<T> = std::result::Result<T, WhiskError>;
