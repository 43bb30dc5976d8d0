#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::pedantic)]
// Allowed pedantic lints
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
//! # whisk - action runtime for OpenWhisk-style platforms
//!
//! Write an action as a plain Rust function from a JSON dictionary to
//! anything serializable, and hand it to [`run_main`]. The platform starts
//! the process with the parameters in `WHISK_INPUT`; the result is printed
//! to stdout as a single line of JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use whisk::{Dictionary, Whisk};
//!
//! fn main_action(args: Dictionary) -> serde_json::Value {
//!     let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("stranger");
//!
//!     // Blocks until the platform answers; failures come back as {"error": ...}.
//!     let mut params = Dictionary::new();
//!     params.insert("payload".into(), json!(name));
//!     let echoed = Whisk::invoke("/whisk.system/utils/echo", params);
//!
//!     json!({"greeting": format!("Hello {}!", name), "echo": echoed})
//! }
//!
//! fn main() {
//!     whisk::run_main(main_action);
//! }
//! ```
//!
//! ## Callback primitives
//!
//! [`Whisk::invoke`] and [`Whisk::trigger`] call back into the platform API
//! (`__OW_API_HOST`, authenticated with `__OW_API_KEY`). They look blocking
//! to the action: the HTTP call runs on a worker thread (see [`bridge`]) and
//! the caller waits for its single outcome. [`WhiskClient`] offers the same
//! operations with explicit configuration, as `Result`s, and in async form.
//!
//! ## Features
//!
//! - `reqwest-transport` (default): HTTP transport and the
//!   environment-driven [`Whisk`] facade.
//! - `testing`: [`testing::MockTransport`], a recording in-memory transport.

pub mod activation;
pub mod bridge;
pub mod client;
pub mod config;
pub mod errors;
pub mod json;
pub mod logging;
pub mod name;
pub mod runner;
#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing;
pub mod transport;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use activation::{ActivationContext, ActivationMessage};
pub use client::{Whisk, WhiskClient, WhiskClientBuilder};
pub use config::{ApiHost, ConnectionConfig, RunnerConfig, Scheme};
pub use errors::{Result, WhiskError};
pub use json::{JsonType, QuoteEscaping};
pub use name::QualifiedName;
pub use runner::{run_actions, run_main, Actions, Runner};
pub use transport::{DynTransport, Transport};

/// A JSON object: the parameter and result type of every action.
pub type Dictionary = serde_json::Map<String, serde_json::Value>;
