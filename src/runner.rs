//! Running an action: read the input payload, call the handler, print the
//! result.
//!
//! The platform reads the action result from standard output as one line
//! of JSON. Problems are reported as a plain message on both standard output
//! and standard error, so they show up in the activation result and in the
//! activation logs alike.

use std::collections::HashMap;
use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use crate::config::RunnerConfig;
use crate::errors::{WhiskError, MSG_INVALID_INPUT};
use crate::json;
use crate::Dictionary;

/// Executes one action invocation against the given output streams.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `handler` on the configured input.
    ///
    /// On success the printed dictionary is also returned. Every failure has
    /// already been reported on `out` and `err` when the `Err` comes back.
    pub fn run<F, R, O, E>(&self, handler: F, out: &mut O, err: &mut E) -> crate::Result<Dictionary>
    where
        F: FnOnce(Dictionary) -> R,
        R: Serialize,
        O: Write,
        E: Write,
    {
        self.run_erased(move |params| serde_json::to_value(handler(params)), out, err)
    }

    fn run_erased<F, O, E>(&self, handler: F, out: &mut O, err: &mut E) -> crate::Result<Dictionary>
    where
        F: FnOnce(Dictionary) -> serde_json::Result<Value>,
        O: Write,
        E: Write,
    {
        let params = match json::string_to_dictionary(&self.config.input) {
            Some(params) => params,
            None => {
                report(out, err, MSG_INVALID_INPUT)?;
                return Err(WhiskError::Input(self.config.input.clone()));
            }
        };

        let result = match handler(params) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let e = WhiskError::NotADictionary(other.to_string());
                report(out, err, &e.to_string())?;
                return Err(e);
            }
            Err(e) => {
                report(out, err, &format!("Error serializing response {}", e))?;
                return Err(e.into());
            }
        };

        match json::dictionary_to_json_string(&result, self.config.escaping) {
            Some(text) => {
                writeln!(out, "{}", text)?;
                out.flush()?;
                Ok(result)
            }
            None => {
                let message = format!("Error converting {} to JSON string", Value::Object(result));
                report(out, err, &message)?;
                Err(WhiskError::Serialization(message))
            }
        }
    }
}

fn report<O: Write, E: Write>(out: &mut O, err: &mut E, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message)?;
    out.flush()?;
    writeln!(err, "{}", message)?;
    err.flush()
}

// ---------------------------------------------------------------------------
// Named entry points
// ---------------------------------------------------------------------------

/// Name of the entry point used when none is configured.
pub const DEFAULT_ENTRY_POINT: &str = "main";

type EntryPoint = Box<dyn FnOnce(Dictionary) -> serde_json::Result<Value>>;

/// A set of named handlers, one of which runs per process.
///
/// The platform lets an action declare which function is its `main`; this
/// registry maps that name to a handler.
///
/// # Example
///
/// ```rust
/// use whisk::{Actions, Dictionary, Runner, RunnerConfig};
///
/// let actions = Actions::new()
///     .register("main", |args: Dictionary| args)
///     .register("count", |args: Dictionary| serde_json::json!({"keys": args.len()}))
///     .entry_point("count");
///
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let runner = Runner::new(RunnerConfig::new(r#"{"a":1,"b":2}"#));
/// actions.run(&runner, &mut out, &mut err).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "{\"keys\":2}\n");
/// ```
pub struct Actions {
    entries: HashMap<String, EntryPoint>,
    entry_point: String,
}

impl Default for Actions {
    fn default() -> Self {
        Self::new()
    }
}

impl Actions {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }

    /// Register `handler` under `name`, replacing any earlier registration.
    pub fn register<F, R>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: FnOnce(Dictionary) -> R + 'static,
        R: Serialize,
    {
        let entry: EntryPoint = Box::new(move |params| serde_json::to_value(handler(params)));
        self.entries.insert(name.into(), entry);
        self
    }

    /// Select which registered handler runs.
    pub fn entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = name.into();
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the selected entry point.
    pub fn run<O: Write, E: Write>(
        mut self,
        runner: &Runner,
        out: &mut O,
        err: &mut E,
    ) -> crate::Result<Dictionary> {
        match self.entries.remove(&self.entry_point) {
            Some(handler) => runner.run_erased(handler, out, err),
            None => {
                let e = WhiskError::NoEntryPoint(self.entry_point);
                report(out, err, &e.to_string())?;
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Process entry points
// ---------------------------------------------------------------------------

/// Run `handler` as the action of this process.
///
/// Reads `WHISK_INPUT`, prints the result to stdout, and reports problems on
/// stdout and stderr. It never panics and never exits the process.
///
/// ```rust,no_run
/// use whisk::Dictionary;
///
/// fn hello(args: Dictionary) -> Dictionary {
///     let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("stranger");
///     let mut result = Dictionary::new();
///     result.insert("greeting".into(), format!("Hello {}!", name).into());
///     result
/// }
///
/// fn main() {
///     whisk::run_main(hello);
/// }
/// ```
pub fn run_main<F, R>(handler: F)
where
    F: FnOnce(Dictionary) -> R,
    R: Serialize,
{
    crate::logging::try_init();
    let runner = Runner::new(RunnerConfig::from_env());

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if let Err(e) = runner.run(handler, &mut out, &mut err) {
        tracing::error!(error = %e, "action did not produce a result");
    }
}

/// Run the entry point named by `WHISK_MAIN` (default `main`).
pub fn run_actions(actions: Actions) {
    crate::logging::try_init();
    let config = RunnerConfig::from_env();
    let actions = actions.entry_point(config.main.clone());
    let runner = Runner::new(config);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if let Err(e) = actions.run(&runner, &mut out, &mut err) {
        tracing::error!(error = %e, "action did not produce a result");
    }
}
