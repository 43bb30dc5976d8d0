//! Minimal action: greets the caller and echoes its parameters.
//!
//! Run locally with
//! `WHISK_INPUT='{"name":"Ada"}' cargo run --example echo`.

use serde_json::json;
use whisk::{ActivationContext, Dictionary};

fn greet(args: Dictionary) -> serde_json::Value {
    let ctx = ActivationContext::from_env();
    let name = args
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("stranger")
        .to_string();

    json!({
        "greeting": format!("Hello {}!", name),
        "params": args,
        "activation": ctx.activation_id,
        "remaining_ms": ctx.remaining_time().map(|d| d.as_millis() as u64),
    })
}

fn main() {
    whisk::run_main(greet);
}
