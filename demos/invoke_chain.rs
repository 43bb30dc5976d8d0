//! An action that calls another action and fires a trigger with the result.
//!
//! Needs a reachable platform:
//!
//! ```sh
//! export __OW_API_HOST=http://172.17.0.1:3233
//! export __OW_API_KEY=user:secret
//! export WHISK_INPUT='{"text":"hello"}'
//! export WHISK_MAIN=shout      # or "main"
//! cargo run --example invoke_chain
//! ```

use serde_json::json;
use whisk::{Actions, Dictionary, Whisk};

fn main_action(args: Dictionary) -> Dictionary {
    // Blocks until the echo action finishes; a failure comes back as {"error": ...}.
    let echoed = Whisk::invoke("/whisk.system/utils/echo", args);
    if echoed.contains_key("error") {
        return echoed;
    }

    let mut event = Dictionary::new();
    event.insert("source".into(), json!("invoke_chain"));
    event.insert("echo".into(), json!(echoed));
    Whisk::trigger("chainCompleted", event)
}

fn shout(args: Dictionary) -> serde_json::Value {
    let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default();
    json!({"text": text.to_uppercase()})
}

fn main() {
    whisk::run_actions(
        Actions::new()
            .register("main", main_action)
            .register("shout", shout),
    );
}
