use serde_json::json;
use whisk::{ActivationContext, ActivationMessage, Actions, Dictionary, Runner, RunnerConfig};

fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Proxy message -> action environment -> action result
// ---------------------------------------------------------------------------

#[test]
fn test_run_message_drives_action() {
    let message: ActivationMessage = serde_json::from_value(json!({
        "value": {"name": "Grace", "count": 2},
        "namespace": "guest",
        "action_name": "/guest/greet",
        "activation_id": "0123abcd",
        "deadline": "4102444800000"
    }))
    .unwrap();
    let env = message.environment();
    let lookup = |key: &str| env.get(key).cloned();

    let ctx = ActivationContext::from_lookup(lookup);
    let runner = Runner::new(RunnerConfig::from_lookup(lookup));

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = runner
        .run(
            |args: Dictionary| {
                json!({
                    "greeting": format!("Hello {}", args["name"].as_str().unwrap_or("?")),
                    "times": args["count"],
                    "activation": ctx.activation_id,
                })
            },
            &mut out,
            &mut err,
        )
        .unwrap();

    assert_eq!(result["activation"], "0123abcd");
    assert_eq!(
        output(out),
        "{\"activation\":\"0123abcd\",\"greeting\":\"Hello Grace\",\"times\":2}\n"
    );
    assert!(err.is_empty());
    assert!(ctx.remaining_time().is_some());
}

#[test]
fn test_message_without_value_runs_with_empty_input() {
    let env = ActivationMessage::default().environment();
    let runner = Runner::new(RunnerConfig::from_lookup(|key| env.get(key).cloned()));

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = runner
        .run(|args: Dictionary| json!({"keys": args.len()}), &mut out, &mut err)
        .unwrap();

    assert_eq!(result["keys"], 0);
    assert_eq!(output(out), "{\"keys\":0}\n");
}

// ---------------------------------------------------------------------------
// Failure reporting
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_input_reported_twice() {
    let runner = Runner::new(RunnerConfig::new("{not json"));

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = runner.run(|args: Dictionary| args, &mut out, &mut err);

    assert!(result.is_err());
    assert_eq!(output(out), "Error: couldn't parse JSON input.\n");
    assert_eq!(output(err), "Error: couldn't parse JSON input.\n");
}

#[test]
fn test_scalar_result_is_rejected() {
    let runner = Runner::new(RunnerConfig::default());

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = runner.run(|_args: Dictionary| "just a string", &mut out, &mut err);

    assert!(result.is_err());
    assert_eq!(output(out), "Cannot serialize response: \"just a string\"\n");
    assert_eq!(output(err), "Cannot serialize response: \"just a string\"\n");
}

// ---------------------------------------------------------------------------
// Entry point selection
// ---------------------------------------------------------------------------

#[test]
fn test_entry_point_from_config() {
    let config = RunnerConfig::new(r#"{"n": 4}"#).main("square");
    let actions = Actions::new()
        .register("main", |args: Dictionary| args)
        .register("square", |args: Dictionary| {
            let n = args["n"].as_i64().unwrap_or(0);
            json!({"square": n * n})
        })
        .entry_point(config.main.clone());

    let mut out = Vec::new();
    let mut err = Vec::new();
    actions
        .run(&Runner::new(config), &mut out, &mut err)
        .unwrap();

    assert_eq!(output(out), "{\"square\":16}\n");
}
