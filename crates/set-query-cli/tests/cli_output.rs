//! Runs the `set-query` binary and checks that stdout carries only the command's output.
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_set-query"))
        .args(args)
        .env_remove("SET_QUERY_CONFIG_PATH")
        .env_remove("SET_QUERY_SETS_PATH")
        .env_remove("OTLP_ENDPOINT")
        .env_remove("EXPORT_TRACES_STDOUT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|error| panic!("could not start set-query: {error}"));
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_transform_output_is_json_with_trace_export() {
    let output = run_cli(
        &["--export-traces-stdout", "transform"],
        r#"{"queryArgs": {}, "inputArgs": {"setQuery": [{"set": "featured"}]}}"#,
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "set-query failed: {stderr}");

    let query_args: serde_json::Value = serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|error| {
            panic!(
                "stdout is not a single JSON value ({error}): {}",
                String::from_utf8_lossy(&output.stdout)
            )
        });
    assert_eq!(
        query_args,
        serde_json::json!({"post__in": [42, 7, 19], "orderby": "post__in"})
    );
    assert!(stderr.contains("resolve_set"), "no spans exported: {stderr}");
}

#[test]
fn test_config_schema_output_is_json() {
    let output = run_cli(&["--export-traces-stdout", "config-schema"], "");
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "SetQueryConfiguration");
}
