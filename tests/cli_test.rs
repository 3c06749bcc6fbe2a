// Tests for the command line surface and its exit codes
use anyhow::Result;
use serde_json::Value;
use std::process::Command;

mod common;
use common::{fixtures, write_scenario};

/// Helper to run navcheck and capture stdout and the exit code
fn run_command(args: &[&str]) -> Result<(String, i32)> {
    let output = Command::new(env!("CARGO_BIN_EXE_navcheck"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let exit_code = output.status.code().unwrap_or(-1);
    Ok((stdout, exit_code))
}

/// The error object is always the last line printed on failure
fn error_json(stdout: &str) -> Value {
    let line = stdout.lines().last().unwrap_or("{}");
    serde_json::from_str(line).unwrap_or(Value::Null)
}

#[test]
fn test_validate_valid_scenario() -> Result<()> {
    let (_dir, path) = write_scenario(fixtures::VALID_SCENARIO);

    let (stdout, code) = run_command(&["validate", path.to_str().unwrap(), "--format", "json"])?;

    assert_eq!(code, 0);
    let summary: Value = serde_json::from_str(&stdout)?;
    assert_eq!(summary["valid"], true);
    assert_eq!(summary["name"], "smoke");
    assert_eq!(summary["steps"], 3);
    assert_eq!(summary["positional_steps"], 1);
    Ok(())
}

#[test]
fn test_validate_simple_lists_steps() -> Result<()> {
    let (_dir, path) = write_scenario(fixtures::VALID_SCENARIO);

    let (stdout, code) = run_command(&["validate", path.to_str().unwrap()])?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Scenario 'smoke' is valid (3 steps)"));
    assert!(stdout.contains("0 click Open Stocks"));
    assert!(stdout.contains("positional locators"));
    Ok(())
}

#[test]
fn test_validate_bundled_scenario() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/trendscope.json");

    let (_, code) = run_command(&["validate", path])?;

    assert_eq!(code, 0);
    Ok(())
}

#[test]
fn test_invalid_scenario_exit_code() -> Result<()> {
    let (_dir, path) = write_scenario(fixtures::EMPTY_STEPS);

    let (stdout, code) = run_command(&["validate", path.to_str().unwrap()])?;

    assert_eq!(code, 3);
    let error = error_json(&stdout);
    assert_eq!(error["error"], true);
    assert_eq!(error["exit_code"], 3);
    assert!(error["message"].as_str().unwrap().contains("no steps"));
    Ok(())
}

#[test]
fn test_malformed_scenario_exit_code() -> Result<()> {
    let (_dir, path) = write_scenario("{ \"name\": \"broken\", ");

    let (_, code) = run_command(&["validate", path.to_str().unwrap()])?;

    assert_eq!(code, 3);
    Ok(())
}

#[test]
fn test_missing_scenario_file() -> Result<()> {
    let (stdout, code) = run_command(&["validate", "/nonexistent/scenario.json"])?;

    assert_eq!(code, 1);
    assert!(error_json(&stdout)["message"]
        .as_str()
        .unwrap()
        .contains("Failed to read scenario"));
    Ok(())
}

#[test]
fn test_run_without_webdriver_server() -> Result<()> {
    let (dir, path) = write_scenario(fixtures::VALID_SCENARIO);
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"capabilities": {"platformName": "Android"}}"#)?;

    let (stdout, code) = run_command(&[
        "run",
        path.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--webdriver-url",
        "http://127.0.0.1:9",
    ])?;

    assert_eq!(code, 4);
    assert_eq!(error_json(&stdout)["exit_code"], 4);
    Ok(())
}

#[test]
fn test_run_rejects_bad_webdriver_url() -> Result<()> {
    let (dir, path) = write_scenario(fixtures::VALID_SCENARIO);
    let config = dir.path().join("config.json");
    std::fs::write(&config, "{}")?;

    let (stdout, code) = run_command(&[
        "run",
        path.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--webdriver-url",
        "not a url",
    ])?;

    assert_eq!(code, 1);
    assert!(error_json(&stdout)["message"]
        .as_str()
        .unwrap()
        .contains("Invalid WebDriver URL"));
    Ok(())
}

#[test]
fn test_version() -> Result<()> {
    let (stdout, code) = run_command(&["version"])?;

    assert_eq!(code, 0);
    assert!(stdout.starts_with("navcheck v"));
    Ok(())
}
