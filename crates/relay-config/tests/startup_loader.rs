//! Startup loader tests for relay-config.
// crates/relay-config/tests/startup_loader.rs
// =============================================================================
// Module: Startup Loader Tests
// Description: Validate dotenv overlay, boot sequencing, and typed settings.
// Purpose: Ensure startup fails closed and collaborators get typed settings.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use relay_config::ApiEnv;
use relay_config::EnvFile;
use relay_config::EnvSchema;
use relay_config::EnvSnapshot;
use relay_config::NodeEnv;
use relay_config::SnapshotError;
use relay_config::StartupError;
use relay_config::StartupLoader;
use relay_config::boot_from;
use relay_config::env_example;

mod common;

type TestResult = Result<(), String>;

/// Writes a dotenv file into `dir`.
fn write_env_file(dir: &tempfile::TempDir, content: &str) -> Result<PathBuf, String> {
    let path = dir.path().join("test.env");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Loader reading the dotenv file at `path`.
fn loader_for(path: PathBuf) -> StartupLoader {
    StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Path(path))
}

#[test]
fn dotenv_fills_unset_variables() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_env_file(
        &dir,
        "SLACK_APP_TOKEN=xapp-file\nSLACK_BOT_TOKEN=xoxb-file\nNEXT_PUBLIC_API_BASE=http://localhost:4000\n",
    )?;
    let snapshot = loader_for(path).snapshot(EnvSnapshot::default()).map_err(|err| err.to_string())?;
    if snapshot.text("SLACK_BOT_TOKEN") != Some("xoxb-file") {
        return Err("dotenv entry was not applied".to_string());
    }
    Ok(())
}

#[test]
fn process_variables_win_over_dotenv() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_env_file(&dir, "PORT=1234\nNODE_ENV=test\n")?;
    let loader = loader_for(path);
    let snapshot = loader.snapshot(common::valid_snapshot()).map_err(|err| err.to_string())?;
    let config = loader.resolve(&snapshot).map_err(|err| err.to_string())?;
    if config.text("NODE_ENV") != Some("production") {
        return Err(format!("process NODE_ENV should win, got {:?}", config.get("NODE_ENV")));
    }
    if config.number("PORT").map(|port| port.to_string()) != Some("8080".to_string()) {
        return Err(format!("process PORT should win, got {:?}", config.get("PORT")));
    }
    Ok(())
}

#[test]
fn explicit_missing_env_file_is_fatal() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let loader = loader_for(dir.path().join("absent.env"));
    match loader.snapshot(common::valid_snapshot()) {
        Err(StartupError::EnvFile(SnapshotError::NotFound { .. })) => Ok(()),
        other => Err(format!("expected missing file error, got {other:?}")),
    }
}

#[test]
fn malformed_env_file_is_fatal() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_env_file(&dir, "THIS LINE IS NOT AN ASSIGNMENT\n")?;
    match loader_for(path).snapshot(EnvSnapshot::default()) {
        Err(StartupError::EnvFile(SnapshotError::Read { .. })) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn disabled_env_file_uses_snapshot_only() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    let snapshot = loader.snapshot(EnvSnapshot::default()).map_err(|err| err.to_string())?;
    if !snapshot.is_empty() {
        return Err("disabled env file must not add variables".to_string());
    }
    Ok(())
}

#[test]
fn resolve_failure_exposes_violations() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    match loader.resolve(&common::snapshot_without("SLACK_APP_TOKEN")) {
        Err(err) => {
            let names = err.violations().iter().map(|v| v.variable.as_str()).collect::<Vec<_>>();
            if names == ["SLACK_APP_TOKEN"] {
                Ok(())
            } else {
                Err(format!("unexpected violations: {names:?}"))
            }
        }
        Ok(config) => Err(format!("expected failure, got {config:?}")),
    }
}

#[test]
fn boot_builds_typed_collaborator_settings() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    let boot = boot_from(&loader, &common::valid_snapshot()).map_err(|err| err.to_string())?;
    if boot.env.http.environment != NodeEnv::Production || boot.env.http.port != 8080 {
        return Err(format!("unexpected http settings: {:?}", boot.env.http));
    }
    if boot.env.slack.bot_token.expose() != "xoxb-test" {
        return Err("bot token not carried through".to_string());
    }
    if boot.env.public_api_base.as_str() != "https://api.example.com/v1" {
        return Err(format!("unexpected api base: {}", boot.env.public_api_base));
    }
    if boot.env.missing_production_signing_secret() {
        return Err("signing secret is configured".to_string());
    }
    let rendered = format!("{:?}", boot.env.slack);
    if rendered.contains("xoxb-test") || rendered.contains("signing-test") {
        return Err(format!("credentials leaked through Debug: {rendered}"));
    }
    Ok(())
}

#[test]
fn listener_rejects_ports_outside_tcp_range() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    for raw in ["70000", "-1", "80.5"] {
        let snapshot = common::snapshot_with("PORT", raw);
        let config = loader.resolve(&snapshot).map_err(|err| format!("{raw}: {err}"))?;
        match ApiEnv::from_resolved(&config) {
            Err(err) => match err.violations() {
                [violation] if violation.variable == "PORT" && violation.kind.code() == "out_of_range" => {}
                other => return Err(format!("{raw}: unexpected violations {other:?}")),
            },
            Ok(env) => return Err(format!("{raw}: expected port rejection, got {:?}", env.http)),
        }
        if boot_from(&loader, &snapshot).is_ok() {
            return Err(format!("{raw}: boot must fail for an unusable port"));
        }
    }
    Ok(())
}

#[test]
fn listener_accepts_port_bounds() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    for (raw, expected) in [("0", 0_u16), ("65535", 65_535), ("8e3", 8_000)] {
        let boot = boot_from(&loader, &common::snapshot_with("PORT", raw))
            .map_err(|err| format!("{raw}: {err}"))?;
        if boot.env.http.port != expected {
            return Err(format!("{raw}: expected {expected}, got {}", boot.env.http.port));
        }
    }
    Ok(())
}

#[test]
fn production_without_signing_secret_is_flagged() -> TestResult {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(EnvFile::Disabled);
    let boot = boot_from(&loader, &common::snapshot_without("SLACK_SIGNING_SECRET"))
        .map_err(|err| err.to_string())?;
    if !boot.env.missing_production_signing_secret() {
        return Err("missing production signing secret should be flagged".to_string());
    }
    if boot.env.slack.signing_secret.is_some() {
        return Err("signing secret should be absent".to_string());
    }
    Ok(())
}

#[test]
fn example_env_file_boots_cleanly() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_env_file(&dir, &env_example())?;
    let loader = loader_for(path);
    let snapshot = loader.snapshot(EnvSnapshot::default()).map_err(|err| err.to_string())?;
    let boot = boot_from(&loader, &snapshot).map_err(|err| err.to_string())?;
    if boot.env.http.port != 4000 || boot.env.http.environment != NodeEnv::Development {
        return Err(format!("unexpected example settings: {:?}", boot.env.http));
    }
    Ok(())
}
