// crates/relay-cli/src/main.rs
// ============================================================================
// Module: Relay API CLI Entry Point
// Description: Command dispatcher for Relay API startup and environment tooling.
// Purpose: Validate the environment before serving and expose contract artifacts.
// Dependencies: clap, relay-config, serde_json, thiserror, tracing.
// ============================================================================

//! ## Overview
//! The `relay-api` binary runs the startup preflight for the Relay API and
//! offers offline helpers for the environment contract (validate, show,
//! schema, docs, example). All user-facing strings are routed through the
//! i18n catalog. Security posture: environment inputs are untrusted and
//! secret values are never written to stdout, stderr, or logs.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use relay_cli::logging::LogConfig;
use relay_cli::logging::LogFormat;
use relay_cli::logging::init_logging;
use relay_cli::t;
use relay_config::EnvFile;
use relay_config::EnvSchema;
use relay_config::ResolvedConfig;
use relay_config::StartupLoader;
use relay_config::docs::DOCS_PATH;
use relay_config::error::REDACTED;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "relay-api", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Log output format (overrides `RELAY_LOG_FORMAT`).
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormatArg>,
    /// Dotenv source selection.
    #[command(flatten)]
    env_source: EnvSourceArgs,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Dotenv source flags shared by every command that reads the environment.
#[derive(Args, Debug, Default)]
struct EnvSourceArgs {
    /// Dotenv file to overlay on the process environment (must exist).
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "no_env_file")]
    env_file: Option<PathBuf>,
    /// Ignore dotenv files and read the process environment only.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    no_env_file: bool,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the environment and report the settings the API would start with.
    Preflight,
    /// Environment contract utilities.
    Env {
        /// Selected env subcommand.
        #[command(subcommand)]
        command: EnvCommand,
    },
}

/// Environment subcommands.
#[derive(Subcommand, Debug)]
enum EnvCommand {
    /// Validate the environment against the contract.
    Validate,
    /// Print the resolved environment with secrets masked.
    Show(EnvShowCommand),
    /// Print the environment JSON schema.
    Schema,
    /// Render, write, or verify the environment docs.
    Docs(EnvDocsCommand),
    /// Print an example dotenv file.
    Example,
}

/// Arguments for `env show`.
#[derive(Args, Debug)]
struct EnvShowCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ShowFormat::Text)]
    format: ShowFormat,
}

/// Arguments for `env docs`.
#[derive(Args, Debug)]
struct EnvDocsCommand {
    /// Write the docs file instead of printing it.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "check")]
    write: bool,
    /// Verify the docs file matches the generated output.
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,
    /// Docs file location (defaults to `Docs/configuration/environment.md`).
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,
}

/// Output formats for `env show`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ShowFormat {
    /// `NAME=value` lines.
    Text,
    /// Pretty-printed JSON object.
    Json,
}

/// Log formats accepted by `--log-format`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormatArg {
    /// Human-readable lines.
    Human,
    /// One JSON object per line.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Rendered error message.
    message: String,
}

impl CliError {
    /// Creates a new CLI error with the provided message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let log_config = LogConfig::from_env(cli.log_format.map(LogFormat::from))
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))?;
    init_logging(&log_config).map_err(|err| CliError::new(t!("logging.init_failed", error = err)))?;

    let env_file = resolve_env_file(&cli.env_source);
    match command {
        Commands::Preflight => command_preflight(env_file),
        Commands::Env {
            command,
        } => command_env(command, env_file),
    }
}

/// Maps dotenv flags to a startup file selection.
fn resolve_env_file(args: &EnvSourceArgs) -> EnvFile {
    if args.no_env_file {
        return EnvFile::Disabled;
    }
    args.env_file.clone().map_or(EnvFile::Default, EnvFile::Path)
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Preflight Command
// ============================================================================

/// Executes the `preflight` command.
fn command_preflight(env_file: EnvFile) -> CliResult<ExitCode> {
    let bootstrap = relay_config::boot(env_file)
        .map_err(|err| CliError::new(t!("startup.failed", error = err)))?;
    let env = &bootstrap.env;
    let signing_status = if env.slack.signing_secret.is_some() {
        t!("preflight.signing_secret.configured")
    } else {
        t!("preflight.signing_secret.missing")
    };
    let lines = [
        t!("preflight.http", environment = env.http.environment, port = env.http.port),
        t!("preflight.api_base", url = env.public_api_base),
        t!("preflight.signing_secret", status = signing_status),
        t!("preflight.ok"),
    ];
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    info!(variables = bootstrap.config.len(), "preflight passed");
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Env Commands
// ============================================================================

/// Dispatches env subcommands.
fn command_env(command: EnvCommand, env_file: EnvFile) -> CliResult<ExitCode> {
    match command {
        EnvCommand::Validate => command_env_validate(env_file),
        EnvCommand::Show(command) => command_env_show(&command, env_file),
        EnvCommand::Schema => command_env_schema(),
        EnvCommand::Docs(command) => command_env_docs(&command),
        EnvCommand::Example => command_env_example(),
    }
}

/// Loads and validates the environment with the Relay API rule table.
fn load_config(env_file: EnvFile) -> CliResult<Arc<ResolvedConfig>> {
    StartupLoader::new(EnvSchema::api())
        .with_env_file(env_file)
        .load()
        .map_err(|err| CliError::new(t!("startup.failed", error = err)))
}

/// Executes `env validate`.
fn command_env_validate(env_file: EnvFile) -> CliResult<ExitCode> {
    load_config(env_file)?;
    write_stdout_line(&t!("env.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `env show`.
fn command_env_show(command: &EnvShowCommand, env_file: EnvFile) -> CliResult<ExitCode> {
    let config = load_config(env_file)?;
    let output = match command.format {
        ShowFormat::Text => render_show_text(&config),
        ShowFormat::Json => render_json(&config.redacted())?,
    };
    write_stdout_line(output.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `env schema`.
fn command_env_schema() -> CliResult<ExitCode> {
    let output = render_json(&relay_config::env_schema())?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `env docs`.
fn command_env_docs(command: &EnvDocsCommand) -> CliResult<ExitCode> {
    let path = command.path.as_deref();
    let display_path = path.map_or_else(|| DOCS_PATH.to_string(), |path| path.display().to_string());
    if command.write {
        relay_config::write_env_docs(path)
            .map_err(|err| CliError::new(t!("env.docs.failed", error = err)))?;
        write_stdout_line(&t!("env.docs.written", path = display_path))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    if command.check {
        relay_config::verify_env_docs(path)
            .map_err(|err| CliError::new(t!("env.docs.failed", error = err)))?;
        write_stdout_line(&t!("env.docs.up_to_date", path = display_path))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let markdown = relay_config::env_docs_markdown()
        .map_err(|err| CliError::new(t!("env.docs.failed", error = err)))?;
    write_stdout_line(markdown.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `env example`.
fn command_env_example() -> CliResult<ExitCode> {
    let example = relay_config::env_example();
    write_stdout_line(example.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders resolved values as sorted `NAME=value` lines, masking secrets.
fn render_show_text(config: &ResolvedConfig) -> String {
    let mut out = String::new();
    for name in config.names() {
        let Some(value) = config.get(name) else {
            continue;
        };
        if config.is_secret(name) {
            let _ = writeln!(&mut out, "{name}={REDACTED}");
        } else {
            let _ = writeln!(&mut out, "{name}={value}");
        }
    }
    out
}

/// Renders a JSON value with stable pretty formatting.
fn render_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
