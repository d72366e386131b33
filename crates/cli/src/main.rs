//! protoc-gen-cmd
//!
//! protoc plugin that adds a command id and name to configured messages.
//! Invoked by protoc, never directly:
//!
//! ```text
//! protoc --csharp_out=gen --cmd_out=gen --cmd_opt=lang=csharp,config=cmd.yaml game.proto
//! ```
//!
//! Logs go to stderr; set `PROTOC_GEN_CMD_LOG` (e.g. `debug`) to see them.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use protoc_gen_cmd_generator::{Driver, GeneratorRegistry};
use protoc_gen_cmd_parser::{read_request, write_response};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PROTOC_GEN_CMD_LOG";

#[derive(Parser)]
#[command(name = "protoc-gen-cmd", disable_help_flag = true, disable_version_flag = true)]
struct Cli {}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "protoc-gen-cmd".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    Cli::try_parse().context("this program should be run by protoc, not directly")?;

    let request = read_request(io::stdin().lock()).context("Failed to read CodeGeneratorRequest")?;
    tracing::debug!(
        files = request.file_to_generate.len(),
        parameter = request.parameter(),
        "received request"
    );

    let registry = GeneratorRegistry::with_builtin();
    let response = Driver::new(&registry).respond(&request)?;

    tracing::info!(files = response.file.len(), "generation complete");
    write_response(io::stdout().lock(), &response).context("Failed to write CodeGeneratorResponse")?;

    Ok(())
}

/// Stdout carries the response, so everything is logged to stderr
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
