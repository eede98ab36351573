//! Resolve command
//!
//! Usage: launchspec resolve <COMMAND.json> [--wrapper <NAME>] [--input NAME=VALUE]...
//!        [--archive <FILE>] [--config-dir <DIR>] [--output <FILE>]

use clap::Args;
use launchspec_core::collaborators::{
    ArchiveLookup, ConfigStore, InMemoryArchive, NoopArchive, NoopConfigStore,
};
use launchspec_core::errors::ExError;
use launchspec_core::{resolve, resolve_wrapper, CallerContext, Command};
use launchspec_core_types::{RequestContext, RequestId};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{parse_json, read_document};
use crate::config_store::DirConfigStore;

const OP: &str = "cli_resolve";

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Command document (JSON)
    pub command: PathBuf,

    /// Resolve through this wrapper
    #[arg(short, long)]
    pub wrapper: Option<String>,

    /// Runtime value, as NAME=VALUE (repeatable)
    #[arg(short, long = "input", value_parser = parse_runtime_value)]
    pub inputs: Vec<(String, String)>,

    /// Archive fixture (JSON) to look objects up in
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Root of the configuration file tree
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Request id to correlate log lines with (default: generated)
    #[arg(long)]
    pub request_id: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_runtime_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got \"{}\"", raw)),
    }
}

/// Execute resolve command
pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_document(&args.command, OP)?;
    let command = Command::from_json_str(&text)
        .map_err(|e| ExError::from(e).with_op(OP))?;

    let archive: Box<dyn ArchiveLookup> = match &args.archive {
        Some(path) => {
            let fixture: Value = parse_json(&read_document(path, OP)?, path, OP)?;
            Box::new(InMemoryArchive::from_fixture(&fixture)?)
        }
        None => Box::new(NoopArchive),
    };
    let config: Box<dyn ConfigStore> = match &args.config_dir {
        Some(root) => Box::new(DirConfigStore::new(root)),
        None => Box::new(NoopConfigStore),
    };

    let request = match &args.request_id {
        Some(id) => RequestContext::with_request_id(RequestId::from_string(id.clone())),
        None => RequestContext::new(),
    };
    let caller = CallerContext::new(archive.as_ref()).with_request(request.clone());
    let runtime_values: BTreeMap<String, String> = args.inputs.into_iter().collect();

    let resolved = match &args.wrapper {
        Some(wrapper) => resolve_wrapper(
            &command,
            wrapper,
            &runtime_values,
            &caller,
            config.as_ref(),
        ),
        None => resolve(&command, &runtime_values, &caller, config.as_ref()),
    }
    .map_err(|e| {
        ExError::from(e)
            .with_op(OP)
            .with_command(command.name.clone())
            .with_context(&request)
    })?;

    let rendered = serde_json::to_string_pretty(&resolved)?;
    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Resolved to {}", output_path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
