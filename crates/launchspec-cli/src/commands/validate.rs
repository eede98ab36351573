//! Validate command
//!
//! Usage: launchspec validate <COMMAND.json>

use clap::Args;
use launchspec_core::errors::ExError;
use launchspec_core::{validate, Command, LaunchSpecError};
use std::path::PathBuf;

use super::{parse_json, read_document};

const OP: &str = "cli_validate";

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Command document (JSON)
    pub command: PathBuf,
}

/// Execute validate command
pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_document(&args.command, OP)?;
    let command: Command = parse_json(&text, &args.command, OP)?;

    let errors = validate(&command);
    if !errors.is_empty() {
        let err: ExError = LaunchSpecError::Validation {
            command: command.name.clone(),
            errors,
        }
        .into();
        return Err(err.with_op(OP).into());
    }

    println!("✓ Command \"{}\" is valid", command.name);
    Ok(())
}
