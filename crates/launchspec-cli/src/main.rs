//! launchspec CLI
//!
//! Validate and resolve container Command declarations from the command line

use clap::{Parser, Subcommand, ValueEnum};
use launchspec_core::logging_facility::{init, Profile};

mod commands;
mod config_store;

#[derive(Debug, Parser)]
#[command(name = "launchspec")]
#[command(about = "launchspec - Resolve container Command declarations", long_about = None)]
struct Cli {
    /// Log format; logging is off unless set
    #[arg(long, value_enum, global = true)]
    log: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Dev,
    /// JSON lines
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a Command document for structural errors
    Validate(commands::validate::ValidateArgs),
    /// Resolve a Command document into a launch-ready command
    Resolve(commands::resolve::ResolveArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log {
        Some(LogFormat::Dev) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
