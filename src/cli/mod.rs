// src/cli/mod.rs
use clap::{Args as ClapArgs, Parser};

pub mod commands;
pub mod handlers;
pub mod menu;

pub use commands::CliCommand;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Command to execute (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<String>,
}

/// Generator settings given on the command line
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Password length (4-40)
    #[arg(long, short)]
    pub length: Option<usize>,

    /// Leave letters out of the alphabet
    #[arg(long)]
    pub no_letters: bool,

    /// Leave digits out of the alphabet
    #[arg(long)]
    pub no_digits: bool,

    /// Leave symbols out of the alphabet
    #[arg(long)]
    pub no_symbols: bool,

    /// Extra characters to allow
    #[arg(long, default_value = "")]
    pub extra: String,
}
