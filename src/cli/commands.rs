// src/cli/commands.rs
use clap::Subcommand;

use crate::cli::SettingsArgs;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Show the entropy of passwords generated with the given settings
    Entropy {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Generate passwords
    Generate {
        #[command(flatten)]
        settings: SettingsArgs,

        /// How many passwords to generate
        #[arg(long, short, default_value_t = 1)]
        count: usize,
    },

    /// Draw random words for a memorable sentence
    Words {
        /// Number of words (defaults to SENTENCE_WORD_COUNT)
        count: Option<usize>,
    },

    /// List the storage providers a vault can use
    Providers,

    /// Run the interactive menu
    Menu,
}
