use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;

use vault_sync::cli::{handlers, menu, Args, CliCommand};
use vault_sync::logging;
use vault_sync::utils::format_entropy;
use vault_sync::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let mut config = Config::load();
    if let Some(file) = &args.log_file {
        config.log_file = Some(PathBuf::from(file));
    }
    logging::init(&config)?;
    log::debug!("Loaded config: {:?}", config);

    match args.command.unwrap_or(CliCommand::Menu) {
        CliCommand::Entropy { settings } => {
            let settings = handlers::settings_from_args(&settings, &config)?;
            let (bits, rating) = handlers::handle_entropy(&settings);
            println!("{} ({})", style(format_entropy(bits)).cyan(), rating);
        }
        CliCommand::Generate { settings, count } => {
            let settings = handlers::settings_from_args(&settings, &config)?;
            match handlers::handle_generate(&settings, count) {
                Some(passwords) => {
                    for password in passwords {
                        println!("{}", password);
                    }
                }
                None => {
                    eprintln!("⚠️ No characters left to draw from; enable a class or add extra characters");
                    std::process::exit(1);
                }
            }
        }
        CliCommand::Words { count } => {
            let words = handlers::handle_words(count.unwrap_or(config.sentence_word_count));
            println!("{}", words.join(" "));
        }
        CliCommand::Providers => {
            for (provider, title, description) in handlers::handle_providers() {
                println!("{:<8} {}  {}", style(provider).bold(), title, style(description).dim());
            }
        }
        CliCommand::Menu => {
            menu::run_cli_menu(&config).await?;
        }
    }

    Ok(())
}
