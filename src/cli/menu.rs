// src/cli/menu.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use console::style;
use inquire::{Confirm, Password, Select, Text};

use crate::core::auth::RootPasswordChange;
use crate::core::config::Config;
use crate::core::generator::{GeneratorController, GeneratorSettingsBinding};
use crate::core::vault::{RestoreRequest, VaultCreation, VaultField};
use crate::host::{channel, HostClient, HostError, LocalHost, MessageHost};
use crate::storage::StorageProvider;
use crate::utils::{format_entropy, format_time_ago};

fn print_entropy(binding: &GeneratorSettingsBinding) {
    println!(
        "   Strength: {} ({})",
        style(format_entropy(binding.entropy_bits())).cyan(),
        binding.strength()
    );
}

fn print_host_error(action: &str, error: &HostError) {
    println!("❌ {} failed: {}", action, style(error).red());
}

pub async fn run_cli_menu(config: &Config) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════╗");
    println!("║        🔐 VAULT SYNC GENERATOR        ║");
    println!("╚══════════════════════════════════════╝");

    let root_password = Password::new("🔐 Set the root password for this session:")
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()?;

    let local = Arc::new(LocalHost::from_config(config, &root_password)?);
    let (client, server) = channel::serve(Arc::clone(&local), config.channel_buffer);
    let client: Arc<HostClient> = Arc::new(client);
    log::info!("Background host started");

    let controller = GeneratorController::new(Arc::clone(&client), config.quiet_period);

    loop {
        let options = vec![
            "🔐  Generate password",
            "⚙️  Edit generator settings",
            "📜  Generation history",
            "🗄️  Create vault",
            "♻️  Restore from URL",
            "🔁  Change root password",
            "❌  Exit",
        ];

        let choice = Select::new("What would you like to do?", options).prompt()?;
        match choice {
            "🔐  Generate password" => {
                controller.request_password().await?;
                let state = controller.generated();
                match (state.last_result, state.last_error) {
                    (_, Some(e)) => print_host_error("Generation", &e),
                    (Some(Some(password)), None) => {
                        println!("\nGenerated Password: {}", style(password).green().bold());
                        print_entropy(controller.settings());
                    }
                    _ => println!("⚠️ No password available with the current settings"),
                }
            }
            "⚙️  Edit generator settings" => {
                edit_settings(controller.settings()).await?;
            }
            "📜  Generation history" => match client.generated_history().await {
                Ok(history) if history.is_empty() => println!("Nothing generated yet"),
                Ok(history) => {
                    let now = Utc::now();
                    for entry in history.iter().rev() {
                        println!(
                            "  {}  {}  {}",
                            style(entry.uuid).dim(),
                            format_entropy(entry.entropy),
                            format_time_ago(entry.creation_timestamp, now)
                        );
                    }
                }
                Err(e) => print_host_error("Loading history", &e),
            },
            "🗄️  Create vault" => {
                let mut creation = VaultCreation::new(Arc::clone(&client));

                let titles: Vec<&str> = StorageProvider::ALL.iter().map(|p| p.metadata().title).collect();
                let title = Select::new("Where should the vault be stored?", titles).prompt()?;
                if let Some(provider) = StorageProvider::ALL.into_iter().find(|p| p.metadata().title == title) {
                    creation.select_provider(provider);
                }

                creation.set_name(&Text::new("Vault name:").prompt()?);
                match creation.submit() {
                    Ok(handle) => {
                        handle.await?;
                        match creation.status().last_error {
                            Some(e) => print_host_error("Vault creation", &e),
                            None => println!(
                                "✅ Vault {} created",
                                style(creation.form().value(VaultField::Name).map_or("", String::as_str)).green()
                            ),
                        }
                    }
                    Err(_) => println!("❌ Vault names must be 1-64 characters"),
                }
            }
            "♻️  Restore from URL" => {
                let mut restore = RestoreRequest::new(Arc::clone(&client));
                restore.set_url(&Text::new("Archive URL:").prompt()?);
                match restore.submit() {
                    Ok(handle) => {
                        handle.await?;
                        match restore.status().last_error {
                            Some(e) => print_host_error("Restore", &e),
                            None => println!("✅ Restore requested"),
                        }
                    }
                    Err(_) => println!("❌ Enter an http, https or file URL"),
                }
            }
            "🔁  Change root password" => {
                change_root_password(Arc::clone(&client), config).await?;
            }
            "❌  Exit" => break,
            _ => {}
        }
    }

    // Let a pending settings commit reach the host before shutting down
    if controller.settings().is_pending() {
        tokio::time::sleep(controller.settings().state().quiet_period() + Duration::from_millis(50)).await;
    }
    drop(controller);
    drop(client);
    server.abort();
    println!("👋 Goodbye!");
    Ok(())
}

async fn edit_settings(binding: &GeneratorSettingsBinding) -> anyhow::Result<()> {
    let current = binding.current();
    print_entropy(binding);

    let length: usize = Text::new("Password length (4-40):")
        .with_default(&current.password_length.to_string())
        .prompt()
        .and_then(|s| s.trim().parse().map_err(|_| inquire::InquireError::Custom("Invalid number".into())))?;
    binding.update(|s| s.password_length = length);
    print_entropy(binding);

    let letters = Confirm::new("Include letters?").with_default(current.password_letters).prompt()?;
    binding.update(|s| s.password_letters = letters);
    print_entropy(binding);

    let digits = Confirm::new("Include digits?").with_default(current.password_digits).prompt()?;
    binding.update(|s| s.password_digits = digits);
    print_entropy(binding);

    let symbols = Confirm::new("Include symbols?").with_default(current.password_symbols).prompt()?;
    binding.update(|s| s.password_symbols = symbols);
    print_entropy(binding);

    let extra = Text::new("Extra characters:")
        .with_default(&current.password_extra)
        .prompt()?;
    binding.update(|s| s.password_extra = extra);
    print_entropy(binding);

    // Wait out the quiet period so the outcome of the commit can be shown
    tokio::time::sleep(binding.state().quiet_period() + Duration::from_millis(50)).await;
    while binding.is_pending() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    match binding.last_commit_error() {
        Some(e) => print_host_error("Saving settings", &e),
        None => println!("✅ Settings saved"),
    }
    Ok(())
}

async fn change_root_password<H>(host: Arc<H>, config: &Config) -> anyhow::Result<()>
where
    H: MessageHost + 'static,
{
    let mut flow = RootPasswordChange::new(host, config.sentence_word_count);
    flow.new_challenge();
    let words = flow.words().join(" ");
    println!("Your new root sentence is:\n\n   {}\n", style(&words).yellow().bold());
    println!("Write it down; you will need to type it back.");

    let old = Password::new("Current root password:")
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?;
    flow.set_old_password(&old);
    flow.set_sentence(&Text::new("Type the sentence:").prompt()?);

    match flow.submit() {
        Ok(handle) => {
            handle.await?;
            match flow.feedback() {
                Some(message) => println!("❌ {}", message),
                None => println!("✅ Root password changed"),
            }
        }
        Err(_) => println!("❌ The sentence does not match the words shown"),
    }
    Ok(())
}
