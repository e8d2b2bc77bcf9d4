use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use anonsetup_api::{OllamaApi, RuntimeClient};
use anonsetup_config::AppConfig;
use anonsetup_ui::wizard::{self, WizardStep};

const CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Parser)]
#[command(
    name = "anonsetup",
    version,
    about = "Guided setup for local document anonymization with Ollama"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch the guided setup wizard (the default).
    Run,
    /// Print runtime status, installed models, and configuration.
    Doctor,
    /// Probe the Ollama endpoint; the exit status reflects reachability.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = AppConfig::load_from(CONFIG_PATH)?;
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_wizard(&mut config).await?,
        Commands::Doctor => run_doctor(&config).await,
        Commands::Check => run_check(&config).await,
    }

    Ok(())
}

async fn run_wizard(config: &mut AppConfig) -> Result<()> {
    let api = Arc::new(OllamaApi::new(config.ollama.base_url.clone()));
    let session = wizard::run_wizard(config, api).await?;

    if session.current_step == WizardStep::Complete {
        config.wizard.completed = true;
        if !session.selected_model.is_empty() {
            config.ollama.default_model = session.selected_model.clone();
        }
        config.save_to(CONFIG_PATH)?;
        println!(
            "setup complete: model '{}' ready at {}",
            config.ollama.default_model, config.ollama.base_url
        );
    } else {
        println!("setup exited early; run `anonsetup` again to pick up from the start");
    }

    Ok(())
}

async fn run_doctor(config: &AppConfig) {
    let api = OllamaApi::new(config.ollama.base_url.clone());

    println!("anonsetup doctor");
    println!("- endpoint: {}", api.base_url());
    println!("- default model: {}", config.ollama.default_model);
    println!(
        "- wizard completed: {}",
        if config.needs_setup() { "no" } else { "yes" }
    );

    if api.probe().await {
        println!("- ollama: reachable");
        let models = api.installed_models().await;
        if models.is_empty() {
            println!("- installed models: none (run: ollama pull <model>)");
        } else {
            println!("- installed models:");
            for model in models {
                println!(
                    "    {:<24} {:>9}  {}",
                    model.name,
                    format_size(model.size),
                    model.modified_at
                );
            }
        }
    } else {
        println!("- ollama: unreachable (not installed or not running)");
    }
}

async fn run_check(config: &AppConfig) {
    let api = OllamaApi::new(config.ollama.base_url.clone());
    if api.probe().await {
        println!("ok: {}", api.base_url());
    } else {
        eprintln!("unreachable: {}", api.base_url());
        std::process::exit(1);
    }
}

fn format_size(bytes: u64) -> String {
    const GB: f64 = 1_000_000_000.0;
    const MB: f64 = 1_000_000.0;
    let value = bytes as f64;
    if value >= GB {
        format!("{:.1} GB", value / GB)
    } else if value >= MB {
        format!("{:.0} MB", value / MB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn formats_model_sizes_like_the_catalog() {
        assert_eq!(format_size(4_700_000_000), "4.7 GB");
        assert_eq!(format_size(8_100_000_000), "8.1 GB");
        assert_eq!(format_size(250_000_000), "250 MB");
        assert_eq!(format_size(512), "512 B");
    }
}
