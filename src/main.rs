use anyhow::Result;
use clap::{Parser, Subcommand};
use currencyd::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conversion service
    Serve {
        /// Override the listen address from configuration
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Create default configuration
    Setup,
    /// Send a single conversion request to a running service
    Request {
        /// Target currency code, e.g. EUR or JPY
        #[arg(short, long)]
        to_currency: String,
        /// Amount in USD to convert
        #[arg(short, long)]
        amount: f64,
        /// Date for historical rates in YYYY-MM-DD form (latest when omitted)
        #[arg(short, long)]
        date: Option<String>,
        /// Service address to connect to
        #[arg(long, default_value = "127.0.0.1:5555")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(Commands::Request {
            to_currency,
            amount,
            date,
            addr,
        }) => currencyd::run_request(&addr, &to_currency, amount, date.as_deref()).await,
        Some(Commands::Serve { bind }) => {
            currencyd::run_serve(cli.config_path.as_deref(), bind.as_deref()).await
        }
        None => currencyd::run_serve(cli.config_path.as_deref(), None).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> Result<()> {
    use anyhow::Context;

    let path = currencyd::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
server:
  bind: "127.0.0.1:5555"

provider:
  base_url: "https://api.frankfurter.app"
  timeout_secs: 10

cache:
  duration_secs: 3600
  max_entries: 1000
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
