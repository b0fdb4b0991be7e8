use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use penwatch::core::log::init_logging;

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

impl From<Commands> for penwatch::AppCommand {
    fn from(cmd: Commands) -> penwatch::AppCommand {
        match cmd {
            Commands::Dashboard {
                amount,
                window,
                auto_refresh,
            } => penwatch::AppCommand::Dashboard {
                amount,
                window,
                auto_refresh,
            },
            Commands::Watch { amount, window } => penwatch::AppCommand::Watch { amount, window },
            Commands::Convert { amount } => penwatch::AppCommand::Convert { amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the exchange dashboard once
    Dashboard {
        /// USD amount for the quick conversion
        #[arg(short, long)]
        amount: Option<f64>,
        /// History window in days (7, 30 or 365)
        #[arg(short, long)]
        window: Option<u32>,
        /// Keep refreshing every 60 seconds
        #[arg(long)]
        auto_refresh: bool,
    },
    /// Display the dashboard and refresh it every 60 seconds
    Watch {
        /// USD amount for the quick conversion
        #[arg(short, long)]
        amount: Option<f64>,
        /// History window in days (7, 30 or 365)
        #[arg(short, long)]
        window: Option<u32>,
    },
    /// Convert a USD amount at the latest rate
    Convert {
        /// USD amount to convert
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => penwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = penwatch::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  yahoo:
    base_url: "https://query1.finance.yahoo.com"

amount: 100.0
window_days: 365
auto_refresh: false
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
