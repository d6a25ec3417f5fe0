//! CLI for vui-request

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vui_request::VuiConfig;
use vui_request_cli::{OutputFormat, commands};

#[derive(Parser)]
#[command(name = "vui-request")]
#[command(version, about = "Normalize voice assistant requests", long_about = None)]
struct Cli {
    /// Config file path (JSON, or TOML with a .toml extension)
    #[arg(short, long, env = "VUI_REQUEST_CONFIG", global = true)]
    config_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "VUI_REQUEST_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Locale assumed for payloads that do not carry one
    #[arg(long, env = "VUI_REQUEST_DEFAULT_LOCALE", global = true)]
    default_locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Parse a raw payload and print the normalized request
    Parse {
        /// Payload file, `-` for stdin
        file: PathBuf,

        /// Require the payload to be JSON
        #[arg(long)]
        json: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = cli
        .config_file
        .as_deref()
        .map(|path| (path, VuiConfig::load_from_file(path)));

    let mut config = match &loaded {
        Some((_, Ok(cfg))) => cfg.clone(),
        _ => VuiConfig::default(),
    };

    // Override with CLI options
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if let Some(locale) = cli.default_locale {
        config.default_locale = Some(locale);
    }

    // Initialize logging
    let filter = format!(
        "vui_request={0},vui_request_core={0},vui_request_cli={0}",
        config.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &loaded {
        Some((path, Ok(_))) => info!("Configuration loaded from: {}", path.display()),
        Some((_, Err(e))) => warn!(
            "Failed to load config file: {}. Using default configuration.",
            e
        ),
        None => debug!("No config file given, using defaults"),
    }

    match cli.command {
        Commands::Parse { file, json, output } => {
            commands::run_parse(config, &file, json, output)?;
        }
        Commands::Config => {
            commands::run_config(&config)?;
        }
    }

    Ok(())
}
