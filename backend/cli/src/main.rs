mod config_cmd;
mod probe_cmd;
mod send_menu_cmd;
mod serve_cmd;
mod settings;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use settings::Overrides;

#[derive(Parser)]
#[command(name = "wabot")]
#[command(about = "WhatsApp Business webhook bot with canned replies")]
#[command(version)]
struct Cli {
    /// YAML config file (defaults to $WABOT_CONFIG, ./wabot.yaml, then ~/.wabot/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
        /// Log replies instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Query /health on a running server
    Status {
        /// Server base URL (defaults to http://localhost:<port>)
        #[arg(long)]
        url: Option<String>,
    },
    /// Exercise a running server: health, verification handshake and a sample "hello" event
    Probe {
        /// Server base URL (defaults to http://localhost:<port>)
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the effective configuration with secrets masked
    Config,
    /// Send the quick-reply button menu to a WhatsApp number
    SendMenu {
        /// Recipient phone number, digits only (e.g. 15551234567)
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = match &cli.command {
        Commands::Serve {
            port,
            bind,
            dry_run,
        } => Overrides {
            port: *port,
            bind: bind.clone(),
            dry_run: *dry_run,
        },
        _ => Overrides::default(),
    };
    let config = settings::load(cli.config.as_deref(), overrides).await?;

    logging::init_logger(
        config.log_dir().map(std::path::Path::new),
        config.log_level(),
        config.log_json(),
    )?;

    match cli.command {
        Commands::Serve { .. } => serve_cmd::run(config).await?,
        Commands::Status { url } => {
            let base = url.unwrap_or_else(|| settings::local_base_url(&config));
            status_cmd::run(&base).await?;
        }
        Commands::Probe { url } => {
            let base = url.unwrap_or_else(|| settings::local_base_url(&config));
            probe_cmd::run(&base, &config).await?;
        }
        Commands::Config => config_cmd::run(&config)?,
        Commands::SendMenu { to } => send_menu_cmd::run(&config, &to).await?,
    }

    Ok(())
}
