use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mdc_gateway::api::ApiServer;
use mdc_gateway::{Config, Dispatcher, FleetResult, Target};

/// mdcgw - control gateway for networked MDC-style displays
#[derive(Parser)]
#[command(name = "mdcgw", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "MDC_CONFIG")]
    config: Option<PathBuf>,

    /// Display selector: "all" or a 1-based device number
    #[arg(short, long, default_value = "all")]
    display: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server (the default action)
    Serve,
    /// Turn displays on or off
    Power {
        /// "on" or "off"
        state: String,
    },
    /// Set the volume level (0-100; out-of-range values are clamped)
    Volume {
        level: i64,
    },
    /// Mute or unmute audio
    Mute {
        /// "on" or "off"
        state: String,
    },
    /// Switch the input source (hdmi1, hdmi2, dp, vga, magicinfo)
    Input {
        source: String,
    },
    /// Report per-device reachability
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,mdc_gateway=info",
        1 => "info,mdc_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(devices = config.devices.len(), "loaded configuration");

    let dispatcher = Dispatcher::new(config.registry(), config.session);

    let target: Target = cli.display.parse()?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(
                devices = config.devices.len(),
                port = config.api_port,
                "starting MDC gateway"
            );
            return ApiServer::new(dispatcher, config.api_port)
                .run()
                .await
                .map_err(Into::into);
        }
        Command::Power { state } => {
            dispatcher.set_power(target, parse_switch(&state)?).await?
        }
        Command::Volume { level } => dispatcher.set_volume(target, level).await?,
        Command::Mute { state } => dispatcher.set_mute(target, parse_switch(&state)?).await?,
        Command::Input { source } => dispatcher.set_input(target, &source).await?,
        Command::Status => dispatcher.status(target).await?,
    };

    print_result(&result)?;
    Ok(())
}

/// Parse an on/off switch argument
fn parse_switch(state: &str) -> anyhow::Result<bool> {
    match state.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => anyhow::bail!("expected \"on\" or \"off\", got {other:?}"),
    }
}

fn print_result(result: &FleetResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
