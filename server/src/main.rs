use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkprobe_core::Verdict;
use linkprobe_server::{config, logging, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "linkprobe",
    about = "Check whether a URL points at a direct, non-HTML file",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML config file; built-in defaults apply when omitted.
    #[arg(short, long, env = "LINKPROBE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Address to bind, overriding `server.host`.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind, overriding `server.port`.
    #[arg(short, long, env = "PORT", global = true)]
    port: Option<u16>,

    /// tracing filter directives, e.g. `info,linkprobe_core=trace`.
    #[arg(short, long, env = "RUST_LOG", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Validate a single URL and print the JSON the service would return.
    Check { url: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let mut cfg = config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    let state = AppState::from_config(&cfg).context("failed to set up validator")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!("listening on {addr}");
            linkprobe_server::run(listener, state).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { url } => {
            match state.validator().validate(&url, state.transport()).await {
                Ok(verdict) => {
                    println!("{}", serde_json::to_string(&verdict)?);
                    Ok(match verdict {
                        Verdict::Direct(_) => ExitCode::SUCCESS,
                        Verdict::Rejected { .. } => ExitCode::from(1),
                    })
                }
                Err(err) => {
                    println!("{}", serde_json::json!({ "error": err.to_string() }));
                    Ok(ExitCode::from(2))
                }
            }
        }
    }
}
