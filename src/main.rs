use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tourism_agent::{AgentConfig, TourismError, TripPlanner, logging, web};

#[derive(Debug, Parser)]
#[command(name = "tourism-agent")]
#[command(version, about = "Answers travel questions with weather and nearby places")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "TOURISM_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer a single question and exit
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

/// Short message for the terminal; known errors get their user-facing wording
fn report(error: &anyhow::Error) -> String {
    match error.downcast_ref::<TourismError>() {
        Some(e) => e.user_message(),
        None => format!("Error: {error:#}"),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AgentConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    let planner = TripPlanner::from_config(&config).context("Failed to build planner")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            web::run(&config.server, planner).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ask { text, json } => {
            let response = planner.plan(&text.join(" ")).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.message);
            }
            Ok(if response.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
