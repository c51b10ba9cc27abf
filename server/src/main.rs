mod client;
mod config;
mod http;
mod store;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::ClientConfig;
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
    store::RosterStore,
};

#[derive(Parser, Debug)]
#[command(name = "salary-roster", version, about = "Employee salary roster")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the roster HTTP backend.
    Serve(ServeCommand),
    /// Print the names and salary entries the backend currently holds.
    Show(ClientArgs),
    /// Submit the new-name form.
    AddName {
        #[command(flatten)]
        client: ClientArgs,
        name: String,
    },
    /// Submit the salary entry form.
    AddEntry {
        #[command(flatten)]
        client: ClientArgs,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        salary: Option<f64>,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, value_name = "FILE", help = "CSV file holding salary entries")]
    data_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Backend base URL; falls back to `ROSTER_API_URL`, then `http://localhost:8080`.
    #[arg(long)]
    api_url: Option<String>,
}

impl From<&ClientArgs> for ClientConfig {
    fn from(value: &ClientArgs) -> Self {
        value
            .api_url
            .clone()
            .map(ClientConfig::new)
            .unwrap_or_else(ClientConfig::from_env)
    }
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

// Client subcommands are driven by `block_on` on the main thread and never
// spawn, so the `Rc`-based form stays on one thread.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => {
            init_tracing(ObsConfig::default())?;
            run_server(cmd).await
        }
        Command::Show(args) => {
            init_tracing(ObsConfig::cli())?;
            client::show(&ClientConfig::from(&args)).await
        }
        Command::AddName { client: args, name } => {
            init_tracing(ObsConfig::cli())?;
            client::add_name(&ClientConfig::from(&args), name).await
        }
        Command::AddEntry {
            client: args,
            name,
            salary,
            year,
        } => {
            init_tracing(ObsConfig::cli())?;
            client::add_entry(&ClientConfig::from(&args), name, salary, year).await
        }
    }
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = AppConfig::load()?.with_data_file(cmd.data_file.clone());
    info!(path = %config.data_file.display(), origins = config.cors_allowed_origins.len(), "starting roster backend");
    let store = RosterStore::open(&config.data_file)
        .with_context(|| format!("failed to load {}", config.data_file.display()))?;
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };
    http::serve((&cmd).into(), state).await
}
