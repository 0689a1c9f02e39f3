use std::{fs::File, path::PathBuf, process::ExitCode, sync::Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use holdings::{
    group::group_by_asset_class,
    loader::{spawn_fetch, HoldingsClient, LoadState, DEFAULT_URL},
    report::{expansion_for, render_report},
    tui::app::App,
    AppEvent,
};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "HOLDINGS_URL", default_value = DEFAULT_URL)]
    url: String,
    /// Tracing output goes here; the terminal belongs to the table.
    #[arg(long)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tui,
    Print {
        /// Asset class to show expanded, may be repeated
        #[arg(long)]
        expand: Vec<String>,
        /// Also expand holdings that have no asset class
        #[arg(long)]
        expand_unclassified: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(err) = init_tracing(args.log_path.as_ref()) {
        eprintln!("{}", format!("Could not set up logging: {:#}", err).red());
        return ExitCode::FAILURE;
    }

    let result = match args.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_tui(&args.url).await,
        Commands::Print {
            expand,
            expand_unclassified,
        } => run_print(&args.url, &expand, expand_unclassified).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{:#}", err).red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_path: Option<&PathBuf>) -> Result<()> {
    let file_layer = match log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("{}=debug,reqwest=debug", env!("CARGO_CRATE_NAME")).into()
        }))
        .with(file_layer)
        .init();

    Ok(())
}

async fn run_tui(url: &str) -> Result<()> {
    let client = HoldingsClient::new(url)?;

    let (tx, rx) = tokio::sync::mpsc::channel::<AppEvent>(8);
    let mut app = App::new(rx);
    app.attach_fetch(spawn_fetch(client, tx));

    let result = app.run().await;
    info!("Holdings view closed");
    result
}

async fn run_print(url: &str, expand: &[String], expand_unclassified: bool) -> Result<()> {
    let client = HoldingsClient::new(url)?;

    let mut load = LoadState::default();
    load.begin();
    load.finish(client.fetch_holdings().await);

    if let Some(error) = load.error {
        anyhow::bail!(error);
    }

    let grouping = group_by_asset_class(&load.holdings);
    let expansion = expansion_for(expand, expand_unclassified);

    println!("{}", render_report(&grouping, &expansion));
    Ok(())
}
