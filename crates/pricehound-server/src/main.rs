// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pricehound::{
    EngineSettings, FetchOrchestrator, FetchRequest, MarkupAcquirer, SiteResolver,
};
use pricehound_server::{rest, telemetry};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "pricehound",
    about = "Pricehound: price extraction for e-commerce product pages",
    version,
    after_help = "Run 'pricehound <command> --help' for details on each command."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Never launch a browser; rendering sites fall back to direct HTTP providers
    #[arg(long, global = true)]
    no_render: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API
    Serve {
        /// Listen address (host:port)
        #[arg(long, env = "PRICEHOUND_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
    /// Fetch the current price of one product page
    Fetch {
        /// Product page URL
        url: String,
        /// Currency code reported with the price
        #[arg(long)]
        currency: Option<String>,
    },
    /// Show which providers would handle a URL
    Resolve {
        /// Product page URL
        url: String,
    },
    /// List registered providers
    Providers,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "pricehound", &mut std::io::stdout());
        return Ok(());
    }

    telemetry::init(&cli.log_level, cli.log_json);

    let mut settings = EngineSettings::from_env();
    if cli.no_render {
        settings = settings.without_rendering();
    }

    match cli.command {
        Commands::Serve { addr } => serve(addr, &settings).await,
        Commands::Fetch { url, currency } => fetch(url, currency, &settings).await,
        Commands::Resolve { url } => print_json(&static_engine()?.analyze(&url)),
        Commands::Providers => print_json(&static_engine()?.providers()),
        Commands::Completions { .. } => Ok(()),
    }
}

async fn serve(addr: SocketAddr, settings: &EngineSettings) -> Result<()> {
    tracing::info!("starting Pricehound v{}", env!("CARGO_PKG_VERSION"));
    let engine = Arc::new(
        FetchOrchestrator::launch(settings)
            .await
            .context("failed to start fetch engine")?,
    );

    let state = Arc::new(rest::AppState::new(Arc::clone(&engine)));
    let served = rest::start(addr, state).await;
    engine.shutdown().await;
    served
}

async fn fetch(url: String, currency: Option<String>, settings: &EngineSettings) -> Result<()> {
    let engine = FetchOrchestrator::launch(settings)
        .await
        .context("failed to start fetch engine")?;

    let mut request = FetchRequest::product(url);
    if let Some(currency) = currency {
        request = request.with_param("currency", currency);
    }

    let result = engine.fetch(&request).await;
    engine.shutdown().await;
    let sample = result.context("price fetch failed")?;
    print_json(&sample)
}

/// An engine for routing-only commands; it never acquires markup.
fn static_engine() -> Result<FetchOrchestrator> {
    let resolver = SiteResolver::builtin().context("invalid site table")?;
    Ok(FetchOrchestrator::new(
        resolver,
        Arc::new(MarkupAcquirer::http_only()),
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
