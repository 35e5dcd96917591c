//! Serve command - run the HTTP upload server.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use crate::server::{self, AppState};

use super::common::load_config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to (default: server.host from the configuration)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (default: server.port from the configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for the JSON and CSV exports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Use only the embedded text layer, never OCR
    #[arg(long)]
    no_ocr: bool,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }

    fs::create_dir_all(&config.output.dir)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(
        "Upload limits: {} files, {}MB each",
        config.upload.max_files,
        config.upload.max_file_size_mb()
    );
    info!("Exports go to {}", config.output.dir.display());

    let app = server::router(AppState::new(config, !args.no_ocr));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!(
        "{} Server listening on http://{}",
        style("✓").green(),
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
