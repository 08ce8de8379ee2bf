//! Command line entry point of the virtual N5 server
//!
//! Run with: cargo run --release -- --port 8000

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use virtual_n5::{server, ServerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Serve a synthetic multiscale N5 volume over HTTP")]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Highest pyramid level to serve
    #[arg(long)]
    max_scale: Option<u32>,

    /// Verbose per-request logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_scale) = self.max_scale {
            config.dataset.max_scale = max_scale;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug {
        "virtual_n5=debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = args.into_config()?;
    server::serve(config).await
}
