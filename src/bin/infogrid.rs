use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use infogrid::app::{self, AppOpts};

#[derive(Parser, Debug)]
#[command(name = "infogrid", version, about = "Grid of refreshing information cells on a framebuffer")]
struct Cli {
    /// Configuration JSON.
    #[arg(long, default_value = app::DEFAULT_CONFIG)]
    config: PathBuf,

    /// Framebuffer device.
    #[arg(long, default_value = app::DEFAULT_FBDEV)]
    fbdev: PathBuf,

    /// Serve a PNG mirror of the screen over HTTP on this port.
    #[arg(long)]
    port: Option<u16>,

    /// Stop after this many page activations.
    #[arg(long)]
    cycles: Option<usize>,

    /// Give up on a remote image download after this many seconds.
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let opts = AppOpts {
        config_path: cli.config,
        fbdev: cli.fbdev,
        mirror_port: cli.port,
        cycles: cli.cycles,
        fetch_timeout: cli.fetch_timeout_secs.map(Duration::from_secs),
    };

    let config = app::load_config(&opts.config_path)
        .with_context(|| format!("load config '{}'", opts.config_path.display()))?;
    tracing::info!(pages = config.pages().len(), "configuration loaded");

    app::run_on_device(&config, &opts)
        .with_context(|| format!("run on '{}'", opts.fbdev.display()))?;
    Ok(())
}
