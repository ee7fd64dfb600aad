use anyhow::Context;
use clap::Parser;
use fitrec_core::FitRecConfig;
use fitrec_engine::Recommender;
use fitrec_server::{app_with_state, state::AppState};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fitrec-server", about = "Hybrid fitness recommendation API")]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Debug logging regardless of RUST_LOG.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = FitRecConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let recommender = Recommender::load(&config).context("loading model, rule tables and population")?;
    let coach = fitrec_coach::adapter_from_config(&config.coaching)?;
    info!(coaching = coach.name(), "coaching adapter ready");

    let state = AppState::new(recommender, coach, Duration::from_millis(config.coaching.timeout_ms));
    let app = app_with_state(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "fitrec-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
