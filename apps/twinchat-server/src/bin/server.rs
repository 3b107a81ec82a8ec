use tracing_subscriber::EnvFilter;

use twinchat_core::config::Config;
use twinchat_hybrid::ChatPipeline;
use twinchat_server::{serve, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let base_dir = std::env::current_dir()?;

    let server = settings.server.clone();

    // Model loading and index building are blocking work.
    let pipeline = tokio::task::spawn_blocking(move || ChatPipeline::from_settings(&settings, &base_dir)).await??;

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    serve(listener, AppState::new(pipeline)).await
}
