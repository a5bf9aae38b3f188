use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wayvox_app::config::AppConfig;
use wayvox_app::runtime;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("wayvox.toml"));
    tracing::info!(config = %config_path.display(), "Starting WayVox");

    let config = AppConfig::load(&config_path)?;
    runtime::run(config).await
}
