use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| autoriza::config::DEFAULT_PATH.to_owned());
    let config = autoriza::config::init(&path)
        .with_context(|| format!("loading config from {path}"))?;

    tracing_subscriber::fmt()
        .with_max_level(
            config
                .log
                .level
                .parse::<tracing::Level>()
                .unwrap_or(tracing::Level::INFO),
        )
        .with_writer(std::io::stderr)
        .init();

    if !std::path::Path::new(&path).exists() {
        tracing::warn!("config file {path} not found, using defaults");
    }
    tracing::info!("backend at {}", config.api.url_prefix);

    autoriza::build(config).run().await
}
