mod config;
mod routes;
mod telemetry;

use anyhow::Context;
use hisab_assistant::FallbackOrchestrator;
use hisab_parse::{Categorizer, Normalizer, PatternCascade, TransactionExtractor};
use tracing::info;

use crate::config::ServerConfig;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("loading configuration")?;
    telemetry::init(config.log_format)?;

    let extractor = build_extractor(&config)?;
    let assistant = FallbackOrchestrator::from_config(&config.assistant, extractor);
    let app = routes::router(AppState::new(assistant), config.body_limit_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_extractor(config: &ServerConfig) -> anyhow::Result<TransactionExtractor> {
    let categorizer = match &config.category_rules {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading category rules {}", path.display()))?;
            let categorizer = Categorizer::from_toml(&content)
                .with_context(|| format!("parsing category rules {}", path.display()))?;
            info!(path = %path.display(), "Loaded category rules");
            categorizer
        }
        None => Categorizer::default(),
    };
    Ok(TransactionExtractor::new(PatternCascade::new(
        Normalizer::default(),
        categorizer,
    )))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
