use lingo_service::config::LingoConfig;
use lingo_service::services::metrics::init_metrics;
use lingo_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = LingoConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        "lingo-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    // Recorder must exist before the first request records anything
    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics disabled: {}", e);
    }

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("lingo-service ready on port {}", application.port());

    application.run_until_stopped().await
}
