use crate::config::{CorsConfig, LingoConfig};
use crate::handlers;
use crate::middleware::credential_middleware;
use crate::services::providers::openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};
use crate::services::{
    AuthResolver, CrewGateway, GenerationGateway, ProfileStore, SupabaseIdentityClient,
    SupabaseProfileStore,
};
use axum::{
    body::Body,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    http_request_span, metrics_middleware, panic_response, request_id_middleware,
    security_headers_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

const SUPABASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Collaborators shared by every request. Nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthResolver,
    pub profiles: Arc<dyn ProfileStore>,
    pub generator: Arc<dyn GenerationGateway>,
}

impl AppState {
    /// Wire the Supabase adapters and the LLM crew gateway from config.
    pub fn from_config(config: &LingoConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(SUPABASE_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;

        let verifier = SupabaseIdentityClient::new(http.clone(), config.supabase.clone());
        let profiles = SupabaseProfileStore::new(http, config.supabase.clone());

        let provider = OpenAiCompatProvider::new(OpenAiCompatConfig::from(&config.llm))
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        tracing::info!(
            provider = config.llm.provider.as_str(),
            model = %config.llm.model,
            timeout_secs = config.llm.timeout_secs,
            "LLM provider configured"
        );

        Ok(Self {
            auth: AuthResolver::new(Arc::new(verifier)),
            profiles: Arc::new(profiles),
            generator: Arc::new(CrewGateway::new(Arc::new(provider), config.llm.timeout())),
        })
    }
}

/// Full HTTP surface: `/health`, `/metrics` and the authenticated `/api` routes.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let api = Router::new()
        .route("/api/random-phrase", post(handlers::random_phrase))
        .route("/api/translate", post(handlers::translate))
        .layer(from_fn(credential_middleware))
        .layer(cors_layer(cors));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(api)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: LingoConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(&config, state).await
    }

    /// Bind and prepare the server around an already-wired state.
    pub async fn build_with_state(config: &LingoConfig, state: AppState) -> Result<Self, AppError> {
        let app = build_router(state, &config.cors);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
