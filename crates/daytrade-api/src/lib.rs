pub mod docs;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod helpers;
pub mod router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::{env, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use deadpool_diesel::postgres::Pool;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use daytrade_metrics::MetricsRegistry;

use docs::ApiDoc;
use router::api_router;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub metrics: Arc<MetricsRegistry>,
}

pub struct ApiService {
    state: AppState,
    host: String,
    port: u16,
    openapi_output: Option<PathBuf>,
}

impl ApiService {
    pub fn new(state: AppState, host: &str, port: u16) -> Self {
        Self {
            state,
            host: host.to_owned(),
            port,
            openapi_output: None,
        }
    }

    /// Also write `openapi.json` into `dir` when the service starts.
    #[must_use]
    pub fn with_openapi_output(mut self, dir: Option<PathBuf>) -> Self {
        self.openapi_output = dir;
        self
    }

    /// Serve until `shutdown` is cancelled, then drain in-flight requests.
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        if let Some(dir) = self.openapi_output {
            ApiDoc::generate_openapi_json(dir)?;
        }

        let address = format!("{}:{}", self.host, self.port);
        let socket_addr: SocketAddr = address
            .parse()
            .with_context(|| format!("invalid listen address {address}"))?;
        let listener = TcpListener::bind(socket_addr).await?;

        let timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        tracing::info!(timeout_secs = timeout_secs, "Request timeout configured");

        let state = self.state;
        let app = api_router::<ApiDoc>(state.clone())
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
            .layer(cors_layer_from_env());

        tracing::info!("🧩 API started at http://{}", socket_addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("😱 API server stopped!")
    }
}

fn cors_layer_from_env() -> CorsLayer {
    match env::var("CORS_ALLOWED_ORIGINS") {
        Ok(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        return None;
                    }
                    match HeaderValue::from_str(trimmed) {
                        Ok(value) => Some(value),
                        Err(err) => {
                            tracing::warn!(
                                origin = trimmed,
                                error = %err,
                                "Invalid origin in CORS_ALLOWED_ORIGINS, skipping",
                            );
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS_ALLOWED_ORIGINS was set but no valid origins were parsed; falling back to permissive CORS",
                );
                return CorsLayer::permissive();
            }

            tracing::info!(allowed = %origins, "Configured restricted CORS origins");

            CorsLayer::new()
                .allow_credentials(true)
                .allow_headers(AllowHeaders::mirror_request())
                .allow_methods(AllowMethods::list([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ]))
                .allow_origin(AllowOrigin::list(allowed_origins))
        }
        Err(_) => {
            tracing::info!("CORS_ALLOWED_ORIGINS not set; using permissive CORS configuration");
            CorsLayer::permissive()
        }
    }
}
