use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{middleware, Router};
use derivative::Derivative;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorVerbosity,
    import::import_csv_file,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    openapi::api_doc,
    route,
    state::ApiState,
    store::{memory::InMemoryBookStore, BookStore},
};

fn default_api_key_header_name() -> String {
    String::from("x-api-key")
}

#[derive(Derivative, Deserialize)]
#[derivative(Debug)]
pub struct ServerConfig {
    pub socket_address: SocketAddr,
    pub error_verbosity: ErrorVerbosity,
    #[serde(default = "default_api_key_header_name")]
    pub api_key_header_name: String,
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub api_keys: Vec<String>,
    /// CSV file imported into the store before the server starts listening.
    #[serde(default)]
    pub seed_csv: Option<PathBuf>,
    /// Logs every response body. Expensive.
    #[serde(default)]
    pub trace_response_body: bool,
}

impl ServerConfig {
    pub async fn from_config_file(path: &str) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: ServerConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Builds the application router over the given state.
    pub(crate) fn app(state: ApiState, trace_response_body_enabled: bool) -> Router {
        let openapi = api_doc(crate::traits::ApiKeyProvider::header_name(&state));

        let mut app = Router::new()
            .nest("/books", route::books::app::app())
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi.clone()))
            .merge(Redoc::with_url("/redoc", openapi))
            .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
            .fallback(not_found)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                method_not_allowed::<ApiState>,
            ));

        if trace_response_body_enabled {
            app = app.layer(middleware::from_fn_with_state(
                state.clone(),
                trace_response_body,
            ));
        }

        app.with_state(state).layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(config = ?self.config, "Configuration");

        let store = Arc::new(InMemoryBookStore::new());

        if let Some(seed_csv) = &self.config.seed_csv {
            let report = import_csv_file(seed_csv, &*store)
                .await
                .context("Failed to import seed CSV")?;

            let books = store.count().await;

            tracing::info!(
                created = report.created,
                failed = report.failed.len(),
                books,
                "Seeded"
            );
        }

        let state = ApiState::new(
            self.config.error_verbosity,
            self.config.api_key_header_name,
            self.config.api_keys,
            store,
        );

        let app = Self::app(state, self.config.trace_response_body);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("CTRL+C received"),
            Err(err) => {
                tracing::error!(%err, "Failed to install CTRL+C signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;

                tracing::info!("SIGTERM received");
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");
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

    tracing::info!("Shutting down");
}
