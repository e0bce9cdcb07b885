use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::Config;
use crate::error::ApiError;
use crate::module::ApiModule;
use crate::openapi::ApiDoc;
use crate::routing;
use crate::state::AppState;

/// The application: configuration, database handle and mounted modules.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
    modules: Vec<Box<dyn ApiModule>>,
    api_docs_path: String,
}

impl App {
    /// Create a new application with a given config.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = crate::db::connect(&config).await?;

        Ok(App {
            config,
            db,
            modules: Vec::new(),
            api_docs_path: "/api-docs".to_string(),
        })
    }

    /// Mount a feature module: its routes, migrations and API docs.
    pub fn mount_module(self, module: impl ApiModule + 'static) -> Self {
        self.mount_boxed(Box::new(module))
    }

    /// Mount an already boxed module.
    pub fn mount_boxed(mut self, module: Box<dyn ApiModule>) -> Self {
        tracing::debug!(module = module.name(), "mounting module");
        self.modules.push(module);
        self
    }

    /// Customize the URL path where API docs are served.
    ///
    /// Default: `/api-docs` (Scalar UI) and `/api-docs/openapi.json` (raw spec).
    pub fn api_docs_url(mut self, path: &str) -> Self {
        self.api_docs_path = path.to_string();
        self
    }

    /// Names of the mounted modules, in mount order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Run pending migrations of every mounted module.
    pub async fn run_migrations(&self) -> Result<(), ApiError> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "running pending database migrations");
            module.migrate(&self.db).await?;
        }
        tracing::info!("migrations complete");
        Ok(())
    }

    /// Roll back `steps` migrations of every mounted module, last mounted first.
    pub async fn rollback_migrations(&self, steps: u32) -> Result<(), ApiError> {
        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), steps, "rolling back migrations");
            module.rollback(&self.db, steps).await?;
        }
        Ok(())
    }

    /// Handle `--migrate` and `--rollback [n]` command-line flags.
    ///
    /// Returns `true` when a database operation was performed and the
    /// process should exit instead of serving.
    async fn handle_db_cli_args(&self) -> Result<bool, ApiError> {
        let args: Vec<String> = std::env::args().collect();

        if args.iter().any(|arg| arg == "--migrate") {
            self.run_migrations().await?;
            return Ok(true);
        }

        if let Some(pos) = args.iter().position(|arg| arg == "--rollback") {
            let steps = args
                .get(pos + 1)
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(1);
            self.rollback_migrations(steps).await?;
            tracing::info!("rollback complete");
            return Ok(true);
        }

        Ok(false)
    }

    /// Build the application router with module routes, API docs and middleware.
    pub fn router(&self) -> Router {
        let state = AppState {
            db: self.db.clone(),
            config: Arc::new(self.config.clone()),
        };

        let openapi_spec = crate::openapi::merge_openapi(
            ApiDoc::openapi(),
            self.modules.iter().filter_map(|m| m.openapi_spec()),
        );
        let openapi_json = openapi_spec.clone();
        let docs_path = self.api_docs_path.clone();
        let json_path = format!("{docs_path}/openapi.json");

        let mut router =
            Router::new().merge(routing::build_routes(docs_path.clone()).with_state(state.clone()));
        for module in &self.modules {
            router = router.merge(module.routes().with_state(state.clone()));
        }

        router = router
            .merge(Scalar::with_url(docs_path, openapi_spec))
            .route(
                &json_path,
                get(move || {
                    let spec = openapi_json.clone();
                    async move { axum::Json(spec) }
                }),
            )
            .layer(CorsLayer::permissive());

        // Request ids and per-request spans only in development.
        if self.config.is_dev() {
            use tower_http::LatencyUnit;
            use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse};

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            router = router
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
                .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));
        }

        router
    }

    /// Run migrations, then serve until Ctrl-C.
    ///
    /// With `--migrate` or `--rollback [n]` on the command line, only the
    /// database operation runs and the server is not started.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        if self.handle_db_cli_args().await? {
            return Ok(());
        }
        self.run_migrations().await?;

        let addr = self.config.server_addr();
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!(
            addr = %addr,
            docs = %self.api_docs_path,
            modules = ?self.module_names(),
            "TASVideos API listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
