use crate::catalog::{Catalog, HttpCatalog};
use crate::config::Config;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod render;
pub mod routes_api;
pub mod routes_pages;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Remote catalog (HTTP in production, fakes in tests)
    pub catalog: Arc<dyn Catalog>,
}

impl AppContext {
    pub fn new(config: Config, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let site_name = ctx.config.server.site_name.clone();
    let image_base = ctx.config.catalog.image_base.clone();

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // JSON endpoints used by the browser (load more, suggestions, watch plan)
        .nest("/api", routes_api::api_routes())
        // Server-rendered pages
        .merge(routes_pages::page_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files (player script, styles) for any path no route matched
    match static_dir {
        Some(dir) if dir.exists() => {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.fallback_service(ServeDir::new(&dir));
        }
        _ => {
            app = app.fallback(move || async move {
                let page = render::Page {
                    site_name: &site_name,
                    image_base: &image_base,
                };
                (StatusCode::NOT_FOUND, Html(page.not_found()))
            });
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server against the configured remote catalog
pub async fn start_server(config: Config) -> Result<()> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    start_server_with_catalog(config, Arc::new(catalog)).await
}

/// Start the HTTP server with an explicit catalog implementation
pub async fn start_server_with_catalog(config: Config, catalog: Arc<dyn Catalog>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, catalog);
    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
