//! HTTP server facade for biblio with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::signal;

use biblio_kernel::ModuleRegistry;

pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &biblio_kernel::settings::Settings,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
///
/// Routes are registered before the middleware layers so that the layers
/// actually wrap them; `Router::layer` only applies to routes added earlier.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &biblio_kernel::settings::Settings,
) -> Router {
    let mut router_builder = RouterBuilder::new();

    // Add health check route
    router_builder = router_builder.route("/healthz", get(health_check));

    // Mount module routes under the configured base path
    for module in registry.modules() {
        let module_name = module.name();
        let module_router = module.routes();

        tracing::info!(
            module = module_name,
            base_path = %settings.server.base_path,
            "mounting module routes"
        );
        router_builder = router_builder.mount(&settings.server.base_path, module_router);
    }

    // Add OpenAPI documentation
    router_builder = router_builder.with_openapi(registry, &settings.server.base_path);

    // Global middlewares go last so they wrap everything registered above
    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    router_builder.build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating shutdown");
        }
    }
}
