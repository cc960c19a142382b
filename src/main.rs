use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::{router, AppState};
use chart_core::config::{max_sessions_from_env_value, seed_demo_from_env_value};
use chart_core::CoreConfig;

/// Main entry point for the HIV chart server
///
/// Resolves configuration once, then serves the REST API (with Swagger UI under
/// `/swagger-ui`) until the process is stopped.
///
/// # Environment Variables
/// - `CHART_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CHART_SEED_DEMO`: seed each new session with the demo patients (default: true)
/// - `CHART_MAX_SESSIONS`: sessions held before the oldest is evicted (default: 1024)
///
/// # Errors
/// Returns an error if:
/// - the logging filter or configuration values cannot be parsed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(with_default_directives(EnvFilter::from_default_env())?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CHART_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let seed_demo_patients = seed_demo_from_env_value(std::env::var("CHART_SEED_DEMO").ok())?;
    let max_sessions = max_sessions_from_env_value(std::env::var("CHART_MAX_SESSIONS").ok())?;

    let cfg = Arc::new(CoreConfig::new(seed_demo_patients, max_sessions)?);

    tracing::info!("++ Starting HIV chart REST on {}", rest_addr);
    tracing::info!(
        seed_demo_patients,
        max_sessions,
        "sessions configured"
    );

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Adds the `info` level for every crate in the server on top of `RUST_LOG`.
fn with_default_directives(filter: EnvFilter) -> anyhow::Result<EnvFilter> {
    Ok(filter
        .add_directive("chart_run=info".parse()?)
        .add_directive("api_rest=info".parse()?)
        .add_directive("chart_core=info".parse()?))
}
