use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use rolegate::logging::init_tracing;
use rolegate::metrics::{init_metrics, metrics_app};
use rolegate::modules::Directory;
use rolegate::router::init_router;
use rolegate::routes::RouteTable;
use rolegate::state::init_app_state;
use rolegate_config::{JwtConfig, SeedConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    let _log_guard = init_tracing(&server_config)?;

    let jwt_config = JwtConfig::from_env();
    let table = RouteTable::standard()?;

    for finding in table.audit() {
        warn!(
            method = %finding.method,
            path = finding.path,
            operation = finding.operation.name(),
            "Route mutates state without an authorization guard"
        );
    }

    let directory = Directory::new(jwt_config.clone());
    if let Some(seed) = SeedConfig::from_env() {
        directory
            .seed_admin(&seed)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed administrator: {}", e))?;
    }

    let state = init_app_state(jwt_config, &server_config, Arc::new(directory));
    let mut app = init_router(state, &table)?;

    if let Some(handle) = init_metrics(server_config.metrics_enabled)? {
        app = app.merge(metrics_app(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %address, routes = table.routes().len(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
