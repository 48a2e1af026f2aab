use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};

use colegio::config::server::ServerConfig;
use colegio::logging::{init_tracing, shutdown_tracer};
use colegio::metrics::{init_metrics, metrics_app};
use colegio::router::init_router;
use colegio::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;
    let metrics_handle = init_metrics()?;

    let server_config = ServerConfig::from_env();

    let state = init_app_state().await?;
    colegio_db::run_migrations(&state.db)
        .await
        .context("failed to run database migrations")?;

    if let Some(handle) = metrics_handle {
        let metrics_addr = server_config.metrics_addr();
        let metrics_listener = TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics server on {}", metrics_addr))?;
        info!(addr = %metrics_addr, "Metrics server listening");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);

    let addr = server_config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(addr = %addr, "Servidor Colegio José Martí escuchando");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    shutdown_tracer().await;

    Ok(())
}
