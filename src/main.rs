// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use relational_identity::{
    api::router,
    auth::ProviderChain,
    config::{LogFormat, Settings, DEFAULT_LOG_FILTER},
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    let chain = ProviderChain::from_files(
        &settings.jwt_mapper,
        &settings.api_key_mapper,
        &settings.cert_mapper,
    )
    .inspect_err(|e| tracing::error!(error = %e, "Failed to build identity provider chain"))?;

    let app = router(AppState::new(chain));

    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        "Relational Identity server listening (OpenAPI at /api-doc/openapi.json)"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
