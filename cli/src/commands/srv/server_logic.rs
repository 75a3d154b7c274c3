//! # Site Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! The Axum server behind `chatterify srv`. It serves the built site,
//! falls back to the index file for client-side routes, and mounts the
//! `/api` endpoints from `api.rs`.
//!
//! ## Architecture
//!
//! 1. Find a free port, starting at the configured one
//! 2. Build the router: API routes, then `ServeDir` with an index fallback
//! 3. Wrap it in request tracing and (optionally) permissive CORS
//! 4. Serve until Ctrl+C or SIGTERM
//!
use super::api::{self, SharedState};
use super::config::ServerConfig;
use super::utils;
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// Binds, prints the banner and serves until a shutdown signal arrives.
pub async fn run_server(config: ServerConfig, state: SharedState) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    utils::log_directory_contents(&config.directory);
    let backend_name = state.backend.name();
    let app = create_app(&config, state);

    println!("\n=================================================================");
    println!("📂 Serving site from:  {}", config.directory.display());
    println!("🌐 Local URL:          http://localhost:{}", addr.port());
    if let Some(ip) = utils::get_local_ip() {
        if config.host.is_unspecified() {
            println!("🔗 Network URL:        http://{}:{}", ip, addr.port());
        }
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("❓ Index file:         {}", config.index_file);
    println!("💬 Chat backend:       {}", backend_name);
    println!("🔒 CORS enabled:       {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting server on {} for {}", addr, config.directory.display());
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}

/// First bindable address at `start_port` or one of the next `max_attempts - 1` ports.
async fn find_available_port(host: IpAddr, start_port: u16, max_attempts: u8) -> Result<SocketAddr> {
    let mut port = start_port;
    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!("Port {} was unavailable, using port {}", start_port, port);
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!("Port {} on {} is unavailable ({}), trying the next one", port, host, e);
                port = port
                    .checked_add(1)
                    .context("Ran out of port numbers while searching for a free port")?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

/// The full application: API routes, static files and middleware.
fn create_app(config: &ServerConfig, state: SharedState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default())
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Unknown paths are client-side routes; hand them the index page.
    let index = ServeFile::new(config.directory.join(&config.index_file));
    let static_files = ServeDir::new(&config.directory).fallback(index);

    api::routes()
        .with_state(state)
        .fallback_service(static_files)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
}
