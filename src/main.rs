//! HTTP server for the incident query engine.
//!
//! # Usage
//!
//! ```bash
//! incidentframe-server --data traffic_incidents.csv
//! incidentframe-server --config incidents.toml --port 8080
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use clap::Parser;
use incidentframe::config::loader::load_layered;
use incidentframe::{io, IncidentService};

#[derive(Parser, Debug)]
#[command(name = "incidentframe-server")]
#[command(about = "Serves analytic queries over a traffic incident CSV snapshot")]
#[command(version)]
struct Args {
    /// Configuration file (TOML or YAML)
    #[arg(short, long, env = "INCIDENTS_CONFIG")]
    config: Option<PathBuf>,

    /// CSV snapshot to load, overriding the configuration
    #[arg(short, long)]
    data: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validated once, after the command-line overrides
    let mut config = load_layered(args.config.as_ref())?;
    if let Some(data) = args.data {
        config.data.path = data;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    log::info!("incidentframe-server {} starting", incidentframe::VERSION);

    // The table is fully loaded before the listener exists
    let table = io::load_with_options(&config.data.path, &config.data.load_options())
        .with_context(|| format!("loading {}", config.data.path))?;
    let service = Arc::new(IncidentService::from_config(Arc::new(table), &config));

    let app = Router::new().fallback(dispatch).with_state(service);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;
    log::info!("listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server stopped");
    Ok(())
}

async fn dispatch(
    State(service): State<Arc<IncidentService>>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let response = service.handle(uri.path(), &params);
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
    }
}
