//! HTTP host for the Change Impact Simulator.
//!
//! Thin transport over `cis-core`: tools are invoked with
//! `POST /api/tools/{name}` and the rule documents plus live statistics
//! are served read-only under `GET /api/resources/{name}`. The core stays
//! wire-agnostic; everything JSON-shaped lives here.

mod dispatch;
mod error;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use cis_core::Simulator;

pub use dispatch::{TOOLS, ToolDescriptor, dispatch_tool, read_resource};
pub use error::ToolError;

#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<Simulator>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8490 }
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(call_tool))
        .route("/api/resources/{name}", get(resource))
        .with_state(state)
        .layer(cors)
}

pub async fn run_server(config: ServerConfig, simulator: Arc<Simulator>) -> anyhow::Result<()> {
    let state = AppState { simulator };
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for cis-server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("cis-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status":"ok","service":"change-impact-simulator"}))
}

async fn list_tools() -> impl IntoResponse {
    Json(TOOLS)
}

async fn call_tool(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Json(args): Json<Value>,
) -> Result<Json<Value>, ToolError> {
    dispatch_tool(&state.simulator, &name, &args).map(Json)
}

async fn resource(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, StatusCode> {
    read_resource(&state.simulator, &name).map(Json).ok_or(StatusCode::NOT_FOUND)
}
