use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::Mode,
    error::{ApiError, ApiException, ErrorCode},
    protocol::{
        CommandsResponse, InjectCommandRequest, ServiceStatus, StatusResponse, COMMANDS_ROUTE,
        SET_MODE_ROUTE, START_ROUTE, STATUS_ROUTE, STOP_ROUTE,
    },
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::ApiContext;
use config::load_settings;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[derive(Debug, Deserialize)]
struct SetModeBody {
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let state = AppState {
        api: ApiContext::new(settings.max_queue_len),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "recognition service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(START_ROUTE, post(start_gesture))
        .route(STOP_ROUTE, post(stop_gesture))
        .route(COMMANDS_ROUTE, get(get_commands))
        .route(SET_MODE_ROUTE, post(set_mode))
        .route(STATUS_ROUTE, get(get_status))
        .route("/api/gesture/start", post(start_gesture))
        .route("/api/gesture/stop", post(stop_gesture))
        .route("/api/gesture/commands", get(get_commands))
        .route("/api/gesture/mode", post(set_mode))
        .route("/api/gesture/status", get(get_status))
        .route("/inject_command", post(inject_command))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn start_gesture(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let started = state.api.recognition.lock().await.start();
    Json(StatusResponse::new(if started {
        "Gesture control started"
    } else {
        "Already running"
    }))
}

async fn stop_gesture(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let stopped = state.api.recognition.lock().await.stop();
    Json(StatusResponse::new(if stopped {
        "Gesture control stopped"
    } else {
        "Not running"
    }))
}

async fn get_commands(State(state): State<Arc<AppState>>) -> Json<CommandsResponse> {
    let commands = state.api.recognition.lock().await.drain();
    Json(CommandsResponse {
        commands: Some(commands),
    })
}

async fn set_mode(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetModeBody>,
) -> Json<StatusResponse> {
    info!(requested = ?body.mode, "mode change request");
    let Some(Ok(mode)) = body.mode.as_deref().map(str::parse::<Mode>) else {
        warn!(requested = ?body.mode, "invalid mode requested");
        return Json(StatusResponse::new("Invalid mode"));
    };

    state.api.recognition.lock().await.set_mode(mode);
    Json(StatusResponse::new(format!("Mode changed to {mode}")))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(state.api.recognition.lock().await.status())
}

async fn inject_command(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InjectCommandRequest>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ApiError>)> {
    let mut recognition = state.api.recognition.lock().await;
    let queued = recognition
        .enqueue(req.command.clone(), req.source)
        .map_err(api_error)?;
    let status = if queued {
        format!("Queued {}", req.command)
    } else {
        format!("Ignored in {} mode", recognition.status().mode)
    };
    Ok(Json(StatusResponse::new(status)))
}

fn api_error(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::from(err)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
