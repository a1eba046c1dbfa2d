use super::*;
use axum::{body, body::Body, http::Request};
use serde::de::DeserializeOwned;
use shared::domain::Command;
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(Arc::new(AppState {
        api: ApiContext::new(16),
    }))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, body.to_vec())
}

async fn post_json<T: DeserializeOwned>(
    app: &Router,
    uri: &str,
    payload: serde_json::Value,
) -> (StatusCode, T) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let (status, body) = call(app, request).await;
    (status, serde_json::from_slice(&body).expect("json"))
}

async fn post_empty(app: &Router, uri: &str) -> StatusResponse {
    let request = Request::post(uri).body(Body::empty()).expect("request");
    let (status, body) = call(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("json")
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> T {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, body) = call(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app();
    let (status, body) = call(&app, Request::get("/healthz").body(Body::empty()).expect("request")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn start_and_stop_report_current_state() {
    let app = test_app();

    assert_eq!(
        post_empty(&app, "/start_gesture").await.status.as_deref(),
        Some("Gesture control started")
    );
    assert_eq!(
        post_empty(&app, "/api/gesture/start").await.status.as_deref(),
        Some("Already running")
    );
    assert_eq!(
        post_empty(&app, "/stop_gesture").await.status.as_deref(),
        Some("Gesture control stopped")
    );
    assert_eq!(
        post_empty(&app, "/stop_gesture").await.status.as_deref(),
        Some("Not running")
    );
}

#[tokio::test]
async fn injected_commands_are_drained_once() {
    let app = test_app();
    post_empty(&app, "/start_gesture").await;

    for tag in ["play_pause", "volume_up"] {
        let (status, _): (StatusCode, StatusResponse) = post_json(
            &app,
            "/inject_command",
            serde_json::json!({ "command": tag, "source": "gesture" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let first: CommandsResponse = get_json(&app, "/get_commands").await;
    assert_eq!(
        first.commands,
        Some(vec![Command::PlayPause, Command::VolumeUp])
    );
    let second: CommandsResponse = get_json(&app, "/api/gesture/commands").await;
    assert_eq!(second.commands, Some(Vec::new()));
}

#[tokio::test]
async fn injecting_while_stopped_is_a_conflict() {
    let app = test_app();

    let (status, err): (StatusCode, ApiError) = post_json(
        &app,
        "/inject_command",
        serde_json::json!({ "command": "play_pause", "source": "gesture" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(matches!(err.code, ErrorCode::Conflict));
}

#[tokio::test]
async fn set_mode_accepts_known_modes_and_reports_invalid_ones() {
    let app = test_app();

    let (status, reply): (StatusCode, StatusResponse) =
        post_json(&app, "/set_mode", serde_json::json!({ "mode": "voice" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.status.as_deref(), Some("Mode changed to voice"));

    let (status, reply): (StatusCode, StatusResponse) =
        post_json(&app, "/api/gesture/mode", serde_json::json!({ "mode": "telepathy" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.status.as_deref(), Some("Invalid mode"));

    let status: ServiceStatus = get_json(&app, "/get_status").await;
    assert_eq!(status.mode, Mode::Voice);
    assert!(!status.running);
}

#[tokio::test]
async fn gesture_commands_are_ignored_in_voice_mode() {
    let app = test_app();
    post_empty(&app, "/start_gesture").await;
    let _: (StatusCode, StatusResponse) =
        post_json(&app, "/set_mode", serde_json::json!({ "mode": "voice" })).await;

    let (status, reply): (StatusCode, StatusResponse) = post_json(
        &app,
        "/inject_command",
        serde_json::json!({ "command": "skip_forward", "source": "gesture" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.status.as_deref(), Some("Ignored in voice mode"));
    let drained: CommandsResponse = get_json(&app, "/get_commands").await;
    assert_eq!(drained.commands, Some(Vec::new()));
}
