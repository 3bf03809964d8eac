use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ActionError, ApiError, ArgumentOutcome, DiscussionEntry, ErrorCode, FinalReport,
    GroupStartOutcome, ParticipantProfile, Phase, PolicyArea, PreferenceOutcome,
    ReflectionOutcome, SessionConfig, SessionStatus, TopicOutcome, DEFAULT_TOTAL_BUDGET,
    SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use session_core::catalog;
use session_core::statement::detect_stance;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};

use crate::{PersistedSessionSummary, PersistenceError, SessionApi};

const DEFAULT_PAGE_SIZE: usize = 200;
const MAX_PAGE_SIZE: usize = 2000;

include!("error.rs");
include!("state.rs");
include!("routes/control.rs");
include!("routes/query.rs");
include!("routes/stream.rs");
include!("util.rs");

pub async fn serve(addr: SocketAddr) -> Result<(), ServerError> {
    let state = AppState::new();
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(get_catalog))
        .route("/api/v1/sessions", post(create_session).get(list_sessions))
        .route(
            "/api/v1/sessions/{session_id}",
            get(get_session_state).delete(destroy_session),
        )
        .route("/api/v1/sessions/{session_id}/start", post(start_session))
        .route(
            "/api/v1/sessions/{session_id}/preferences",
            post(set_preference),
        )
        .route(
            "/api/v1/sessions/{session_id}/group",
            post(start_group_discussion),
        )
        .route(
            "/api/v1/sessions/{session_id}/arguments",
            post(submit_argument),
        )
        .route(
            "/api/v1/sessions/{session_id}/topics/finalize",
            post(finalize_topic),
        )
        .route(
            "/api/v1/sessions/{session_id}/reflection",
            post(start_reflection),
        )
        .route(
            "/api/v1/sessions/{session_id}/report",
            get(generate_report).post(generate_report),
        )
        .route(
            "/api/v1/sessions/{session_id}/transcript",
            get(get_transcript),
        )
        .route("/api/v1/sessions/{session_id}/stance", post(detect_stance_text))
        .route("/api/v1/sessions/{session_id}/stream", get(stream_session))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests;
