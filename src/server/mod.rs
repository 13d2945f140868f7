//! HTTP surface of the generator.
//!
//! - `POST /api/generate` with `{ "prompt": string }` answers
//!   `{ code, language }`: 200 for a document, 400 for a rejected prompt,
//!   500 with `{ error }` when the body is unreadable or the model call fails.
//! - `GET /api/history` answers the most recent entries, newest first.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::pipeline::{Generator, Outcome};
use crate::wire::{ErrorBody, GenerateRequest};

pub const GENERATE_FAILED: &str = "Failed to generate code";
pub const HISTORY_FAILED: &str = "Failed to fetch history";

/// Shared state passed to all request handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    /// Cancelled on shutdown; every request works under a child token.
    pub shutdown: CancellationToken,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(handle_generate))
        .route("/api/history", get(handle_history))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message.to_string() })).into_response()
}

async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => {
            error!(error = %e, "unreadable generate request");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATE_FAILED);
        }
    };

    // dropping the guard (client gone, or handler done) cancels the token
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    match state.generator.generate(&req.prompt, &cancel).await {
        Ok(outcome) => {
            let status = match outcome {
                Outcome::Rejected(_) => StatusCode::BAD_REQUEST,
                Outcome::Completed(_) => StatusCode::OK,
            };
            (status, Json(outcome.into_response())).into_response()
        }
        Err(e) => {
            error!(error = %e, "generate request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATE_FAILED)
        }
    }
}

async fn handle_history(State(state): State<AppState>) -> Response {
    match state.generator.list_history().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            error!(error = %e, "history request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, HISTORY_FAILED)
        }
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, generator: Arc<Generator>) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let app = router(AppState { generator, shutdown: shutdown.clone() });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
            shutdown.cancel();
        })
        .await?;
    Ok(())
}
