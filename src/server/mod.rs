//! HTTP surface: `POST /api/generate-drawing` and a health probe.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::generate::client::CompletionSource;
use crate::generate::tutor::Tutor;
use crate::lesson::model::Step;

const QUESTION_REQUIRED: &str = "Question is required";
const GENERATE_FAILED: &str = "Failed to generate drawing instructions";

/// Body of `POST /api/generate-drawing`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Question to explain. Missing or blank is a 400.
    #[serde(default)]
    pub question: Option<String>,
    /// Subject area; defaults to mathematics.
    #[serde(default)]
    pub subject: Option<String>,
}

/// Successful response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateResponse {
    /// Normalized steps, or the single fallback step.
    pub steps: Vec<Step>,
}

/// Error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable, human-readable summary.
    pub error: String,
    /// Underlying cause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn failure(status: StatusCode, error: &str, details: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: error.to_owned(),
        details: Some(details.into()),
    };
    (status, Json(body)).into_response()
}

/// Routes backed by `tutor`.
pub fn router<S: CompletionSource + 'static>(tutor: Arc<Tutor<S>>) -> Router {
    Router::new()
        .route("/api/generate-drawing", post(generate_drawing::<S>))
        .route("/healthz", get(healthz))
        .with_state(tutor)
}

async fn healthz() -> &'static str {
    "ok"
}

#[tracing::instrument(skip_all, fields(bytes = body.len()))]
async fn generate_drawing<S: CompletionSource>(
    State(tutor): State<Arc<Tutor<S>>>,
    body: Bytes,
) -> Response {
    let req: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = %e, "unreadable request body");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, GENERATE_FAILED, e.to_string());
        }
    };
    let question = req.question.unwrap_or_default();

    match tutor.generate(&question, req.subject.as_deref()).await {
        Ok(steps) => Json(GenerateResponse { steps }).into_response(),
        Err(ChalkboardError::EmptyInput(msg)) => {
            failure(StatusCode::BAD_REQUEST, QUESTION_REQUIRED, msg)
        }
        Err(err) => {
            tracing::error!(error = %err, "generation request failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATE_FAILED,
                err.to_string(),
            )
        }
    }
}

/// Serve on `addr` until Ctrl-C.
pub async fn serve<S: CompletionSource + 'static>(
    addr: SocketAddr,
    tutor: Arc<Tutor<S>>,
) -> ChalkboardResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {addr}: {e}"))?;
    serve_with_shutdown(listener, tutor, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<S, F>(
    listener: TcpListener,
    tutor: Arc<Tutor<S>>,
    shutdown: F,
) -> ChalkboardResult<()>
where
    S: CompletionSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| anyhow::anyhow!("listener address: {e}"))?;
    tracing::info!(addr = %local, "serving");
    axum::serve(listener, router(tutor))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;
    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/server/mod.rs"]
mod tests;
