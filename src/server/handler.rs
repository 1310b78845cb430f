//! Webhook request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::comment::ReviewThread;
use crate::error::RequestError;
use crate::runtask::RunTaskProcessor;
use crate::tfe::{RunTaskPlatform, RunTaskRequest};

use super::signature::{SIGNATURE_HEADER, verify_signature};

/// Shared state of the webhook server.
pub struct ServerState<P: RunTaskPlatform, T: ReviewThread> {
    /// Invocation processor.
    pub processor: RunTaskProcessor<P, T>,
    /// Key for verifying request signatures.
    pub hmac_key: String,
}

/// Handles a run task webhook.
pub(super) async fn run_task<P, T>(
    State(state): State<Arc<ServerState<P, T>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    P: RunTaskPlatform + 'static,
    T: ReviewThread + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if let Err(e) = verify_signature(&body, signature, &state.hmac_key) {
        warn!("{e}");
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    let request: RunTaskRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let e = RequestError::InvalidPayload {
                message: e.to_string(),
            };
            warn!("{e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.processor.process(&request).await {
        Ok(outcome) => {
            info!("Run {} {outcome}", request.run_id);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            error!("Run {} failed: {e}", request.run_id);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

/// Liveness probe.
pub(super) async fn health() -> &'static str {
    "ok"
}
