//! Webhook server module.
//!
//! Receives run task requests from Terraform Cloud/Enterprise, verifies
//! their signature, and hands them to the processor.

mod handler;
mod signature;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::comment::ReviewThread;
use crate::error::Result;
use crate::tfe::RunTaskPlatform;

pub use handler::ServerState;
pub use signature::{SIGNATURE_HEADER, verify_signature};

/// Builds the webhook router.
///
/// `POST /` accepts run task requests and `GET /healthz` answers `ok`.
pub fn router<P, T>(state: Arc<ServerState<P, T>>) -> Router
where
    P: RunTaskPlatform + 'static,
    T: ReviewThread + 'static,
{
    Router::new()
        .route("/", post(handler::run_task::<P, T>))
        .route("/healthz", get(handler::health))
        .with_state(state)
}

/// Serves the webhook until the process is stopped.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve<P, T>(port: u16, state: ServerState<P, T>) -> Result<()>
where
    P: RunTaskPlatform + 'static,
    T: ReviewThread + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, router(Arc::new(state))).await?;
    Ok(())
}
