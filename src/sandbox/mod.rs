//! In-memory REST backend for local development and integration tests.
//!
//! Serves every [`Resource`](crate::domain::Resource) collection under
//! `/api/{resource}` with the same envelope, status codes and error body
//! the client expects from the real backend.

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ErrorBody, ErrorResponse, SandboxError};
pub use state::SandboxState;

use crate::config::SandboxConfig;

/// Builds the sandbox router: collections under `/api` behind the bearer
/// check, `/health` open.
pub fn build_router(state: SandboxState, request_timeout: Duration) -> Router {
    let api = handlers::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        handlers::require_token,
    ));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// A sandbox server running on a background task.
#[derive(Debug)]
pub struct RunningSandbox {
    /// Address the server is bound to.
    pub addr: SocketAddr,
    /// Shared state, for seeding or inspecting rows from the outside.
    pub state: SandboxState,
    /// Server task.
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl RunningSandbox {
    /// API root clients should point at.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Stops the server task.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// Binds `addr` and serves `state` on a background task.
///
/// Port `0` picks a free port; read it back from [`RunningSandbox::addr`].
///
/// # Errors
///
/// Returns [`SandboxError::Internal`] if the address cannot be bound.
pub async fn spawn(
    addr: SocketAddr,
    state: SandboxState,
    request_timeout: Duration,
) -> Result<RunningSandbox, SandboxError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| SandboxError::Internal(format!("binding {addr}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| SandboxError::Internal(format!("reading bound address: {e}")))?;
    let app = build_router(state.clone(), request_timeout);
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    tracing::info!(%addr, "sandbox listening");
    Ok(RunningSandbox {
        addr,
        state,
        handle,
    })
}

/// Builds state from `config` (token, seed file) and serves it until the
/// server stops.
///
/// # Errors
///
/// Returns [`SandboxError`] if seeding or binding fails, or the server
/// exits with an I/O error.
pub async fn serve(config: &SandboxConfig) -> Result<(), SandboxError> {
    let mut state = SandboxState::new();
    if let Some(token) = &config.token {
        state = state.with_token(token.as_str());
    }
    if let Some(path) = &config.seed_path {
        state.seed_from_file(path).await?;
    }

    let running = spawn(config.listen_addr, state, config.request_timeout).await?;
    match running.handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(SandboxError::Internal(format!("server error: {e}"))),
        Err(e) => Err(SandboxError::Internal(format!("server task failed: {e}"))),
    }
}
