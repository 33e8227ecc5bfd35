//! Web UI for extracting, editing and downloading conversations.
//!
//! One HTML page backed by per-cookie [`SessionState`]; each form post runs
//! to completion before its response is sent.

pub mod page;
mod routes;
pub mod session;

pub use routes::DocumentKind;
pub use session::{SessionId, SessionState, SessionStore, DEFAULT_SESSION_TTL};

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::{AppContext, Result};

/// Shared state for every route handler.
pub struct AppState {
    pub ctx: AppContext,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        let sessions = SessionStore::with_ttl(ctx.config.server.session_ttl());
        Self { ctx, sessions }
    }
}

/// Build the router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the web UI on `bind` until Ctrl-C.
pub async fn serve(ctx: AppContext, bind: &str, open_browser: bool) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    let address = format!("http://{}", listener.local_addr()?);
    info!("Web UI listening on {}", address);

    if open_browser {
        if let Err(e) = open::that(&address) {
            warn!("Failed to open browser: {}", e);
        }
    }

    let state = Arc::new(AppState::new(ctx));
    let sweeper = spawn_session_sweeper(state.clone());

    let app = build_router(state);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await;

    sweeper.abort();
    served?;
    Ok(())
}

/// Periodically drop idle sessions that no request touches any more.
fn spawn_session_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(state.sessions.ttl());
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sessions.purge_expired().await;
        }
    })
}
