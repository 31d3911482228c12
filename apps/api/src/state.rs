#![allow(dead_code)]

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::ModelGateway;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Single entry point for model calls. Constructed unavailable when no
    /// API key is configured; AI routes then answer 503.
    pub gateway: ModelGateway,
    pub sessions: SessionStore,
    /// Signing key for the session cookie.
    pub session_key: Key,
    pub config: Config,
}

// Lets SignedCookieJar pull its key straight out of the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
