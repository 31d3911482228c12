//! Session layer: the signed session cookie and the in-memory session map.
//!
//! Sessions live for the process lifetime only. Durable state (the saved
//! profile) goes to SQLite; everything here is rebuildable by starting a
//! new conversation.

use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::models::transcript::Transcript;

/// Name of the signed cookie carrying the session id.
pub const SESSION_COOKIE: &str = "norte_session";

/// Builds the signed session cookie for `id`.
pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

/// Reads the session id out of the signed jar. None when the cookie is
/// absent, fails signature verification, or does not hold a UUID.
pub fn session_id_from(jar: &SignedCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Derives the cookie signing key from `SESSION_SECRET`. Without a secret the
/// server still boots, using a per-process random key, so restarts invalidate
/// every cookie. A configured secret shorter than 32 bytes is a hard error
/// rather than a silently weak key.
pub fn signing_key(secret: Option<&str>) -> anyhow::Result<Key> {
    match secret {
        Some(s) if s.len() < 32 => {
            anyhow::bail!("SESSION_SECRET must be at least 32 bytes, got {}", s.len())
        }
        Some(s) => Ok(Key::derive_from(s.as_bytes())),
        None => {
            warn!("SESSION_SECRET not set; using a random key, sessions will not survive restarts");
            Ok(Key::generate())
        }
    }
}

/// Per-conversation state. The transcript accumulates turns; the profile
/// appears once extraction has run for this session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub transcript: Transcript,
    pub profile: Option<Profile>,
}

impl Session {
    /// A fresh session whose transcript opens with the given assistant
    /// greeting.
    pub fn seeded(greeting: &str) -> Self {
        Self {
            transcript: Transcript::seeded(greeting),
            profile: None,
        }
    }
}

/// Shared map of live sessions keyed by session id.
///
/// Handlers never hold the lock across an await: they clone a snapshot out,
/// do the slow model call on the clone, then re-lock to write the advanced
/// transcript back. Two racing requests on one session can interleave (last
/// write wins), which is acceptable because a session belongs to a single
/// browser.
///
/// Nothing evicts abandoned entries. [`remove`](SessionStore::remove) only
/// fires when a caller starts over, so the map grows with every session
/// begun since the process started. Transcripts are small and a single
/// instance serves a campus-scale audience, so the bound is restart-based
/// rather than time-based. A sweeper over per-session timestamps is the
/// natural extension if that assumption stops holding.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh seeded session under `id`, replacing any previous
    /// state for that id.
    pub async fn start(&self, id: Uuid, greeting: &str) {
        self.inner.write().await.insert(id, Session::seeded(greeting));
    }

    /// Clones the current state of a session, if it exists.
    pub async fn snapshot(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Writes an advanced transcript back onto its session. Returns false
    /// when the session no longer exists.
    pub async fn save_transcript(&self, id: Uuid, transcript: Transcript) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.transcript = transcript;
                true
            }
            None => false,
        }
    }

    /// Drops a session outright. Used when its owner starts over.
    pub async fn remove(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }

    /// Records the extracted profile on a session. Returns false when the
    /// session no longer exists.
    pub async fn set_profile(&self, id: Uuid, profile: Profile) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.profile = Some(profile);
                true
            }
            None => false,
        }
    }
}
