//! # Session Store
//!
//! Server-side storage for per-client `SessionState`.
//!
//! Clients carry only an opaque uuid in the `surveyor_session` cookie; the
//! state itself stays in process memory. Only non-default state is stored,
//! so anonymous visitors cost nothing. Entries idle for longer than the
//! configured TTL are treated as absent and pruned at most once per TTL.
//! Nothing survives a restart.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use surveyor_core::SessionState;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the cookie holding the session id.
pub const SESSION_COOKIE: &str = "surveyor_session";

#[derive(Debug)]
struct StoredSession {
    state: SessionState,
    touched: Instant,
}

#[derive(Debug)]
struct SessionMap {
    entries: BTreeMap<String, StoredSession>,
    last_prune: Instant,
}

/// Shared, in-memory session map keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<SessionMap>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose entries expire after `ttl` of inactivity.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(SessionMap {
                entries: BTreeMap::new(),
                last_prune: Instant::now(),
            })),
            ttl,
        }
    }

    /// Fetch the state for `id`, or a fresh state if absent or expired.
    pub async fn load(&self, id: &str) -> SessionState {
        let sessions = self.sessions.read().await;
        sessions
            .entries
            .get(id)
            .filter(|stored| stored.touched.elapsed() < self.ttl)
            .map(|stored| stored.state.clone())
            .unwrap_or_default()
    }

    /// Store the state for `id`.
    ///
    /// A default state removes the entry instead of storing it.
    pub async fn save(&self, id: &str, state: SessionState) {
        if state == SessionState::default() {
            let mut sessions = self.sessions.write().await;
            sessions.entries.remove(id);
            return;
        }

        let mut sessions = self.sessions.write().await;
        if sessions.last_prune.elapsed() >= self.ttl {
            let before = sessions.entries.len();
            let ttl = self.ttl;
            sessions
                .entries
                .retain(|_, stored| stored.touched.elapsed() < ttl);
            sessions.last_prune = Instant::now();
            let pruned = before - sessions.entries.len();
            if pruned > 0 {
                tracing::debug!(event = "sessions_pruned", count = pruned, "Expired sessions pruned");
            }
        }
        sessions.entries.insert(
            id.to_string(),
            StoredSession {
                state,
                touched: Instant::now(),
            },
        );
    }

    /// Number of stored sessions, expired ones included until pruned.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

/// Read the session id from `jar`, issuing a new one if the client has
/// none or sent something that is not a uuid.
pub fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(existing) = jar.get(SESSION_COOKIE)
        && let Ok(id) = Uuid::parse_str(existing.value())
    {
        return (jar, id.to_string());
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

// =============================================================================
// TESTS
// =============================================================================
