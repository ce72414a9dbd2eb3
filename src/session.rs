//! Cookie-identified user sessions, each owning its own prediction history

use crate::error::AppError;
use crate::types::history::HistoryStore;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "fraudshield_session";

/// A session's history, locked independently of every other session
pub type SharedHistory = Arc<Mutex<HistoryStore>>;

struct SessionEntry {
    history: SharedHistory,
    last_seen: Instant,
}

/// All live sessions
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    history_capacity: Option<usize>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(history_capacity: Option<usize>, idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_capacity,
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// History of a known session, refreshing its idle timer
    pub fn touch(&self, id: Uuid) -> Option<SharedHistory> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.history.clone())
    }

    /// Start a new session with an empty history.
    ///
    /// Idle sessions are expired here. When the registry is still full the
    /// least recently seen session is evicted to make room.
    pub fn create(&self) -> (Uuid, SharedHistory) {
        let id = Uuid::new_v4();
        let history = Arc::new(Mutex::new(HistoryStore::with_capacity(self.history_capacity)));

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired = expired, "Expired idle sessions");
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    warn!(session = %oldest, limit = self.max_sessions, "Session limit reached, evicted least recent");
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            SessionEntry {
                history: history.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, active = sessions.len(), "Session created");

        (id, history)
    }

    /// Number of live sessions
    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}

/// The current request's session
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub history: SharedHistory,
}

/// Middleware: resolve the session cookie, issuing a new session when it is
/// missing, malformed or expired.
pub async fn attach_session(
    State(registry): State<Arc<SessionRegistry>>,
    mut req: Request,
    next: Next,
) -> Response {
    let known = session_id_from_headers(req.headers())
        .and_then(|id| registry.touch(id).map(|history| (id, history)));

    let (session, is_new) = match known {
        Some((id, history)) => (Session { id, history }, false),
        None => {
            let (id, history) = registry.create();
            (Session { id, history }, true)
        }
    };

    let id = session.id;
    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// Parse the session id out of the `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session middleware not installed".to_string()))
    }
}
