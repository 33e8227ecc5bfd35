//! Per-browser session state for the web UI, keyed by a cookie.

use std::collections::HashMap;
use std::time::Duration;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Conversation;

pub const SESSION_COOKIE: &str = "chatpress_session";

/// What one user session holds between interactions.
///
/// Replaced as a whole on every change; never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The conversation exactly as extracted.
    pub original: Option<Conversation>,
    /// The latest edited copy; starts equal to `original`.
    pub current: Option<Conversation>,
}

impl SessionState {
    pub fn extracted(conversation: Conversation) -> Self {
        Self {
            original: Some(conversation.clone()),
            current: Some(conversation),
        }
    }

    /// New state with `current` rebuilt from user edits against `original`.
    ///
    /// Returns `None` when nothing has been extracted yet.
    pub fn with_edits(&self, edits: Vec<(String, String)>) -> Option<Self> {
        let original = self.original.as_ref()?;
        Some(Self {
            original: Some(original.clone()),
            current: Some(original.with_edits(edits)),
        })
    }
}

/// Sessions idle longer than this are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct Entry {
    state: SessionState,
    touched: Instant,
}

/// All live sessions.
///
/// A session ends once it has not been read or written for `ttl`; expired
/// entries are swept on every write.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.touched) < self.ttl
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| self.is_live(entry, now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Dropped {} idle sessions", removed);
        }
        removed
    }

    /// Snapshot of a session; unknown or expired sessions are empty.
    pub async fn get(&self, id: Uuid) -> SessionState {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&id) {
            Some(entry) if self.is_live(entry, now) => {
                entry.touched = now;
                entry.state.clone()
            }
            Some(_) => {
                sessions.remove(&id);
                SessionState::default()
            }
            None => SessionState::default(),
        }
    }

    pub async fn replace(&self, id: Uuid, state: SessionState) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);
        sessions.insert(id, Entry { state, touched: now });
    }

    /// Compute and store a session's next state under a single write lock.
    ///
    /// `next` sees the current state (empty when unknown or expired). When it
    /// returns `None` the session is left as it was.
    pub async fn update<F>(&self, id: Uuid, next: F) -> Option<SessionState>
    where
        F: FnOnce(&SessionState) -> Option<SessionState>,
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);

        let empty = SessionState::default();
        let state = next(sessions.get(&id).map_or(&empty, |entry| &entry.state))?;
        sessions.insert(
            id,
            Entry {
                state: state.clone(),
                touched: now,
            },
        );
        Some(state)
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now)
    }

    /// Number of sessions that have not expired.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| self.is_live(entry, now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// The session a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId {
    id: Uuid,
    is_new: bool,
}

impl SessionId {
    /// Read the session cookie, or mint a new id when it is missing or malformed.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_value(headers, SESSION_COOKIE).and_then(|v| Uuid::parse_str(v).ok()) {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// `Set-Cookie` value to send back, only for freshly minted ids.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.is_new {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.id
        ))
        .ok()
    }

    pub fn attach(&self, response: &mut Response) {
        if let Some(cookie) = self.set_cookie() {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
