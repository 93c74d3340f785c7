//! Cookie-identified, in-memory session storage.
//!
//! Each visitor gets an opaque session id (UUID v4) in a cookie. The id keys
//! a small string map held in a process-wide [`SessionStore`]. A new session
//! is only stored, and its cookie only sent, once something is written to
//! it. Sessions that sit idle longer than the configured lifetime are dropped
//! the next time they are looked up.

use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Session key holding the last page the visitor successfully viewed.
pub const PREVIOUS_URL_KEY: &str = "_previous.url";

#[derive(Debug, Clone)]
struct SessionData {
    values: HashMap<String, String>,
    last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            values: HashMap::new(),
            last_seen: now,
        }
    }
}

/// Shared in-memory session storage.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    lifetime: Duration,
}

impl SessionStore {
    /// Create an empty store.
    ///
    /// # Arguments
    /// * `lifetime` - How long a session may sit idle before it expires
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Idle lifetime, also used as the cookie's `Max-Age`.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Resume the session for `id`, or start a new one.
    ///
    /// Unknown and expired ids are not errors; they produce a fresh session.
    /// A fresh session takes no space in the store until its first write.
    pub fn load(&self, id: Option<&str>) -> Session {
        self.load_at(id, Utc::now())
    }

    fn load_at(&self, id: Option<&str>, now: DateTime<Utc>) -> Session {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(id) = id {
            match sessions.get_mut(id) {
                Some(data) if now - data.last_seen <= self.lifetime => {
                    data.last_seen = now;
                    return Session {
                        id: id.to_string(),
                        store: self.clone(),
                        is_new: false,
                    };
                }
                Some(_) => {
                    debug!("Session expired, starting a new one");
                    sessions.remove(id);
                }
                None => debug!("Unknown session id, starting a new one"),
            }
        }

        Session {
            id: Uuid::new_v4().to_string(),
            store: self.clone(),
            is_new: true,
        }
    }

    /// Drop every session idle longer than the lifetime. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, data| now - data.last_seen <= self.lifetime);
        before - sessions.len()
    }

    /// Number of live sessions (including expired ones not yet purged).
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn get_value(&self, id: &str, key: &str) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .and_then(|data| data.values.get(key).cloned())
    }

    fn set_value(&self, id: &str, key: &str, value: String) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(id.to_string())
            .or_insert_with(|| SessionData::new(Utc::now()))
            .values
            .insert(key.to_string(), value);
    }
}

/// Handle to a single visitor's session.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
    is_new: bool,
}

impl Session {
    /// Opaque id carried in the session cookie.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this session was created for the current request.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Read a value.
    ///
    /// # Returns
    /// The stored value, or `None` if the key (or the session itself) is absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get_value(&self.id, key)
    }

    /// Write a value, storing the session first if this is its first write.
    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.store.set_value(&self.id, key, value.into());
    }

    /// Whether the store holds this session (and so the visitor needs its cookie).
    pub fn is_stored(&self) -> bool {
        self.store.contains(&self.id)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("is_new", &self.is_new)
            .finish_non_exhaustive()
    }
}

/// Extract a named cookie value from the Cookie header.
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == cookie_name).then(|| value.to_string())
        })
}

/// Build the Set-Cookie value carrying the session id.
pub fn session_cookie(name: &str, id: &str, lifetime: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name,
        id,
        lifetime.num_seconds()
    )
}

/// Middleware: attach a [`Session`] to every request and refresh its cookie.
///
/// Successful `GET` page views (not XHR) are remembered under
/// [`PREVIOUS_URL_KEY`] so a later form post can send the visitor back.
/// The cookie is only sent for sessions that ended up in the store.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.config.session_cookie_name;
    let cookie_id = extract_cookie(request.headers(), cookie_name);
    let session = state.sessions.load(cookie_id.as_deref());

    let page_view = (request.method() == Method::GET
        && !is_xhr(request.headers()))
    .then(|| {
        request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string())
    });

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if let Some(url) = page_view {
        if response.status().is_success() {
            session.insert(PREVIOUS_URL_KEY, url);
        }
    }

    if !session.is_stored() {
        return response;
    }

    let cookie = session_cookie(cookie_name, session.id(), state.sessions.lifetime());
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!("Could not encode session cookie: {}", e),
    }

    response
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}
