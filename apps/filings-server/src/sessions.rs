//! Browser sessions and the `x-session-id` extractor

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use filings_core::{AnalysisProvider, SessionHandle};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::error::ServerError;
use crate::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// All live sessions. Nothing outlives the process, and idle sessions are
/// dropped by [`SessionRegistry::cleanup`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionRegistry {
    pub async fn create(&self, provider: Arc<dyn AnalysisProvider>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                handle: SessionHandle::new(provider),
                last_seen: Instant::now(),
            },
        );
        info!("Created session {}", id);
        id
    }

    /// Look up a session and mark it as seen
    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    /// Drop sessions not seen within `idle` (call periodically)
    pub async fn cleanup(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < idle);
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Evicted {} idle sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The session named by the request's `x-session-id` header
pub struct CurrentSession(pub SessionHandle);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ServerError::MissingSession)?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| ServerError::SessionNotFound(raw.to_string()))?;
        state
            .sessions
            .get(&id)
            .await
            .map(CurrentSession)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }
}
