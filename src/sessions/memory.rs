use actix_session::storage::{LoadError, SaveError, UpdateError};
use actix_session::storage::{SessionKey, SessionStore};
use actix_web::cookie::time::Duration;
use anyhow::anyhow;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use time::OffsetDateTime;
use uuid::Uuid;

type SessionState = HashMap<String, String>;

#[derive(Debug, Clone)]
struct StoredSession {
    state: SessionState,
    expires_at: OffsetDateTime,
}

/// Transient session store. Everything is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<Uuid, StoredSession>>,
}

#[derive(Debug)]
pub struct CleanupConfig {
    enabled: bool,
    interval: std::time::Duration,
}

impl CleanupConfig {
    pub fn new(enabled: bool, interval: std::time::Duration) -> Self {
        Self { enabled, interval }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self::new(false, std::time::Duration::from_secs(30))
    }
}

impl MemorySessionStore {
    pub fn new(cleanup_config: CleanupConfig) -> Self {
        let store = Self::default();

        // Launch a background cleanup task if necessary
        if cleanup_config.enabled {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let sessions = Arc::downgrade(&store.sessions);
                    handle.spawn(async move {
                        clean_sessions(sessions, cleanup_config.interval).await;
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        %err,
                        "no runtime available, expired sessions are only dropped on load"
                    );
                }
            }
        }

        store
    }

    /// Number of stored sessions, expired ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

async fn clean_sessions(
    sessions: Weak<DashMap<Uuid, StoredSession>>,
    clean_interval: std::time::Duration,
) {
    let mut interval = tokio::time::interval(clean_interval);
    loop {
        let _ = interval.tick().await;

        let sessions = match sessions.upgrade() {
            Some(sessions) => sessions,
            None => {
                tracing::debug!("session store is gone");
                return;
            }
        };

        let now = OffsetDateTime::now_utc();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);

        let cleaned = before.saturating_sub(sessions.len());
        tracing::debug!(%cleaned, "sessions cleanup done");
    }
}

#[async_trait::async_trait(?Send)]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let session_id = session_key_to_uuid(session_key).map_err(LoadError::Other)?;

        let now = OffsetDateTime::now_utc();
        let state = match self.sessions.get(&session_id) {
            None => return Ok(None),
            Some(session) if session.expires_at <= now => None,
            Some(session) => Some(session.state.clone()),
        };

        // Expired, drop it now rather than waiting for the cleanup task
        if state.is_none() {
            self.sessions.remove(&session_id);
        }

        Ok(state)
    }

    async fn save(
        &self,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        let session_id = Uuid::new_v4();
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(*ttl)
            .ok_or_else(|| SaveError::Other(anyhow!("unable to compute expiry timestamp")))?;

        self.sessions.insert(
            session_id,
            StoredSession {
                state: session_state,
                expires_at,
            },
        );

        let session_key = uuid_to_session_key(session_id).map_err(SaveError::Other)?;

        Ok(session_key)
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        let session_id = session_key_to_uuid(&session_key).map_err(UpdateError::Other)?;
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(*ttl)
            .ok_or_else(|| UpdateError::Other(anyhow!("unable to compute expiry timestamp")))?;

        if let Some(mut session) = self.sessions.get_mut(&session_id) {
            session.state = session_state;
            session.expires_at = expires_at;
            return Ok(session_key);
        }

        // If the session doesn't exist fall back to calling save
        self.save(session_state, ttl)
            .await
            .map_err(|err| match err {
                SaveError::Serialization(err) => UpdateError::Serialization(err),
                SaveError::Other(err) => UpdateError::Other(err),
            })
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        let session_id = session_key_to_uuid(session_key)?;
        self.sessions.remove(&session_id);

        Ok(())
    }
}

fn uuid_to_session_key(id: Uuid) -> Result<SessionKey, anyhow::Error> {
    let session_key_string = id.to_string();

    let res: Result<SessionKey, _> = session_key_string.try_into();
    let session_key = res.map_err(Into::<anyhow::Error>::into)?;

    Ok(session_key)
}

fn session_key_to_uuid(session_key: &SessionKey) -> Result<Uuid, anyhow::Error> {
    Uuid::try_parse(session_key.as_ref()).map_err(Into::<anyhow::Error>::into)
}
