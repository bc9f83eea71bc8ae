mod memory;
mod typed_session;

pub use memory::{CleanupConfig, MemorySessionStore};
pub use typed_session::TypedSession;

use crate::configuration::Environment;
use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_session::SessionExt;
use actix_web::body::MessageBody;
use actix_web::cookie::time::Duration;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web_lab::middleware::Next;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A session store supplied from outside, expected to survive restarts.
pub type DurableSessionStore = Arc<dyn SessionStore + Send + Sync>;

#[derive(thiserror::Error, Debug)]
#[error("A production session store has not been configured for the {environment} environment")]
pub struct MissingSessionStore {
    pub environment: Environment,
}

#[derive(Clone)]
pub enum SessionBackend {
    Transient(MemorySessionStore),
    Durable(DurableSessionStore),
}

impl SessionBackend {
    /// A durable store is always preferred. Without one, only the development
    /// environment may fall back to keeping sessions in memory.
    pub fn select(
        environment: Environment,
        durable_store: Option<DurableSessionStore>,
        cleanup_config: CleanupConfig,
    ) -> Result<Self, MissingSessionStore> {
        match durable_store {
            Some(store) => Ok(SessionBackend::Durable(store)),
            None if environment.is_development() => {
                tracing::warn!(%environment, "using a transient in-memory session store");
                Ok(SessionBackend::Transient(MemorySessionStore::new(
                    cleanup_config,
                )))
            }
            None => Err(MissingSessionStore { environment }),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, SessionBackend::Transient(_))
    }
}

impl fmt::Debug for SessionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionBackend::Transient(store) => f.debug_tuple("Transient").field(store).finish(),
            SessionBackend::Durable(_) => f.write_str("Durable"),
        }
    }
}

type SessionState = HashMap<String, String>;

#[async_trait::async_trait(?Send)]
impl SessionStore for SessionBackend {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        match self {
            SessionBackend::Transient(store) => store.load(session_key).await,
            SessionBackend::Durable(store) => store.load(session_key).await,
        }
    }

    async fn save(
        &self,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        match self {
            SessionBackend::Transient(store) => store.save(session_state, ttl).await,
            SessionBackend::Durable(store) => store.save(session_state, ttl).await,
        }
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        match self {
            SessionBackend::Transient(store) => store.update(session_key, session_state, ttl).await,
            SessionBackend::Durable(store) => store.update(session_key, session_state, ttl).await,
        }
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        match self {
            SessionBackend::Transient(store) => store.delete(session_key).await,
            SessionBackend::Durable(store) => store.delete(session_key).await,
        }
    }
}

/// Must be mounted inside the session middleware.
pub async fn initialize_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = TypedSession::new(req.get_session());
    if session.ensure_initialized()? {
        tracing::debug!("new session created");
    }

    next.call(req).await
}
