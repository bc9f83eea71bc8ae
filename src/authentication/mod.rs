mod extractors;
mod middleware;
pub use extractors::{Authenticated, CurrentUser};
pub use middleware::{attach_session_user, initialize_authentication};

use crate::errors::{error_chain_fmt, json_error};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UserId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Per-request authentication state. Strategies proving who the user is live
/// outside of this crate, this only carries the outcome between requests.
#[derive(Clone, Debug, Default)]
pub struct AuthenticationContext {
    user: Option<UserId>,
}

impl AuthenticationContext {
    pub fn user(&self) -> Option<UserId> {
        self.user
    }
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Authentication has not been initialized")]
    NotInitialized,
    #[error("Authentication required")]
    Anonymous,
}

impl fmt::Debug for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotInitialized => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Anonymous => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}
