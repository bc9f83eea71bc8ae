use crate::authentication::{AuthError, AuthenticationContext, UserId};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

/// The user restored from the session, if any.
#[derive(Copy, Clone, Debug)]
pub struct CurrentUser(pub Option<UserId>);

impl FromRequest for CurrentUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = req.extensions().get::<AuthenticationContext>().cloned();
        ready(
            context
                .map(|context| CurrentUser(context.user()))
                .ok_or(AuthError::NotInitialized),
        )
    }
}

/// Rejects anonymous requests.
#[derive(Copy, Clone, Debug)]
pub struct Authenticated(pub UserId);

impl FromRequest for Authenticated {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = match req.extensions().get::<AuthenticationContext>() {
            None => Err(AuthError::NotInitialized),
            Some(context) => context.user().map(Authenticated).ok_or(AuthError::Anonymous),
        };
        ready(user)
    }
}
