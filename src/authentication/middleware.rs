use crate::authentication::{AuthError, AuthenticationContext, UserId};
use crate::sessions::TypedSession;
use actix_session::SessionExt;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::HttpMessage;
use actix_web_lab::middleware::Next;

pub async fn initialize_authentication(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    req.extensions_mut()
        .insert(AuthenticationContext::default());

    next.call(req).await
}

/// Restores the user bound to the session, if any. Must run inside the session
/// middleware and after `initialize_authentication`.
pub async fn attach_session_user(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = TypedSession::new(req.get_session());
    let user_id = session.get_user_id()?.map(UserId::new);

    {
        let mut extensions = req.extensions_mut();
        let context = extensions
            .get_mut::<AuthenticationContext>()
            .ok_or(AuthError::NotInitialized)?;
        context.user = user_id;
    }

    if let Some(user_id) = user_id {
        tracing::debug!(%user_id, "restored user from session");
    }

    next.call(req).await
}
