use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};
use time::OffsetDateTime;
use uuid::Uuid;

pub struct TypedSession(Session);

impl TypedSession {
    const USER_ID_KEY: &'static str = "user_id";
    const CREATED_AT_KEY: &'static str = "created_at";

    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Marks a brand new session so that it is persisted even if nothing else
    /// is ever stored in it. Returns true if the session was new.
    pub fn ensure_initialized(&self) -> Result<bool, actix_web::Error> {
        if self.0.get::<i64>(Self::CREATED_AT_KEY)?.is_some() {
            return Ok(false);
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.0.insert(Self::CREATED_AT_KEY, now)?;

        Ok(true)
    }

    /// Binds the session to a user. The session id is renewed to prevent fixation.
    pub fn log_in(&self, user_id: Uuid) -> Result<(), actix_web::Error> {
        // Inserting marks the session as changed, renewing must come last.
        self.0.insert(Self::USER_ID_KEY, user_id)?;
        self.0.renew();
        Ok(())
    }

    pub fn get_user_id(&self) -> Result<Option<Uuid>, actix_web::Error> {
        let user_id = self.0.get(Self::USER_ID_KEY)?;
        Ok(user_id)
    }

    pub fn log_out(self) {
        self.0.purge()
    }
}

impl FromRequest for TypedSession {
    type Error = <Session as FromRequest>::Error;
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
