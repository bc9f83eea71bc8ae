//! Cookie parsing.
//!
//! Every request cookie is exposed as-is. Cookies carrying a valid signature
//! for the application secret are additionally exposed, unwrapped, as signed
//! cookies. A `Cookie` header that cannot be parsed is rejected with a `400`.

use crate::errors::{error_chain_fmt, json_error};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, CookieJar, Key, ParseError};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::COOKIE;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use actix_web_lab::middleware::Next;
use std::collections::HashMap;
use std::fmt;
use std::future::{ready, Ready};

/// Key used to verify signed cookies, registered as application data.
#[derive(Clone)]
pub struct CookieSigningKey(pub Key);

#[derive(thiserror::Error)]
pub enum CookieError {
    #[error("Malformed cookie header")]
    Malformed(#[source] ParseError),
    #[error("Cookie parsing is not configured")]
    MissingSigningKey,
    #[error("Cookie parsing middleware is not in use")]
    NotParsed,
}

impl fmt::Debug for CookieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CookieError {
    fn status_code(&self) -> StatusCode {
        match self {
            CookieError::Malformed(_) => StatusCode::BAD_REQUEST,
            CookieError::MissingSigningKey | CookieError::NotParsed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RequestCookies {
    plain: HashMap<String, String>,
    signed: HashMap<String, String>,
}

impl RequestCookies {
    pub fn parse(req: &HttpRequest, key: &Key) -> Result<Self, CookieError> {
        let cookies = parse_cookie_headers(req).map_err(CookieError::Malformed)?;

        let mut jar = CookieJar::new();
        for cookie in cookies.iter() {
            jar.add_original(cookie.clone());
        }

        let plain = cookies
            .iter()
            .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
            .collect();

        let signed_jar = jar.signed(key);
        let signed = cookies
            .iter()
            .filter_map(|cookie| signed_jar.get(cookie.name()))
            .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
            .collect();

        Ok(Self { plain, signed })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.plain.get(name).map(String::as_str)
    }

    /// Only returns a value if its signature was valid.
    pub fn get_signed(&self, name: &str) -> Option<&str> {
        self.signed.get(name).map(String::as_str)
    }

    pub fn signed(&self) -> &HashMap<String, String> {
        &self.signed
    }
}

/// Unlike `HttpRequest::cookies`, a single bad pair fails the whole header.
fn parse_cookie_headers(req: &HttpRequest) -> Result<Vec<Cookie<'static>>, ParseError> {
    let mut cookies = Vec::new();
    for header in req.headers().get_all(COOKIE) {
        let header = std::str::from_utf8(header.as_bytes()).map_err(ParseError::from)?;
        for pair in header.split(';').map(str::trim) {
            if pair.is_empty() {
                continue;
            }
            cookies.push(Cookie::parse_encoded(pair)?.into_owned());
        }
    }

    Ok(cookies)
}

impl FromRequest for RequestCookies {
    type Error = CookieError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cookies = req.extensions().get::<RequestCookies>().cloned();
        ready(cookies.ok_or(CookieError::NotParsed))
    }
}

pub async fn parse_cookies(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let key = req
        .app_data::<CookieSigningKey>()
        .cloned()
        .ok_or(CookieError::MissingSigningKey)?;

    let cookies = RequestCookies::parse(req.request(), &key.0)?;
    tracing::trace!(
        cookies = cookies.plain.len(),
        signed = cookies.signed.len(),
        "parsed cookies"
    );
    req.extensions_mut().insert(cookies);

    next.call(req).await
}
