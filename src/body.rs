use crate::configuration::BodySettings;
use crate::errors::{error_chain_fmt, json_error};
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use std::fmt;

#[derive(thiserror::Error)]
#[error("Invalid request body")]
pub struct BodyError(#[from] JsonPayloadError);

impl fmt::Debug for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for BodyError {
    fn status_code(&self) -> StatusCode {
        ResponseError::status_code(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}

/// Configuration shared by every `web::Json` extractor of the application.
pub fn json_config(settings: &BodySettings) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(settings.json_limit_bytes)
        .error_handler(|err, req| {
            tracing::debug!(error = %err, path = %req.path(), "unable to parse request body");
            BodyError::from(err).into()
        })
}
