use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use std::fmt;

pub fn error_chain_fmt(err: &impl std::error::Error, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}\n", err)?;
    let mut current = err.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn json_error(status_code: StatusCode, err: &impl std::error::Error) -> HttpResponse {
    HttpResponse::build(status_code).json(ErrorBody {
        error: err.to_string(),
    })
}
