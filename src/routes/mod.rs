use actix_web::{web, HttpResponse};

/// Default route table. Applications mount their own through `Application::build`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check));
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
