//! Liveness endpoint; needs no token so load balancers can probe it.
use actix_web::{get, web, HttpResponse, Responder};

/// Plain-text `OK` while the HTTP workers are serving.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = String))
)]
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
