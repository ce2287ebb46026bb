//! app.rs
use actix_web::{error, guard, http::StatusCode, middleware::DefaultHeaders, web, HttpResponse};

use crate::handlers::message_handler;
use crate::models::message_model::ErrorResponse;

const ALLOWED_METHODS: &str = "GET, POST";
const ALLOWED_HEADERS: &str = "Content-Type";

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Preflight CORS en cualquier ruta; va primero porque el guard de recurso
        // deja pasar al resto de métodos
        .service(
            web::resource("/{tail:.*}")
                .guard(guard::Options())
                .to(preflight_ok),
        )
        .route("/send", web::post().to(message_handler::send_message_endpoint))
        .route(
            "/messages/{type}",
            web::get().to(message_handler::list_messages_endpoint),
        )
        .route("/health", web::get().to(message_handler::health_endpoint));
}

/// Cabeceras CORS para el único origen configurado
pub fn cors_headers(allowed_origin: &str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", allowed_origin.to_string()))
        .add(("Access-Control-Allow-Methods", ALLOWED_METHODS))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
}

async fn preflight_ok() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Body inválido (incluido un `type` desconocido) -> 400 con el mismo formato de error
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        log::warn!("Body de mensaje inválido: {}", detail);
        let resp = HttpResponse::build(StatusCode::BAD_REQUEST)
            .json(ErrorResponse::new("Invalid message payload").with_error(detail));
        error::InternalError::from_response(err, resp).into()
    })
}
