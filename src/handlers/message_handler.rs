//! handlers/message_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    models::message_model::{Channel, ErrorResponse, OutboundMessage, SendMessageResponse},
    services::message_service::MessageService,
};

/// POST /send
pub async fn send_message_endpoint(
    message_service: web::Data<MessageService>,
    body: web::Json<OutboundMessage>,
) -> HttpResponse {
    let msg = body.into_inner();

    match message_service.append(msg).await {
        Ok(record) => HttpResponse::Created().json(SendMessageResponse {
            success: true,
            data: record,
        }),
        Err(e) => {
            log::error!("Error guardando mensaje: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to save message").with_error(e))
        }
    }
}

/// GET /messages/{type}
pub async fn list_messages_endpoint(
    message_service: web::Data<MessageService>,
    path: web::Path<String>,
) -> HttpResponse {
    let raw_type = path.into_inner();
    let channel: Channel = match raw_type.parse() {
        Ok(ch) => ch,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new(format!("Unknown message type: {}", raw_type)))
        }
    };

    match message_service.list_by_channel(channel).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            log::error!("Error listando mensajes {}: {}", channel, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch messages"))
        }
    }
}

/// GET /health
pub async fn health_endpoint(message_service: web::Data<MessageService>) -> HttpResponse {
    match message_service.ping().await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(e) => {
            log::error!("Health check falló: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "error": e.to_string()
            }))
        }
    }
}
