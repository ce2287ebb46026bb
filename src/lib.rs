//! Historial de notificaciones (email, SMS, WhatsApp): store de mensajes,
//! API HTTP y lógica de búsqueda/paginación del cliente.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;
