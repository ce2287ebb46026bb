//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod history_query;
pub mod message_client;
pub mod message_service;
