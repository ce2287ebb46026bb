//! handlers/mod.rs
pub mod message_handler;
