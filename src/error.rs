//! error.rs
//! Errores del servicio de mensajes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessageError {
    /// La base de datos no responde o la lectura/escritura falló.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    /// Fila persistida que no se puede reconstruir como `MessageRecord`.
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

pub type MessageResult<T> = std::result::Result<T, MessageError>;
