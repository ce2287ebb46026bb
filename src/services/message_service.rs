//! services/message_service.rs
//! Store append-only de mensajes, consultable por canal.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::error::{MessageError, MessageResult};
use crate::models::message_model::{Channel, MessageRecord, OutboundMessage};

/// Tiempo que una conexión espera un lock de escritura antes de fallar
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    #[sqlx(rename = "type")]
    channel: String,
    email_to: Option<String>,
    mobile_number: Option<String>,
    message: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = MessageError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| MessageError::CorruptRecord {
            id: row.id.clone(),
            reason,
        };

        let channel = Channel::from_str(&row.channel)
            .map_err(|_| corrupt(format!("unknown type '{}'", row.channel)))?;
        let created_at = parse_timestamp(&row.created_at).map_err(corrupt)?;
        let updated_at = parse_timestamp(&row.updated_at).map_err(corrupt)?;

        let payload = match channel {
            Channel::Email => OutboundMessage::Email {
                email_to: row.email_to.unwrap_or_default(),
            },
            Channel::Sms => OutboundMessage::Sms {
                mobile_number: row.mobile_number.unwrap_or_default(),
                message: row.message.unwrap_or_default(),
            },
            Channel::Whatsapp => OutboundMessage::Whatsapp {
                mobile_number: row.mobile_number.unwrap_or_default(),
                message: row.message.unwrap_or_default(),
            },
        };

        Ok(MessageRecord {
            id: row.id,
            payload,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp '{}': {}", raw, e))
}

/// Ancho fijo (microsegundos, sufijo Z) para que el orden lexicográfico
/// de la columna coincida con el cronológico.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Reloj truncado a microsegundos, para que lo devuelto por `append`
/// coincida con lo que después lee `list_by_channel`.
fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Abre el pool SQLite. Crea el archivo si no existe.
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
) -> MessageResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Directorio que contiene el archivo de un URL `sqlite:`. `None` para
/// bases en memoria o rutas sin carpeta.
pub fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    let parent = Path::new(path).parent()?;
    (!parent.as_os_str().is_empty()).then(|| parent.to_path_buf())
}

/// Crea la carpeta de la base, conecta y migra. Un error aquí es fatal
/// para el proceso.
pub async fn open_store(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<MessageService> {
    // SQLite no crea carpetas intermedias
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("No se pudo crear directorio {:?}", dir))?;
    }

    log::info!("Conectando a la base en {}", database_url);
    let db_pool = connect_pool(database_url, max_connections)
        .await
        .context("No se pudo conectar a la base de datos")?;

    let message_service = MessageService::new(db_pool);
    message_service
        .run_migrations()
        .await
        .context("Fallo en migraciones de 'messages'")?;

    Ok(message_service)
}

#[derive(Clone, Debug)]
pub struct MessageService {
    db_pool: Pool<Sqlite>,
}

impl MessageService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        MessageService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> MessageResult<()> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await?;
        Ok(())
    }

    /// Persiste el mensaje y devuelve el registro con id y timestamps nuevos.
    /// Un único INSERT: si falla, no queda nada visible.
    pub async fn append(&self, msg: OutboundMessage) -> MessageResult<MessageRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_micros();
        let stamp = format_timestamp(&now);

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, type, email_to, mobile_number, message, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(msg.channel().as_str())
        .bind(msg.email_to())
        .bind(msg.mobile_number())
        .bind(msg.message())
        .bind(&stamp)
        .execute(&self.db_pool)
        .await
        .map_err(|e| {
            log::error!("(append) Fallo al insertar mensaje {}: {}", msg.channel(), e);
            MessageError::StoreUnavailable(e)
        })?;

        log::info!("(append) Mensaje {} guardado con id={}", msg.channel(), id);

        Ok(MessageRecord {
            id,
            payload: msg,
            created_at: now,
            updated_at: now,
        })
    }

    /// Todos los mensajes de un canal, del más reciente al más antiguo.
    /// Empates de `created_at` se resuelven por inserción inversa.
    pub async fn list_by_channel(&self, channel: Channel) -> MessageResult<Vec<MessageRecord>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, type, email_to, mobile_number, message, created_at, updated_at
            FROM messages
            WHERE type = ?1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(channel.as_str())
        .fetch_all(&self.db_pool)
        .await?;

        log::debug!(
            "(list_by_channel) {} mensajes para canal {}",
            rows.len(),
            channel
        );

        rows.into_iter().map(MessageRecord::try_from).collect()
    }

    /// Verifica que la base responde
    pub async fn ping(&self) -> MessageResult<()> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
