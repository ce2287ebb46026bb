//! models/message_model.rs
//! Registro de mensaje por canal y cuerpos de request/response de la API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::MessageError;

/// Canal de notificación. No existe otro valor persistible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Whatsapp,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Sms, Channel::Whatsapp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            "whatsapp" => Ok(Channel::Whatsapp),
            other => Err(MessageError::InvalidChannel(other.to_string())),
        }
    }
}

/// Cuerpo de `POST /send`. El campo `type` decide qué campos aplican;
/// los que falten quedan vacíos y los de otros canales se ignoran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Email {
        #[serde(rename = "emailTo", default, deserialize_with = "loose_string")]
        email_to: String,
    },
    Sms {
        #[serde(rename = "mobileNumber", default, deserialize_with = "loose_string")]
        mobile_number: String,
        #[serde(default, deserialize_with = "loose_string")]
        message: String,
    },
    Whatsapp {
        #[serde(rename = "mobileNumber", default, deserialize_with = "loose_string")]
        mobile_number: String,
        #[serde(default, deserialize_with = "loose_string")]
        message: String,
    },
}

/// Los campos de texto aceptan `null` (vacío) y números o booleanos
/// (su forma en texto); objetos y arrays se rechazan.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string, got {}",
            other
        ))),
    }
}

impl OutboundMessage {
    pub fn email(email_to: impl Into<String>) -> Self {
        OutboundMessage::Email {
            email_to: email_to.into(),
        }
    }

    pub fn sms(mobile_number: impl Into<String>, message: impl Into<String>) -> Self {
        OutboundMessage::Sms {
            mobile_number: mobile_number.into(),
            message: message.into(),
        }
    }

    pub fn whatsapp(mobile_number: impl Into<String>, message: impl Into<String>) -> Self {
        OutboundMessage::Whatsapp {
            mobile_number: mobile_number.into(),
            message: message.into(),
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            OutboundMessage::Email { .. } => Channel::Email,
            OutboundMessage::Sms { .. } => Channel::Sms,
            OutboundMessage::Whatsapp { .. } => Channel::Whatsapp,
        }
    }

    pub fn email_to(&self) -> Option<&str> {
        match self {
            OutboundMessage::Email { email_to } => Some(email_to),
            _ => None,
        }
    }

    pub fn mobile_number(&self) -> Option<&str> {
        match self {
            OutboundMessage::Sms { mobile_number, .. }
            | OutboundMessage::Whatsapp { mobile_number, .. } => Some(mobile_number),
            OutboundMessage::Email { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            OutboundMessage::Sms { message, .. } | OutboundMessage::Whatsapp { message, .. } => {
                Some(message)
            }
            OutboundMessage::Email { .. } => None,
        }
    }
}

/// Mensaje persistido. `id`, `created_at` y `updated_at` los asigna el store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    #[serde(flatten)]
    pub payload: OutboundMessage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn channel(&self) -> Channel {
        self.payload.channel()
    }
}

/// Respuesta 201 de `POST /send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub data: MessageRecord,
}

/// Cuerpo de error genérico
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
