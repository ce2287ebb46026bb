//! services/message_client.rs
//! Cliente HTTP del servicio: envía mensajes y trae el historial por canal.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};

use crate::models::message_model::{
    Channel, ErrorResponse, MessageRecord, OutboundMessage, SendMessageResponse,
};
use crate::services::history_query::{derive_page, HistoryPage, HistoryView};

#[derive(Clone, Debug)]
pub struct MessageClient {
    base_url: String,
    http_client: Client,
}

impl MessageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    /// Sin timeout propio se usa el del transporte; un timeout no implica
    /// que el mensaje no se haya guardado.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("No se pudo construir el cliente HTTP")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// POST /send
    pub async fn send(&self, msg: &OutboundMessage) -> Result<MessageRecord> {
        let url = format!("{}/send", self.base_url);
        log::debug!("(send) POST {} canal={}", url, msg.channel());

        let resp = self
            .http_client
            .post(&url)
            .json(msg)
            .send()
            .await
            .context("Fallo al hacer POST /send")?;

        let body: SendMessageResponse = Self::check_status(resp)
            .await?
            .json()
            .await
            .context("Respuesta de /send inválida")?;
        Ok(body.data)
    }

    /// GET /messages/{type}, ya ordenado del más reciente al más antiguo
    pub async fn fetch_channel(&self, channel: Channel) -> Result<Vec<MessageRecord>> {
        let url = format!("{}/messages/{}", self.base_url, channel);
        log::debug!("(fetch_channel) GET {}", url);

        let resp = self
            .http_client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Fallo al hacer GET /messages/{}", channel))?;

        Self::check_status(resp)
            .await?
            .json()
            .await
            .context("Respuesta de /messages inválida")
    }

    /// Trae el canal activo de la vista y devuelve los registros; la página
    /// se deriva con `page_of`.
    pub async fn load(&self, view: &HistoryView) -> Result<Vec<MessageRecord>> {
        self.fetch_channel(view.channel).await
    }

    pub fn page_of<'a>(view: &HistoryView, records: &'a [MessageRecord]) -> HistoryPage<'a> {
        derive_page(records, &view.query, view.page)
    }

    async fn check_status(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(err) => match err.error {
                Some(cause) => format!("{}: {}", err.message, cause),
                None => err.message,
            },
            Err(_) => text,
        };
        Err(anyhow!("HTTP {}: {}", status.as_u16(), detail))
    }
}
