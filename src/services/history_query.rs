//! services/history_query.rs
//! Búsqueda y paginación del historial de un canal, del lado del cliente.
//! Todo es cálculo puro sobre los registros ya traídos del servidor.

use crate::models::message_model::{Channel, MessageRecord};

/// Filas por página en la tabla de historial
pub const PAGE_SIZE: usize = 5;

/// Fila de la página con su número correlativo (1-based, global al filtro).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow<'a> {
    pub serial: usize,
    pub record: &'a MessageRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageNav {
    /// "Anterior" se deshabilita en la página 1; "siguiente" cuando
    /// `page == total_pages` o no hay páginas.
    pub fn new(page: usize, total_pages: usize) -> Self {
        Self {
            has_previous: page != 1,
            has_next: total_pages != 0 && page != total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage<'a> {
    pub rows: Vec<HistoryRow<'a>>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub nav: PageNav,
}

/// Texto sobre el que se busca: el JSON del registro en minúsculas.
fn searchable_text(record: &MessageRecord) -> String {
    serde_json::to_string(record)
        .unwrap_or_default()
        .to_lowercase()
}

/// Conserva el orden de entrada. Query vacía deja pasar todo.
pub fn filter_records<'a>(records: &'a [MessageRecord], query: &str) -> Vec<&'a MessageRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || searchable_text(r).contains(&needle))
        .collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Rango `[(page-1)*size, page*size)`; fuera de rango devuelve vacío.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// filtro -> conteo -> corte. Page 0 se trata como 1.
pub fn derive_page<'a>(records: &'a [MessageRecord], query: &str, page: usize) -> HistoryPage<'a> {
    let page = page.max(1);
    let filtered = filter_records(records, query);
    let total_pages = total_pages(filtered.len(), PAGE_SIZE);
    let offset = (page - 1).saturating_mul(PAGE_SIZE);

    let rows = page_slice(&filtered, page, PAGE_SIZE)
        .iter()
        .enumerate()
        .map(|(i, record)| HistoryRow {
            serial: offset + i + 1,
            record: *record,
        })
        .collect();

    HistoryPage {
        rows,
        page,
        total_pages,
        filtered_count: filtered.len(),
        nav: PageNav::new(page, total_pages),
    }
}

/// Estado de la vista de historial, propiedad de quien la renderiza.
///
/// Cambiar canal o búsqueda no reinicia la página; quien llama decide
/// si invocar `reset_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub channel: Channel,
    pub query: String,
    pub page: usize,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            channel: Channel::Email,
            query: String::new(),
            page: 1,
        }
    }
}

impl HistoryView {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn derive<'a>(&self, records: &'a [MessageRecord]) -> HistoryPage<'a> {
        derive_page(records, &self.query, self.page)
    }

    /// Avanza si la navegación lo permite. Devuelve si cambió la página.
    pub fn next_page(&mut self, records: &[MessageRecord]) -> bool {
        if self.derive(records).nav.has_next {
            self.page = self.page.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self, records: &[MessageRecord]) -> bool {
        if self.derive(records).nav.has_previous {
            self.page = self.page.saturating_sub(1).max(1);
            true
        } else {
            false
        }
    }
}
