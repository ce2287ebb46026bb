//! config/app_config.rs
//! Configuración del servidor leída de variables de entorno (.env incluido).

use std::env;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite:data/messages.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Único origen permitido por CORS ("*" si no se define)
    pub frontend_url: String,
    pub database_url: String,
    pub db_max_connections: u32,
    /// `None` deja el valor por defecto de actix
    pub http_workers: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_url: "*".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            http_workers: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("PORT inválido: {}", v))?,
            None => defaults.port,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", v))?,
            None => defaults.db_max_connections,
        };

        let http_workers = match get("HTTP_WORKERS") {
            Some(v) => Some(
                v.trim()
                    .parse()
                    .with_context(|| format!("HTTP_WORKERS inválido: {}", v))?,
            ),
            None => None,
        };

        Ok(AppConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            frontend_url: get("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections,
            http_workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.frontend_url, "*");
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("FRONTEND_URL", "http://localhost:5173"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("HTTP_WORKERS", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.frontend_url, "http://localhost:5173");
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.http_workers, Some(2));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("PORT", "cinco mil")])).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[("FRONTEND_URL", "  ")])).unwrap();
        assert_eq!(cfg.frontend_url, "*");
    }
}
