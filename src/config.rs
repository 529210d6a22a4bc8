use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub statement_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let url = ["DATABASE_URL", "PG_DSN"]
            .into_iter()
            .filter_map(&var)
            .find(|v| !v.trim().is_empty())
            .context("DATABASE_URL (or PG_DSN) is not set")?;

        let port = match var("APP_PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid APP_PORT {v:?}"))?,
            None => 50051,
        };

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS {v:?}"))?,
            None => 10,
        };

        // 0 disables the deadline
        let statement_timeout = match var("DB_STATEMENT_TIMEOUT_MS") {
            Some(v) => {
                let ms: u64 = v
                    .parse()
                    .with_context(|| format!("invalid DB_STATEMENT_TIMEOUT_MS {v:?}"))?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None => None,
        };

        let database = DatabaseConfig {
            url,
            max_connections,
            statement_timeout,
        };

        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
