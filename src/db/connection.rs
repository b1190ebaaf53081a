use std::time::Duration;

use anyhow::anyhow;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackendKind {
    Postgres,
    Sqlite,
}

impl DbBackendKind {
    pub fn from_url(url: &str) -> Option<Self> {
        let normalized = url.trim().to_ascii_lowercase();
        if normalized.starts_with("postgres://") || normalized.starts_with("postgresql://") {
            Some(DbBackendKind::Postgres)
        } else if normalized.starts_with("sqlite:") {
            Some(DbBackendKind::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DbBackendKind::Postgres => "postgres",
            DbBackendKind::Sqlite => "sqlite",
        }
    }
}

pub fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let kind = DbBackendKind::from_url(&cfg.url).ok_or_else(|| {
        anyhow!(
            "unsupported database url '{}'; expected scheme postgres://, postgresql://, or sqlite://",
            redact_url(&cfg.url)
        )
    })?;

    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    if kind == DbBackendKind::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
    }

    info!(
        backend = kind.as_str(),
        url = %redact_url(&cfg.url),
        "syncing database schema from entities"
    );
    db.get_schema_registry("todo_board::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}
