use anyhow::{Result, bail};

use super::AppConfig;
use crate::db::connection::{DbBackendKind, redact_url};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        } else if DbBackendKind::from_url(&database.url).is_none() {
            errors.push(format!(
                "database.url '{}' must use postgres://, postgresql://, or sqlite://",
                redact_url(&database.url)
            ));
        }

        if database.max_connections == 0 {
            errors.push("database.max_connections must be > 0".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }

        if cfg.storage.snapshot_path.is_some() {
            errors.push(
                "storage.snapshot_path only applies to the memory backend; unset it or database.url"
                    .to_string(),
            );
        }
    }

    if cfg.auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }

    if cfg
        .auth
        .audience
        .as_ref()
        .is_some_and(|audience| audience.trim().is_empty())
    {
        errors.push("auth.audience must not be blank when set".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
