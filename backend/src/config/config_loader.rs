use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use super::config_model::{Database, DotEnvyConfig, Server};

const DEFAULT_BODY_LIMIT_MIB: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup; `load` passes the process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let server = Server {
        port: required(&lookup, "SERVER_PORT")?
            .parse::<u16>()
            .context("SERVER_PORT is invalid")?,
        body_limit: optional(&lookup, "SERVER_BODY_LIMIT", DEFAULT_BODY_LIMIT_MIB)?,
        timeout: optional(&lookup, "SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let url = required(&lookup, "DB_CONNECTION")
        .or_else(|_| required(&lookup, "DATABASE_URL"))
        .map_err(|_| anyhow!("DB_CONNECTION is not set"))?;

    let database = Database {
        url,
        max_connections: optional(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
    };

    Ok(DotEnvyConfig { server, database })
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("{key} is not set"))
}

fn optional<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}
