//! Command handlers.

pub mod alerts;
pub mod dashboard;
pub mod login;
pub mod recommend;
pub mod status;
pub mod treat;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use livestock_core::withdrawal::parse_timestamp;
use livestock_core::Database;

use crate::config::Config;

/// Open the configured store, seeding it when allowed.
pub fn open_store(config: &Config) -> anyhow::Result<Database> {
    let db = match &config.db_path {
        Some(path) => Database::open(path).with_context(|| format!("Failed to open {}", path))?,
        None => Database::open_in_memory()?,
    };
    if config.seed && db.seed_demo()? {
        tracing::debug!("Empty store seeded with demo records");
    }
    Ok(db)
}

/// The `--at` override, or the current time.
pub fn evaluation_time(at: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(value) => Ok(parse_timestamp(value)?),
        None => Ok(Utc::now()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
