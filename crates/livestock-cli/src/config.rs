//! Settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use livestock_core::board::MAX_TREND_DAYS;
use livestock_core::BoardConfig;

/// Where `login` keeps the session between invocations
pub const DEFAULT_SESSION_PATH: &str = ".livestock-session.json";

/// CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file; `None` for a fresh in-memory store
    pub db_path: Option<String>,
    /// Load the demo farm into an empty store
    pub seed: bool,
    pub session_path: PathBuf,
    pub board: BoardConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `db_path` comes from the command line, which already folds in
    /// `LIVESTOCK_DB`.
    pub fn from_env(db_path: Option<String>) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(db_path, |key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(db_path: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = BoardConfig::default();
        Self {
            db_path: db_path.filter(|p| !p.trim().is_empty()),
            seed: lookup("LIVESTOCK_SEED")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            session_path: lookup("LIVESTOCK_SESSION")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH)),
            board: BoardConfig {
                expiring_soon_days: lookup("LIVESTOCK_EXPIRING_DAYS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.expiring_soon_days),
                trend_days: lookup("LIVESTOCK_TREND_DAYS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .filter(|days| (1..=MAX_TREND_DAYS).contains(days))
                    .unwrap_or(defaults.trend_days),
            },
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
