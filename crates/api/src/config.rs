use std::str::FromStr;

use mqt_sources::remote_sheet::DEFAULT_SHEET_RANGE;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Remote imports can
    /// take a while on large sheets.
    pub request_timeout_secs: u64,
    /// Upper bound of the database pool (default: `10`).
    pub db_max_connections: u32,
    /// Range fetched from remote sheets (default: `A1:F1000`).
    pub sheet_range: String,
    /// Spreadsheet service base URL.
    pub sheets_api_base: String,
    /// Timeout for each spreadsheet service call (default: `30`).
    pub sheets_timeout_secs: u64,
    /// Run the project's validation rules on every import (default: `true`).
    pub validate_on_import: bool,
    /// Largest accepted workbook upload in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                         |
    /// |---------------------------|---------------------------------|
    /// | `HOST`                    | `0.0.0.0`                       |
    /// | `PORT`                    | `3000`                          |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS`    | `120`                           |
    /// | `DB_MAX_CONNECTIONS`      | `10`                            |
    /// | `MQT_SHEET_RANGE`         | `A1:F1000`                      |
    /// | `MQT_SHEETS_API_BASE`     | `https://sheets.googleapis.com` |
    /// | `MQT_SHEETS_TIMEOUT_SECS` | `30`                            |
    /// | `MQT_VALIDATE_ON_IMPORT`  | `true`                          |
    /// | `MQT_MAX_UPLOAD_BYTES`    | `20971520`                      |
    ///
    /// Panics on unparsable values; misconfiguration should stop start-up.
    pub fn from_env() -> Self {
        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 120),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10),
            sheet_range: std::env::var("MQT_SHEET_RANGE")
                .unwrap_or_else(|_| DEFAULT_SHEET_RANGE.into()),
            sheets_api_base: std::env::var("MQT_SHEETS_API_BASE")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".into()),
            sheets_timeout_secs: parse_var("MQT_SHEETS_TIMEOUT_SECS", 30),
            validate_on_import: parse_var("MQT_VALIDATE_ON_IMPORT", true),
            max_upload_bytes: parse_var("MQT_MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
