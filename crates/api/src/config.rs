use std::time::Duration;

use folio_db::RetryPolicy;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, uploads included (default: 10 MiB).
    pub max_upload_bytes: usize,
    pub database: DatabaseConfig,
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Startup retries after the first failed connect (default: `5`).
    pub connect_retries: u32,
    /// Fixed pause between startup connect attempts (default: `5000`).
    pub connect_delay_ms: u64,
    /// Upper bound on a single query (default: `5`).
    pub query_timeout_secs: u64,
    /// How often the connectivity monitor pings the database (default: `10`).
    pub monitor_interval_secs: u64,
}

impl DatabaseConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.connect_retries, self.connect_delay_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`                 |
    /// | `DATABASE_URL`             | required                   |
    /// | `DB_CONNECT_RETRIES`       | `5`                        |
    /// | `DB_CONNECT_DELAY_MS`      | `5000`                     |
    /// | `DB_QUERY_TIMEOUT_SECS`    | `5`                        |
    /// | `DB_MONITOR_INTERVAL_SECS` | `10`                       |
    ///
    /// Panics on malformed values and on a zero timeout or interval.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = secs_from_env("REQUEST_TIMEOUT_SECS", "30");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", "10485760")
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            connect_retries: env_or("DB_CONNECT_RETRIES", "5")
                .parse()
                .expect("DB_CONNECT_RETRIES must be a valid u32"),
            connect_delay_ms: env_or("DB_CONNECT_DELAY_MS", "5000")
                .parse()
                .expect("DB_CONNECT_DELAY_MS must be a valid u64"),
            query_timeout_secs: secs_from_env("DB_QUERY_TIMEOUT_SECS", "5"),
            monitor_interval_secs: secs_from_env("DB_MONITOR_INTERVAL_SECS", "10"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            database,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn secs_from_env(name: &str, default: &str) -> u64 {
    positive_secs(name, &env_or(name, default)).unwrap_or_else(|e| panic!("{e}"))
}

/// Parse a whole number of seconds that must be at least 1.
fn positive_secs(name: &str, raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(format!("{name} must be at least 1 second")),
        Ok(secs) => Ok(secs),
        Err(e) => Err(format!("{name} must be a whole number of seconds: {e}")),
    }
}
