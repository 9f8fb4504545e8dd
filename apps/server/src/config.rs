use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug)]
pub struct UnknownLogFormat(String);

impl fmt::Display for UnknownLogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected 'text' or 'json', got '{}'", self.0)
    }
}

impl std::error::Error for UnknownLogFormat {}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(LogFormat::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(UnknownLogFormat(s.to_string()))
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Upper bound on one market data fetch during enrichment.
    pub enrichment_timeout: Duration,
    /// 0 means unbounded.
    pub max_concurrent_enrichments: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            db_path: "./db/screener.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            enrichment_timeout: Duration::from_millis(15_000),
            max_concurrent_enrichments: 0,
            log_format: LogFormat::Text,
        }
    }
}

/// Reads `key`, falling back to `default` when unset. A set but malformed
/// value is an error.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = env_or("SCREENER_LISTEN_ADDR", defaults.listen_addr)?;
        let db_path = std::env::var("SCREENER_DB_PATH").unwrap_or(defaults.db_path);
        let cors_allow = std::env::var("SCREENER_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("SCREENER_REQUEST_TIMEOUT_MS", 30_000)?;
        let enrichment_timeout_ms: u64 = env_or("SCREENER_ENRICHMENT_TIMEOUT_MS", 15_000)?;
        let max_concurrent_enrichments =
            env_or("SCREENER_MAX_CONCURRENT_ENRICHMENTS", defaults.max_concurrent_enrichments)?;
        let log_format = env_or("SCREENER_LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            enrichment_timeout: Duration::from_millis(enrichment_timeout_ms),
            max_concurrent_enrichments,
            log_format,
        })
    }
}
