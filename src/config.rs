use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TICK_MS: u64 = 250;
const MIN_TICK_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    /// `None` leaves requests without a deadline.
    pub http_timeout: Option<Duration>,
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: None,
            tick_rate: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("FIT_API_URL")
            .map(|val| normalize_base_url(&val))
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let http_timeout = lookup("FIT_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let tick_ms = lookup("FIT_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .max(MIN_TICK_MS);

        Self {
            api_url,
            http_timeout,
            tick_rate: Duration::from_millis(tick_ms),
        }
    }
}

/// Loads `.env.local` first so it wins over `.env`.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
