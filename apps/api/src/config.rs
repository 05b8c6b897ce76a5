use anyhow::{Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_MAX_RESUMES: usize = 5;
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Application configuration loaded from environment variables.
///
/// Only `DATABASE_URL` is required. Missing AI or job-search keys do not stop
/// startup; the affected routes answer with a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Backing store for the per-user resume and external-job collections.
    /// Falls back to process memory when unset.
    pub redis_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub jsearch_api_key: Option<String>,
    pub jsearch_base_url: String,
    pub jsearch_host: String,
    pub google_tokeninfo_url: String,
    /// When set, sign-in tokens must carry this audience.
    pub google_client_id: Option<String>,
    pub max_resumes: usize,
    /// `None` means the external-job collection is unbounded.
    pub max_external_jobs: Option<usize>,
    pub http_timeout_secs: u64,
    /// Sessions expire this long after sign-in.
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jsearch_host =
            optional_env("JSEARCH_HOST").unwrap_or_else(|| DEFAULT_JSEARCH_HOST.to_string());

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            jsearch_api_key: optional_env("JSEARCH_API_KEY"),
            jsearch_base_url: optional_env("JSEARCH_BASE_URL")
                .unwrap_or_else(|| format!("https://{jsearch_host}")),
            jsearch_host,
            google_tokeninfo_url: optional_env("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string()),
            google_client_id: optional_env("GOOGLE_CLIENT_ID"),
            max_resumes: parse_env("MAX_RESUMES")?.unwrap_or(DEFAULT_MAX_RESUMES),
            max_external_jobs: parse_env("MAX_EXTERNAL_JOBS")?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS")?.unwrap_or(120),
            session_ttl_secs: parse_env("SESSION_TTL_SECS")?
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}"))
        })
        .transpose()
}

/// Blank values count as unset so `KEY=` in a `.env` file disables a feature.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/gradindstud_test".to_string(),
            redis_url: None,
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            jsearch_api_key: None,
            jsearch_base_url: "http://127.0.0.1:9".to_string(),
            jsearch_host: DEFAULT_JSEARCH_HOST.to_string(),
            google_tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            google_client_id: None,
            max_resumes: DEFAULT_MAX_RESUMES,
            max_external_jobs: None,
            http_timeout_secs: 5,
            session_ttl_secs: 3600,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
