use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAIL_PORT: u16 = 587;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    /// `None` when `MAILER_EMAIL` is unset; notifications are then disabled.
    pub mail: Option<MailConfig>,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP username, also used as the From address.
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm: LlmConfig {
                api_key: require_env("OPENAI_API_KEY")?,
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
                timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            },
            mail: MailConfig::from_env()?,
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Option<Self>> {
        let Some(username) = optional_env("MAILER_EMAIL") else {
            return Ok(None);
        };

        Ok(Some(MailConfig {
            username,
            password: require_env("MAILER_PASSWORD")?,
            host: require_env("MAILER_SERVICE")?,
            port: optional_env("MAIL_PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("MAIL_PORT must be a valid port number")?
                .unwrap_or(DEFAULT_MAIL_PORT),
        }))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
