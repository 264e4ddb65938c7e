use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Process configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub db_pool_size: u32,
    pub bcrypt_cost: u32,
    pub cors_allowed_origin: Option<String>,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Write verbs the bridge may execute, lowercase. Empty means read-only.
    pub allowed_writes: Vec<String>,
    pub max_rows: usize,
    pub statement_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout: Duration::from_secs(20),
            allowed_writes: Vec::new(),
            max_rows: 500,
            statement_timeout: Duration::from_millis(2000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let bcrypt_cost = parse_var("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(anyhow!("BCRYPT_COST must be within 4..=31, got {}", bcrypt_cost));
        }
        let db_pool_size = parse_var("DB_POOL_SIZE", 8u32)?;
        if db_pool_size == 0 {
            return Err(anyhow!("DB_POOL_SIZE must be positive"));
        }

        let defaults = AssistantConfig::default();
        let assistant = AssistantConfig {
            api_key: optional_var("OPENAI_API_KEY"),
            base_url: optional_var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: optional_var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(parse_var("ASSISTANT_TIMEOUT_SECS", 20u64)?),
            allowed_writes: optional_var("ASSISTANT_ALLOWED_WRITES")
                .map(|v| parse_verb_list(&v))
                .unwrap_or_default(),
            max_rows: parse_var("ASSISTANT_MAX_ROWS", defaults.max_rows)?,
            statement_timeout: Duration::from_millis(parse_var(
                "ASSISTANT_STATEMENT_TIMEOUT_MS",
                2000u64,
            )?),
        };

        Ok(Config {
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            database_url: optional_var("DATABASE_URL")
                .unwrap_or_else(|| "sql_learning_platform.db".to_string()),
            db_pool_size,
            bcrypt_cost,
            cors_allowed_origin: optional_var("CORS_ALLOWED_ORIGIN"),
            assistant,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

pub fn parse_verb_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_list_is_normalized() {
        assert_eq!(
            parse_verb_list(" INSERT, update ,,"),
            vec!["insert".to_string(), "update".to_string()]
        );
        assert!(parse_verb_list("").is_empty());
    }

    #[test]
    fn assistant_defaults_are_read_only() {
        let cfg = AssistantConfig::default();
        assert!(cfg.allowed_writes.is_empty());
        assert_eq!(cfg.model, "gpt-3.5-turbo");
    }
}
