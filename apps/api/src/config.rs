use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Deadline applied to every completion call made by the assistant and the matcher.
    pub llm_call_timeout: Duration,
    /// Max scorer calls in flight across all ranking batches.
    pub rank_concurrency: usize,
    /// When false, jobs are scored by keyword overlap only and no completion calls are made.
    pub llm_match_scoring: bool,
    /// Idle time after which a chat session is evicted.
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    /// Allowed browser origin. Permissive CORS when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 3001u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_call_timeout: Duration::from_secs(parse_nonzero_env(
                "LLM_CALL_TIMEOUT_SECS",
                30u64,
            )?),
            rank_concurrency: parse_nonzero_env("RANK_CONCURRENCY", 8usize)?,
            llm_match_scoring: parse_env("ENABLE_LLM_MATCH_SCORING", true)?,
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", 1800u64)?),
            session_sweep_interval: Duration::from_secs(parse_nonzero_env(
                "SESSION_SWEEP_INTERVAL_SECS",
                60u64,
            )?),
            cors_origin: std::env::var("CORS_ORIGIN").ok(),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Like `parse_env`, but zero is rejected.
fn parse_nonzero_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_env(key, default)?;
    if value == T::default() {
        bail!("{key} must be at least 1");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value = parse_env("JOBSCOUT_TEST_UNSET_VAR", 42u64).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("JOBSCOUT_TEST_PORT_VAR", " 4000 ");
        let value = parse_env("JOBSCOUT_TEST_PORT_VAR", 3001u16).unwrap();
        assert_eq!(value, 4000);
    }

    #[test]
    fn test_parse_env_reads_bool() {
        std::env::set_var("JOBSCOUT_TEST_BOOL_VAR", "false");
        assert!(!parse_env("JOBSCOUT_TEST_BOOL_VAR", true).unwrap());
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("JOBSCOUT_TEST_BAD_VAR", "eight");
        let err = parse_env("JOBSCOUT_TEST_BAD_VAR", 8usize).unwrap_err();
        assert!(err.to_string().contains("JOBSCOUT_TEST_BAD_VAR"));
    }

    #[test]
    fn test_parse_nonzero_env_rejects_zero_timeout() {
        std::env::set_var("JOBSCOUT_TEST_ZERO_TIMEOUT_VAR", "0");
        let err = parse_nonzero_env("JOBSCOUT_TEST_ZERO_TIMEOUT_VAR", 30u64).unwrap_err();
        assert!(err.to_string().contains("must be at least 1"));
    }

    #[test]
    fn test_parse_nonzero_env_accepts_positive_and_default() {
        std::env::set_var("JOBSCOUT_TEST_POSITIVE_VAR", "4");
        assert_eq!(parse_nonzero_env("JOBSCOUT_TEST_POSITIVE_VAR", 8usize).unwrap(), 4);
        assert_eq!(parse_nonzero_env("JOBSCOUT_TEST_UNSET_NONZERO_VAR", 30u64).unwrap(), 30);
    }
}
