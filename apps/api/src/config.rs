use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot file, or a directory of `data-DD-MM-YYYY.json` snapshots.
    pub listings_path: PathBuf,
    pub regions_path: PathBuf,
    pub regions_fetch: bool,
    /// Server-side key; requests may bring their own.
    pub openrouter_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub cv_prompt_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            listings_path: env_or("LISTINGS_PATH", "data_lowongan").into(),
            regions_path: env_or("REGIONS_PATH", "wilayah_id.txt").into(),
            regions_fetch: parse_env("REGIONS_FETCH", false)?,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            llm_model: env_or("LLM_MODEL", DEFAULT_MODEL),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 90)?,
            cv_prompt_path: optional_env("CV_PROMPT_PATH").map(PathBuf::from),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let port: u16 = parse_env("MAGANG_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("MAGANG_TEST_BAD_TIMEOUT", "ninety");
        let result: Result<u64> = parse_env("MAGANG_TEST_BAD_TIMEOUT", 90);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        std::env::set_var("MAGANG_TEST_BLANK_KEY", "   ");
        assert!(optional_env("MAGANG_TEST_BLANK_KEY").is_none());
    }
}
