use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_SESSION_FILE: &str = ".movie_session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub session_file: PathBuf,
    pub api_timeout_secs: u64,
    pub send_token: bool,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("MOVIE_API_URL")
            .map(|value| value.trim().to_string())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_file = std::env::var("MOVIE_SESSION_FILE")
            .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string())
            .into();
        let api_timeout_secs = parse_u64_env("MOVIE_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let send_token = parse_bool_env("MOVIE_API_SEND_TOKEN", false)?;
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            api_url,
            session_file,
            api_timeout_secs,
            send_token,
            log_level,
        })
    }
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    parse_u64(key, std::env::var(key).ok(), default)
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    parse_bool(key, std::env::var(key).ok(), default)
}

fn parse_u64(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    let value = raw
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("Failed to parse {key}: `{other}` is not a boolean")),
    }
}
