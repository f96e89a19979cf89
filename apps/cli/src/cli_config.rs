use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use url::Url;
use vetclinic_core::{AppError, AppResult};

const DEFAULT_SESSION_FILE: &str = ".vetclinic-session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Runtime settings for the terminal client.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub backend_url: Url,
    pub session_file: PathBuf,
    pub http_timeout: Duration,
}

impl CliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let raw_backend_url = required_non_empty(&lookup, "VETCLINIC_BACKEND_URL")?;
        let backend_url = Url::parse(raw_backend_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid VETCLINIC_BACKEND_URL '{raw_backend_url}': {error}"
            ))
        })?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "VETCLINIC_BACKEND_URL must use http or https, got '{}'",
                backend_url.scheme()
            )));
        }

        let session_file = lookup("VETCLINIC_SESSION_FILE")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_owned());

        let timeout_secs = parse_u64(
            &lookup,
            "VETCLINIC_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "VETCLINIC_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            backend_url,
            session_file: PathBuf::from(session_file),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
