use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    /// Prediction endpoint. Enrichment is disabled when unset.
    pub risk_service_url: Option<String>,
    pub risk_service_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            risk_service_url: None,
            risk_service_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into()),
        );

        let risk_service_url = std::env::var("RISK_SERVICE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let risk_service_timeout = std::env::var("RISK_SERVICE_TIMEOUT_SECS")
            .ok()
            .map(|raw| parse_timeout(&raw))
            .transpose()
            .context("invalid RISK_SERVICE_TIMEOUT_SECS")?
            .flatten();

        Ok(Self {
            cors_allowed_origins,
            risk_service_url,
            risk_service_timeout,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Whole seconds; zero or blank means no timeout.
fn parse_timeout(raw: &str) -> Result<Option<Duration>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let secs = raw
        .parse::<u64>()
        .with_context(|| format!("`{raw}` is not a whole number of seconds"))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
