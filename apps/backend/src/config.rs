//! Runtime configuration read from the environment.

use std::time::Duration;

use anyhow::{anyhow, Context};
use mindmatch_core::{GatePolicy, Variant};

use crate::services::reporter::ReportPolicy;
use crate::services::sessions::DEFAULT_IDLE_TTL;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Variant used when a start request doesn't name one.
    pub default_variant: Variant,
    pub report: ReportPolicy,
    pub gate: GatePolicy,
    /// Live sessions untouched for this long are evicted.
    pub session_idle_ttl: Duration,
}

impl Config {
    /// Load from process environment (after `.env` has been applied).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Unset keys fall back to defaults; only
    /// `DATABASE_URL` is required.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let default_variant = match lookup("GAME_VARIANT") {
            Some(name) => Variant::from_str(&name)
                .ok_or_else(|| anyhow!("GAME_VARIANT has unknown value '{}'", name))?,
            None => Variant::default(),
        };

        let report_defaults = ReportPolicy::default();
        let report = ReportPolicy {
            timeout: Duration::from_millis(parse_or(
                &lookup,
                "REPORT_TIMEOUT_MS",
                report_defaults.timeout.as_millis() as u64,
            )?),
            retries: parse_or(&lookup, "REPORT_RETRIES", report_defaults.retries)?,
            backoff: report_defaults.backoff,
        };

        let gate_defaults = GatePolicy::default();
        let gate = GatePolicy {
            max_attempts: parse_or(&lookup, "AUTH_LOOKUP_ATTEMPTS", gate_defaults.max_attempts)?
                .max(1),
            retry_delay: Duration::from_millis(parse_or(
                &lookup,
                "AUTH_RETRY_DELAY_MS",
                gate_defaults.retry_delay.as_millis() as u64,
            )?),
            ..gate_defaults
        };

        let session_idle_ttl = Duration::from_secs(parse_or(
            &lookup,
            "SESSION_IDLE_TTL_SECS",
            DEFAULT_IDLE_TTL.as_secs(),
        )?);

        Ok(Self {
            database_url,
            host,
            port,
            default_variant,
            report,
            gate,
            session_idle_ttl,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
