use std::env;
use std::time::Duration;

use lexai_core::cache::DEFAULT_TTL_SECONDS;
use lexai_core::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 120_000;

pub const ENV_BASE_URL: &str = "LEXAI_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "LEXAI_REQUEST_TIMEOUT_MS";
pub const ENV_UPLOAD_TIMEOUT_MS: &str = "LEXAI_UPLOAD_TIMEOUT_MS";
pub const ENV_CACHE_TTL_SECS: &str = "LEXAI_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Uploads carry up to 50 MiB per file and get their own budget.
    pub upload_timeout: Duration,
    pub cache_ttl_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            upload_timeout: Duration::from_millis(DEFAULT_UPLOAD_TIMEOUT_MS),
            cache_ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Malformed numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = lookup(ENV_BASE_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            request_timeout: Duration::from_millis(lookup_u64(
                &lookup,
                ENV_REQUEST_TIMEOUT_MS,
                DEFAULT_REQUEST_TIMEOUT_MS,
            )),
            upload_timeout: Duration::from_millis(lookup_u64(
                &lookup,
                ENV_UPLOAD_TIMEOUT_MS,
                DEFAULT_UPLOAD_TIMEOUT_MS,
            )),
            cache_ttl_seconds: lookup_u64(&lookup, ENV_CACHE_TTL_SECS, DEFAULT_TTL_SECONDS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Zero timeouts would fail every request before it is sent.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            (ENV_REQUEST_TIMEOUT_MS, self.request_timeout),
            (ENV_UPLOAD_TIMEOUT_MS, self.upload_timeout),
        ] {
            if value.is_zero() {
                return Err(AppError::new("CONFIG_INVALID_TIMEOUT", "Timeout must be positive")
                    .with_details(format!("setting={name}")));
            }
        }
        Ok(())
    }
}

fn lookup_u64<F>(lookup: &F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => default,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(var = name, value = %raw, err = %e, "ignoring malformed setting");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_and_falls_back() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://lexai.example.com/"),
            (ENV_REQUEST_TIMEOUT_MS, "1500"),
            (ENV_CACHE_TTL_SECS, "soon"),
        ]);
        let cfg = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.base_url, "https://lexai.example.com/");
        assert_eq!(cfg.request_timeout, Duration::from_millis(1500));
        assert_eq!(cfg.upload_timeout, Duration::from_millis(DEFAULT_UPLOAD_TIMEOUT_MS));
        assert_eq!(cfg.cache_ttl_seconds, DEFAULT_TTL_SECONDS);
    }

    #[test]
    fn zero_timeout_is_a_config_error() {
        let cfg = ClientConfig::from_lookup(|k| (k == ENV_UPLOAD_TIMEOUT_MS).then(|| "0".to_string()));
        let err = cfg.validate().expect_err("zero timeout");
        assert_eq!(err.code, "CONFIG_INVALID_TIMEOUT");
        assert_eq!(err.category(), lexai_core::error::ErrorCategory::Config);
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn blank_base_url_uses_default() {
        let cfg = ClientConfig::from_lookup(|k| (k == ENV_BASE_URL).then(|| "  ".to_string()));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
