pub mod api;
pub mod client;
pub mod config;
pub mod files;
pub mod multipart;
pub mod session;

use lexai_core::cache::QueryCache;
use lexai_core::error::AppError;

use crate::api::http_api::HttpLegalApi;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::session::Session;

/// Build an HTTP-backed session from configuration.
pub fn connect(config: &ClientConfig) -> Result<Session<HttpLegalApi>, AppError> {
    let client = ApiClient::new(config)?;
    tracing::debug!(base_url = %client.base_url(), "api client ready");
    Ok(Session::new(
        HttpLegalApi::new(client),
        QueryCache::with_ttl(config.cache_ttl_seconds),
    ))
}

#[cfg(test)]
mod tests {
    use super::config::ClientConfig;

    #[test]
    fn connect_rejects_bad_base_url() {
        let cfg = ClientConfig::default().with_base_url("localhost:5000");
        let err = super::connect(&cfg).err().expect("invalid base url");
        assert_eq!(err.code, "API_INVALID_BASE_URL");
    }

    #[test]
    fn connect_trims_trailing_slash() {
        let cfg = ClientConfig::default().with_base_url("http://127.0.0.1:5000/");
        let session = super::connect(&cfg).expect("connect");
        assert_eq!(session.api().client().base_url(), "http://127.0.0.1:5000");
        assert_eq!(session.cache().stats().ttl_seconds, cfg.cache_ttl_seconds);
    }
}
