use std::io::Read;
use std::time::Duration;

use lexai_core::error::AppError;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::multipart::MultipartBody;

/// Downloads larger than this are refused rather than buffered.
const MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

/// Blocking transport for the LexAI REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    request_timeout: Duration,
    upload_timeout: Duration,
}

/// Validate and normalize an API base URL (`http(s)://host[:port][/prefix]`, no query).
pub fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let base_url = raw.trim().trim_end_matches('/').to_string();
    let invalid = |why: &str| {
        AppError::new("API_INVALID_BASE_URL", "API base URL is invalid")
            .with_details(format!("base_url={base_url}; {why}"))
    };

    let parsed = Url::parse(&base_url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("host is empty"));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("credentials are not allowed"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    if parsed.port() == Some(0) {
        return Err(invalid("port is invalid"));
    }
    Ok(base_url)
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        config.validate()?;
        let base_url = normalize_base_url(&config.base_url)?;
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();
        Ok(Self {
            base_url,
            agent,
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<T, AppError> {
        let mut req = self.agent.get(&self.url(path)).timeout(self.request_timeout);
        for (k, v) in query {
            req = req.query(k, v);
        }
        let resp = settle(req.call(), fallback)?;
        decode_json(resp, path)
    }

    pub fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        fallback: &str,
    ) -> Result<T, AppError> {
        let resp = settle(
            self.agent
                .post(&self.url(path))
                .timeout(self.request_timeout)
                .send_json(body),
            fallback,
        )?;
        decode_json(resp, path)
    }

    pub fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &MultipartBody,
        fallback: &str,
    ) -> Result<T, AppError> {
        let resp = settle(
            self.agent
                .post(&self.url(path))
                .timeout(self.upload_timeout)
                .set("Content-Type", &form.content_type)
                .send_bytes(&form.body),
            fallback,
        )?;
        decode_json(resp, path)
    }

    pub fn delete(&self, path: &str, fallback: &str) -> Result<(), AppError> {
        settle(
            self.agent
                .delete(&self.url(path))
                .timeout(self.request_timeout)
                .call(),
            fallback,
        )?;
        Ok(())
    }

    pub fn get_bytes(&self, path: &str, fallback: &str) -> Result<Vec<u8>, AppError> {
        let resp = settle(
            self.agent
                .get(&self.url(path))
                .timeout(self.upload_timeout)
                .call(),
            fallback,
        )?;
        let mut out = Vec::new();
        resp.into_reader()
            .take(MAX_DOWNLOAD_BYTES + 1)
            .read_to_end(&mut out)
            .map_err(|e| {
                AppError::new("API_DECODE_FAILED", "Failed to read response body")
                    .with_details(format!("path={path}; err={e}"))
                    .with_retryable(true)
            })?;
        if out.len() as u64 > MAX_DOWNLOAD_BYTES {
            return Err(AppError::new("API_DECODE_FAILED", "Response body is too large")
                .with_details(format!("path={path}; limit={MAX_DOWNLOAD_BYTES}")));
        }
        Ok(out)
    }
}

/// Map a ureq outcome onto the request-error taxonomy.
fn settle(
    result: Result<ureq::Response, ureq::Error>,
    fallback: &str,
) -> Result<ureq::Response, AppError> {
    match result {
        Ok(r) => Ok(r),
        Err(ureq::Error::Status(status, r)) => {
            let body = r.into_string().unwrap_or_default();
            let message = server_message(&body, fallback);
            tracing::warn!(status, message = %message, "request failed");
            Err(AppError::new("API_REQUEST_FAILED", message)
                .with_details(format!("status={status}"))
                .with_retryable(status >= 500))
        }
        Err(e) => {
            tracing::warn!(err = %e, "request could not be sent");
            Err(AppError::new("API_UNREACHABLE", fallback)
                .with_details(e.to_string())
                .with_retryable(true))
        }
    }
}

fn decode_json<T: DeserializeOwned>(resp: ureq::Response, path: &str) -> Result<T, AppError> {
    resp.into_json::<T>().map_err(|e| {
        AppError::new("API_DECODE_FAILED", "Failed to decode response")
            .with_details(format!("path={path}; err={e}"))
    })
}

/// Error text reported by the server: a JSON `message` field when present, else the body.
pub fn server_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        if let Some(serde_json::Value::String(m)) = map.get("message") {
            if !m.trim().is_empty() {
                return m.trim().to_string();
            }
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_rules() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:5000/").expect("ok"),
            "http://127.0.0.1:5000"
        );
        assert!(normalize_base_url("https://lexai.example.com").is_ok());
        assert!(normalize_base_url("https://lexai.example.com/v2").is_ok());
        assert!(normalize_base_url("http://[::1]:5000").is_ok());

        assert!(normalize_base_url("ftp://lexai.example.com").is_err());
        assert!(normalize_base_url("lexai.example.com").is_err());
        assert!(normalize_base_url("http://").is_err());
        assert!(normalize_base_url("http://:5000").is_err());
        assert!(normalize_base_url("http://user@lexai.example.com").is_err());
        assert!(normalize_base_url("http://lexai.example.com?x=1").is_err());
        assert!(normalize_base_url("http://127.0.0.1:0").is_err());
        assert!(normalize_base_url("http://127.0.0.1:99999").is_err());
        assert!(normalize_base_url("http://ho st").is_err());
        assert!(normalize_base_url("http://lexai.example.com#top").is_err());
        assert!(normalize_base_url("http://user:pw@lexai.example.com").is_err());
    }

    #[test]
    fn server_message_prefers_json_message() {
        assert_eq!(
            server_message(r#"{"message":"Document not found"}"#, "fallback"),
            "Document not found"
        );
        assert_eq!(server_message("  plain text  ", "fallback"), "plain text");
        assert_eq!(server_message("", "Failed to upload document"), "Failed to upload document");
        assert_eq!(server_message(r#"{"error":"x"}"#, "fallback"), r#"{"error":"x"}"#);
    }
}
