//! HTTP transport for the Nimbus CLI client.
//!
//! This module provides the single low-level `invoke` used by the request
//! dispatcher, plus the shared client configuration. Session and credential
//! management live outside this tool; the bearer token is handed in by the
//! caller.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::configuration::Configuration;
use crate::nimbus_v1::ApiError;

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Timeout for upload operations in seconds (defaults to timeout if not set)
    pub upload_timeout: Option<u64>,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), "NBCLI".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: crate::configuration::DEFAULT_API_BASE_URL.to_string(),
            default_headers,
            timeout: 300,
            upload_timeout: Some(1800),
        }
    }
}

impl HttpRequestConfig {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            base_url: configuration.base_url().as_str().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// A raw response as seen by the dispatcher: the status code plus the parsed
/// JSON body, when one was present.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        StatusCode::from_u16(self.status)
            .map(|status| status.is_success())
            .unwrap_or(false)
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: HttpRequestConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpRequestConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Get a reference to the HTTP client configuration
    pub fn config(&self) -> &HttpRequestConfig {
        &self.config
    }

    /// Turn a relative resource URI into an absolute one. Continuation links
    /// and upload session URLs arrive absolute and pass through unchanged.
    pub fn absolute_uri(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("{}/{}", self.config.base_url, uri.trim_start_matches('/'))
        }
    }

    /// Execute a single request and hand back the raw status and JSON body.
    ///
    /// Only network-level failures surface as errors here; status code
    /// classification is the dispatcher's concern.
    pub async fn invoke(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        content_type: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<RawResponse, ApiError> {
        let url = self.absolute_uri(uri);
        trace!("{} {}", method, url);

        let mut request = self.client.request(method, &url);

        if let Some(token) = access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Response from {} was not JSON: {}", url, e);
                    Value::Null
                }
            }
        };

        Ok(RawResponse { status, body })
    }

    /// Execute a request carrying a raw byte payload, such as a single-shot
    /// file upload.
    pub async fn invoke_bytes(
        &self,
        method: Method,
        uri: &str,
        payload: Vec<u8>,
        access_token: Option<&str>,
    ) -> Result<RawResponse, ApiError> {
        let url = self.absolute_uri(uri);
        trace!("{} {} ({} byte body)", method, url, payload.len());

        let upload_timeout = self.config.upload_timeout.unwrap_or(self.config.timeout);
        let mut request = self
            .client
            .request(method, &url)
            .timeout(std::time::Duration::from_secs(upload_timeout))
            .header("Content-Type", mime::APPLICATION_OCTET_STREAM.as_ref())
            .body(payload);

        if let Some(token) = access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        Ok(RawResponse { status, body })
    }

    /// Upload one range-addressed chunk to a session URL.
    ///
    /// Session URLs are pre-authorized by the server; no bearer token is
    /// attached.
    pub async fn put_chunk(
        &self,
        upload_url: &str,
        chunk: Vec<u8>,
        content_range: &str,
    ) -> Result<RawResponse, ApiError> {
        trace!("PUT {} ({})", upload_url, content_range);

        let upload_timeout = self.config.upload_timeout.unwrap_or(self.config.timeout);
        let response = self
            .client
            .put(upload_url)
            .timeout(std::time::Duration::from_secs(upload_timeout))
            .header("Content-Range", content_range)
            .header("Content-Type", mime::APPLICATION_OCTET_STREAM.as_ref())
            .body(chunk)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_config_default() {
        let config = HttpRequestConfig::default();
        assert_eq!(config.base_url, crate::configuration::DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, 300);
        assert_eq!(config.default_headers.get("User-Agent").unwrap(), "NBCLI");
    }

    #[test]
    fn test_absolute_uri_composition() {
        let client = HttpClient::new(HttpRequestConfig::default()).unwrap();
        assert_eq!(
            client.absolute_uri("users/ada"),
            format!("{}/users/ada", crate::configuration::DEFAULT_API_BASE_URL)
        );
        assert_eq!(
            client.absolute_uri("/users/ada"),
            format!("{}/users/ada", crate::configuration::DEFAULT_API_BASE_URL)
        );
        assert_eq!(
            client.absolute_uri("https://upload.example.com/session/1"),
            "https://upload.example.com/session/1"
        );
    }

    #[test]
    fn test_raw_response_success_classification() {
        let ok = RawResponse {
            status: 200,
            body: Value::Null,
        };
        let missing = RawResponse {
            status: 404,
            body: Value::Null,
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }
}
