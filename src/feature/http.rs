//! Bounded-timeout HTTP/1.1 GET client.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{FeatureError, FeatureResult};
use crate::config::HttpConfig;

/// A fully-read HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    /// Final URL after any redirects the client followed
    pub url: String,
    pub body: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Thin wrapper over `reqwest::Client`; cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Client that follows redirects (up to reqwest's default limit).
    pub fn new(config: &HttpConfig) -> FeatureResult<Self> {
        Self::build(config, reqwest::redirect::Policy::default())
    }

    /// Client that reports 3xx responses as-is.
    pub fn without_redirects(config: &HttpConfig) -> FeatureResult<Self> {
        Self::build(config, reqwest::redirect::Policy::none())
    }

    fn build(config: &HttpConfig, redirect: reqwest::redirect::Policy) -> FeatureResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect)
            .build()
            .map_err(|e| FeatureError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a GET and read the whole body.
    ///
    /// # Errors
    /// `InvalidUrl` if `url` is not an absolute http(s) URL, `Http` for any
    /// transport failure or timeout. Non-2xx statuses are not errors.
    pub async fn get(&self, url: &str) -> FeatureResult<HttpResponse> {
        let parsed = parse_http_url(url)?;
        tracing::debug!(url = %parsed, "GET");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FeatureError::Http(describe(&e)))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(key, value)| {
                (
                    key.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| FeatureError::Http(format!("Failed to read response body: {}", describe(&e))))?;

        tracing::trace!(status, bytes = body.len(), "Response received");

        Ok(HttpResponse {
            status,
            url: final_url,
            body,
            headers,
        })
    }
}

/// Parse an absolute `http`/`https` URL.
pub fn parse_http_url(url: &str) -> FeatureResult<url::Url> {
    let invalid = |reason: String| FeatureError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = url::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(parsed)
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_http_url_accepts_http_and_https() {
        assert!(parse_http_url("http://127.0.0.1:8080/path").is_ok());
        assert!(parse_http_url("https://example.com").is_ok());
    }

    #[test]
    fn parse_http_url_rejects_malformed_input() {
        for bad in ["", "not a url", "ftp://example.com", "example.com", "file:///etc/passwd"] {
            let err = parse_http_url(bad).unwrap_err();
            assert!(err.is_input_error(), "{bad} should be an input error");
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = HttpResponse {
            status: 200,
            url: "http://localhost/".to_string(),
            body: String::new(),
            headers: HashMap::from([("server".to_string(), "nginx".to_string())]),
        };
        assert_eq!(response.header("Server"), Some("nginx"));
        assert!(response.is_success());
        assert!(!response.is_redirect());
    }

    #[tokio::test]
    async fn get_against_closed_port_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HttpClient::new(&HttpConfig {
            timeout: Duration::from_secs(2),
            ..HttpConfig::default()
        })
        .unwrap();
        let err = client
            .get(&format!("http://127.0.0.1:{}/", port))
            .await
            .unwrap_err();
        assert!(matches!(err, FeatureError::Http(_)));
        assert!(!err.is_input_error());
    }
}
