use std::time::Duration;

use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::response;
use crate::error::AppError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client bound to one bridge's API base URL.
///
/// Every call is a single round trip: the connection pool is disabled so each
/// request opens a fresh connection, and there is no retry and no total
/// request timeout, only a connect timeout. Cloning is cheap; clones share
/// the underlying reqwest client.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
}

fn build_http_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(0)
        .build()?)
}

impl BridgeClient {
    /// Client for an authorized user. Request paths are joined onto
    /// `http://{ip}/api/{username}`.
    ///
    /// `ip` may carry a port (`192.168.1.2:8080`).
    pub fn new(ip: &str, username: &str) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: format!("http://{}/api/{}", ip, username),
        })
    }

    /// Client without a username, for pairing. Paths are joined onto
    /// `http://{ip}`.
    pub fn unauthenticated(ip: &str) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: format!("http://{}", ip),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against the bridge and decode the JSON response.
    ///
    /// Classification: a connect failure is `BridgeUnreachable`; an HTTP
    /// status >= 400 is `Protocol` with the server's reason text; a decoded
    /// body carrying the bridge's error envelope surfaces as the typed
    /// bridge error. Nothing is retried.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, &url);
        if let Some(payload) = payload {
            debug!("body: {}", payload);
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(classify_send_error)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            let reason = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(AppError::Protocol {
                status: status.as_u16(),
                reason,
            });
        }

        let value: Value = response.json().await?;
        debug!("response: {}", value);

        if let Some(err) = response::first_error(&value) {
            return Err(err.into());
        }

        Ok(value)
    }

    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn put(&self, path: &str, payload: &Value) -> Result<Value, AppError> {
        self.request(Method::PUT, path, Some(payload)).await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> Result<Value, AppError> {
        self.request(Method::POST, path, Some(payload)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AppError> {
        self.request(Method::DELETE, path, None).await
    }
}

fn classify_send_error(err: reqwest::Error) -> AppError {
    if err.is_connect() || err.is_timeout() {
        AppError::BridgeUnreachable {
            message: err.to_string(),
        }
    } else {
        AppError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_embeds_username() {
        let client = BridgeClient::new("192.168.1.2", "abc123").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.2/api/abc123");
    }

    #[test]
    fn test_base_url_keeps_port() {
        let client = BridgeClient::new("192.168.1.2:8080", "abc123").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.2:8080/api/abc123");
    }

    #[test]
    fn test_unauthenticated_base_url() {
        let client = BridgeClient::unauthenticated("192.168.1.2").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.2");
    }
}
