//! Shared REST plumbing
//!
//! Builds authenticated JSON requests against a base URL, checks the
//! expected status and turns unexpected responses into client errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Token header understood by the identity and service endpoints.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Authenticated JSON client bound to one base URL.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    token: Option<String>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Join base URL and resource path with exactly one `/`.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn get(&self, path: &str, success: u16) -> ApplicationResult<HttpResponse> {
        self.request(Method::Get, path, None, success)
    }

    pub fn post(&self, path: &str, body: &Value, success: u16) -> ApplicationResult<HttpResponse> {
        self.request(Method::Post, path, Some(body), success)
    }

    pub fn put(&self, path: &str, body: &Value, success: u16) -> ApplicationResult<HttpResponse> {
        self.request(Method::Put, path, Some(body), success)
    }

    pub fn delete(&self, path: &str, success: u16) -> ApplicationResult<HttpResponse> {
        self.request(Method::Delete, path, None, success)
    }

    /// Send one request and require `success` as response status.
    #[instrument(level = "debug", skip(self, body), fields(base = %self.base_url))]
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        success: u16,
    ) -> ApplicationResult<HttpResponse> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = &self.token {
            headers.insert(AUTH_TOKEN_HEADER.to_string(), token.clone());
        }
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let request = HttpRequest {
            method,
            url: self.url(path),
            headers,
            body: body.map(Value::to_string),
        };

        let response = self
            .transport
            .send(&request)
            .with_transport_context(&format!("{} {}", method, request.url))?;
        debug!(status = response.status, expected = success, "response");

        if response.status != success {
            return Err(ApplicationError::Client {
                status: response.status,
                message: error_message(&response),
            });
        }
        Ok(response)
    }
}

/// Parse the body and take the value under its single top-level `key`.
pub fn unwrap_key(response: &HttpResponse, key: &str) -> ApplicationResult<Value> {
    let mut body = response.json().map_err(|e| ApplicationError::Client {
        status: response.status,
        message: format!("invalid JSON in response: {e}"),
    })?;
    body.get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApplicationError::Client {
            status: response.status,
            message: format!("missing '{key}' in response"),
        })
}

/// Human-readable message of an error response.
///
/// Fault bodies look like `{"itemNotFound": {"message": "...", "code": 404}}`;
/// the nested message is preferred, then the raw body, then the reason phrase.
pub fn error_message(response: &HttpResponse) -> String {
    if let Ok(Value::Object(fault)) = response.json() {
        let nested = fault
            .values()
            .find_map(|v| v.get("message").and_then(Value::as_str))
            .or_else(|| fault.get("message").and_then(Value::as_str));
        if let Some(message) = nested {
            return message.to_string();
        }
    }
    let body = response.body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unexpected response")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: BTreeMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn given_fault_body_when_extracting_message_then_uses_nested_message() {
        let r = response(404, r#"{"itemNotFound": {"message": "Network not found", "code": 404}}"#);
        assert_eq!(error_message(&r), "Network not found");
    }

    #[test]
    fn given_plain_body_when_extracting_message_then_uses_body() {
        assert_eq!(error_message(&response(500, "boom\n")), "boom");
        assert_eq!(error_message(&response(503, "")), "Service Unavailable");
    }

    #[test]
    fn given_body_without_key_when_unwrapping_then_client_error() {
        let err = unwrap_key(&response(200, r#"{"networks": []}"#), "network").unwrap_err();
        assert_eq!(err.to_string(), "client error (200): missing 'network' in response");
    }
}
