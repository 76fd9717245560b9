//! I/O boundary traits for testability
//!
//! HTTP exchanges go through [`HttpTransport`], allowing services to be
//! tested with a stub that records requests and replays canned responses.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

/// HTTP verbs used by the REST clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// Received response. Header names are lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP transport abstraction.
pub trait HttpTransport: Send + Sync {
    /// Perform one blocking request/response exchange.
    ///
    /// Any HTTP status is a successful exchange; only network-level
    /// failures are errors.
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Blocking transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given per-request timeout; zero means none.
    pub fn new(timeout: Duration) -> io::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout((!timeout.is_zero()).then_some(timeout))
            .user_agent(concat!("cloudctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(io::Error::other)?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(to_io_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().map_err(to_io_error)?;

        trace!(status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_io_error(e: reqwest::Error) -> io::Error {
    let kind = if e.is_timeout() {
        io::ErrorKind::TimedOut
    } else if e.is_connect() {
        io::ErrorKind::ConnectionRefused
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, e)
}

/// Transport decorator that echoes each exchange.
///
/// `verbose` writes the request and status lines to stderr;
/// `include` writes the status line and response headers to stdout.
pub struct ExchangeEcho {
    inner: Arc<dyn HttpTransport>,
    include: bool,
    verbose: bool,
}

impl ExchangeEcho {
    pub fn new(inner: Arc<dyn HttpTransport>, include: bool, verbose: bool) -> Self {
        Self {
            inner,
            include,
            verbose,
        }
    }
}

impl HttpTransport for ExchangeEcho {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        if self.verbose {
            eprintln!("> {} {}", request.method, request.url);
        }
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.inner.send(request)?;

        if self.verbose {
            eprintln!("< {}", status_line(response.status));
        }
        if self.include {
            println!("{}", status_line(response.status));
            for (name, value) in &response.headers {
                println!("{name}: {value}");
            }
            println!();
        }
        Ok(response)
    }
}

/// `HTTP <code> <reason>` for display.
pub fn status_line(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    format!("HTTP {status} {reason}").trim_end().to_string()
}
