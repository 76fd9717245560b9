//! Service endpoint resolution
//!
//! A service client needs a base URL and a token. Both come from the
//! configuration, in this order:
//!
//! 1. `[<service>] url`
//! 2. `[compute] url`
//! 3. the identity catalog (`[astakos] url` or `[global] url`), looked up by
//!    `compute.type` / `compute.version`
//!
//! The token follows `[<service>]`, `[compute]`, `[global]` for the first
//! two; a catalog endpoint uses the identity token it was looked up with.
//!
//! If nothing yields a URL the resolver fails before any HTTP call is made.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::services::astakos::AstakosClient;
use crate::application::services::rest::RestClient;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::infrastructure::traits::HttpTransport;

/// Where a resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Service,
    Compute,
    Session,
}

/// Base URL and token for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub token: Option<String>,
    pub source: EndpointSource,
}

pub struct EndpointResolver<'a> {
    settings: &'a Settings,
    transport: Arc<dyn HttpTransport>,
}

impl<'a> EndpointResolver<'a> {
    pub fn new(settings: &'a Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// First non-empty value of `key` across `sections`.
    fn first(&self, sections: &[&str], key: &str) -> Option<String> {
        sections
            .iter()
            .find_map(|section| self.settings.get(section, key))
            .map(str::to_string)
    }

    /// Resolve the endpoint of `service` (e.g. `network`).
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, service: &str) -> ApplicationResult<Endpoint> {
        let token = self.first(&[service, "compute", "global"], "token");

        if let Some(base_url) = self.settings.get(service, "url") {
            debug!(base_url, "endpoint from service section");
            return Ok(Endpoint {
                base_url: base_url.to_string(),
                token,
                source: EndpointSource::Service,
            });
        }

        if let Some(base_url) = self.settings.get("compute", "url") {
            debug!(base_url, "endpoint from compute section");
            return Ok(Endpoint {
                base_url: base_url.to_string(),
                token,
                source: EndpointSource::Compute,
            });
        }

        let Ok(identity) = self.resolve_identity() else {
            return Err(ApplicationError::MissingEndpoint {
                service: service.to_string(),
            });
        };

        let service_type = self.settings.get("compute", "type").unwrap_or("compute");
        let version = self.settings.get("compute", "version").unwrap_or("");
        let astakos = AstakosClient::new(RestClient::new(
            identity.base_url,
            identity.token.clone(),
            Arc::clone(&self.transport),
        ));
        let endpoint = astakos.get_service_endpoints(service_type, version)?;

        let base_url = endpoint
            .get("publicURL")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApplicationError::MissingEndpoint {
                service: service.to_string(),
            })?;
        debug!(base_url, service_type, "endpoint from identity catalog");

        Ok(Endpoint {
            base_url: base_url.to_string(),
            token: identity.token,
            source: EndpointSource::Session,
        })
    }

    /// Endpoint of the identity service itself.
    pub fn resolve_identity(&self) -> ApplicationResult<Endpoint> {
        let base_url = self
            .first(&["astakos", "global"], "url")
            .ok_or_else(|| ApplicationError::MissingEndpoint {
                service: "astakos".to_string(),
            })?;
        Ok(Endpoint {
            base_url,
            token: self.first(&["astakos", "global"], "token"),
            source: EndpointSource::Session,
        })
    }
}
