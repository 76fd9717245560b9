//! Identity ("astakos") client
//!
//! Authenticates a token against the identity endpoint and looks up
//! service endpoints in the returned catalog.

use serde_json::{json, Value};
use tracing::debug;

use crate::application::services::rest::{unwrap_key, RestClient};
use crate::application::{ApplicationError, ApplicationResult};

/// Identity API client.
#[derive(Debug, Clone)]
pub struct AstakosClient {
    rest: RestClient,
}

impl AstakosClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Validate the token and return the `access` document
    /// (token, user and service catalog).
    pub fn authenticate(&self) -> ApplicationResult<Value> {
        let token = self.rest.token().unwrap_or_default();
        let body = json!({ "auth": { "token": { "id": token } } });
        let r = self.rest.post("tokens", &body, 200)?;
        unwrap_key(&r, "access")
    }

    /// The `user` part of the access document.
    pub fn user_info(&self) -> ApplicationResult<Value> {
        let mut access = self.authenticate()?;
        access
            .get_mut("user")
            .map(Value::take)
            .ok_or_else(|| ApplicationError::Client {
                status: 200,
                message: "missing 'user' in access document".into(),
            })
    }

    /// First endpoint of the catalog service with `service_type`.
    ///
    /// An empty `version` matches any `versionId`.
    pub fn get_service_endpoints(
        &self,
        service_type: &str,
        version: &str,
    ) -> ApplicationResult<Value> {
        let access = self.authenticate()?;
        let catalog = access
            .get("serviceCatalog")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(services = catalog.len(), service_type, version, "searching catalog");

        catalog
            .iter()
            .filter(|service| service.get("type").and_then(Value::as_str) == Some(service_type))
            .filter_map(|service| service.get("endpoints").and_then(Value::as_array))
            .flatten()
            .find(|endpoint| {
                version.is_empty()
                    || endpoint.get("versionId").and_then(Value::as_str) == Some(version)
            })
            .cloned()
            .ok_or_else(|| ApplicationError::Client {
                status: 404,
                message: if version.is_empty() {
                    format!("no endpoints found for service type {service_type}")
                } else {
                    format!("no endpoints found for service type {service_type} version {version}")
                },
            })
    }
}
