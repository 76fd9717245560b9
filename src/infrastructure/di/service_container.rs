//! Service container for dependency injection
//!
//! Wires up the API clients with their transport and settings.

use std::sync::Arc;

use crate::application::services::{
    AstakosClient, EndpointResolver, NetworkingClient, RestClient,
};
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{ExchangeEcho, HttpTransport, ReqwestTransport};

/// Container holding settings and the HTTP transport.
///
/// Clients are built on demand; building one resolves its endpoint.
pub struct ServiceContainer {
    /// Effective settings (file, environment and `-o` overrides applied)
    pub settings: Arc<Settings>,

    /// HTTP transport abstraction
    pub transport: Arc<dyn HttpTransport>,
}

impl ServiceContainer {
    /// Create a container with the real transport.
    ///
    /// `include` and `verbose` wrap the transport in an [`ExchangeEcho`].
    pub fn new(settings: Settings, include: bool, verbose: bool) -> InfraResult<Self> {
        let timeout = settings.timeout()?;
        let real: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(timeout).map_err(InfraError::HttpClient)?);
        let transport: Arc<dyn HttpTransport> = if include || verbose {
            Arc::new(ExchangeEcho::new(real, include, verbose))
        } else {
            real
        };
        Ok(Self::with_deps(settings, transport))
    }

    /// Create a container with a custom transport (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
        }
    }

    pub fn endpoint_resolver(&self) -> EndpointResolver<'_> {
        EndpointResolver::new(&self.settings, Arc::clone(&self.transport))
    }

    /// Networking client for the `network` service endpoint.
    pub fn networking_client(&self) -> InfraResult<NetworkingClient> {
        let endpoint = self.endpoint_resolver().resolve("network")?;
        Ok(NetworkingClient::new(RestClient::new(
            endpoint.base_url,
            endpoint.token,
            Arc::clone(&self.transport),
        )))
    }

    /// Identity client for `[astakos]` / `[global]`.
    pub fn astakos_client(&self) -> InfraResult<AstakosClient> {
        let endpoint = self.endpoint_resolver().resolve_identity()?;
        Ok(AstakosClient::new(RestClient::new(
            endpoint.base_url,
            endpoint.token,
            Arc::clone(&self.transport),
        )))
    }
}
