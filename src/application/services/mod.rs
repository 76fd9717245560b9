//! Application services
//!
//! Remote API clients and endpoint resolution. Clients depend on the
//! `HttpTransport` boundary trait but are themselves concrete structs.

mod astakos;
mod endpoint;
mod networking;
pub mod rest;

pub use astakos::AstakosClient;
pub use endpoint::{Endpoint, EndpointResolver, EndpointSource};
pub use networking::{NetworkUpdate, NetworkingClient, NewSubnet, SubnetUpdate};
pub use rest::RestClient;
