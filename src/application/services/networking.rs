//! Networking API client (networks, subnets, ports)
//!
//! One method per endpoint: build the JSON body from named parameters,
//! issue one request, check the status, unwrap the top-level key.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::application::services::rest::{unwrap_key, RestClient};
use crate::application::ApplicationResult;
use crate::domain::{validate_network_specs, validate_subnet_specs, AllocationPool, FixedIp};

/// Optional attributes for a network update. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkUpdate {
    pub name: Option<String>,
    pub admin_state_up: Option<bool>,
    pub shared: Option<bool>,
}

/// Parameters of a new subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubnet {
    pub network_id: String,
    pub cidr: String,
    pub name: Option<String>,
    pub allocation_pools: Vec<AllocationPool>,
    pub gateway_ip: Option<String>,
    pub subnet_id: Option<String>,
    pub ipv6: bool,
    pub enable_dhcp: Option<bool>,
}

impl NewSubnet {
    pub fn new(network_id: impl Into<String>, cidr: impl Into<String>) -> Self {
        Self {
            network_id: network_id.into(),
            cidr: cidr.into(),
            ..Self::default()
        }
    }

    fn to_body(&self) -> Value {
        let mut subnet = Map::new();
        subnet.insert("network_id".into(), json!(self.network_id));
        subnet.insert("cidr".into(), json!(self.cidr));
        subnet.insert("ip_version".into(), json!(if self.ipv6 { 6 } else { 4 }));
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            subnet.insert("name".into(), json!(name));
        }
        if !self.allocation_pools.is_empty() {
            subnet.insert("allocation_pools".into(), json!(self.allocation_pools));
        }
        if let Some(gateway) = self.gateway_ip.as_deref().filter(|g| !g.is_empty()) {
            subnet.insert("gateway_ip".into(), json!(gateway));
        }
        if let Some(id) = self.subnet_id.as_deref().filter(|i| !i.is_empty()) {
            subnet.insert("id".into(), json!(id));
        }
        if let Some(dhcp) = self.enable_dhcp {
            subnet.insert("enable_dhcp".into(), json!(dhcp));
        }
        json!({ "subnet": subnet })
    }
}

/// Optional attributes for a subnet update. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetUpdate {
    pub name: Option<String>,
    pub gateway_ip: Option<String>,
    pub enable_dhcp: Option<bool>,
}

/// OpenStack Network API v2.0 client.
#[derive(Debug, Clone)]
pub struct NetworkingClient {
    rest: RestClient,
}

impl NetworkingClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    // ========================================================================
    // Networks
    // ========================================================================

    pub fn list_networks(&self) -> ApplicationResult<Vec<Value>> {
        let r = self.rest.get("networks", 200)?;
        Ok(into_list(unwrap_key(&r, "networks")?))
    }

    /// Create one network. `admin_state_up` is always sent, `shared` only
    /// when given.
    pub fn create_network(
        &self,
        name: &str,
        admin_state_up: bool,
        shared: Option<bool>,
    ) -> ApplicationResult<Value> {
        let mut network = Map::new();
        network.insert("name".into(), json!(name));
        network.insert("admin_state_up".into(), json!(admin_state_up));
        if let Some(shared) = shared {
            network.insert("shared".into(), json!(shared));
        }
        let r = self.rest.post("networks", &json!({ "network": network }), 201)?;
        unwrap_key(&r, "network")
    }

    /// Create several networks in one request.
    ///
    /// All specifications are validated before the request is sent; an
    /// invalid entry means nothing is sent.
    pub fn create_networks(&self, networks: &[Value]) -> ApplicationResult<Vec<Value>> {
        let networks = validate_network_specs(networks)?;
        let r = self
            .rest
            .post("networks", &json!({ "networks": networks }), 201)?;
        Ok(into_list(unwrap_key(&r, "networks")?))
    }

    pub fn get_network_details(&self, network_id: &str) -> ApplicationResult<Value> {
        let r = self.rest.get(&format!("networks/{network_id}"), 200)?;
        unwrap_key(&r, "network")
    }

    pub fn update_network(
        &self,
        network_id: &str,
        update: &NetworkUpdate,
    ) -> ApplicationResult<Value> {
        let mut network = Map::new();
        if let Some(name) = update.name.as_deref().filter(|n| !n.is_empty()) {
            network.insert("name".into(), json!(name));
        }
        if let Some(admin_state_up) = update.admin_state_up {
            network.insert("admin_state_up".into(), json!(admin_state_up));
        }
        if let Some(shared) = update.shared {
            network.insert("shared".into(), json!(shared));
        }
        let r = self.rest.put(
            &format!("networks/{network_id}"),
            &json!({ "network": network }),
            200,
        )?;
        unwrap_key(&r, "network")
    }

    /// Delete a network; the response has no body, its headers are returned.
    pub fn delete_network(&self, network_id: &str) -> ApplicationResult<BTreeMap<String, String>> {
        let r = self.rest.delete(&format!("networks/{network_id}"), 204)?;
        Ok(r.headers)
    }

    // ========================================================================
    // Subnets
    // ========================================================================

    pub fn list_subnets(&self) -> ApplicationResult<Vec<Value>> {
        let r = self.rest.get("subnets", 200)?;
        Ok(into_list(unwrap_key(&r, "subnets")?))
    }

    pub fn create_subnet(&self, subnet: &NewSubnet) -> ApplicationResult<Value> {
        let r = self.rest.post("subnets", &subnet.to_body(), 201)?;
        unwrap_key(&r, "subnet")
    }

    /// Create several subnets in one request, validated up front like
    /// [`create_networks`](Self::create_networks).
    pub fn create_subnets(&self, subnets: &[Value]) -> ApplicationResult<Vec<Value>> {
        let subnets = validate_subnet_specs(subnets)?;
        let r = self
            .rest
            .post("subnets", &json!({ "subnets": subnets }), 201)?;
        Ok(into_list(unwrap_key(&r, "subnets")?))
    }

    pub fn get_subnet_details(&self, subnet_id: &str) -> ApplicationResult<Value> {
        let r = self.rest.get(&format!("subnets/{subnet_id}"), 200)?;
        unwrap_key(&r, "subnet")
    }

    pub fn update_subnet(&self, subnet_id: &str, update: &SubnetUpdate) -> ApplicationResult<Value> {
        let mut subnet = Map::new();
        if let Some(name) = update.name.as_deref().filter(|n| !n.is_empty()) {
            subnet.insert("name".into(), json!(name));
        }
        if let Some(gateway) = update.gateway_ip.as_deref().filter(|g| !g.is_empty()) {
            subnet.insert("gateway_ip".into(), json!(gateway));
        }
        if let Some(dhcp) = update.enable_dhcp {
            subnet.insert("enable_dhcp".into(), json!(dhcp));
        }
        let r = self.rest.put(
            &format!("subnets/{subnet_id}"),
            &json!({ "subnet": subnet }),
            200,
        )?;
        unwrap_key(&r, "subnet")
    }

    pub fn delete_subnet(&self, subnet_id: &str) -> ApplicationResult<BTreeMap<String, String>> {
        let r = self.rest.delete(&format!("subnets/{subnet_id}"), 204)?;
        Ok(r.headers)
    }

    // ========================================================================
    // Ports
    // ========================================================================

    pub fn list_ports(&self) -> ApplicationResult<Vec<Value>> {
        let r = self.rest.get("ports", 200)?;
        Ok(into_list(unwrap_key(&r, "ports")?))
    }

    pub fn get_port_details(&self, port_id: &str) -> ApplicationResult<Value> {
        let r = self.rest.get(&format!("ports/{port_id}"), 200)?;
        unwrap_key(&r, "port")
    }

    pub fn create_port(
        &self,
        network_id: &str,
        name: Option<&str>,
        fixed_ips: &[FixedIp],
    ) -> ApplicationResult<Value> {
        let mut port = Map::new();
        port.insert("network_id".into(), json!(network_id));
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            port.insert("name".into(), json!(name));
        }
        if !fixed_ips.is_empty() {
            port.insert("fixed_ips".into(), json!(fixed_ips));
        }
        let r = self.rest.post("ports", &json!({ "port": port }), 201)?;
        unwrap_key(&r, "port")
    }

    pub fn delete_port(&self, port_id: &str) -> ApplicationResult<BTreeMap<String, String>> {
        let r = self.rest.delete(&format!("ports/{port_id}"), 204)?;
        Ok(r.headers)
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
