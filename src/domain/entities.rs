//! Domain entities: remote resource shapes and batch specifications
//!
//! Networks, subnets and ports are owned by the remote service; locally they
//! are JSON objects. This module holds the client-side rules that apply
//! before anything is sent: batch spec validation and small value parsers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::argument::parse_bool;
use crate::domain::error::{DomainError, DomainResult};

/// Keys accepted in a network batch specification.
pub const NETWORK_SPEC_KEYS: &[&str] = &["name", "admin_state_up", "shared"];

/// Keys accepted in a subnet batch specification.
pub const SUBNET_SPEC_KEYS: &[&str] = &[
    "network_id",
    "cidr",
    "name",
    "allocation_pools",
    "gateway_ip",
    "subnet_id",
    "ipv6",
    "enable_dhcp",
];

/// Keys whose batch values are booleans.
pub const BOOLEAN_SPEC_KEYS: &[&str] = &["admin_state_up", "shared", "ipv6", "enable_dhcp"];

/// Start/end addresses of a subnet allocation pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPool {
    pub start: String,
    pub end: String,
}

impl AllocationPool {
    /// Parse `start,end`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.split_once(',') {
            Some((start, end)) if !start.trim().is_empty() && !end.trim().is_empty() => {
                Ok(Self {
                    start: start.trim().to_string(),
                    end: end.trim().to_string(),
                })
            }
            _ => Err(DomainError::syntax(
                raw,
                format!("invalid allocation pool \"{raw}\" (use start,end)"),
            )),
        }
    }
}

/// Fixed address of a port: a subnet and optionally an address in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl FixedIp {
    /// Parse `subnet_id` or `subnet_id,ip_address`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let (subnet_id, ip_address) = match raw.split_once(',') {
            Some((subnet, ip)) => (subnet.trim(), Some(ip.trim())),
            None => (raw.trim(), None),
        };
        if subnet_id.is_empty() || ip_address.is_some_and(str::is_empty) {
            return Err(DomainError::syntax(
                raw,
                format!("invalid fixed ip \"{raw}\" (use subnet_id[,ip_address])"),
            ));
        }
        Ok(Self {
            subnet_id: subnet_id.to_string(),
            ip_address: ip_address.map(str::to_string),
        })
    }
}

/// Short listing form of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    pub id: String,
    pub name: String,
}

impl ResourceSummary {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: field_str(value, "id").unwrap_or_default().to_string(),
            name: field_str(value, "name").unwrap_or_default().to_string(),
        }
    }
}

/// String field of a JSON object, if present.
pub fn field_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

/// Build a batch specification object from parsed `key=value` pairs.
///
/// Keys in [`BOOLEAN_SPEC_KEYS`] are coerced to booleans and
/// `allocation_pools` takes `start,end` pools separated by `;`. Other values
/// stay strings; key validation is left to the `validate_*` functions.
pub fn spec_from_pairs(pairs: &BTreeMap<String, String>) -> DomainResult<Value> {
    let mut spec = Map::new();
    for (key, raw) in pairs {
        let value = if BOOLEAN_SPEC_KEYS.contains(&key.as_str()) {
            Value::Bool(parse_bool(raw)?)
        } else if key == "allocation_pools" {
            let pools = raw
                .split(';')
                .filter(|p| !p.trim().is_empty())
                .map(AllocationPool::parse)
                .collect::<DomainResult<Vec<_>>>()?;
            serde_json::to_value(pools)
                .map_err(|e| DomainError::InvalidParameter(format!("allocation_pools: {e}")))?
        } else {
            Value::String(raw.clone())
        };
        spec.insert(key.clone(), value);
    }
    Ok(Value::Object(spec))
}

fn spec_object<'a>(spec: &'a Value, kind: &str) -> DomainResult<&'a Map<String, Value>> {
    spec.as_object().ok_or_else(|| {
        DomainError::InvalidParameter(format!("{kind} specification {spec} is not an object"))
    })
}

fn reject_unknown_keys(
    spec: &Map<String, Value>,
    allowed: &[&str],
    kind: &str,
) -> DomainResult<()> {
    let unknown: Vec<&str> = spec
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidParameter(format!(
            "invalid key(s): {} in {kind} specification {}",
            unknown.join(", "),
            Value::Object(spec.clone())
        )))
    }
}

fn require_key(spec: &Map<String, Value>, key: &str, kind: &str) -> DomainResult<()> {
    let present = match spec.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    if present {
        Ok(())
    } else {
        Err(DomainError::InvalidParameter(format!(
            "{key} is missing in {kind} specification {}",
            Value::Object(spec.clone())
        )))
    }
}

/// Validate and normalize network batch specifications.
///
/// Every entry must be an object with keys from [`NETWORK_SPEC_KEYS`] and a
/// non-empty `name`. `admin_state_up` defaults to `false`. Nothing is
/// returned unless all entries are valid.
pub fn validate_network_specs(specs: &[Value]) -> DomainResult<Vec<Value>> {
    specs
        .iter()
        .map(|spec| {
            let obj = spec_object(spec, "network")?;
            reject_unknown_keys(obj, NETWORK_SPEC_KEYS, "network")?;
            require_key(obj, "name", "network")?;
            let mut network = obj.clone();
            network
                .entry("admin_state_up")
                .or_insert(Value::Bool(false));
            Ok(Value::Object(network))
        })
        .collect()
}

/// Validate and normalize subnet batch specifications.
///
/// Every entry must be an object with keys from [`SUBNET_SPEC_KEYS`],
/// carrying `network_id` and `cidr`. `ipv6` becomes `ip_version` (6 or 4)
/// and `subnet_id` becomes `id`.
pub fn validate_subnet_specs(specs: &[Value]) -> DomainResult<Vec<Value>> {
    specs
        .iter()
        .map(|spec| {
            let obj = spec_object(spec, "subnet")?;
            reject_unknown_keys(obj, SUBNET_SPEC_KEYS, "subnet")?;
            require_key(obj, "network_id", "subnet")?;
            require_key(obj, "cidr", "subnet")?;

            let mut subnet = obj.clone();
            let ipv6 = subnet
                .remove("ipv6")
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or(false);
            subnet.insert("ip_version".into(), Value::from(if ipv6 { 6 } else { 4 }));
            if let Some(id) = subnet.remove("subnet_id") {
                subnet.insert("id".into(), id);
            }
            Ok(Value::Object(subnet))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_network_spec_without_admin_state_when_validating_then_defaults_to_false() {
        let specs = validate_network_specs(&[json!({"name": "net1"})]).unwrap();
        assert_eq!(specs[0], json!({"name": "net1", "admin_state_up": false}));
    }

    #[test]
    fn given_subnet_spec_with_ipv6_when_validating_then_sets_ip_version() {
        let specs = validate_subnet_specs(&[json!({
            "network_id": "n1", "cidr": "fd00::/64", "ipv6": true, "subnet_id": "s1"
        })])
        .unwrap();
        assert_eq!(
            specs[0],
            json!({"network_id": "n1", "cidr": "fd00::/64", "ip_version": 6, "id": "s1"})
        );
    }

    #[test]
    fn given_allocation_pool_without_comma_when_parsing_then_syntax_error() {
        assert!(matches!(
            AllocationPool::parse("10.0.0.2"),
            Err(DomainError::Syntax { .. })
        ));
        let pool = AllocationPool::parse("10.0.0.2, 10.0.0.9").unwrap();
        assert_eq!(pool.end, "10.0.0.9");
    }

    #[test]
    fn given_pairs_with_boolean_and_pool_keys_when_building_spec_then_coerced() {
        let pairs = BTreeMap::from([
            ("network_id".to_string(), "n1".to_string()),
            ("enable_dhcp".to_string(), "yes".to_string()),
            (
                "allocation_pools".to_string(),
                "10.0.0.2,10.0.0.9;10.0.0.20,10.0.0.29".to_string(),
            ),
        ]);
        let spec = spec_from_pairs(&pairs).unwrap();
        assert_eq!(spec["enable_dhcp"], json!(true));
        assert_eq!(spec["allocation_pools"][1]["start"], json!("10.0.0.20"));
    }

    #[test]
    fn given_fixed_ip_tokens_when_parsing_then_address_is_optional() {
        assert_eq!(FixedIp::parse("sub-1").unwrap().ip_address, None);
        let ip = FixedIp::parse("sub-1,10.0.0.5").unwrap();
        assert_eq!(ip.ip_address.as_deref(), Some("10.0.0.5"));
        assert!(FixedIp::parse("sub-1,").is_err());
    }
}
