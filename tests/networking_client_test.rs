//! Networking client against a stub transport: request shapes and
//! response unwrapping.

use std::sync::Arc;

use serde_json::json;

use cloudctl::application::services::{
    NetworkUpdate, NetworkingClient, NewSubnet, RestClient,
};
use cloudctl::application::ApplicationError;
use cloudctl::domain::{AllocationPool, DomainError, FixedIp};
use cloudctl::infrastructure::traits::Method;
use cloudctl::util::testing::{init_test_setup, StubTransport};

const BASE: &str = "https://network.example.org/v2.0/";

fn client(stub: &Arc<StubTransport>) -> NetworkingClient {
    init_test_setup();
    NetworkingClient::new(RestClient::new(BASE, Some("tok".into()), stub.clone()))
}

#[test]
fn given_shared_flag_when_creating_network_then_body_has_shared_and_admin_state() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"network": {"id": "n1", "name": "myNet", "shared": true}}));

    let network = client(&stub).create_network("myNet", true, Some(true)).unwrap();

    assert_eq!(network["id"], "n1");
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, "https://network.example.org/v2.0/networks");
    assert_eq!(requests[0].headers.get("X-Auth-Token").map(String::as_str), Some("tok"));
    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"network": {"name": "myNet", "admin_state_up": true, "shared": true}})
    );
}

#[test]
fn given_no_shared_when_creating_network_then_shared_omitted() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"network": {"id": "n1"}}));

    client(&stub).create_network("plain", false, None).unwrap();

    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"network": {"name": "plain", "admin_state_up": false}})
    );
}

#[test]
fn given_batch_with_unknown_key_when_creating_networks_then_rejected_without_request() {
    let stub = Arc::new(StubTransport::new());

    let err = client(&stub)
        .create_networks(&[json!({"name": "a"}), json!({"name": "b", "color": "red"})])
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidParameter(_))
    ));
    assert!(stub.requests().is_empty());
}

#[test]
fn given_batch_missing_name_when_creating_networks_then_rejected_without_request() {
    let stub = Arc::new(StubTransport::new());
    let err = client(&stub)
        .create_networks(&[json!({"shared": true})])
        .unwrap_err();
    assert!(err.to_string().contains("name is missing"), "{err}");
    assert!(stub.requests().is_empty());
}

#[test]
fn given_valid_batch_when_creating_networks_then_single_request_with_defaults() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"networks": [{"id": "1"}, {"id": "2"}]}));

    let created = client(&stub)
        .create_networks(&[json!({"name": "a"}), json!({"name": "b", "shared": true})])
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"networks": [
            {"name": "a", "admin_state_up": false},
            {"name": "b", "shared": true, "admin_state_up": false}
        ]})
    );
}

#[test]
fn given_subnet_batch_missing_cidr_when_creating_then_rejected_without_request() {
    let stub = Arc::new(StubTransport::new());
    let err = client(&stub)
        .create_subnets(&[json!({"network_id": "n1"})])
        .unwrap_err();
    assert!(err.to_string().contains("cidr is missing"), "{err}");
    assert!(stub.requests().is_empty());
}

#[test]
fn given_full_subnet_when_creating_then_optional_fields_mapped() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"subnet": {"id": "s1"}}));

    let mut subnet = NewSubnet::new("n1", "10.0.0.0/24");
    subnet.name = Some("sub".into());
    subnet.allocation_pools = vec![AllocationPool::parse("10.0.0.2,10.0.0.9").unwrap()];
    subnet.gateway_ip = Some("10.0.0.1".into());
    subnet.subnet_id = Some("s1".into());
    subnet.enable_dhcp = Some(true);

    client(&stub).create_subnet(&subnet).unwrap();

    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"subnet": {
            "network_id": "n1",
            "cidr": "10.0.0.0/24",
            "ip_version": 4,
            "name": "sub",
            "allocation_pools": [{"start": "10.0.0.2", "end": "10.0.0.9"}],
            "gateway_ip": "10.0.0.1",
            "id": "s1",
            "enable_dhcp": true
        }})
    );
}

#[test]
fn given_update_with_name_only_when_updating_network_then_put_sends_only_name() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(200, &json!({"network": {"id": "n1", "name": "renamed"}}));

    let update = NetworkUpdate {
        name: Some("renamed".into()),
        ..NetworkUpdate::default()
    };
    client(&stub).update_network("n1", &update).unwrap();

    let request = &stub.requests()[0];
    assert_eq!(request.method, Method::Put);
    assert!(request.url.ends_with("/networks/n1"));
    assert_eq!(stub.request_json(0).unwrap(), json!({"network": {"name": "renamed"}}));
}

#[test]
fn given_delete_when_server_answers_204_then_headers_returned() {
    let stub = Arc::new(StubTransport::new());
    stub.push_empty(204, &[("X-Request-Id", "req-1")]);

    let headers = client(&stub).delete_network("n1").unwrap();

    assert_eq!(headers.get("x-request-id").map(String::as_str), Some("req-1"));
    assert_eq!(stub.requests()[0].method, Method::Delete);
}

#[test]
fn given_fault_response_when_getting_network_then_client_error_with_status() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(
        404,
        &json!({"itemNotFound": {"message": "Network n9 not found", "code": 404}}),
    );

    let err = client(&stub).get_network_details("n9").unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "client error (404): Network n9 not found");
}

#[test]
fn given_no_response_when_listing_then_transport_error() {
    let stub = Arc::new(StubTransport::new());
    let err = client(&stub).list_networks().unwrap_err();
    assert!(matches!(err, ApplicationError::Transport { .. }));
}

#[test]
fn given_fixed_ips_when_creating_port_then_sent_with_optional_address() {
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"port": {"id": "p1"}}));

    let fixed = [
        FixedIp::parse("s1").unwrap(),
        FixedIp::parse("s2,10.0.0.7").unwrap(),
    ];
    client(&stub).create_port("n1", Some("p"), &fixed).unwrap();

    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"port": {
            "network_id": "n1",
            "name": "p",
            "fixed_ips": [{"subnet_id": "s1"}, {"subnet_id": "s2", "ip_address": "10.0.0.7"}]
        }})
    );
}
