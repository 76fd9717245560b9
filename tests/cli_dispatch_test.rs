//! Command line to handler, end to end, with a stub transport.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rstest::rstest;
use serde_json::json;

use cloudctl::cli::{command_tree, parse_invocation, Cli, CliError, Dispatch, Invocation};
use cloudctl::config::Settings;
use cloudctl::domain::CommandTree;
use cloudctl::exitcode;
use cloudctl::infrastructure::di::ServiceContainer;
use cloudctl::util::testing::StubTransport;

fn invocation<'t>(
    tree: &'t CommandTree<cloudctl::cli::commands::CommandSpec>,
    args: &[&str],
) -> Result<Dispatch<'t>, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("cloudctl").chain(args.iter().copied()))
        .expect("global flags parse");
    parse_invocation(&cli, tree)
}

fn expect_command<'t>(dispatch: Dispatch<'t>) -> Invocation<'t> {
    match dispatch {
        Dispatch::Command(invocation) => invocation,
        other => panic!("expected command, got {other:?}"),
    }
}

/// Run with network URL configured; returns stdout.
fn run(invocation: &Invocation<'_>, stub: &Arc<StubTransport>) -> Result<String, CliError> {
    let mut settings = Settings::defaults();
    settings.set("network", "url", "https://net.example.org/v2.0");
    settings.set("global", "token", "tok");
    settings.apply_overrides(&invocation.globals.overrides);
    let container = ServiceContainer::with_deps(settings, stub.clone());

    let mut out = Vec::new();
    let mut input: &[u8] = b"";
    invocation.run(&container, &mut out, &mut input)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn given_option_override_when_parsing_then_compute_token_set() {
    let tree = command_tree();
    let inv = expect_command(invocation(&tree, &["-o", "compute.token=abc123", "network", "list"]).unwrap());

    let mut settings = Settings::defaults();
    settings.apply_overrides(&inv.globals.overrides);

    assert_eq!(settings.get("compute", "token"), Some("abc123"));
}

#[test]
fn given_global_flags_after_command_when_parsing_then_merged() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(&tree, &["-d", "network", "list", "-d", "-s", "-o", "global.timeout=3"]).unwrap(),
    );

    assert_eq!(inv.globals.debug, 2);
    assert!(inv.globals.silent);
    assert_eq!(inv.globals.overrides.len(), 1);
    assert_eq!(inv.path, vec!["network", "list"]);
}

#[rstest]
#[case::list(&["network", "list", "-V"])]
#[case::missing_positional(&["network", "info", "--version"])]
#[case::group(&["subnet", "-V"])]
fn given_trailing_version_flag_when_parsing_then_version_shown(#[case] args: &[&str]) {
    let tree = command_tree();
    match invocation(&tree, args).unwrap() {
        Dispatch::Version(text) => {
            assert_eq!(text, format!("cloudctl {}", env!("CARGO_PKG_VERSION")));
        }
        other => panic!("expected version, got {other:?}"),
    }
}

#[test]
fn given_trailing_config_path_when_parsing_then_replaces_leading_one() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(
            &tree,
            &["--config", "/tmp/lead.toml", "network", "list", "--config", "/tmp/trail.toml"],
        )
        .unwrap(),
    );
    assert_eq!(inv.globals.config, Some(PathBuf::from("/tmp/trail.toml")));

    let inv = expect_command(invocation(&tree, &["network", "list", "--config", "/tmp/only.toml"]).unwrap());
    assert_eq!(inv.globals.config, Some(PathBuf::from("/tmp/only.toml")));
}

#[rstest]
#[case::include_only(&["network", "list", "-i"], true)]
#[case::silent_leading(&["-s", "-i", "network", "list"], false)]
#[case::silent_trailing(&["-i", "network", "list", "-s"], false)]
fn given_include_and_silent_flags_when_parsing_then_header_echo_follows_silence(
    #[case] args: &[&str],
    #[case] expected: bool,
) {
    let tree = command_tree();
    let inv = expect_command(invocation(&tree, args).unwrap());
    assert!(inv.globals.include);
    assert_eq!(inv.globals.echo_headers(), expected);
}

#[test]
fn given_malformed_override_when_parsing_then_usage_exit_code() {
    let tree = command_tree();
    let err = invocation(&tree, &["-o", "computetoken=abc", "network", "list"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(err.to_string().contains("missing ."), "{err}");
}

#[test]
fn given_no_command_when_parsing_then_help_shows_tree() {
    let tree = command_tree();
    match invocation(&tree, &[]).unwrap() {
        Dispatch::Help(text) => {
            assert!(text.contains("network"));
            assert!(text.contains("astakos"));
        }
        other => panic!("expected help, got {other:?}"),
    }
}

#[test]
fn given_command_help_flag_when_parsing_then_help_not_error() {
    let tree = command_tree();
    match invocation(&tree, &["subnet", "create", "--help"]).unwrap() {
        Dispatch::Help(text) => assert!(text.contains("--allocation-pool")),
        other => panic!("expected help, got {other:?}"),
    }
}

#[test]
fn given_unknown_command_when_parsing_then_usage_error_lists_alternatives() {
    let tree = command_tree();
    let err = invocation(&tree, &["network", "explode"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(err.to_string().contains("available: list"), "{err}");
}

#[test]
fn given_missing_positional_when_parsing_then_invalid_args() {
    let tree = command_tree();
    let err = invocation(&tree, &["network", "info"]).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgs(_)));
}

#[test]
fn given_create_shared_when_running_then_posts_shared_and_admin_state() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(&tree, &["network", "create", "myNet", "--shared", "--json"]).unwrap(),
    );
    let stub = Arc::new(StubTransport::new());
    stub.push_json(201, &json!({"network": {"id": "n1", "name": "myNet"}}));

    let out = run(&inv, &stub).unwrap();

    assert_eq!(
        stub.request_json(0).unwrap(),
        json!({"network": {"name": "myNet", "admin_state_up": true, "shared": true}})
    );
    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed, json!({"id": "n1", "name": "myNet"}));
}

#[test]
fn given_name_filters_when_listing_then_only_matches_printed() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(&tree, &["net", "list", "--name-pref", "web", "--json"]).unwrap(),
    );
    let stub = Arc::new(StubTransport::new());
    stub.push_json(
        200,
        &json!({"networks": [
            {"id": "1", "name": "web-a", "status": "ACTIVE"},
            {"id": "2", "name": "db", "status": "ACTIVE"},
            {"id": "3", "name": "web-b", "status": "DOWN"}
        ]}),
    );

    let out = run(&inv, &stub).unwrap();

    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        printed,
        json!([{"id": "1", "name": "web-a"}, {"id": "3", "name": "web-b"}])
    );
}

#[test]
fn given_bad_batch_spec_when_running_then_data_error_and_no_request() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(&tree, &["subnet", "batch-create", "network_id=n1 color=red cidr=10.0.0.0/24"])
            .unwrap(),
    );
    let stub = Arc::new(StubTransport::new());

    let err = run(&inv, &stub).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(stub.requests().is_empty());
}

#[test]
fn given_delete_with_output_when_running_then_prints_headers() {
    let tree = command_tree();
    let inv = expect_command(
        invocation(&tree, &["port", "delete", "p1", "--with-output"]).unwrap(),
    );
    let stub = Arc::new(StubTransport::new());
    stub.push_empty(204, &[("X-Request-Id", "req-9")]);

    let out = run(&inv, &stub).unwrap();

    assert_eq!(out, "x-request-id: req-9\n");
}

#[test]
fn given_no_endpoint_configured_when_running_then_config_exit_and_no_request() {
    let tree = command_tree();
    let inv = expect_command(invocation(&tree, &["network", "list"]).unwrap());
    let stub = Arc::new(StubTransport::new());
    let container = ServiceContainer::with_deps(Settings::defaults(), stub.clone());

    let mut out = Vec::new();
    let mut input: &[u8] = b"";
    let err = inv.run(&container, &mut out, &mut input).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CONFIG);
    assert!(stub.requests().is_empty());
}
