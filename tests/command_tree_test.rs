//! Command namespace resolution against the real command tree.

use rstest::rstest;

use cloudctl::cli::command_tree;
use cloudctl::domain::DomainError;

#[rstest]
#[case(&["network", "list"], &["network", "list"], 2)]
#[case(&["net", "info", "net-1"], &["network", "info"], 2)]
#[case(&["subnet", "batch-create", "network_id=n cidr=c"], &["subnet", "batch-create"], 2)]
#[case(&["subnet", "batch", "create", "network_id=n cidr=c"], &["subnet", "batch-create"], 3)]
#[case(&["user", "authenticate"], &["astakos", "authenticate"], 2)]
#[case(&["port", "create", "net-1", "--name", "p"], &["port", "create"], 2)]
fn given_command_path_when_resolving_then_reaches_canonical_command(
    #[case] input: &[&str],
    #[case] path: &[&str],
    #[case] consumed: usize,
) {
    let tree = command_tree();
    let resolved = tree.resolve(input).unwrap();
    assert_eq!(resolved.path, path);
    assert_eq!(resolved.consumed, consumed);
    assert!(resolved.node.handler().is_some());
}

#[test]
fn given_unknown_subcommand_when_resolving_then_lists_available() {
    let tree = command_tree();
    let err = tree.resolve(&["network", "frobnicate"]).unwrap_err();
    match err {
        DomainError::NoSuchCommand { path, available } => {
            assert_eq!(path, "network frobnicate");
            assert!(available.contains(&"list".to_string()));
            assert!(available.contains(&"batch-create".to_string()));
        }
        other => panic!("expected no such command, got {other:?}"),
    }
}

#[test]
fn given_group_without_command_when_resolving_then_stops_at_group() {
    let tree = command_tree();
    let resolved = tree.resolve(&["subnet"]).unwrap();
    assert!(resolved.node.is_group());
    assert_eq!(resolved.node.subcommands().len(), 6);
}
