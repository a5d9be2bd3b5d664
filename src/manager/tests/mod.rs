use super::*;
use crate::ErrorKind;
use yare::parameterized;


const SERVICE_DOMAIN_POLICIES: &str = r#"[
    {"path": "/serviceDomain:.*", "name": "infra"},
    {"path": "/serviceDomain:.*/project:.*", "name": "project"},
    {"path": "/serviceDomain:.*/project:.*/service:kafka", "name": "infra-project"}
]"#;

fn manager_from(policies: &[(&str, &str)]) -> PolicyManager {
    let manager = PolicyManager::new();
    let policies: Policies = policies
        .iter()
        .map(|(path, name)| Policy::new(*path, *name))
        .collect();
    manager.load_policies(&policies).unwrap();
    manager
}

fn policy_name(manager: &PolicyManager, path: &str) -> String {
    manager.get_policy(path).unwrap().name
}

#[test]
fn test_empty_manager_returns_no_policy() {
    let manager = PolicyManager::new();
    let policy = manager.get_policy("/a/b").unwrap();
    assert_eq!(policy.path, "/a/b");
    assert_eq!(policy.name, "");
    assert!(policy.is_unassigned());
}

#[parameterized(
    exact_literal_wins = { "/a/b", "inner" },
    wildcard_fallback = { "/a/c", "outer" },
    deeper_than_rules = { "/a/c/d", "outer" },
    shallower_than_rules = { "/a", "" },
    unrelated = { "/x/y", "" },
)]
fn test_longest_match_override(path: &str, expected: &str) {
    let manager = manager_from(&[("/a/*", "outer"), ("/a/b", "inner")]);
    assert_eq!(policy_name(&manager, path), expected);
}

#[test]
fn test_deeper_node_without_policy_keeps_shallower() {
    let manager = manager_from(&[("/a", "X")]);
    assert_eq!(policy_name(&manager, "/a/b/c"), "X");

    // An intermediate node created by a deeper rule has no policy of its own.
    manager.set_policy(Policy::new("/a/b/c/d", "Y")).unwrap();
    assert_eq!(policy_name(&manager, "/a/b/c"), "X");
    assert_eq!(policy_name(&manager, "/a/b/c/d"), "Y");
    assert_eq!(policy_name(&manager, "/a/b/c/d/e"), "Y");
}

#[test]
fn test_no_shared_prefix_is_not_an_error() {
    let manager = manager_from(&[("/a/b", "inner"), ("/service:.*", "svc")]);
    let policy = manager.get_policy("/zzz/b").unwrap();
    assert_eq!(policy.name, "");
}

#[parameterized(
    literal_kafka = { "/broker/kafka", "literal" },
    wildcard_other = { "/broker/redis", "wildcard" },
)]
fn test_direct_match_preferred_over_wildcard_sibling(path: &str, expected: &str) {
    let manager = manager_from(&[("/broker/.*", "wildcard"), ("/broker/kafka", "literal")]);
    assert_eq!(policy_name(&manager, path), expected);
}

#[test]
fn test_direct_match_preferred_at_root() {
    let manager = manager_from(&[("/.*", "any"), ("/kafka", "literal")]);
    assert_eq!(policy_name(&manager, "/kafka"), "literal");
    assert_eq!(policy_name(&manager, "/redis"), "any");
}

#[test]
fn test_set_policy_is_idempotent() {
    let once = PolicyManager::new();
    once.set_policy(Policy::new("/a/*", "outer")).unwrap();

    let twice = PolicyManager::new();
    twice.set_policy(Policy::new("/a/*", "outer")).unwrap();
    twice.set_policy(Policy::new("/a/*", "outer")).unwrap();

    for path in ["/a", "/a/b", "/a/b/c", "/b"] {
        assert_eq!(policy_name(&once, path), policy_name(&twice, path));
    }
    assert_eq!(once.policies().unwrap(), twice.policies().unwrap());
}

#[test]
fn test_set_policy_overwrites_existing() {
    let manager = manager_from(&[("/a", "old")]);
    manager.set_policy(Policy::new("/a", "new")).unwrap();
    assert_eq!(policy_name(&manager, "/a/b"), "new");
}

#[test]
fn test_set_policy_normalizes_path_and_name() {
    let manager = PolicyManager::new();
    manager.set_policy(Policy::new(" a // b/ ", "  inner ")).unwrap();
    assert_eq!(policy_name(&manager, "/a/b"), "inner");
    assert_eq!(manager.policies().unwrap(), vec![Policy::new("/a/b", "inner")]);
}

#[parameterized(
    empty_path = { "", "x" },
    whitespace_path = { "   ", "x" },
    separators_only = { " / // ", "x" },
    empty_name = { "/a", "" },
    whitespace_name = { "/a", "   " },
)]
fn test_set_policy_rejects_invalid_input(path: &str, name: &str) {
    let manager = PolicyManager::new();
    let err = manager.set_policy(Policy::new(path, name)).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidArgument(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(manager.policies().unwrap().is_empty());
}

#[parameterized(
    empty = { "" },
    whitespace = { "   " },
    separators_only = { "///" },
)]
fn test_get_policy_rejects_empty_path(path: &str) {
    let manager = manager_from(&[("/a", "A")]);
    let err = manager.get_policy(path).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidArgument(_)));
}

#[test]
fn test_set_policy_rejects_bad_pattern() {
    let manager = manager_from(&[("/a", "A")]);
    let err = manager.set_policy(Policy::new("/a/(*", "B")).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidPattern { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(policy_name(&manager, "/a/x"), "A");
}

#[test]
fn test_failed_set_policy_keeps_routing_through_prefix() {
    let manager = manager_from(&[("/a/.*", "wild")]);
    assert_eq!(policy_name(&manager, "/a/b/c"), "wild");
    let dump_before = manager.dump_policies().unwrap();

    let err = manager.set_policy(Policy::new("/a/b/(*", "x")).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidPattern { .. }));

    // No policy-less "b" node may be left behind to shadow the wildcard.
    assert_eq!(manager.dump_policies().unwrap(), dump_before);
    assert_eq!(policy_name(&manager, "/a/b/c"), "wild");
    assert_eq!(policy_name(&manager, "/a/b"), "wild");

    let copy = PolicyManager::new();
    copy.load_policies(&manager.policies().unwrap()).unwrap();
    assert_eq!(policy_name(&copy, "/a/b/c"), policy_name(&manager, "/a/b/c"));
}

#[parameterized(
    project_application = { "/serviceDomain:X/project:Y/application:Z", "project" },
    infra_non_project = { "/serviceDomain:X/testinfra/service:kafka", "infra" },
    project_kafka = { "/serviceDomain:X/project:Y/service:kafka", "infra-project" },
    project_other_service = { "/serviceDomain:X/project:Y/service:redis", "project" },
    service_domain_only = { "/serviceDomain:X", "infra" },
    wrong_type_prefix = { "/edge:X/project:Y", "" },
)]
fn test_service_domain_scenario(path: &str, expected: &str) {
    let manager = PolicyManager::new();
    manager.load_from_str(SERVICE_DOMAIN_POLICIES).unwrap();
    assert_eq!(policy_name(&manager, path), expected);
}

#[test]
fn test_get_policy_name_from_components() {
    let manager = PolicyManager::new();
    manager.load_from_str(SERVICE_DOMAIN_POLICIES).unwrap();

    let name = manager
        .get_policy_name(&["serviceDomain:X", "project:Y", "service:kafka"])
        .unwrap();
    assert_eq!(name, "infra-project");

    let owned = vec!["serviceDomain:X".to_string()];
    assert_eq!(manager.get_policy_name(&owned).unwrap(), "infra");

    let empty: [&str; 0] = [];
    assert!(matches!(
        manager.get_policy_name(&empty),
        Err(PolicyError::InvalidArgument(_))
    ));
}

#[test]
fn test_wildcard_siblings_resolve_in_id_order() {
    let manager = manager_from(&[("/a/x.*", "x-prefixed"), ("/a/.*y", "y-suffixed")]);
    // Both patterns match "xy"; ".*y" sorts first.
    assert_eq!(policy_name(&manager, "/a/xy"), "y-suffixed");
    assert_eq!(policy_name(&manager, "/a/xz"), "x-prefixed");
}

#[test]
fn test_wildcard_sibling_without_deeper_match_falls_through() {
    // The first matching sibling yields nothing, so the next one is tried.
    let manager = manager_from(&[("/a/.*/deep", "deep"), ("/a/x.*", "x")]);
    assert_eq!(policy_name(&manager, "/a/xyz"), "x");
    assert_eq!(policy_name(&manager, "/a/xyz/deep"), "deep");
}

#[test]
fn test_clones_share_tree() {
    let manager = PolicyManager::new();
    let handle = manager.clone();
    handle.set_policy(Policy::new("/a", "A")).unwrap();
    assert_eq!(policy_name(&manager, "/a"), "A");
}
