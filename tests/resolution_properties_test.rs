//! End-to-end properties of the resolution and composition pipeline,
//! exercised through the public library API.

use nbcli::query::{compose, QueryOptions};
use nbcli::resolve::{ContainerRef, ItemRef, SpecialFolder};

#[test]
fn test_root_inputs_resolve_to_canonical_root() {
    for input in ["/", "root:", "root:/"] {
        let resolved = ItemRef::Reference(input.to_string()).resolve().unwrap();
        assert_eq!(resolved, "root", "input {:?}", input);
    }
}

#[test]
fn test_bare_identifiers_resolve_to_id_routes() {
    assert_eq!(
        ItemRef::Reference("01BYE5RZ6QN3ZWBT".to_string())
            .resolve()
            .unwrap(),
        "items/01BYE5RZ6QN3ZWBT"
    );
    assert_eq!(
        ContainerRef::Reference("b!mF9vQ2".to_string())
            .resolve()
            .unwrap(),
        "containers/b!mF9vQ2"
    );
}

#[test]
fn test_slash_paths_wrap_with_trimmed_separators() {
    for (input, expected) in [
        ("Documents/Project-X", "root:/Documents/Project-X:"),
        ("/Documents/Project-X", "root:/Documents/Project-X:"),
        ("Documents/Project-X/", "root:/Documents/Project-X:"),
    ] {
        assert_eq!(
            ItemRef::Reference(input.to_string()).resolve().unwrap(),
            expected,
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_resolution_is_deterministic_and_idempotent() {
    let references = vec![
        ItemRef::Reference("Documents/Project-X".to_string()),
        ItemRef::Reference("items/01BYE5RZ".to_string()),
        ItemRef::Special(SpecialFolder::Photos),
        ItemRef::Root,
    ];

    for reference in &references {
        let first = reference.resolve().unwrap();
        let second = reference.resolve().unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_prefix_wildcard_translates_to_startswith_filter() {
    let options = QueryOptions::default().with_include(Some("budget*".to_string()));
    let uri = compose("containers/b!x/root/children", &options).unwrap();
    assert!(uri.contains("$filter=startswith(name,'budget')"), "{}", uri);
}

#[test]
fn test_contains_wildcard_is_rejected_without_composing() {
    let options = QueryOptions::default().with_include(Some("*budget*".to_string()));
    let error = compose("containers/b!x/root/children", &options).unwrap_err();
    assert!(matches!(
        error,
        nbcli::nimbus_v1::ApiError::UnsupportedQuery(_)
    ));
}

#[test]
fn test_search_default_scope_is_container_root() {
    // A search with no folder reference composes against the root scope of
    // the addressed container.
    let scope = ItemRef::Root.resolve().unwrap();
    let options = QueryOptions {
        search: Some("budget".to_string()),
        ..Default::default()
    };
    let uri = compose(&format!("containers/b!x/{}", scope), &options).unwrap();
    assert_eq!(uri, "containers/b!x/root/search(q='budget')");
}

#[test]
fn test_container_reference_composes_into_children_route() {
    let container = ContainerRef::Reference("b!x".to_string()).resolve().unwrap();
    let folder = ItemRef::Reference("Documents".to_string());
    // A single path segment without separators is an identifier.
    assert_eq!(
        format!("{}/{}/children", container, folder.resolve().unwrap()),
        "containers/b!x/items/Documents/children"
    );

    let folder = ItemRef::Reference("Documents/2024".to_string());
    assert_eq!(
        format!("{}/{}/children", container, folder.resolve().unwrap()),
        "containers/b!x/root:/Documents/2024:/children"
    );
}
