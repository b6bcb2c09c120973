//! Layering rules between the crate's modules.

mod support;

use support::architecture::{find_lines_containing, find_non_test_lines_containing};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::app",
            "crate::cli",
            "crate::port",
            "tokio::",
            "reqwest::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_adapters_or_the_app() {
    let hits = find_lines_containing("src/port", &["crate::adapter", "crate::app", "crate::cli"]);

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn adapters_do_not_reach_into_the_app() {
    let hits = find_lines_containing("src/adapter", &["crate::app", "crate::cli"]);

    assert!(hits.is_empty(), "found app imports in adapters: {hits:#?}");
}

#[test]
fn cli_uses_stores_only_through_the_app() {
    let hits = find_lines_containing("src/cli", &["adapter::store", "JsonFileStore"]);

    assert!(
        hits.is_empty(),
        "found direct store access in CLI handlers: {hits:#?}"
    );
}

#[test]
fn library_code_does_not_unwrap() {
    let hits = find_non_test_lines_containing("src/domain", &[".unwrap()", ".expect("]);

    assert!(hits.is_empty(), "found unwrap/expect in domain code: {hits:#?}");
}
