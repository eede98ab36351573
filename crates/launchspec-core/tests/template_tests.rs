//! Template tests
//!
//! Embedded `#[...]#` queries against the Command document and literal
//! replacement-key substitution, including their order and the ambiguous
//! query failure.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{command_from, resolve_plain, values};
use launchspec_core::template::{resolve_embedded_query, resolve_template, substitute_keys};
use launchspec_core::{Command, LaunchSpecError};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_embedded_query_against_command_name() {
    let command = Command::new("foo", "busybox");
    let doc = serde_json::to_value(&command).unwrap();
    assert_eq!(
        resolve_embedded_query("abc^$.name^def", &doc).unwrap(),
        "abcfoodef"
    );
}

#[test]
fn test_embedded_query_with_several_results_is_ambiguous() {
    let doc = json!({"inputs": [{"name": "a"}, {"name": "b"}]});
    let err = resolve_embedded_query("^$.inputs[*].name^", &doc).unwrap_err();
    assert_eq!(
        err,
        LaunchSpecError::AmbiguousQuery {
            query: "$.inputs[*].name".to_string(),
            count: 2
        }
    );
}

#[test]
fn test_embedded_query_with_no_result_leaves_string() {
    let doc = json!({"name": "foo"});
    assert_eq!(
        resolve_embedded_query("x^$.label^y", &doc).unwrap(),
        "x^$.label^y"
    );
}

#[test]
fn test_query_runs_before_key_substitution() {
    // the query produces a key, which the second pass then replaces
    let doc = json!({"label": "#IN#"});
    let keys = values(&[("#IN#", "/input/a.dcm")]);
    assert_eq!(
        resolve_template("run ^label^", &doc, &keys).unwrap(),
        "run /input/a.dcm"
    );
}

#[test]
fn test_key_substitution_is_literal() {
    let keys = values(&[("#A.B#", "x"), ("#C#", "$1")]);
    assert_eq!(substitute_keys("#A.B# #AxB# #C#", &keys), "x #AxB# $1");
}

#[test]
fn test_key_substitution_replaces_every_occurrence() {
    let keys = values(&[("#IN#", "/in")]);
    assert_eq!(substitute_keys("#IN# and #IN#", &keys), "/in and /in");
}

#[test]
fn test_command_line_embedded_query_resolves_through_resolve() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "echo ^$.name^-^$.image^"
    }));
    // one marker per string: first to last caret
    let resolved = resolve_plain(&command, &BTreeMap::new());
    assert!(matches!(resolved, Err(LaunchSpecError::InvalidQuery { .. })));

    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "echo ^$.name^ --image #IMG#",
        "inputs": [
            {"name": "img", "default-value": "^image^", "replacement-key": "#IMG#"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.command_line, "echo foo --image busybox");
    assert_eq!(resolved.input_value("img"), Some("busybox"));
}

#[test]
fn test_ambiguous_query_aborts_resolution() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "echo #X#",
        "inputs": [
            {"name": "a", "default-value": "1"},
            {"name": "x", "default-value": "^$.inputs[*].name^", "replacement-key": "#X#"}
        ]
    }));
    let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, LaunchSpecError::AmbiguousQuery { count: 2, .. }));
}

#[test]
fn test_dashed_keys_need_bracket_notation() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "cd ^$['working-directory']^",
        "working-directory": "/work"
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.command_line, "cd /work");
}
