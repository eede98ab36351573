//! Input Resolution Tests
//!
//! This test suite verifies how each declared input gets its value.
//!
//! ## Scenarios Covered
//!
//! 1. Defaults, runtime overrides and required inputs
//! 2. Boolean literals; numbers pass through unchecked
//! 3. Child objects picked from a parent snapshot by value and matcher
//! 4. Archive lookups by identifier and by locator
//! 5. Prerequisite ordering and parent type rules
//! 6. Config inputs: scope, value shape, missing files

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    command_from, defaults_only_command, resolve_plain, resolve_sample, sample_archive,
    session_scan_command, values,
};
use launchspec_core::collaborators::{InMemoryArchive, NoopArchive, NoopConfigStore};
use launchspec_core::{resolve, CallerContext, LaunchSpecError};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

fn input_error_for(err: &LaunchSpecError) -> &str {
    match err {
        LaunchSpecError::InputResolution { input, .. } => input,
        other => panic!("expected an input resolution error, got {:?}", other),
    }
}

#[test]
fn test_defaults_resolve_every_input() {
    let command = defaults_only_command();
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();

    assert_eq!(resolved.inputs.len(), command.inputs.len());
    assert_eq!(resolved.input_value("greeting"), Some("hello"));
    assert_eq!(resolved.input_value("count"), Some("3"));
    assert_eq!(resolved.input_value("verbose"), Some(""));
    assert_eq!(resolved.command_line, "echo hello -n 3 ");
}

#[test]
fn test_missing_required_input_names_it() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "optional", "default-value": "x"},
            {"name": "subject-label", "required": true}
        ]
    }));
    let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "subject-label");
    assert!(err.to_string().contains("must supply a value"));
}

#[test]
fn test_runtime_value_overrides_default() {
    let command = defaults_only_command();
    let resolved = resolve_plain(&command, &values(&[("greeting", "bonjour")])).unwrap();
    assert_eq!(resolved.input_value("greeting"), Some("bonjour"));
    assert_eq!(resolved.command_line, "echo bonjour -n 3 ");
}

proptest! {
    #[test]
    fn prop_runtime_value_always_wins(value in "[a-zA-Z0-9 ._/-]{1,24}") {
        let command = defaults_only_command();
        let resolved = resolve_plain(&command, &values(&[("greeting", &value)])).unwrap();
        prop_assert_eq!(resolved.input_value("greeting"), Some(value.as_str()));
    }
}

#[test]
fn test_boolean_literals() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "run #B#",
        "inputs": [
            {"name": "b", "type": "boolean", "replacement-key": "#B#",
             "true-value": "-b", "false-value": ""}
        ]
    }));

    let on = resolve_plain(&command, &values(&[("b", "true")])).unwrap();
    assert_eq!(on.input_value("b"), Some("-b"));
    assert_eq!(on.command_line, "run -b");

    let off = resolve_plain(&command, &values(&[("b", "false")])).unwrap();
    assert_eq!(off.input_value("b"), Some(""));
    assert_eq!(off.command_line, "run ");

    let upper = resolve_plain(&command, &values(&[("b", "TRUE")])).unwrap();
    assert_eq!(upper.input_value("b"), Some("-b"));
}

#[test]
fn test_boolean_without_literals_passes_through() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "b", "type": "boolean"}]
    }));
    let resolved = resolve_plain(&command, &values(&[("b", "yes")])).unwrap();
    assert_eq!(resolved.input_value("b"), Some("yes"));
}

#[test]
fn test_number_is_not_checked() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "n", "type": "number"}]
    }));
    let resolved = resolve_plain(&command, &values(&[("n", "three")])).unwrap();
    assert_eq!(resolved.input_value("n"), Some("three"));
}

#[test]
fn test_scan_selected_from_parent_snapshot() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session"}
        ]
    }));
    let session =
        json!({"scans": [{"id": "1", "uri": "/a"}, {"id": "2", "uri": "/b"}]}).to_string();
    let runtime = values(&[("session", &session), ("scan", "2")]);
    let resolved = resolve_plain(&command, &runtime).unwrap();

    assert_eq!(resolved.input_value("scan"), Some("/b"));
    assert_eq!(resolved.inputs["scan"].snapshot["id"], json!("2"));
}

#[test]
fn test_first_child_wins_without_value() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session"}
        ]
    }));
    let session =
        json!({"scans": [{"id": "1", "uri": "/a"}, {"id": "2", "uri": "/b"}]}).to_string();
    let resolved = resolve_plain(&command, &values(&[("session", &session)])).unwrap();
    assert_eq!(resolved.input_value("scan"), Some("/a"));
}

#[test]
fn test_value_and_matcher_combine() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session",
             "matcher": "@['scan-type'] == 'T1'"}
        ]
    }));
    let session = json!({"scans": [
        {"id": "1", "uri": "/a", "scan-type": "T1"},
        {"id": "2", "uri": "/b", "scan-type": "T2"}
    ]})
    .to_string();

    let hit = resolve_plain(&command, &values(&[("session", &session), ("scan", "1")])).unwrap();
    assert_eq!(hit.input_value("scan"), Some("/a"));

    // value selects scan 2, matcher rejects it
    let miss = resolve_plain(&command, &values(&[("session", &session), ("scan", "2")])).unwrap();
    assert_eq!(miss.input_value("scan"), None);
    assert_eq!(miss.inputs["scan"].snapshot, serde_json::Value::Null);
}

#[test]
fn test_unmatched_required_child_fails() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session", "required": true}
        ]
    }));
    let session = json!({"scans": [{"id": "1", "uri": "/a"}]}).to_string();
    let runtime = values(&[("session", &session), ("scan", "9")]);
    let err = resolve_plain(&command, &runtime).unwrap_err();
    assert_eq!(input_error_for(&err), "scan");
}

#[test]
fn test_unparseable_matcher_counts_as_no_match() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session", "matcher": "@.id ==="}
        ]
    }));
    let session = json!({"scans": [{"id": "1", "uri": "/a"}]}).to_string();
    let resolved = resolve_plain(&command, &values(&[("session", &session)])).unwrap();
    assert_eq!(resolved.input_value("scan"), None);
}

#[test]
fn test_session_chain_from_archive() {
    let command = session_scan_command();
    let resolved =
        resolve_sample(&command, &values(&[("session", "E1"), ("scan", "1")])).unwrap();

    assert_eq!(resolved.input_value("session"), Some("/archive/experiments/E1"));
    assert_eq!(resolved.input_value("scan"), Some("/archive/experiments/E1/scans/1"));
    assert_eq!(resolved.input_value("scan-id"), Some("1"));
    assert_eq!(
        resolved.input_value("dicom"),
        Some("/archive/experiments/E1/scans/1/resources/r1")
    );
    assert_eq!(resolved.command_line, "dcm2niix 1 -o /output /input");
    assert_eq!(resolved.replacement_values["#SCAN_ID#"], "1");
}

#[test]
fn test_lookup_by_locator() {
    let command = session_scan_command();
    let resolved = resolve_sample(
        &command,
        &values(&[("session", "/archive/experiments/E1"), ("scan", "2")]),
    )
    .unwrap();
    assert_eq!(resolved.input_value("scan"), Some("/archive/experiments/E1/scans/2"));
}

#[test]
fn test_locator_of_wrong_kind_fails() {
    let command = session_scan_command();
    let err = resolve_sample(
        &command,
        &values(&[("session", "/archive/projects/P1"), ("scan", "1")]),
    )
    .unwrap_err();
    assert_eq!(input_error_for(&err), "session");
}

#[test]
fn test_unknown_identifier_fails() {
    let command = session_scan_command();
    let err = resolve_sample(&command, &values(&[("session", "E404")])).unwrap_err();
    assert_eq!(input_error_for(&err), "session");
    assert!(err.to_string().contains("E404"));
}

#[test]
fn test_matcher_rechecks_looked_up_object() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session", "matcher": "@.modality == 'CT'"}
        ]
    }));
    let err = resolve_sample(&command, &values(&[("session", "E1")])).unwrap_err();
    assert_eq!(input_error_for(&err), "session");

    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session", "matcher": "@.modality == 'MR'"}
        ]
    }));
    let resolved = resolve_sample(&command, &values(&[("session", "E1")])).unwrap();
    assert_eq!(resolved.input_value("session"), Some("/archive/experiments/E1"));
}

#[test]
fn test_collaborator_failure_propagates() {
    let command = session_scan_command();
    let err = resolve(
        &command,
        &values(&[("session", "E1")]),
        &CallerContext::new(&NoopArchive),
        &NoopConfigStore,
    )
    .unwrap_err();
    assert!(matches!(err, LaunchSpecError::Collaborator { .. }));
}

#[test]
fn test_prerequisite_declared_later_fails() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "scan", "type": "Scan", "parent": "session"},
            {"name": "session", "type": "Session"}
        ]
    }));
    let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "scan");
    assert!(err.to_string().contains("\"session\""));
}

#[test]
fn test_explicit_prerequisite_must_precede() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "a", "default-value": "x", "prerequisites": ["b"]},
            {"name": "b", "default-value": "y"}
        ]
    }));
    let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "a");
}

#[test]
fn test_file_and_resource_need_a_parent() {
    for input_type in ["File", "Resource"] {
        let command = command_from(json!({
            "name": "foo",
            "image": "busybox",
            "inputs": [{"name": "f", "type": input_type, "default-value": "x"}]
        }));
        let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
        assert_eq!(input_error_for(&err), "f");
    }
}

#[test]
fn test_project_cannot_have_a_parent() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "s", "default-value": "x"},
            {"name": "p", "type": "Project", "parent": "s"}
        ]
    }));
    let err = resolve_plain(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "p");
}

#[test]
fn test_file_selected_by_name_uses_path() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session"},
            {"name": "scan", "type": "Scan", "parent": "session"},
            {"name": "dicom", "type": "Resource", "parent": "scan"},
            {"name": "file", "type": "File", "parent": "dicom"}
        ]
    }));
    let resolved = resolve_sample(
        &command,
        &values(&[("session", "E1"), ("scan", "1"), ("file", "a.dcm")]),
    )
    .unwrap();
    assert_eq!(resolved.input_value("file"), Some("/data/E1/scans/1/DICOM/a.dcm"));
}

#[test]
fn test_inline_json_snapshot() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "project", "type": "Project"}]
    }));
    let archive = InMemoryArchive::new();
    let inline = json!({"id": "P7", "uri": "/archive/projects/P7"}).to_string();
    let resolved = resolve(
        &command,
        &values(&[("project", &inline)]),
        &CallerContext::new(&archive),
        &NoopConfigStore,
    )
    .unwrap();
    assert_eq!(resolved.input_value("project"), Some("/archive/projects/P7"));
    assert_eq!(resolved.inputs["project"].snapshot["id"], json!("P7"));
}

#[test]
fn test_config_site_and_project_scope() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "site-settings", "type": "Config", "default-value": "dcm2niix/settings.json"},
            {"name": "project", "type": "Project", "default-value": "P1"},
            {"name": "project-settings", "type": "Config", "parent": "project",
             "default-value": "dcm2niix/settings.json"}
        ]
    }));
    let resolved = resolve_sample(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.input_value("site-settings"), Some("{\"compress\":true}"));
    assert_eq!(resolved.input_value("project-settings"), Some("{\"compress\":false}"));
}

#[test]
fn test_config_value_shape_and_missing_file() {
    let malformed = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "c", "type": "Config", "default-value": "only-a-tool"}]
    }));
    let err = resolve_sample(&malformed, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "c");

    let missing = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "c", "type": "Config", "default-value": "other/file.txt"}]
    }));
    let err = resolve_sample(&missing, &BTreeMap::new()).unwrap_err();
    assert!(err.to_string().contains("Could not read config other/file.txt"));
}

#[test]
fn test_config_without_value_fails() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [{"name": "settings", "type": "Config"}]
    }));
    let err = resolve_sample(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "settings");
    assert!(err.to_string().contains("must have the form toolName/fileName"));

    let err = resolve_sample(&command, &values(&[("settings", "  ")])).unwrap_err();
    assert_eq!(input_error_for(&err), "settings");
}

#[test]
fn test_config_rejects_session_parent() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "inputs": [
            {"name": "session", "type": "Session", "default-value": "E1"},
            {"name": "c", "type": "Config", "parent": "session",
             "default-value": "dcm2niix/settings.json"}
        ]
    }));
    let err = resolve_sample(&command, &BTreeMap::new()).unwrap_err();
    assert_eq!(input_error_for(&err), "c");
}

#[test]
fn test_unflagged_command_line_value_passes_through() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "run #T# #S#",
        "inputs": [
            {"name": "t", "default-value": "5", "replacement-key": "#T#",
             "command-line-flag": "--threads", "command-line-separator": "="},
            {"name": "s", "default-value": "plain", "replacement-key": "#S#"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.command_line, "run --threads=5 plain");
    assert_eq!(resolved.replacement_values["#T#"], "5");
}

#[test]
fn test_sample_archive_is_complete() {
    assert_eq!(sample_archive().len(), 4);
}
