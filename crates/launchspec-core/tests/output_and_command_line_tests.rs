//! Output and command line tests
//!
//! Output paths and mounts, templating of the command line, environment,
//! ports and working directory, and the provenance and serialized shape of
//! a resolved command.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{command_from, resolve_plain, resolve_sample, session_scan_command, values};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_outputs_carry_mount_and_resolved_path() {
    let command = command_from(json!({
        "name": "fsl",
        "image": "fsl:6",
        "mounts": [{"name": "out", "path": "/output", "writable": true}],
        "outputs": [
            {"name": "report", "mount": "out", "path": "^name^-report.html", "required": true},
            {"name": "logs", "mount": "out", "glob": "*.log"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();

    let report = resolved.output("report").unwrap();
    assert_eq!(report.mount, "out");
    assert_eq!(report.path.as_deref(), Some("fsl-report.html"));
    assert!(report.required);

    let logs = resolved.output("logs").unwrap();
    assert_eq!(logs.path, None);
    assert_eq!(logs.glob.as_deref(), Some("*.log"));
    assert!(!logs.required);
}

#[test]
fn test_output_path_keeps_replacement_keys() {
    let command = command_from(json!({
        "name": "fsl",
        "image": "fsl:6",
        "mounts": [{"name": "out", "path": "/output", "writable": true}],
        "inputs": [{"name": "label", "default-value": "x", "replacement-key": "#LABEL#"}],
        "outputs": [{"name": "o", "mount": "out", "path": "#LABEL#.nii"}]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.output("o").unwrap().path.as_deref(), Some("#LABEL#.nii"));
}

#[test]
fn test_environment_and_ports_are_templated() {
    let command = command_from(json!({
        "name": "notebook",
        "image": "jupyter:latest",
        "command-line": "start #PORT#",
        "environment-variables": {
            "USER_NAME": "#USER#",
            "#EXTRA_KEY#": "on",
            "IMAGE": "^image^"
        },
        "ports": {"#PORT#": "#HOST_PORT#"},
        "inputs": [
            {"name": "user", "default-value": "ada", "replacement-key": "#USER#"},
            {"name": "extra", "default-value": "DEBUG", "replacement-key": "#EXTRA_KEY#"},
            {"name": "port", "default-value": "8888", "replacement-key": "#PORT#"},
            {"name": "host-port", "default-value": "18888", "replacement-key": "#HOST_PORT#"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();

    assert_eq!(resolved.command_line, "start 8888");
    assert_eq!(resolved.environment_variables["USER_NAME"], "ada");
    assert_eq!(resolved.environment_variables["DEBUG"], "on");
    assert_eq!(resolved.environment_variables["IMAGE"], "jupyter:latest");
    assert_eq!(resolved.ports["8888"], "18888");
}

#[test]
fn test_flagged_value_lands_on_environment_too() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "environment-variables": {"ARGS": "#T#"},
        "inputs": [
            {"name": "t", "default-value": "4", "replacement-key": "#T#", "command-line-flag": "-t"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.environment_variables["ARGS"], "-t 4");
}

#[test]
fn test_unset_input_substitutes_empty() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "command-line": "run [#OPT#]",
        "inputs": [
            {"name": "opt", "replacement-key": "#OPT#", "command-line-flag": "--opt"}
        ]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.command_line, "run []");
    assert_eq!(resolved.input_value("opt"), None);
}

#[test]
fn test_working_directory_is_templated() {
    let command = command_from(json!({
        "name": "foo",
        "image": "busybox",
        "working-directory": "/work/#SUB#",
        "inputs": [{"name": "sub", "default-value": "a", "replacement-key": "#SUB#"}]
    }));
    let resolved = resolve_plain(&command, &BTreeMap::new()).unwrap();
    assert_eq!(resolved.working_directory.as_deref(), Some("/work/a"));
}

#[test]
fn test_resolved_command_provenance() {
    let mut command = session_scan_command();
    command.id = Some(42);
    let resolved = resolve_sample(&command, &values(&[("session", "E1"), ("scan", "1")])).unwrap();

    assert_eq!(resolved.command_id, Some(42));
    assert_eq!(resolved.command_name, "dcm2niix");
    assert_eq!(resolved.image, "xnat/dcm2niix:1.0");
    assert_eq!(resolved.command_type, "docker");
    assert_eq!(resolved.wrapper, None);
    assert_eq!(resolved.command_digest.len(), 64);
    assert!(resolved.wrapper_inputs.is_empty());
}

#[test]
fn test_resolved_command_serializes_kebab_case() {
    let command = session_scan_command();
    let resolved = resolve_sample(&command, &values(&[("session", "E1"), ("scan", "1")])).unwrap();
    let doc = serde_json::to_value(&resolved).unwrap();

    assert_eq!(doc["command-line"], json!("dcm2niix 1 -o /output /input"));
    assert_eq!(doc["mounts"][0]["container-path"], json!("/input"));
    assert_eq!(doc["replacement-values"]["#SCAN_ID#"], json!("1"));
    assert!(doc.get("wrapper-inputs").is_none());
}
