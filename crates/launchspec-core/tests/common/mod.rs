use launchspec_core::collaborators::{InMemoryArchive, InMemoryConfigStore, NoopConfigStore};
use launchspec_core::{resolve, CallerContext, Command, ResolvedCommand, Result};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Parse a Command document, skipping validation
#[allow(dead_code)]
pub fn command_from(doc: Value) -> Command {
    serde_json::from_value(doc).expect("command fixture should deserialize")
}

/// Runtime values from `(name, value)` pairs
#[allow(dead_code)]
pub fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A small archive: one project holding one subject, one session with two
/// scans and two resources, and a stand-alone resource
#[allow(dead_code)]
pub fn sample_archive_doc() -> Value {
    json!({
        "projects": [{
            "id": "P1",
            "label": "Project One",
            "uri": "/archive/projects/P1",
            "directory": "/data/P1",
            "resources": [{"id": "pr1", "label": "CONFIGS", "directory": "/data/P1/resources/CONFIGS"}]
        }],
        "subjects": [{
            "id": "S1",
            "label": "sub-01",
            "uri": "/archive/subjects/S1",
            "project-id": "P1"
        }],
        "experiments": [{
            "id": "E1",
            "label": "sess-01",
            "uri": "/archive/experiments/E1",
            "project-id": "P1",
            "modality": "MR",
            "scans": [
                {"id": "1", "uri": "/archive/experiments/E1/scans/1", "scan-type": "T1",
                 "resources": [{"id": "r1", "label": "DICOM", "uri": "/archive/experiments/E1/scans/1/resources/r1", "directory": "/data/E1/scans/1/DICOM",
                                "files": [{"name": "a.dcm", "path": "/data/E1/scans/1/DICOM/a.dcm"}]}]},
                {"id": "2", "uri": "/archive/experiments/E1/scans/2", "scan-type": "T2",
                 "resources": [
                    {"id": "r2", "label": "DICOM", "uri": "/archive/experiments/E1/scans/2/resources/r2", "directory": "/data/E1/scans/2/DICOM"},
                    {"id": "r3", "label": "NIFTI", "uri": "/archive/experiments/E1/scans/2/resources/r3", "directory": "/data/E1/scans/2/NIFTI"}
                 ]}
            ],
            "resources": [{"id": "er1", "label": "SNAPSHOTS", "directory": "/data/E1/SNAPSHOTS"}]
        }],
        "resources": [{
            "id": "R9",
            "label": "LOOSE",
            "uri": "/archive/projects/P1/resources/R9",
            "directory": "/data/P1/resources/LOOSE"
        }]
    })
}

#[allow(dead_code)]
pub fn sample_archive() -> InMemoryArchive {
    InMemoryArchive::from_fixture(&sample_archive_doc()).expect("archive fixture should load")
}

#[allow(dead_code)]
pub fn sample_config() -> InMemoryConfigStore {
    let mut store = InMemoryConfigStore::new();
    store.insert_site("dcm2niix", "settings.json", "{\"compress\":true}");
    store.insert_project("P1", "dcm2niix", "settings.json", "{\"compress\":false}");
    store
}

/// Resolve against an empty archive and no configuration
#[allow(dead_code)]
pub fn resolve_plain(
    command: &Command,
    runtime: &BTreeMap<String, String>,
) -> Result<ResolvedCommand> {
    let archive = InMemoryArchive::new();
    resolve(command, runtime, &CallerContext::new(&archive), &NoopConfigStore)
}

/// Resolve against the sample archive and configuration
#[allow(dead_code)]
pub fn resolve_sample(
    command: &Command,
    runtime: &BTreeMap<String, String>,
) -> Result<ResolvedCommand> {
    let archive = sample_archive();
    resolve(command, runtime, &CallerContext::new(&archive), &sample_config())
}

/// A command whose every input has a default
#[allow(dead_code)]
pub fn defaults_only_command() -> Command {
    command_from(json!({
        "name": "foo",
        "image": "busybox:latest",
        "command-line": "echo #GREETING# #COUNT# #VERBOSE#",
        "inputs": [
            {"name": "greeting", "type": "string", "default-value": "hello", "replacement-key": "#GREETING#"},
            {"name": "count", "type": "number", "default-value": "3", "replacement-key": "#COUNT#",
             "command-line-flag": "-n"},
            {"name": "verbose", "type": "boolean", "default-value": "false", "replacement-key": "#VERBOSE#",
             "true-value": "-v", "false-value": ""}
        ]
    }))
}

/// The session/scan/resource chain most resolution tests build on
#[allow(dead_code)]
pub fn session_scan_command() -> Command {
    command_from(json!({
        "name": "dcm2niix",
        "image": "xnat/dcm2niix:1.0",
        "command-line": "dcm2niix #SCAN_ID# -o /output /input",
        "mounts": [
            {"name": "in", "path": "/input", "input": "dicom"},
            {"name": "out", "path": "/output", "writable": true}
        ],
        "inputs": [
            {"name": "session", "type": "Session", "required": true},
            {"name": "scan", "type": "Scan", "parent": "session", "required": true},
            {"name": "scan-id", "type": "string", "parent": "scan", "parent-property": "id",
             "replacement-key": "#SCAN_ID#"},
            {"name": "dicom", "type": "Resource", "parent": "scan", "matcher": "@.label == 'DICOM'"}
        ],
        "outputs": [
            {"name": "nifti", "mount": "out", "path": "nifti", "required": true}
        ]
    }))
}
