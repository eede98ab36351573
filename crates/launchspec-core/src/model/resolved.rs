use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::input::InputType;

/// One input after resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedInput {
    pub name: String,

    #[serde(rename = "type")]
    pub input_type: InputType,

    pub value: Option<String>,

    /// Archive snapshot the value came from, or the value itself when no
    /// richer object was produced
    pub snapshot: Value,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

impl ResolvedInput {
    /// Text of `value`, empty when unset
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedMount {
    pub name: String,
    pub writable: bool,
    pub container_path: String,

    /// Unset for output-only mounts
    pub host_path: Option<String>,

    /// Input the host path was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedOutput {
    pub name: String,
    pub mount: String,
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
}

/// Launch-ready form of a Command
///
/// Built once per resolution call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<i64>,

    pub command_name: String,

    /// SHA-256 of the Command JSON the embedded queries ran against
    pub command_digest: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,

    pub image: String,

    #[serde(rename = "type")]
    pub command_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    pub command_line: String,

    pub environment_variables: BTreeMap<String, String>,

    pub ports: BTreeMap<String, String>,

    pub mounts: Vec<ResolvedMount>,

    pub outputs: Vec<ResolvedOutput>,

    pub inputs: BTreeMap<String, ResolvedInput>,

    /// Raw resolved values keyed by replacement key
    pub replacement_values: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub wrapper_inputs: BTreeMap<String, ResolvedInput>,
}

impl ResolvedCommand {
    pub fn input_value(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).and_then(|i| i.value.as_deref())
    }

    pub fn mount(&self, name: &str) -> Option<&ResolvedMount> {
        self.mounts.iter().find(|m| m.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&ResolvedOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }
}
