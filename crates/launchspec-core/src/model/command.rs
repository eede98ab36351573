use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::input::Input;
use super::mount::Mount;
use super::output::Output;
use super::wrapper::Wrapper;
use crate::errors::{LaunchSpecError, Result};

/// Kind of container a Command describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    /// The tool itself
    Docker,
    /// Runs before the main container to stage files
    DockerSetup,
    /// Runs after the main container to post-process outputs
    DockerWrapup,
}

impl CommandType {
    pub const ALL: [CommandType; 3] = [
        CommandType::Docker,
        CommandType::DockerSetup,
        CommandType::DockerWrapup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::Docker => "docker",
            CommandType::DockerSetup => "docker-setup",
            CommandType::DockerWrapup => "docker-wrapup",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Comma-separated list of every type name
    pub fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn default_command_type() -> String {
    CommandType::Docker.as_str().to_string()
}

/// Declaration of a containerized tool invocation
///
/// Read-only for the duration of any resolution call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Command {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,

    #[serde(default)]
    pub image: String,

    /// Raw type name; checked by the validator, see [`CommandType`]
    #[serde(rename = "type", default = "default_command_type")]
    pub command_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    #[serde(default)]
    pub command_line: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_entrypoint: Option<bool>,

    #[serde(default)]
    pub mounts: Vec<Mount>,

    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,

    #[serde(default)]
    pub ports: BTreeMap<String, String>,

    #[serde(default)]
    pub inputs: Vec<Input>,

    #[serde(default)]
    pub outputs: Vec<Output>,

    #[serde(default, alias = "xnat")]
    pub wrappers: Vec<Wrapper>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_memory: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_memory: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_cpu: Option<f64>,
}

impl Command {
    /// Create a `docker` command with no inputs, mounts or outputs
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            command_type: default_command_type(),
            ..Self::default()
        }
    }

    /// Parse a Command document and run the validator over it
    ///
    /// # Errors
    ///
    /// Returns `LaunchSpecError::Serialization` if the text is not a Command
    /// document, or `LaunchSpecError::Validation` carrying every structural
    /// problem the validator found.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let command: Command = serde_json::from_str(text)?;
        command.validated()
    }

    /// Return `self` if the validator finds nothing wrong
    ///
    /// # Errors
    ///
    /// Returns `LaunchSpecError::Validation` listing every problem found.
    pub fn validated(self) -> Result<Self> {
        let errors = crate::rules::validation::validate(&self);
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(LaunchSpecError::Validation {
                command: self.name,
                errors,
            })
        }
    }

    pub fn kind(&self) -> Option<CommandType> {
        CommandType::from_name(&self.command_type)
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn mount(&self, name: &str) -> Option<&Mount> {
        self.mounts.iter().find(|m| m.name == name)
    }

    pub fn wrapper(&self, name: &str) -> Option<&Wrapper> {
        self.wrappers.iter().find(|w| w.name == name)
    }
}
