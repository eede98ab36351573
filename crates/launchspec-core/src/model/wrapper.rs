use serde::{Deserialize, Serialize};

use super::input::{Input, InputType};

/// Binding of a Command to archive object types
///
/// External inputs are supplied by the caller. Derived inputs are selected
/// from another wrapper input's snapshot. Output handlers say where each
/// Command output is filed once the container finishes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Wrapper {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Archive object types (xsi types) the wrapper can be launched on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,

    #[serde(default)]
    pub external_inputs: Vec<WrapperInput>,

    #[serde(default)]
    pub derived_inputs: Vec<WrapperInput>,

    #[serde(default)]
    pub output_handlers: Vec<OutputHandler>,
}

impl Wrapper {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// External inputs followed by derived inputs
    pub fn inputs(&self) -> impl Iterator<Item = &WrapperInput> {
        self.external_inputs.iter().chain(self.derived_inputs.iter())
    }
}

/// An input declared on a wrapper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WrapperInput {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Archive object type, or a scalar type for external inputs
    #[serde(rename = "type", default)]
    pub input_type: InputType,

    /// Path-query filter the selected object must pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,

    /// Used when the caller supplies no value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Resolution fails when no object or value is found
    #[serde(default)]
    pub required: bool,

    /// Token substituted on the command line, like a command input's key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_key: Option<String>,

    /// Keep the resolved value out of log output
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,

    /// Command input that receives this input's resolved value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides_value_for_command_input: Option<String>,

    /// Command mount whose host path comes from this input's object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides_files_for_command_mount: Option<String>,

    /// Whether a launcher may let users change the value; not read during resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settable: Option<bool>,

    /// Launcher hint to load the object's children; not read during resolution
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub load_children: bool,

    /// Derived inputs only: the wrapper input this one is selected from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from_wrapper_input: Option<String>,

    /// Derived inputs only: property of the source object used as the value
    #[serde(
        default,
        alias = "derived-from-xnat-object-property",
        skip_serializing_if = "Option::is_none"
    )]
    pub derived_from_property: Option<String>,
}

impl WrapperInput {
    pub fn new(name: impl Into<String>, input_type: InputType) -> Self {
        Self {
            name: name.into(),
            input_type,
            ..Self::default()
        }
    }

    /// The engine-level input this wrapper input resolves as
    pub fn to_input(&self) -> Input {
        Input {
            name: self.name.clone(),
            description: self.description.clone(),
            input_type: self.input_type,
            required: self.required,
            default_value: self.default_value.clone(),
            matcher: self.matcher.clone(),
            parent: self.derived_from_wrapper_input.clone(),
            parent_property: self.derived_from_property.clone(),
            replacement_key: self.replacement_key.clone(),
            sensitive: self.sensitive,
            ..Input::default()
        }
    }
}

/// Known output handler types
pub const HANDLER_TYPES: [&str; 2] = ["Resource", "Assessor"];

/// Files a Command output under an archive object once the container finishes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputHandler {
    pub name: String,

    /// Command output this handler takes
    #[serde(default)]
    pub accepts_command_output: String,

    /// Wrapper input (or earlier handler) whose object receives the output
    #[serde(default)]
    pub as_a_child_of: String,

    #[serde(rename = "type", default = "default_handler_type")]
    pub handler_type: String,

    /// Resource label, required for `Resource` handlers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_handler_type() -> String {
    HANDLER_TYPES[0].to_string()
}

impl OutputHandler {
    pub fn new(
        name: impl Into<String>,
        accepts_command_output: impl Into<String>,
        as_a_child_of: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            accepts_command_output: accepts_command_output.into(),
            as_a_child_of: as_a_child_of.into(),
            handler_type: default_handler_type(),
            label: None,
        }
    }
}
