use serde::{Deserialize, Serialize};

use crate::archive::ArchiveKind;

/// Closed set of input types
///
/// The serialized names are the ones used in Command documents; upper-case
/// spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum InputType {
    #[default]
    #[serde(rename = "string", alias = "STRING")]
    String,
    #[serde(rename = "boolean", alias = "BOOLEAN")]
    Boolean,
    #[serde(rename = "number", alias = "NUMBER")]
    Number,
    #[serde(rename = "File", alias = "FILE", alias = "file")]
    File,
    #[serde(rename = "Project", alias = "PROJECT", alias = "project")]
    Project,
    #[serde(rename = "Subject", alias = "SUBJECT", alias = "subject")]
    Subject,
    #[serde(rename = "Session", alias = "SESSION", alias = "session")]
    Session,
    #[serde(rename = "Scan", alias = "SCAN", alias = "scan")]
    Scan,
    #[serde(rename = "Assessor", alias = "ASSESSOR", alias = "assessor")]
    Assessor,
    #[serde(rename = "Config", alias = "CONFIG", alias = "config")]
    Config,
    #[serde(rename = "Resource", alias = "RESOURCE", alias = "resource")]
    Resource,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::String => "string",
            InputType::Boolean => "boolean",
            InputType::Number => "number",
            InputType::File => "File",
            InputType::Project => "Project",
            InputType::Subject => "Subject",
            InputType::Session => "Session",
            InputType::Scan => "Scan",
            InputType::Assessor => "Assessor",
            InputType::Config => "Config",
            InputType::Resource => "Resource",
        }
    }

    /// Archive entity this input resolves to, if any
    pub fn archive_kind(self) -> Option<ArchiveKind> {
        match self {
            InputType::File => Some(ArchiveKind::File),
            InputType::Project => Some(ArchiveKind::Project),
            InputType::Subject => Some(ArchiveKind::Subject),
            InputType::Session => Some(ArchiveKind::Session),
            InputType::Scan => Some(ArchiveKind::Scan),
            InputType::Assessor => Some(ArchiveKind::Assessor),
            InputType::Resource => Some(ArchiveKind::Resource),
            InputType::String | InputType::Boolean | InputType::Number | InputType::Config => None,
        }
    }

    /// Project, subject, session, scan or assessor
    pub fn is_domain_object(self) -> bool {
        matches!(
            self,
            InputType::Project
                | InputType::Subject
                | InputType::Session
                | InputType::Scan
                | InputType::Assessor
        )
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed parameter slot on a Command
///
/// Optional fields are omitted from the serialized form when unset so the
/// Command's JSON stays close to what was authored; embedded path queries run
/// against that JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Input {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Drives how the value is resolved; defaults to `string`
    #[serde(rename = "type", default)]
    pub input_type: InputType,

    /// Resolution fails when no value is supplied or found
    #[serde(default)]
    pub required: bool,

    /// Used when the caller supplies no value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Path-query filter expression applied to candidate snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,

    /// Name of an earlier input whose snapshot this input is selected from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Earlier inputs that must be resolved first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,

    /// Path into the parent's snapshot supplying this input's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_property: Option<String>,

    /// Literal token replaced by the rendered value in templated fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_key: Option<String>,

    /// Flag placed before the value on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line_flag: Option<String>,

    /// Text between flag and value; a single space when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line_separator: Option<String>,

    /// Substituted for a boolean input that resolves to true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_value: Option<String>,

    /// Substituted for a boolean input that resolves to false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_value: Option<String>,

    /// Keep the resolved value out of log output
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

impl Input {
    /// Create an optional input with no default
    pub fn new(name: impl Into<String>, input_type: InputType) -> Self {
        Self {
            name: name.into(),
            input_type,
            ..Self::default()
        }
    }

    /// Declared prerequisites plus the parent, in that order, without duplicates
    pub fn required_prerequisites(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.prerequisites.len() + 1);
        for name in self.prerequisites.iter().map(String::as_str).chain(self.parent.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Replacement key, if declared and non-blank
    pub fn replacement_key(&self) -> Option<&str> {
        self.replacement_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Render `value` the way it appears on a command line
    ///
    /// `flag + separator + value` when a flag is configured (separator
    /// defaults to a single space), else the value alone.
    pub fn command_line_value(&self, value: &str) -> String {
        match self.command_line_flag.as_deref().filter(|f| !f.is_empty()) {
            Some(flag) => {
                let separator = self.command_line_separator.as_deref().unwrap_or(" ");
                format!("{}{}{}", flag, separator, value)
            }
            None => value.to_string(),
        }
    }
}
