use serde::{Deserialize, Serialize};

/// A file or directory the Command produces inside one of its mounts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Output {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Name of the declared mount the output is written into
    #[serde(default)]
    pub mount: String,

    /// Path relative to the mount root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
}

impl Output {
    pub fn new(name: impl Into<String>, mount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount: mount.into(),
            ..Self::default()
        }
    }
}
