use serde::{Deserialize, Serialize};

/// A file mount inside the container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Mount {
    pub name: String,

    #[serde(default)]
    pub writable: bool,

    /// Path inside the container
    #[serde(default)]
    pub path: String,

    /// Input whose resolved object supplies the host files
    #[serde(default, alias = "file-input", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Label of the resource to mount when the source object carries several
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl Mount {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// A mount with no source input; its host path is assigned by whoever runs the container
    pub fn is_output_only(&self) -> bool {
        self.input.is_none()
    }
}
