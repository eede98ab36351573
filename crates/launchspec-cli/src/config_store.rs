//! Configuration store backed by a directory tree
//!
//! ```text
//! <root>/site/<tool>/<file>
//! <root>/projects/<project-id>/<tool>/<file>
//! ```

use launchspec_core::errors::{ExError, ExErrorKind};
use launchspec_core::{ConfigScope, ConfigStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct DirConfigStore {
    root: PathBuf,
}

impl DirConfigStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(
        &self,
        tool: &str,
        file: &str,
        scope: ConfigScope,
        entity_id: Option<&str>,
    ) -> Result<PathBuf, ExError> {
        let invalid = |message: String| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("config_get")
                .with_message(message)
        };

        let base = match (scope, entity_id) {
            (ConfigScope::Site, _) => self.root.join("site"),
            (ConfigScope::Project, Some(id)) => {
                check_segment(id).map_err(invalid)?;
                self.root.join("projects").join(id)
            }
            (ConfigScope::Project, None) => {
                return Err(invalid("project-scoped config needs a project id".to_string()))
            }
        };
        check_segment(tool).map_err(invalid)?;
        check_segment(file).map_err(invalid)?;
        Ok(base.join(tool).join(file))
    }
}

/// Reject anything that would step outside its own directory
fn check_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(format!("\"{}\" is not a valid config path segment", segment));
    }
    Ok(())
}

impl ConfigStore for DirConfigStore {
    fn get(
        &self,
        tool: &str,
        file: &str,
        scope: ConfigScope,
        entity_id: Option<&str>,
    ) -> Result<Option<String>, ExError> {
        let path = self.path_for(tool, file, scope, entity_id)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ExError::new(ExErrorKind::Io)
                .with_op("config_get")
                .with_message(format!("cannot read {}: {}", path.display(), e))),
        }
    }
}
