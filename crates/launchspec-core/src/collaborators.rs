//! Interfaces to the systems the resolver reads from
//!
//! The resolver calls these synchronously and applies no timeout or retry of
//! its own. Implementations must tolerate concurrent readers.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::archive::{ArchiveKind, ArchiveLocator, ArchiveObject};
use crate::errors::{ExError, ExErrorKind};

/// Finds archive objects by identifier or locator
#[allow(clippy::result_large_err)]
pub trait ArchiveLookup: Send + Sync {
    /// Look up an object of `kind` by its identifier (or by name, for files).
    ///
    /// # Errors
    ///
    /// Returns an `ExError` if the archive could not be queried. A missing
    /// object is `Ok(None)`.
    fn by_id(&self, kind: ArchiveKind, id: &str) -> Result<Option<ArchiveObject>, ExError>;

    /// Look up the object a locator points at.
    ///
    /// # Errors
    ///
    /// Returns an `ExError` if the archive could not be queried. A missing
    /// object is `Ok(None)`.
    fn by_locator(&self, locator: &ArchiveLocator) -> Result<Option<ArchiveObject>, ExError>;
}

/// Lookup used when no archive is attached; every call fails
pub struct NoopArchive;

impl ArchiveLookup for NoopArchive {
    fn by_id(&self, kind: ArchiveKind, id: &str) -> Result<Option<ArchiveObject>, ExError> {
        Err(ExError::new(ExErrorKind::ExternalService)
            .with_op("archive_by_id")
            .with_message(format!("No archive configured to look up {} {}", kind, id)))
    }

    fn by_locator(&self, locator: &ArchiveLocator) -> Result<Option<ArchiveObject>, ExError> {
        Err(ExError::new(ExErrorKind::ExternalService)
            .with_op("archive_by_locator")
            .with_message(format!("No archive configured to look up {}", locator)))
    }
}

/// Archive held in memory, keyed by uri with a secondary `(kind, id)` index
///
/// Ids are only unique within their parent (two sessions can both have a
/// scan "1"), so an id lookup that hits several objects fails and the
/// caller has to use a locator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    objects: Vec<ArchiveObject>,
    by_uri: BTreeMap<String, usize>,
    by_id: BTreeMap<(ArchiveKind, String), Vec<usize>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object
    ///
    /// An object with the uri of one already held replaces it. Objects with
    /// neither id nor uri cannot be found and are dropped.
    pub fn insert(&mut self, object: ArchiveObject) {
        let kind = object.kind();
        let id = object.id().map(str::to_string);
        let uri = object.uri().map(str::to_string);
        if id.is_none() && uri.is_none() {
            return;
        }

        let replaced = uri.as_ref().and_then(|u| self.by_uri.get(u)).copied();
        let slot = match replaced {
            Some(slot) => {
                let old = std::mem::replace(&mut self.objects[slot], object);
                if let Some(old_id) = old.id() {
                    if let Some(slots) = self.by_id.get_mut(&(old.kind(), old_id.to_string())) {
                        slots.retain(|&s| s != slot);
                    }
                }
                slot
            }
            None => {
                self.objects.push(object);
                self.objects.len() - 1
            }
        };

        if let Some(uri) = uri {
            self.by_uri.insert(uri, slot);
        }
        if let Some(id) = id {
            self.by_id.entry((kind, id)).or_default().push(slot);
        }
    }

    /// Build an archive from a fixture document
    ///
    /// The document maps collection names (`projects`, `subjects`,
    /// `sessions` or `experiments`, `scans`, `assessors`, `resources`,
    /// `files`) to arrays of snapshots.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidInput` for a non-object document, an
    /// unknown collection name, a collection that is not an array, or an
    /// entry that does not have the collection's snapshot shape.
    pub fn from_fixture(doc: &Value) -> Result<Self, ExError> {
        let invalid = |message: String| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_archive_fixture")
                .with_message(message)
        };

        let collections = doc
            .as_object()
            .ok_or_else(|| invalid("archive fixture must be a JSON object".to_string()))?;

        let mut archive = Self::new();
        for (collection, entries) in collections {
            let kind = ArchiveKind::from_collection(collection)
                .ok_or_else(|| invalid(format!("unknown collection \"{}\"", collection)))?;
            let entries = entries
                .as_array()
                .ok_or_else(|| invalid(format!("collection \"{}\" must be an array", collection)))?;
            for (index, entry) in entries.iter().enumerate() {
                let object = ArchiveObject::from_json(kind, entry.clone()).map_err(|e| {
                    invalid(format!("{}[{}] is not a {}: {}", collection, index, kind, e))
                })?;
                archive.insert(object);
            }
        }
        Ok(archive)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ArchiveLookup for InMemoryArchive {
    fn by_id(&self, kind: ArchiveKind, id: &str) -> Result<Option<ArchiveObject>, ExError> {
        let slots = self
            .by_id
            .get(&(kind, id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default();
        match slots {
            [] => Ok(None),
            [slot] => Ok(self.objects.get(*slot).cloned()),
            several => Err(ExError::new(ExErrorKind::AmbiguousResult)
                .with_op("archive_by_id")
                .with_message(format!(
                    "{} objects of kind {} have id \"{}\"; look it up by locator",
                    several.len(),
                    kind,
                    id
                ))),
        }
    }

    /// Exact uri match; a locator with no parent segments may also name an
    /// object held without a uri
    fn by_locator(&self, locator: &ArchiveLocator) -> Result<Option<ArchiveObject>, ExError> {
        if let Some(&slot) = self.by_uri.get(&locator.to_string()) {
            return Ok(self.objects.get(slot).cloned());
        }
        match locator.segments() {
            [_] => Ok(self
                .by_id(locator.kind(), locator.id())?
                .filter(|object| object.uri().is_none())),
            _ => Ok(None),
        }
    }
}

/// Scope a configuration file is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigScope {
    Site,
    Project,
}

impl ConfigScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigScope::Site => "site",
            ConfigScope::Project => "project",
        }
    }
}

impl std::fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stores tool configuration files by `(tool, file, scope, entity)`
#[allow(clippy::result_large_err)]
pub trait ConfigStore: Send + Sync {
    /// Fetch the raw contents of one configuration file.
    ///
    /// `entity_id` is the project id for `ConfigScope::Project` and `None`
    /// for `ConfigScope::Site`.
    ///
    /// # Errors
    ///
    /// Returns an `ExError` if the store could not be read. A missing file is `Ok(None)`.
    fn get(
        &self,
        tool: &str,
        file: &str,
        scope: ConfigScope,
        entity_id: Option<&str>,
    ) -> Result<Option<String>, ExError>;
}

/// Store with no configuration at all
pub struct NoopConfigStore;

impl ConfigStore for NoopConfigStore {
    fn get(
        &self,
        _: &str,
        _: &str,
        _: ConfigScope,
        _: Option<&str>,
    ) -> Result<Option<String>, ExError> {
        Ok(None)
    }
}

type ConfigKey = (String, String, ConfigScope, Option<String>);

#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    entries: BTreeMap<ConfigKey, String>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_site(&mut self, tool: &str, file: &str, contents: impl Into<String>) {
        self.entries.insert(
            (tool.to_string(), file.to_string(), ConfigScope::Site, None),
            contents.into(),
        );
    }

    pub fn insert_project(
        &mut self,
        project_id: &str,
        tool: &str,
        file: &str,
        contents: impl Into<String>,
    ) {
        self.entries.insert(
            (
                tool.to_string(),
                file.to_string(),
                ConfigScope::Project,
                Some(project_id.to_string()),
            ),
            contents.into(),
        );
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get(
        &self,
        tool: &str,
        file: &str,
        scope: ConfigScope,
        entity_id: Option<&str>,
    ) -> Result<Option<String>, ExError> {
        let key = (
            tool.to_string(),
            file.to_string(),
            scope,
            entity_id.map(str::to_string),
        );
        Ok(self.entries.get(&key).cloned())
    }
}
