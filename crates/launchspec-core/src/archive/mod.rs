//! Archive snapshot model
//!
//! Snapshots are read-only JSON views of archive entities. Resolution mostly
//! works on their JSON form (child collections are addressed by path queries);
//! the typed structs pin down the document shape and give mounts typed access
//! to resource directories.

pub mod locator;
pub mod snapshot;

pub use locator::{ArchiveLocator, LocatorError};
pub use snapshot::{ArchiveFile, Assessor, Project, Resource, Scan, Session, Subject};

use serde_json::Value;

/// Archive entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveKind {
    Project,
    Subject,
    Session,
    Scan,
    Assessor,
    Resource,
    File,
}

impl ArchiveKind {
    pub const ALL: [ArchiveKind; 7] = [
        ArchiveKind::Project,
        ArchiveKind::Subject,
        ArchiveKind::Session,
        ArchiveKind::Scan,
        ArchiveKind::Assessor,
        ArchiveKind::Resource,
        ArchiveKind::File,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveKind::Project => "project",
            ArchiveKind::Subject => "subject",
            ArchiveKind::Session => "session",
            ArchiveKind::Scan => "scan",
            ArchiveKind::Assessor => "assessor",
            ArchiveKind::Resource => "resource",
            ArchiveKind::File => "file",
        }
    }

    /// Key of the child collection holding objects of this kind inside a parent snapshot
    pub fn snapshot_collection(self) -> &'static str {
        match self {
            ArchiveKind::Project => "projects",
            ArchiveKind::Subject => "subjects",
            ArchiveKind::Session => "sessions",
            ArchiveKind::Scan => "scans",
            ArchiveKind::Assessor => "assessors",
            ArchiveKind::Resource => "resources",
            ArchiveKind::File => "files",
        }
    }

    /// Path segment naming this kind in an archive locator
    pub fn locator_collection(self) -> &'static str {
        match self {
            ArchiveKind::Session => "experiments",
            other => other.snapshot_collection(),
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            "experiments" => Some(ArchiveKind::Session),
            other => Self::ALL
                .into_iter()
                .find(|k| k.snapshot_collection() == other),
        }
    }

    /// Field a runtime value is compared against when selecting a child of this kind
    pub fn match_key(self) -> &'static str {
        match self {
            ArchiveKind::File => "name",
            _ => "id",
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One archive entity of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveObject {
    Project(Project),
    Subject(Subject),
    Session(Session),
    Scan(Scan),
    Assessor(Assessor),
    Resource(Resource),
    File(ArchiveFile),
}

impl ArchiveObject {
    /// Read a snapshot document as an object of `kind`
    ///
    /// # Errors
    ///
    /// Returns the deserialization error if `value` does not have the shape of `kind`.
    pub fn from_json(kind: ArchiveKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ArchiveKind::Project => ArchiveObject::Project(serde_json::from_value(value)?),
            ArchiveKind::Subject => ArchiveObject::Subject(serde_json::from_value(value)?),
            ArchiveKind::Session => ArchiveObject::Session(serde_json::from_value(value)?),
            ArchiveKind::Scan => ArchiveObject::Scan(serde_json::from_value(value)?),
            ArchiveKind::Assessor => ArchiveObject::Assessor(serde_json::from_value(value)?),
            ArchiveKind::Resource => ArchiveObject::Resource(serde_json::from_value(value)?),
            ArchiveKind::File => ArchiveObject::File(serde_json::from_value(value)?),
        })
    }

    /// # Errors
    ///
    /// Returns the serialization error if an `extra` value cannot be written.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            ArchiveObject::Project(o) => serde_json::to_value(o),
            ArchiveObject::Subject(o) => serde_json::to_value(o),
            ArchiveObject::Session(o) => serde_json::to_value(o),
            ArchiveObject::Scan(o) => serde_json::to_value(o),
            ArchiveObject::Assessor(o) => serde_json::to_value(o),
            ArchiveObject::Resource(o) => serde_json::to_value(o),
            ArchiveObject::File(o) => serde_json::to_value(o),
        }
    }

    pub fn kind(&self) -> ArchiveKind {
        match self {
            ArchiveObject::Project(_) => ArchiveKind::Project,
            ArchiveObject::Subject(_) => ArchiveKind::Subject,
            ArchiveObject::Session(_) => ArchiveKind::Session,
            ArchiveObject::Scan(_) => ArchiveKind::Scan,
            ArchiveObject::Assessor(_) => ArchiveKind::Assessor,
            ArchiveObject::Resource(_) => ArchiveKind::Resource,
            ArchiveObject::File(_) => ArchiveKind::File,
        }
    }

    /// Id, or name for files
    pub fn id(&self) -> Option<&str> {
        match self {
            ArchiveObject::Project(o) => o.id.as_deref(),
            ArchiveObject::Subject(o) => o.id.as_deref(),
            ArchiveObject::Session(o) => o.id.as_deref(),
            ArchiveObject::Scan(o) => o.id.as_deref(),
            ArchiveObject::Assessor(o) => o.id.as_deref(),
            ArchiveObject::Resource(o) => o.id.as_deref(),
            ArchiveObject::File(o) => o.name.as_deref(),
        }
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            ArchiveObject::Project(o) => o.uri.as_deref(),
            ArchiveObject::Subject(o) => o.uri.as_deref(),
            ArchiveObject::Session(o) => o.uri.as_deref(),
            ArchiveObject::Scan(o) => o.uri.as_deref(),
            ArchiveObject::Assessor(o) => o.uri.as_deref(),
            ArchiveObject::Resource(o) => o.uri.as_deref(),
            ArchiveObject::File(o) => o.uri.as_deref(),
        }
    }
}
