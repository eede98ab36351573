//! Archive locators: URI-like paths naming one archive object
//!
//! ```text
//! /archive/projects/P1/subjects/S1/experiments/E1/scans/3/resources/DICOM/files/a/b.dcm
//! ```
//!
//! The `/archive` prefix is optional on input and always present on output.

use super::ArchiveKind;

const ARCHIVE_PREFIX: &str = "/archive";

/// Parsed locator: the `(kind, id)` chain from the outermost object down to the target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveLocator {
    segments: Vec<(ArchiveKind, String)>,
}

/// Why a locator could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    Empty,
    UnknownCollection(String),
    MissingId(String),
}

impl std::fmt::Display for LocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorError::Empty => write!(f, "locator names no archive object"),
            LocatorError::UnknownCollection(c) => write!(f, "unknown collection \"{}\"", c),
            LocatorError::MissingId(c) => write!(f, "collection \"{}\" has no id", c),
        }
    }
}

impl std::error::Error for LocatorError {}

impl ArchiveLocator {
    /// Parse a locator path
    ///
    /// # Errors
    ///
    /// Returns `LocatorError` when the path is empty, names a collection that
    /// is not an archive collection, or ends in a collection with no id.
    pub fn parse(text: &str) -> Result<Self, LocatorError> {
        let trimmed = text.trim();
        let path = trimmed.strip_prefix(ARCHIVE_PREFIX).unwrap_or(trimmed);
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        let mut segments = Vec::new();
        let mut i = 0;
        while i < parts.len() {
            let mut collection = parts[i];
            // Assessor outputs live under ".../out/resources/<label>"
            if collection == "out" && parts.get(i + 1) == Some(&"resources") {
                i += 1;
                collection = parts[i];
            }
            let kind = ArchiveKind::from_collection(collection)
                .ok_or_else(|| LocatorError::UnknownCollection(collection.to_string()))?;

            if kind == ArchiveKind::File {
                let rest = &parts[i + 1..];
                if rest.is_empty() {
                    return Err(LocatorError::MissingId(collection.to_string()));
                }
                segments.push((kind, rest.join("/")));
                break;
            }

            let id = parts
                .get(i + 1)
                .ok_or_else(|| LocatorError::MissingId(collection.to_string()))?;
            segments.push((kind, (*id).to_string()));
            i += 2;
        }

        if segments.is_empty() {
            return Err(LocatorError::Empty);
        }
        Ok(Self { segments })
    }

    /// Kind of the object the locator points at
    pub fn kind(&self) -> ArchiveKind {
        self.target().0
    }

    /// Id (or file name) of the object the locator points at
    pub fn id(&self) -> &str {
        &self.target().1
    }

    /// Id of the enclosing object of `kind`, if the chain contains one
    pub fn id_of(&self, kind: ArchiveKind) -> Option<&str> {
        self.segments
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| id.as_str())
    }

    pub fn segments(&self) -> &[(ArchiveKind, String)] {
        &self.segments
    }

    fn target(&self) -> &(ArchiveKind, String) {
        // parse() never yields an empty chain
        &self.segments[self.segments.len() - 1]
    }
}

impl std::fmt::Display for ArchiveLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(ARCHIVE_PREFIX)?;
        for (kind, id) in &self.segments {
            write!(f, "/{}/{}", kind.locator_collection(), id)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ArchiveLocator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_locator() {
        let locator = ArchiveLocator::parse("/archive/projects/P1/subjects/S1/experiments/E1")
            .unwrap();
        assert_eq!(locator.kind(), ArchiveKind::Session);
        assert_eq!(locator.id(), "E1");
        assert_eq!(locator.id_of(ArchiveKind::Project), Some("P1"));
    }

    #[test]
    fn test_prefix_is_optional_and_restored() {
        let locator = ArchiveLocator::parse("/experiments/E1/scans/4").unwrap();
        assert_eq!(locator.kind(), ArchiveKind::Scan);
        assert_eq!(locator.to_string(), "/archive/experiments/E1/scans/4");
    }

    #[test]
    fn test_file_name_keeps_slashes() {
        let locator =
            ArchiveLocator::parse("/archive/experiments/E1/resources/DICOM/files/a/b.dcm").unwrap();
        assert_eq!(locator.kind(), ArchiveKind::File);
        assert_eq!(locator.id(), "a/b.dcm");
        assert_eq!(locator.id_of(ArchiveKind::Resource), Some("DICOM"));
    }

    #[test]
    fn test_assessor_out_resources() {
        let locator =
            ArchiveLocator::parse("/archive/experiments/E1/assessors/A1/out/resources/QC").unwrap();
        assert_eq!(locator.kind(), ArchiveKind::Resource);
        assert_eq!(locator.id(), "QC");
        assert_eq!(
            locator.to_string(),
            "/archive/experiments/E1/assessors/A1/resources/QC"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ArchiveLocator::parse("/archive"), Err(LocatorError::Empty));
        assert_eq!(
            ArchiveLocator::parse("/archive/widgets/1"),
            Err(LocatorError::UnknownCollection("widgets".to_string()))
        );
        assert_eq!(
            ArchiveLocator::parse("/archive/projects"),
            Err(LocatorError::MissingId("projects".to_string()))
        );
    }
}
