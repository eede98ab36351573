//! launchspec core - resolution engine for container Command declarations
//!
//! A Command declares an image, a templated command line, typed inputs,
//! mounts and outputs. This crate turns a declaration plus caller-supplied
//! runtime values into a launch-ready `ResolvedCommand`:
//! - Input resolution in declaration order, including parent/child selection
//!   over archive snapshots
//! - Embedded `^query^` substitution against the Command's own JSON
//! - Replacement-key substitution into the command line, working directory,
//!   environment variables and ports
//! - Mount host-path and output resolution
//! - Wrapper resolution and structural validation of declarations

pub mod archive;
pub mod collaborators;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod resolve;
pub mod rules;
pub mod template;

pub use launchspec_core_types as core_types;

#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use collaborators::{ArchiveLookup, ConfigScope, ConfigStore};
pub use errors::{ExError, ExErrorKind, LaunchSpecError, Result};
pub use model::{Command, Input, InputType, Mount, Output, ResolvedCommand, Wrapper};
pub use resolve::{resolve, resolve_wrapper, CallerContext};
pub use rules::validation::validate;
