//! Template substitution
//!
//! Two passes that are never merged:
//! 1. embedded path queries (`^<query>^`) evaluated against the Command's own JSON
//! 2. literal replacement-key substitution (`#key#` → value)
//!
//! Wherever both apply the query pass runs first.

pub mod json_path;
pub mod substitution;

pub use json_path::{
    compile, first_value, resolve_embedded_query, scalar_text, CommandDocument, CommandJsonCache,
};
pub use substitution::substitute_keys;

use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::Result;

/// Run both passes over `template`
///
/// # Errors
///
/// Propagates failures of the embedded-query pass.
pub fn resolve_template(
    template: &str,
    command_json: &Value,
    values: &BTreeMap<String, String>,
) -> Result<String> {
    let queried = resolve_embedded_query(template, command_json)?;
    Ok(substitute_keys(&queried, values))
}
