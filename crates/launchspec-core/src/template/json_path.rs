//! Embedded path queries
//!
//! A string may carry one `^<query>^` marker. The query is evaluated as
//! JSONPath (RFC 9535) against the JSON form of the Command being resolved and
//! the single result is spliced in place of the marker.

use serde_json::Value;
use serde_json_path::JsonPath;
use sha2::{Digest, Sha256};

use crate::errors::{LaunchSpecError, Result};
use crate::model::Command;

/// JSON form of a Command plus the SHA-256 digest of its serialization
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDocument {
    json: Value,
    digest: String,
}

impl CommandDocument {
    /// # Errors
    ///
    /// Returns `LaunchSpecError::Serialization` if the Command cannot be serialized.
    pub fn new(command: &Command) -> Result<Self> {
        let json = serde_json::to_value(command)?;
        let digest = hex::encode(Sha256::digest(serde_json::to_vec(&json)?));
        Ok(Self { json, digest })
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Per-call cache of a Command's JSON form
///
/// Serializes on first use and again only when asked about a different
/// Command instance. Never shared between resolution calls.
#[derive(Debug, Default)]
pub struct CommandJsonCache<'c> {
    source: Option<&'c Command>,
    document: Option<CommandDocument>,
    serializations: usize,
}

impl<'c> CommandJsonCache<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `LaunchSpecError::Serialization` if the Command cannot be serialized.
    pub fn document(&mut self, command: &'c Command) -> Result<&CommandDocument> {
        let fresh = matches!(self.source, Some(cached) if std::ptr::eq(cached, command));
        if !fresh || self.document.is_none() {
            self.document = Some(CommandDocument::new(command)?);
            self.source = Some(command);
            self.serializations += 1;
        }
        self.document.as_ref().ok_or_else(|| LaunchSpecError::Internal {
            message: "command document cache is empty".to_string(),
        })
    }

    /// How many times a Command has been serialized through this cache
    pub fn serializations(&self) -> usize {
        self.serializations
    }
}

/// Prefix `$.` unless the query already starts at the root
pub fn normalize(query: &str) -> String {
    let query = query.trim();
    if query.starts_with('$') {
        query.to_string()
    } else {
        format!("$.{}", query)
    }
}

/// Parse a JSONPath query
///
/// # Errors
///
/// Returns `LaunchSpecError::InvalidQuery` carrying the parser's reason.
pub fn compile(query: &str) -> Result<JsonPath> {
    JsonPath::parse(query).map_err(|e| LaunchSpecError::InvalidQuery {
        query: query.to_string(),
        reason: e.to_string(),
    })
}

/// Text spliced for a query result: strings verbatim, anything else as compact JSON
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First non-null result of `query` (normalized) against `doc`, as text
///
/// # Errors
///
/// Returns `LaunchSpecError::InvalidQuery` if the query does not parse.
pub fn first_value(query: &str, doc: &Value) -> Result<Option<String>> {
    let path = compile(&normalize(query))?;
    Ok(path
        .query(doc)
        .all()
        .into_iter()
        .find(|v| !v.is_null())
        .map(scalar_text))
}

/// Byte range of the first `^...^` marker, markers included
///
/// Greedy: runs from the first `^` to the last `^` on the same line, with at
/// least one character between them.
fn find_marker(text: &str) -> Option<(usize, usize)> {
    for (start, _) in text.match_indices('^') {
        let rest = &text[start + 1..];
        let line = rest.split('\n').next().unwrap_or(rest);
        if let Some(end) = line.rfind('^') {
            if end > 0 {
                return Some((start, start + 1 + end));
            }
        }
    }
    None
}

/// Replace the `^<query>^` marker in `template` with the query's single result
///
/// Zero (non-null) results leave the template unchanged.
///
/// # Errors
///
/// Returns `LaunchSpecError::AmbiguousQuery` when the query yields two or
/// more results, `LaunchSpecError::InvalidQuery` when it does not parse.
pub fn resolve_embedded_query(template: &str, command_json: &Value) -> Result<String> {
    let Some((start, end)) = find_marker(template) else {
        return Ok(template.to_string());
    };

    let query = normalize(&template[start + 1..end]);
    let path = compile(&query)?;
    let results: Vec<&Value> = path
        .query(command_json)
        .all()
        .into_iter()
        .filter(|v| !v.is_null())
        .collect();

    match results.as_slice() {
        [] => {
            tracing::debug!(query = %query, "embedded query matched nothing");
            Ok(template.to_string())
        }
        [only] => Ok(format!(
            "{}{}{}",
            &template[..start],
            scalar_text(only),
            &template[end + 1..]
        )),
        many => Err(LaunchSpecError::AmbiguousQuery {
            query,
            count: many.len(),
        }),
    }
}
