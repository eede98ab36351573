//! Input resolution
//!
//! Inputs are resolved once each, strictly in declaration order. Nothing is
//! reordered: an input whose parent or prerequisite is declared after it
//! fails. Each resolved input is recorded in a `ResolutionContext` that is
//! threaded through the loop and handed to the later passes.

use launchspec_core_types::redact_if;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Env;
use crate::archive::{ArchiveKind, ArchiveLocator, ArchiveObject};
use crate::collaborators::ConfigScope;
use crate::errors::{LaunchSpecError, Result};
use crate::model::{Input, InputType, ResolvedInput};
use crate::template::{compile, first_value, resolve_embedded_query};

/// Resolved input values keyed by replacement key
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ReplacementValues {
    /// Values as resolved
    pub raw: BTreeMap<String, String>,
    /// Values with the input's command-line flag applied
    pub command_line: BTreeMap<String, String>,
}

impl ReplacementValues {
    /// Add `other`'s entries, replacing any with the same key
    pub(crate) fn extend(&mut self, other: ReplacementValues) {
        self.raw.extend(other.raw);
        self.command_line.extend(other.command_line);
    }
}

/// Inputs resolved so far, plus the values keyed by replacement key
#[derive(Debug, Default)]
pub(crate) struct ResolutionContext {
    resolved: Vec<ResolvedInput>,
    index: BTreeMap<String, usize>,
    values: ReplacementValues,
}

impl ResolutionContext {
    pub(crate) fn get(&self, name: &str) -> Option<&ResolvedInput> {
        self.index.get(name).map(|&i| &self.resolved[i])
    }

    /// Check that every prerequisite of `input` is already resolved and
    /// return its parent
    fn prerequisites_of(&self, input: &Input) -> Result<Option<&ResolvedInput>> {
        if let Some(missing) = input
            .required_prerequisites()
            .into_iter()
            .find(|name| !self.index.contains_key(*name))
        {
            return Err(LaunchSpecError::input(
                &input.name,
                format!(
                    "prerequisite \"{}\" has not been resolved; it must be declared before \"{}\"",
                    missing, input.name
                ),
            ));
        }
        Ok(input.parent.as_deref().and_then(|parent| self.get(parent)))
    }

    fn record(mut self, input: &Input, resolved: ResolvedInput) -> Self {
        if let Some(key) = input.replacement_key() {
            let raw = resolved.value_or_empty();
            let formatted = if raw.is_empty() {
                String::new()
            } else {
                input.command_line_value(raw)
            };
            self.values.raw.insert(key.to_string(), raw.to_string());
            self.values.command_line.insert(key.to_string(), formatted);
        }
        self.index.insert(resolved.name.clone(), self.resolved.len());
        self.resolved.push(resolved);
        self
    }

    /// Resolved inputs by name, and the values keyed by replacement key
    pub(crate) fn into_parts(self) -> (BTreeMap<String, ResolvedInput>, ReplacementValues) {
        let inputs = self
            .resolved
            .into_iter()
            .map(|input| (input.name.clone(), input))
            .collect();
        (inputs, self.values)
    }
}

/// Resolve `inputs` in order
pub(crate) fn resolve_inputs<'i>(
    inputs: impl IntoIterator<Item = &'i Input>,
    runtime_values: &BTreeMap<String, String>,
    env: &Env<'_>,
) -> Result<ResolutionContext> {
    inputs
        .into_iter()
        .try_fold(ResolutionContext::default(), |context, input| {
            let resolved = resolve_input(input, &context, runtime_values, env)?;
            Ok(context.record(input, resolved))
        })
}

/// Everything a per-type resolver needs about the input in hand
struct Step<'s, 'e> {
    input: &'s Input,
    parent: Option<&'s ResolvedInput>,
    value: Option<String>,
    matcher: Option<String>,
    env: &'s Env<'e>,
}

impl Step<'_, '_> {
    fn name(&self) -> &str {
        &self.input.name
    }

    /// Trimmed value, if there is a non-blank one
    fn value_text(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn fail(&self, message: impl Into<String>) -> LaunchSpecError {
        LaunchSpecError::input(&self.input.name, message)
    }
}

/// Value and snapshot produced by a per-type resolver
#[derive(Debug, Default)]
struct Outcome {
    value: Option<String>,
    snapshot: Option<Value>,
}

impl Outcome {
    fn plain(value: Option<String>) -> Self {
        Self {
            value,
            snapshot: None,
        }
    }

    fn object(value: String, snapshot: Value) -> Self {
        Self {
            value: Some(value),
            snapshot: Some(snapshot),
        }
    }
}

fn resolve_input(
    input: &Input,
    context: &ResolutionContext,
    runtime_values: &BTreeMap<String, String>,
    env: &Env<'_>,
) -> Result<ResolvedInput> {
    let parent = context.prerequisites_of(input)?;

    let seeded = runtime_values
        .get(&input.name)
        .or(input.default_value.as_ref());
    let value = seeded
        .map(|v| resolve_embedded_query(v, env.command_json))
        .transpose()?;
    let matcher = input
        .matcher
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(|m| resolve_embedded_query(m, env.command_json))
        .transpose()?;

    let step = Step {
        input,
        parent,
        value,
        matcher,
        env,
    };

    let outcome = match input.input_type {
        InputType::String => resolve_string(&step)?,
        InputType::Boolean => resolve_boolean(&step),
        InputType::Number => resolve_number(&step),
        InputType::File => resolve_file(&step)?,
        InputType::Resource => resolve_resource(&step)?,
        InputType::Project => resolve_project(&step)?,
        InputType::Subject => resolve_descendant(&step, ArchiveKind::Subject)?,
        InputType::Session => resolve_descendant(&step, ArchiveKind::Session)?,
        InputType::Scan => resolve_descendant(&step, ArchiveKind::Scan)?,
        InputType::Assessor => resolve_descendant(&step, ArchiveKind::Assessor)?,
        InputType::Config => resolve_config(&step)?,
    };

    if outcome.value.is_none() && input.required {
        return Err(step.fail(format!(
            "must supply a value for required input \"{}\"",
            input.name
        )));
    }

    tracing::debug!(
        input = %input.name,
        input_type = %input.input_type,
        value = %redact_if(input.sensitive, outcome.value.as_deref().unwrap_or("")),
        has_parent = parent.is_some(),
        "resolved input"
    );

    let snapshot = outcome.snapshot.unwrap_or_else(|| {
        outcome
            .value
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null)
    });

    Ok(ResolvedInput {
        name: input.name.clone(),
        input_type: input.input_type,
        value: outcome.value,
        snapshot,
        sensitive: input.sensitive,
    })
}

/// Plain value, or a property of the parent's snapshot when one is configured
fn resolve_string(step: &Step<'_, '_>) -> Result<Outcome> {
    let property = step
        .input
        .parent_property
        .as_deref()
        .filter(|p| !p.trim().is_empty());

    if let (Some(parent), Some(property)) = (step.parent, property) {
        let derived = first_value(property, &parent.snapshot)
            .map_err(|e| step.fail(format!("parent property: {}", e)))?;
        if derived.is_some() {
            return Ok(Outcome::plain(derived));
        }
    }
    Ok(Outcome::plain(step.value.clone()))
}

fn resolve_boolean(step: &Step<'_, '_>) -> Outcome {
    let flag = step
        .value
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let literal = if flag {
        &step.input.true_value
    } else {
        &step.input.false_value
    };
    Outcome::plain(literal.clone().or_else(|| step.value.clone()))
}

/// Numbers are passed through unchecked
fn resolve_number(step: &Step<'_, '_>) -> Outcome {
    Outcome::plain(step.value.clone())
}

fn resolve_file(step: &Step<'_, '_>) -> Result<Outcome> {
    let parent = step
        .parent
        .ok_or_else(|| step.fail("a File input must declare a parent"))?;
    Ok(select_child(step, parent, ArchiveKind::File))
}

fn resolve_resource(step: &Step<'_, '_>) -> Result<Outcome> {
    let parent = step
        .parent
        .ok_or_else(|| step.fail("a Resource input must declare a parent"))?;
    Ok(select_child(step, parent, ArchiveKind::Resource))
}

fn resolve_project(step: &Step<'_, '_>) -> Result<Outcome> {
    if step.parent.is_some() {
        return Err(step.fail("a Project input cannot declare a parent"));
    }
    lookup_object(step, ArchiveKind::Project)
}

/// Subject, session, scan or assessor
fn resolve_descendant(step: &Step<'_, '_>, kind: ArchiveKind) -> Result<Outcome> {
    match step.parent {
        Some(parent) => Ok(select_child(step, parent, kind)),
        None => lookup_object(step, kind),
    }
}

/// Escape a value for a single-quoted JSONPath string literal
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Query selecting children of `kind` from a parent snapshot
fn child_query(kind: ArchiveKind, value: Option<&str>, matcher: Option<&str>) -> String {
    let collection = kind.snapshot_collection();
    let by_value = value.map(|v| format!("@.{} == '{}'", kind.match_key(), quote(v)));
    match (by_value, matcher) {
        (Some(eq), Some(m)) => format!("$.{}[?{} && ({})]", collection, eq, m),
        (Some(eq), None) => format!("$.{}[?{}]", collection, eq),
        (None, Some(m)) => format!("$.{}[?({})]", collection, m),
        (None, None) => format!("$.{}[*]", collection),
    }
}

/// Value an input takes from a selected snapshot
fn object_value(kind: ArchiveKind, snapshot: &Value) -> String {
    let keys: &[&str] = match kind {
        ArchiveKind::File => &["path", "uri"],
        _ => &["uri"],
    };
    keys.iter()
        .filter_map(|key| snapshot.get(*key).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::warn!(kind = %kind, "snapshot has no uri; using its JSON text as the value");
            snapshot.to_string()
        })
}

/// First child of `parent` matching the value and matcher, in the parent's order
///
/// No match leaves the input unset. A matcher that does not parse is
/// treated as matching nothing.
fn select_child(step: &Step<'_, '_>, parent: &ResolvedInput, kind: ArchiveKind) -> Outcome {
    let query = child_query(kind, step.value_text(), step.matcher.as_deref());
    let selected = match compile(&query) {
        Ok(path) => path.query(&parent.snapshot).first().cloned(),
        Err(err) => {
            tracing::warn!(
                input = %step.name(),
                query = %query,
                error = %err,
                "child matcher does not parse; treating as no match"
            );
            None
        }
    };

    match selected {
        Some(child) => Outcome::object(object_value(kind, &child), child),
        None => {
            tracing::debug!(
                input = %step.name(),
                parent = %parent.name,
                query = %query,
                "no child matched"
            );
            Outcome::default()
        }
    }
}

/// Fetch an object with no parent: by locator, inline JSON or identifier
fn lookup_object(step: &Step<'_, '_>, kind: ArchiveKind) -> Result<Outcome> {
    let Some(value) = step.value_text() else {
        return Ok(Outcome::default());
    };

    let object = if value.starts_with('/') {
        let locator = ArchiveLocator::parse(value)
            .map_err(|e| step.fail(format!("\"{}\" is not an archive locator: {}", value, e)))?;
        if locator.kind() != kind {
            return Err(step.fail(format!(
                "locator \"{}\" names a {}, expected a {}",
                locator,
                locator.kind(),
                kind
            )));
        }
        step.env
            .archive
            .by_locator(&locator)?
            .ok_or_else(|| step.fail(format!("no {} found at \"{}\"", kind, locator)))?
    } else if value.starts_with('{') {
        let doc: Value = serde_json::from_str(value)
            .map_err(|e| step.fail(format!("value is not valid {} JSON: {}", kind, e)))?;
        ArchiveObject::from_json(kind, doc)
            .map_err(|e| step.fail(format!("value is not a {}: {}", kind, e)))?
    } else {
        step.env
            .archive
            .by_id(kind, value)?
            .ok_or_else(|| step.fail(format!("no {} with id \"{}\"", kind, value)))?
    };

    let snapshot = object.to_json()?;
    if let Some(matcher) = step.matcher.as_deref() {
        ensure_matches(step, matcher, &snapshot)?;
    }
    Ok(Outcome::object(object_value(kind, &snapshot), snapshot))
}

/// Filter a one-element list holding `snapshot` through `matcher`
fn ensure_matches(step: &Step<'_, '_>, matcher: &str, snapshot: &Value) -> Result<()> {
    let query = format!("$[?({})]", matcher);
    let path = compile(&query).map_err(|e| step.fail(e.to_string()))?;
    let candidates = Value::Array(vec![snapshot.clone()]);
    if path.query(&candidates).is_empty() {
        return Err(step.fail(format!("object does not match matcher \"{}\"", matcher)));
    }
    Ok(())
}

/// Contents of a `tool/file` configuration file
fn resolve_config(step: &Step<'_, '_>) -> Result<Outcome> {
    let value = step.value_text().unwrap_or("");
    let malformed = || {
        step.fail(format!(
            "config value \"{}\" must have the form toolName/fileName",
            value
        ))
    };

    let parts: Vec<&str> = value.split('/').collect();
    let &[tool, file] = parts.as_slice() else {
        return Err(malformed());
    };
    if tool.is_empty() || file.is_empty() {
        return Err(malformed());
    }

    let (scope, entity_id) = match step.parent {
        None => (ConfigScope::Site, None),
        Some(parent) => match parent.input_type {
            InputType::Project => {
                let id = parent
                    .snapshot
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        step.fail(format!("parent project \"{}\" has no id", parent.name))
                    })?;
                (ConfigScope::Project, Some(id))
            }
            InputType::Subject | InputType::Session | InputType::Scan | InputType::Assessor => {
                return Err(step.fail(format!(
                    "config cannot be read for a {} parent; no project can be derived from it",
                    parent.input_type
                )));
            }
            InputType::String
            | InputType::Boolean
            | InputType::Number
            | InputType::File
            | InputType::Config
            | InputType::Resource => (ConfigScope::Site, None),
        },
    };

    let contents = step
        .env
        .config
        .get(tool, file, scope, entity_id)?
        .ok_or_else(|| {
            step.fail(format!(
                "Could not read config {}/{} ({} scope{})",
                tool,
                file,
                scope,
                entity_id.map(|id| format!(" {}", id)).unwrap_or_default()
            ))
        })?;
    Ok(Outcome::plain(Some(contents)))
}
