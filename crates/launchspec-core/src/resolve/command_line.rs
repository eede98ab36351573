//! Command line, working directory, environment and port templates

use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::model::Command;
use crate::template::resolve_template;

/// Resolved forms of every templated string on a Command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedTemplates {
    pub working_directory: Option<String>,
    pub command_line: String,
    pub environment_variables: BTreeMap<String, String>,
    pub ports: BTreeMap<String, String>,
}

/// Apply both template passes to the Command's strings
///
/// `values` are command-line formatted, so a flagged input substitutes as
/// `<flag><separator><value>` wherever its key appears.
pub(crate) fn resolve_templates(
    command: &Command,
    command_json: &Value,
    values: &BTreeMap<String, String>,
) -> Result<ResolvedTemplates> {
    let render = |text: &str| resolve_template(text, command_json, values);
    let render_map = |map: &BTreeMap<String, String>| -> Result<BTreeMap<String, String>> {
        map.iter()
            .map(|(key, value)| Ok((render(key)?, render(value)?)))
            .collect()
    };

    Ok(ResolvedTemplates {
        working_directory: command
            .working_directory
            .as_deref()
            .map(render)
            .transpose()?,
        command_line: render(&command.command_line)?,
        environment_variables: render_map(&command.environment_variables)?,
        ports: render_map(&command.ports)?,
    })
}
