//! Output resolution

use serde_json::Value;

use crate::errors::Result;
use crate::model::{Output, ResolvedOutput};
use crate::template::resolve_embedded_query;

/// Resolve output paths; only embedded queries apply, replacement keys do not
pub(crate) fn resolve_outputs(
    outputs: &[Output],
    command_json: &Value,
) -> Result<Vec<ResolvedOutput>> {
    outputs
        .iter()
        .map(|output| {
            let path = output
                .path
                .as_deref()
                .map(|p| resolve_embedded_query(p, command_json))
                .transpose()?;
            Ok(ResolvedOutput {
                name: output.name.clone(),
                mount: output.mount.clone(),
                required: output.required,
                path,
                glob: output.glob.clone(),
            })
        })
        .collect()
}
