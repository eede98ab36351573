//! Resolution: declaration + runtime values → launch-ready command
//!
//! Inputs resolve first, in declaration order, into a `ResolutionContext`.
//! Mounts, outputs and the command-line/environment/port templates are then
//! resolved from that context. Any failure aborts the whole call; no partial
//! result is returned.

mod command_line;
mod inputs;
mod mounts;
mod outputs;
mod wrapper;

pub use wrapper::resolve_wrapper;

use launchspec_core_types::schema::OP_RESOLVE;
use launchspec_core_types::RequestContext;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::collaborators::{ArchiveLookup, ConfigStore};
use crate::errors::Result;
use crate::model::{Command, ResolvedCommand, ResolvedInput};
use crate::template::CommandJsonCache;
use crate::{log_op_end, log_op_error, log_op_start};

use self::inputs::ReplacementValues;
use self::mounts::ProvidedMounts;

/// Who is asking for a resolution, and how to reach their archive
pub struct CallerContext<'a> {
    pub archive: &'a dyn ArchiveLookup,
    pub request: RequestContext,
}

impl<'a> CallerContext<'a> {
    pub fn new(archive: &'a dyn ArchiveLookup) -> Self {
        Self {
            archive,
            request: RequestContext::new(),
        }
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }
}

/// Collaborators and the Command document shared by every step of one call
pub(crate) struct Env<'a> {
    pub archive: &'a dyn ArchiveLookup,
    pub config: &'a dyn ConfigStore,
    pub command_json: &'a Value,
}

/// Wrapper inputs resolved ahead of the Command's own inputs
pub(crate) struct WrapperPart {
    pub name: String,
    pub inputs: BTreeMap<String, ResolvedInput>,
    /// Replacement keys declared on wrapper inputs
    pub values: ReplacementValues,
}

/// Resolve `command` against caller-supplied runtime values
///
/// # Arguments
/// * `command` - Declaration to resolve; not modified
/// * `runtime_values` - Values by input name; these win over declared defaults
/// * `caller` - Archive lookup and correlation context of the caller
/// * `config` - Store CONFIG inputs read from
///
/// # Errors
///
/// Returns the first failure met: `InputResolution` or `MountResolution`
/// naming the offending input or mount, `AmbiguousQuery` when an embedded
/// query matches more than once, `InvalidQuery`, `Serialization`, or
/// `Collaborator` when a lookup fails.
pub fn resolve(
    command: &Command,
    runtime_values: &BTreeMap<String, String>,
    caller: &CallerContext<'_>,
    config: &dyn ConfigStore,
) -> Result<ResolvedCommand> {
    log_op_start!(
        OP_RESOLVE,
        command = %command.name,
        request_id = %caller.request.request_id,
        trace_id = caller.request.trace_str()
    );
    let start = std::time::Instant::now();

    let result = resolve_impl(command, runtime_values, caller, config).map_err(|e| {
        log_op_error!(
            OP_RESOLVE,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            command = %command.name,
            request_id = %caller.request.request_id
        );
        e
    })?;

    log_op_end!(
        OP_RESOLVE,
        duration_ms = start.elapsed().as_millis() as u64,
        command = %command.name,
        request_id = %caller.request.request_id
    );

    Ok(result)
}

fn resolve_impl(
    command: &Command,
    runtime_values: &BTreeMap<String, String>,
    caller: &CallerContext<'_>,
    config: &dyn ConfigStore,
) -> Result<ResolvedCommand> {
    let mut cache = CommandJsonCache::new();
    let document = cache.document(command)?;
    let env = Env {
        archive: caller.archive,
        config,
        command_json: document.json(),
    };
    assemble(
        command,
        document.digest(),
        runtime_values,
        &env,
        &ProvidedMounts::new(),
        None,
    )
}

/// Run every resolution pass and build the result
pub(crate) fn assemble(
    command: &Command,
    digest: &str,
    runtime_values: &BTreeMap<String, String>,
    env: &Env<'_>,
    provided: &ProvidedMounts,
    wrapper: Option<WrapperPart>,
) -> Result<ResolvedCommand> {
    let context = inputs::resolve_inputs(&command.inputs, runtime_values, env)?;
    let mounts = mounts::resolve_mounts(&command.mounts, &context, provided)?;
    let outputs = outputs::resolve_outputs(&command.outputs, env.command_json)?;
    let (inputs, command_values) = context.into_parts();

    // Command inputs win over wrapper inputs sharing a replacement key
    let (wrapper, wrapper_inputs, mut values) = match wrapper {
        Some(part) => (Some(part.name), part.inputs, part.values),
        None => (None, BTreeMap::new(), ReplacementValues::default()),
    };
    values.extend(command_values);

    let templates =
        command_line::resolve_templates(command, env.command_json, &values.command_line)?;

    Ok(ResolvedCommand {
        command_id: command.id,
        command_name: command.name.clone(),
        command_digest: digest.to_string(),
        wrapper,
        image: command.image.clone(),
        command_type: command.command_type.clone(),
        working_directory: templates.working_directory,
        command_line: templates.command_line,
        environment_variables: templates.environment_variables,
        ports: templates.ports,
        mounts,
        outputs,
        inputs,
        replacement_values: values.raw,
        wrapper_inputs,
    })
}
