//! Wrapper resolution
//!
//! A wrapper's inputs resolve first, from the caller's runtime values. Their
//! values then feed the Command's inputs (`provides-value-for-command-input`)
//! and supply host paths for mounts with no input of their own
//! (`provides-files-for-command-mount`) before the Command itself resolves.

use launchspec_core_types::schema::OP_RESOLVE_WRAPPER;
use std::collections::BTreeMap;

use super::inputs::{resolve_inputs, ResolutionContext};
use super::mounts::{host_path_for, ProvidedMount, ProvidedMounts};
use super::{assemble, CallerContext, Env, WrapperPart};
use crate::collaborators::ConfigStore;
use crate::errors::{LaunchSpecError, Result};
use crate::model::{Command, Input, ResolvedCommand, Wrapper};
use crate::template::CommandJsonCache;
use crate::{log_op_end, log_op_error, log_op_start};

/// Resolve `command` through its wrapper named `wrapper_name`
///
/// `runtime_values` are keyed by wrapper input name for wrapper inputs and by
/// command input name for command inputs. A value the wrapper provides for a
/// command input is used unless the caller gave that command input a value
/// directly. A key that also names a wrapper input counts as the wrapper
/// input's value, not as a direct one.
///
/// # Errors
///
/// Returns `LaunchSpecError::Resolution` for an unknown wrapper or a wrapper
/// input naming an unknown command input or mount, and any error `resolve`
/// can return.
pub fn resolve_wrapper(
    command: &Command,
    wrapper_name: &str,
    runtime_values: &BTreeMap<String, String>,
    caller: &CallerContext<'_>,
    config: &dyn ConfigStore,
) -> Result<ResolvedCommand> {
    log_op_start!(
        OP_RESOLVE_WRAPPER,
        command = %command.name,
        wrapper = %wrapper_name,
        request_id = %caller.request.request_id,
        trace_id = caller.request.trace_str()
    );
    let start = std::time::Instant::now();

    let result = resolve_wrapper_impl(command, wrapper_name, runtime_values, caller, config)
        .map_err(|e| {
            log_op_error!(
                OP_RESOLVE_WRAPPER,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                command = %command.name,
                wrapper = %wrapper_name,
                request_id = %caller.request.request_id
            );
            e
        })?;

    log_op_end!(
        OP_RESOLVE_WRAPPER,
        duration_ms = start.elapsed().as_millis() as u64,
        command = %command.name,
        wrapper = %wrapper_name,
        request_id = %caller.request.request_id
    );

    Ok(result)
}

fn resolve_wrapper_impl(
    command: &Command,
    wrapper_name: &str,
    runtime_values: &BTreeMap<String, String>,
    caller: &CallerContext<'_>,
    config: &dyn ConfigStore,
) -> Result<ResolvedCommand> {
    let wrapper = command
        .wrapper(wrapper_name)
        .ok_or_else(|| LaunchSpecError::Resolution {
            message: format!(
                "command \"{}\" has no wrapper \"{}\"",
                command.name, wrapper_name
            ),
        })?;

    let mut cache = CommandJsonCache::new();
    let document = cache.document(command)?;
    let env = Env {
        archive: caller.archive,
        config,
        command_json: document.json(),
    };

    let wrapper_inputs: Vec<Input> = wrapper.inputs().map(|i| i.to_input()).collect();
    let context = resolve_inputs(&wrapper_inputs, runtime_values, &env)?;

    let command_values = command_runtime_values(command, wrapper, &context, runtime_values)?;
    let provided = provided_mounts(command, wrapper, &context)?;
    let (inputs, values) = context.into_parts();

    assemble(
        command,
        document.digest(),
        &command_values,
        &env,
        &provided,
        Some(WrapperPart {
            name: wrapper.name.clone(),
            inputs,
            values,
        }),
    )
}

/// Caller values plus the values wrapper inputs provide for command inputs
fn command_runtime_values(
    command: &Command,
    wrapper: &Wrapper,
    context: &ResolutionContext,
    runtime_values: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut values = runtime_values.clone();
    for source in wrapper.inputs() {
        let Some(target) = source.provides_value_for_command_input.as_deref() else {
            continue;
        };
        if command.input(target).is_none() {
            return Err(LaunchSpecError::Resolution {
                message: format!(
                    "wrapper input \"{}\" provides a value for unknown command input \"{}\"",
                    source.name, target
                ),
            });
        }
        let direct = runtime_values.contains_key(target)
            && !wrapper.inputs().any(|i| i.name == target);
        if direct {
            continue;
        }
        if let Some(value) = context.get(&source.name).and_then(|r| r.value.clone()) {
            values.insert(target.to_string(), value);
        }
    }
    Ok(values)
}

/// Host paths for command mounts fed directly by wrapper inputs
fn provided_mounts(
    command: &Command,
    wrapper: &Wrapper,
    context: &ResolutionContext,
) -> Result<ProvidedMounts> {
    let mut provided = ProvidedMounts::new();
    for source in wrapper.inputs() {
        let Some(target) = source.provides_files_for_command_mount.as_deref() else {
            continue;
        };
        let mount = command
            .mount(target)
            .ok_or_else(|| LaunchSpecError::Resolution {
                message: format!(
                    "wrapper input \"{}\" provides files for unknown command mount \"{}\"",
                    source.name, target
                ),
            })?;
        if mount.input.is_some() {
            tracing::debug!(
                mount = %mount.name,
                input = %source.name,
                "mount has its own source input; wrapper-provided files ignored"
            );
            continue;
        }
        let Some(resolved) = context.get(&source.name).filter(|r| r.value.is_some()) else {
            continue;
        };
        provided.insert(
            mount.name.clone(),
            ProvidedMount {
                host_path: host_path_for(mount, resolved)?,
                input: source.name.clone(),
            },
        );
    }
    Ok(provided)
}
