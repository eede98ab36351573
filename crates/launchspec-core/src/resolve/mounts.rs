//! Mount resolution: pick a host directory for every declared mount

use std::collections::BTreeMap;

use super::inputs::ResolutionContext;
use crate::archive::Resource;
use crate::errors::{LaunchSpecError, Result};
use crate::model::{InputType, Mount, ResolvedInput, ResolvedMount};

/// Host path a wrapper supplied for a mount that has no input of its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProvidedMount {
    pub host_path: String,
    pub input: String,
}

/// Wrapper-provided host paths by mount name
pub(crate) type ProvidedMounts = BTreeMap<String, ProvidedMount>;

pub(crate) fn resolve_mounts(
    mounts: &[Mount],
    context: &ResolutionContext,
    provided: &ProvidedMounts,
) -> Result<Vec<ResolvedMount>> {
    mounts
        .iter()
        .map(|mount| resolve_mount(mount, context, provided))
        .collect()
}

fn resolve_mount(
    mount: &Mount,
    context: &ResolutionContext,
    provided: &ProvidedMounts,
) -> Result<ResolvedMount> {
    let resolved = |host_path: Option<String>, input: Option<String>| ResolvedMount {
        name: mount.name.clone(),
        writable: mount.writable,
        container_path: mount.path.clone(),
        host_path,
        input,
    };

    let Some(source) = mount.input.as_deref() else {
        return Ok(match provided.get(&mount.name) {
            Some(p) => resolved(Some(p.host_path.clone()), Some(p.input.clone())),
            None => resolved(None, None),
        });
    };

    let input = context.get(source).ok_or_else(|| {
        LaunchSpecError::mount(
            &mount.name,
            format!("source input \"{}\" was not resolved", source),
        )
    })?;

    if input.value.as_deref().map_or(true, |v| v.trim().is_empty()) {
        return Err(LaunchSpecError::mount(
            &mount.name,
            format!("source input \"{}\" has no value", source),
        ));
    }

    let host_path = host_path_for(mount, input)?;
    Ok(resolved(Some(host_path), Some(source.to_string())))
}

/// Host directory holding the files of `input`'s resolved object
///
/// # Errors
///
/// Returns `LaunchSpecError::MountResolution` when the object has no usable
/// directory, has several resources and `mount.resource` picks none of them,
/// or is of a type mounts cannot be made from.
pub(crate) fn host_path_for(mount: &Mount, input: &ResolvedInput) -> Result<String> {
    let fail = |message: String| LaunchSpecError::mount(&mount.name, message);

    let path = match input.input_type {
        InputType::Resource => {
            let resource: Resource = serde_json::from_value(input.snapshot.clone())
                .map_err(|e| fail(format!("input \"{}\" is not a resource: {}", input.name, e)))?;
            resource.directory
        }
        InputType::File => input.value.clone(),
        InputType::Project
        | InputType::Subject
        | InputType::Session
        | InputType::Scan
        | InputType::Assessor => Some(directory_of_resources(mount, input)?),
        InputType::String
        | InputType::Boolean
        | InputType::Number
        | InputType::Config => {
            return Err(fail(format!(
                "don't know how to resolve a mount from input \"{}\" of type {}",
                input.name, input.input_type
            )))
        }
    };

    path.filter(|p| !p.trim().is_empty()).ok_or_else(|| {
        fail(format!(
            "input \"{}\" did not provide a host directory",
            input.name
        ))
    })
}

/// Directory of the one resource to mount from a domain object
fn directory_of_resources(mount: &Mount, input: &ResolvedInput) -> Result<String> {
    let fail = |message: String| LaunchSpecError::mount(&mount.name, message);

    let resources: Vec<Resource> = match input.snapshot.get("resources") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| fail(format!("resources of \"{}\" are malformed: {}", input.name, e)))?,
        None => Vec::new(),
    };

    let chosen = match resources.as_slice() {
        [] => {
            return Err(fail(format!(
                "{} \"{}\" has no resources to mount",
                input.input_type, input.name
            )))
        }
        [only] => only,
        many => {
            let label = mount.resource.as_deref().ok_or_else(|| {
                fail(format!(
                    "{} \"{}\" has {} resources; set the mount's resource label to pick one",
                    input.input_type,
                    input.name,
                    many.len()
                ))
            })?;
            many.iter()
                .find(|r| r.label.as_deref() == Some(label))
                .ok_or_else(|| {
                    fail(format!(
                        "{} \"{}\" has no resource labelled \"{}\"",
                        input.input_type, input.name, label
                    ))
                })?
        }
    };

    chosen.directory.clone().ok_or_else(|| {
        fail(format!(
            "resource \"{}\" has no directory",
            chosen.label.as_deref().or(chosen.id.as_deref()).unwrap_or("")
        ))
    })
}
