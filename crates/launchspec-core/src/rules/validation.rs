//! Structural validation of Command declarations
//!
//! Runs once when a Command is authored, never during resolution. Every
//! problem is reported; nothing short-circuits.

use launchspec_core_types::schema::OP_VALIDATE;

use crate::model::{
    Command, CommandType, Mount, Output, OutputHandler, Wrapper, WrapperInput, HANDLER_TYPES,
};
use crate::{log_op_end, log_op_start};

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Names seen so far in one scope, in declaration order
#[derive(Default)]
struct NameSet<'a> {
    names: Vec<&'a str>,
}

impl<'a> NameSet<'a> {
    /// Record `name`; false if it was already present
    fn insert(&mut self, name: &'a str) -> bool {
        if self.contains(name) {
            false
        } else {
            self.names.push(name);
            true
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.names.contains(&name)
    }

    fn joined(&self) -> String {
        self.names.join(", ")
    }
}

/// Validate a Command declaration
///
/// Returns every structural problem found, in a stable order; an empty list
/// means the declaration is valid.
pub fn validate(command: &Command) -> Vec<String> {
    log_op_start!(OP_VALIDATE, command = %command.name);
    let start = std::time::Instant::now();

    let errors = find_command_errors(command);

    log_op_end!(
        OP_VALIDATE,
        duration_ms = start.elapsed().as_millis() as u64,
        command = %command.name,
        error_count = errors.len() as u64
    );
    errors
}

fn find_command_errors(command: &Command) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&command.name) {
        errors.push("Command name cannot be blank.".to_string());
    }
    let prefix = format!("Command \"{}\" - ", command.name);
    if is_blank(&command.image) {
        errors.push(format!("{}image name cannot be blank.", prefix));
    }

    match command.kind() {
        Some(CommandType::Docker) => errors.extend(find_docker_errors(command, &prefix)),
        Some(CommandType::DockerSetup) => {
            errors.extend(find_auxiliary_errors(command, &prefix, "Setup"))
        }
        Some(CommandType::DockerWrapup) => {
            errors.extend(find_auxiliary_errors(command, &prefix, "Wrapup"))
        }
        None => errors.push(format!(
            "{}Cannot validate command of type \"{}\". Known types: {}",
            prefix,
            command.command_type,
            CommandType::known_names()
        )),
    }

    errors
}

fn mount_errors(mount: &Mount) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&mount.name) {
        errors.push("Mount name cannot be blank.".to_string());
    }
    if is_blank(&mount.path) {
        errors.push(format!("Mount \"{}\" path cannot be blank.", mount.name));
    }
    errors
}

fn output_errors(output: &Output) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&output.name) {
        errors.push("Output name cannot be blank.".to_string());
    }
    if is_blank(&output.mount) {
        errors.push(format!("Output \"{}\" - mount cannot be blank.", output.name));
    }
    errors
}

fn wrapper_input_errors(input: &WrapperInput, derived: bool) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&input.name) {
        errors.push("Command wrapper input name cannot be blank.".to_string());
    }
    if derived
        && input
            .derived_from_wrapper_input
            .as_deref()
            .map_or(true, is_blank)
    {
        errors.push(format!(
            "Command wrapper input \"{}\" - property \"derived-from-wrapper-input\" cannot be blank.",
            input.name
        ));
    }
    errors
}

fn handler_errors(handler: &OutputHandler) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&handler.name) {
        errors.push("Command wrapper output - name cannot be blank.".to_string());
    }
    let prefix = format!("Command wrapper output \"{}\" - ", handler.name);
    if is_blank(&handler.accepts_command_output) {
        errors.push(format!("{}property \"accepts-command-output\" cannot be blank.", prefix));
    }
    if is_blank(&handler.as_a_child_of) {
        errors.push(format!("{}property \"as-a-child-of\" cannot be blank.", prefix));
    }
    if !HANDLER_TYPES.contains(&handler.handler_type.as_str()) {
        errors.push(format!(
            "{}Unknown type \"{}\". Known types: {}",
            prefix,
            handler.handler_type,
            HANDLER_TYPES.join(", ")
        ));
    }
    if handler.handler_type == HANDLER_TYPES[0] && handler.label.as_deref().map_or(true, is_blank) {
        errors.push(format!("{}when type = Resource, label cannot be blank.", prefix));
    }
    errors
}

fn find_docker_errors(command: &Command, prefix: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let mut mount_names = NameSet::default();
    for mount in &command.mounts {
        if !mount_names.insert(&mount.name) {
            errors.push(format!("{}mount name \"{}\" is not unique.", prefix, mount.name));
        }
        errors.extend(mount_errors(mount).into_iter().map(|e| format!("{}{}", prefix, e)));
    }

    let mut input_names = NameSet::default();
    for input in &command.inputs {
        if !input_names.insert(&input.name) {
            errors.push(format!("{}input name \"{}\" is not unique.", prefix, input.name));
        }
        if is_blank(&input.name) {
            errors.push(format!("{}Command input name cannot be blank", prefix));
        }
    }

    let mut output_names = NameSet::default();
    for output in &command.outputs {
        if !output_names.insert(&output.name) {
            errors.push(format!("{}output name \"{}\" is not unique.", prefix, output.name));
        }
        if !mount_names.contains(&output.mount) {
            errors.push(format!(
                "{}output \"{}\" references unknown mount \"{}\". Known mounts: {}",
                prefix,
                output.name,
                output.mount,
                mount_names.joined()
            ));
        }
        errors.extend(output_errors(output).into_iter().map(|e| format!("{}{}", prefix, e)));
    }

    let mut wrapper_names = NameSet::default();
    for wrapper in &command.wrappers {
        if !wrapper_names.insert(&wrapper.name) {
            errors.push(format!("{}wrapper name \"{}\" is not unique.", prefix, wrapper.name));
        }
        if is_blank(&wrapper.name) {
            errors.push(format!("{}Command wrapper name cannot be blank.", prefix));
        }
        errors.extend(find_wrapper_errors(wrapper, prefix, &output_names));
    }

    errors
}

fn find_wrapper_errors(
    wrapper: &Wrapper,
    command_prefix: &str,
    output_names: &NameSet<'_>,
) -> Vec<String> {
    let mut errors = Vec::new();
    let prefix = format!("{}wrapper \"{}\" - ", command_prefix, wrapper.name);
    let prefixed = |e: String| format!("{}{}", prefix, e);

    let mut input_names = NameSet::default();
    for external in &wrapper.external_inputs {
        if !input_names.insert(&external.name) {
            errors.push(prefixed(format!(
                "external input name \"{}\" is not unique.",
                external.name
            )));
        }
        errors.extend(wrapper_input_errors(external, false).into_iter().map(prefixed));
    }

    for derived in &wrapper.derived_inputs {
        if !input_names.insert(&derived.name) {
            errors.push(prefixed(format!(
                "derived input name \"{}\" is not unique.",
                derived.name
            )));
        }
        let source = derived.derived_from_wrapper_input.as_deref().unwrap_or("");
        if derived.name == source {
            errors.push(prefixed(format!(
                "derived input \"{}\" is derived from itself.",
                derived.name
            )));
        }
        if !input_names.contains(source) {
            errors.push(prefixed(format!(
                "derived input \"{}\" is derived from an unknown wrapper input \"{}\". Known inputs: {}",
                derived.name,
                source,
                input_names.joined()
            )));
        }
        errors.extend(wrapper_input_errors(derived, true).into_iter().map(prefixed));
    }

    let mut handler_names = NameSet::default();
    let mut handled = NameSet::default();
    for handler in &wrapper.output_handlers {
        if output_names.contains(&handler.accepts_command_output) {
            handled.insert(&handler.accepts_command_output);
        } else {
            errors.push(prefixed(format!(
                "output handler refers to unknown command output \"{}\". Known outputs: {}.",
                handler.accepts_command_output,
                output_names.joined()
            )));
        }

        if !(input_names.contains(&handler.as_a_child_of)
            || handler_names.contains(&handler.as_a_child_of))
        {
            errors.push(prefixed(format!(
                "output handler does not refer to a known wrapper input or output. \
                 \"as-a-child-of\": \"{}\".\nKnown inputs: {}.\nKnown outputs (so far): {}.",
                handler.as_a_child_of,
                input_names.joined(),
                handler_names.joined()
            )));
        }

        if !handler_names.insert(&handler.name) {
            errors.push(prefixed(format!(
                "output handler name \"{}\" is not unique.",
                handler.name
            )));
        }
        errors.extend(handler_errors(handler).into_iter().map(prefixed));
    }

    for output in &output_names.names {
        if !handled.contains(output) {
            errors.push(prefixed(format!(
                "command output \"{}\" is not handled by any output handler.",
                output
            )));
        }
    }

    errors
}

/// Setup and wrapup containers only stage files; they declare nothing of their own
fn find_auxiliary_errors(command: &Command, prefix: &str, role: &str) -> Vec<String> {
    let declared = [
        ("mounts", !command.mounts.is_empty()),
        ("inputs", !command.inputs.is_empty()),
        ("outputs", !command.outputs.is_empty()),
        ("wrappers", !command.wrappers.is_empty()),
        ("environment variables", !command.environment_variables.is_empty()),
        ("ports", !command.ports.is_empty()),
    ];
    declared
        .iter()
        .filter(|(_, present)| *present)
        .map(|(what, _)| format!("{}{} commands cannot declare any {}.", prefix, role, what))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Input, InputType};

    #[test]
    fn test_name_set() {
        let mut names = NameSet::default();
        assert!(names.insert("a"));
        assert!(names.insert("b"));
        assert!(!names.insert("a"));
        assert_eq!(names.joined(), "a, b");
    }

    #[test]
    fn test_setup_command_declares_nothing() {
        let mut command = Command::new("stage", "busybox");
        command.command_type = "docker-setup".to_string();
        command.inputs.push(Input::new("x", InputType::String));
        command.ports.insert("80".to_string(), "8080".to_string());

        let errors = validate(&command);
        assert_eq!(
            errors,
            vec![
                "Command \"stage\" - Setup commands cannot declare any inputs.".to_string(),
                "Command \"stage\" - Setup commands cannot declare any ports.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_type() {
        let mut command = Command::new("foo", "busybox");
        command.command_type = "singularity".to_string();
        let errors = validate(&command);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Known types: docker, docker-setup, docker-wrapup"));
    }
}
