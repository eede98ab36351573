use launchspec_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

/// Result type alias using LaunchSpecError
pub type Result<T> = std::result::Result<T, LaunchSpecError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and the CLI) can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Declaration
    InvalidInput,
    ValidationFailed,

    // Resolution
    InputResolution,
    MountResolution,
    AmbiguousResult,
    InvalidQuery,
    NotFound,
    Resolution,

    // Integration
    Io,
    Serialization,
    ExternalService,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::InputResolution => "ERR_INPUT_RESOLUTION",
            ExErrorKind::MountResolution => "ERR_MOUNT_RESOLUTION",
            ExErrorKind::AmbiguousResult => "ERR_AMBIGUOUS_RESULT",
            ExErrorKind::InvalidQuery => "ERR_INVALID_QUERY",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Resolution => "ERR_RESOLUTION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever identity the failing step knew
/// about (operation, command, input, mount) so a caller can build an
/// actionable message.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command: Option<String>,
    input: Option<String>,
    mount: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    errors: Vec<String>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command: None,
            input: None,
            mount: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            errors: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the command being resolved or validated
    pub fn with_command(mut self, name: impl Into<String>) -> Self {
        self.command = Some(name.into());
        self
    }

    /// Add the name of the offending input
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.input = Some(name.into());
        self
    }

    /// Add the name of the offending mount
    pub fn with_mount(mut self, name: impl Into<String>) -> Self {
        self.mount = Some(name.into());
        self
    }

    /// Copy correlation ids from the call context
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.request_id = Some(ctx.request_id.clone());
        self.trace_id = ctx.trace_id.clone();
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a batch of validation messages
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn mount(&self) -> Option<&str> {
        self.mount.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Batched validation messages (empty for every other kind)
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        if let Some(input) = &self.input {
            write!(f, " (input: {})", input)?;
        }
        if let Some(mount) = &self.mount {
            write!(f, " (mount: {})", mount)?;
        }
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Errors raised while validating or resolving a Command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaunchSpecError {
    /// Structural problems found by the validator, all reported together
    #[error("Command \"{command}\" is invalid: {}", errors.join("; "))]
    Validation { command: String, errors: Vec<String> },

    /// One input could not be resolved
    #[error("Input \"{input}\": {message}")]
    InputResolution { input: String, message: String },

    /// One mount could not be resolved
    #[error("Mount \"{mount}\": {message}")]
    MountResolution { mount: String, message: String },

    /// An embedded path query matched more than one value
    #[error("Query \"{query}\" returned {count} results; expected at most one")]
    AmbiguousQuery { query: String, count: usize },

    /// A path query did not parse
    #[error("Invalid path query \"{query}\": {reason}")]
    InvalidQuery { query: String, reason: String },

    /// Any other condition that aborts resolution as a whole
    #[error("Resolution failed: {message}")]
    Resolution { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An archive lookup or configuration store call failed
    #[error("Collaborator failure: {message}")]
    Collaborator { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LaunchSpecError {
    pub(crate) fn input(input: &str, message: impl Into<String>) -> Self {
        LaunchSpecError::InputResolution {
            input: input.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn mount(mount: &str, message: impl Into<String>) -> Self {
        LaunchSpecError::MountResolution {
            mount: mount.to_string(),
            message: message.into(),
        }
    }
}

impl From<LaunchSpecError> for ExError {
    fn from(err: LaunchSpecError) -> Self {
        match err {
            LaunchSpecError::Validation { command, errors } => {
                ExError::new(ExErrorKind::ValidationFailed)
                    .with_command(command)
                    .with_message(format!("{} validation error(s)", errors.len()))
                    .with_errors(errors)
            }

            LaunchSpecError::InputResolution { input, message } => {
                ExError::new(ExErrorKind::InputResolution)
                    .with_input(input)
                    .with_message(message)
            }

            LaunchSpecError::MountResolution { mount, message } => {
                ExError::new(ExErrorKind::MountResolution)
                    .with_mount(mount)
                    .with_message(message)
            }

            LaunchSpecError::AmbiguousQuery { query, count } => {
                ExError::new(ExErrorKind::AmbiguousResult)
                    .with_message(format!("Query \"{}\" returned {} results", query, count))
            }

            LaunchSpecError::InvalidQuery { query, reason } => {
                ExError::new(ExErrorKind::InvalidQuery)
                    .with_message(format!("Invalid path query \"{}\": {}", query, reason))
            }

            LaunchSpecError::Resolution { message } => {
                ExError::new(ExErrorKind::Resolution).with_message(message)
            }

            LaunchSpecError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            LaunchSpecError::Collaborator { message } => {
                ExError::new(ExErrorKind::ExternalService).with_message(message)
            }

            LaunchSpecError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<ExError> for LaunchSpecError {
    fn from(err: ExError) -> Self {
        LaunchSpecError::Collaborator {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LaunchSpecError {
    fn from(err: serde_json::Error) -> Self {
        LaunchSpecError::Serialization {
            message: err.to_string(),
        }
    }
}
