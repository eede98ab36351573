//! Redaction for values of inputs flagged `sensitive`
//!
//! Passwords and tokens reach the engine as ordinary runtime values. Anything
//! that logs a resolved value goes through `Sensitive<T>` or `redact_if` so the
//! plain text never reaches a log line.

use std::fmt;

pub const REDACTED: &str = "***REDACTED***";

/// Wrapper that prints as `***REDACTED***` under both `Debug` and `Display`
///
/// ```
/// use launchspec_core_types::Sensitive;
///
/// let token = Sensitive::new("hunter2");
/// assert_eq!(format!("{}", token), "***REDACTED***");
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), &"hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the plain value. Never pass the result to a logging macro.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Render `value` for a log line, redacted when `sensitive` is set
pub fn redact_if(sensitive: bool, value: &str) -> String {
    if sensitive {
        Sensitive::new(value).to_string()
    } else {
        value.to_string()
    }
}
