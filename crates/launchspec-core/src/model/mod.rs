//! Command declarations and their resolved forms

pub mod command;
pub mod input;
pub mod mount;
pub mod output;
pub mod resolved;
pub mod wrapper;

pub use command::{Command, CommandType};
pub use input::{Input, InputType};
pub use mount::Mount;
pub use output::Output;
pub use resolved::{ResolvedCommand, ResolvedInput, ResolvedMount, ResolvedOutput};
pub use wrapper::{OutputHandler, Wrapper, WrapperInput, HANDLER_TYPES};
