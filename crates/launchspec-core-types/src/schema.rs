//! Canonical field keys and event names for structured logging

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Declaration identity
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_WRAPPER: &str = "wrapper";
pub const FIELD_INPUT: &str = "input";
pub const FIELD_INPUT_TYPE: &str = "input_type";
pub const FIELD_MOUNT: &str = "mount";
pub const FIELD_OUTPUT: &str = "output";

// Resolution details
pub const FIELD_VALUE: &str = "value";
pub const FIELD_QUERY: &str = "query";
pub const FIELD_HOST_PATH: &str = "host_path";
pub const FIELD_ERROR_COUNT: &str = "error_count";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operation names
pub const OP_RESOLVE: &str = "resolve";
pub const OP_RESOLVE_WRAPPER: &str = "resolve_wrapper";
pub const OP_VALIDATE: &str = "validate";
