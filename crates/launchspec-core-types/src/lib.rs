//! Types shared by the launchspec error and logging facilities
//!
//! - **Correlation**: `RequestId`, `TraceId` and the `RequestContext` carried by a resolution call
//! - **Redaction**: `Sensitive<T>` for values of inputs flagged `sensitive`
//! - **Schema**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use sensitive::{redact_if, Sensitive};
