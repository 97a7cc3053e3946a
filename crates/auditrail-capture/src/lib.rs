//! Pre-commit change capture for auditrail.
//!
//! The host hands every tracked entity of a unit of work to an
//! [`AuditInterceptor`] right before committing it. The interceptor diffs
//! each snapshot and appends the resulting change records to a
//! [`ChangeRecordSink`], ideally one writing into the same transaction.
//!
//! - Records keep submission order.
//! - All snapshots are diffed before anything reaches the sink, and the
//!   records reach it through one all-or-nothing
//!   [`ChangeRecordSink::append_all`] call.
//! - An [`AuditContext`] stamps actor and correlation metadata into records.
//! - [`ChannelSink`] hands records to another task over a bounded channel.

mod context;
mod interceptor;
mod sink;

pub use context::{AuditContext, CORRELATION_ID, CREATED_BY};
pub use interceptor::{AuditInterceptor, CaptureError};
pub use sink::{ChangeRecordSink, ChannelSink, MemorySink, SinkError};

// Re-export types for convenience
pub use auditrail_diff::{DiffEngine, DiffError};
pub use auditrail_types::{ChangeRecord, EntityState, TrackedEntitySnapshot};
