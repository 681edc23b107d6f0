/// Identifier of a work item within a single run.
///
/// Bulk runs assign identifiers positionally (`0..N`); the registration
/// variant uses whatever the caller passed to `add_task`.
pub type TaskId = u64;
