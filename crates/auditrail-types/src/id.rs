//! Change record and tracker entry identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for a change record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeRecordId(Uuid);

impl ChangeRecordId {
    /// Create a new random record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChangeRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChangeRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chg_{}", self.0)
    }
}

impl fmt::Debug for ChangeRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeRecordId({})", self)
    }
}

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one tracked entry inside a unit of work.
///
/// Snapshot builders allocate a fresh id unless the host maps its own change
/// tracker identity through [`EntryId::from_raw`]. Host and generated ids
/// live in separate namespaces, so `from_raw(n)` never equals a generated id.
/// Two snapshots carrying the same id are the same tracked entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Repr);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Repr {
    Host(u64),
    Generated(u64),
}

impl EntryId {
    /// Allocate a process-unique entry id.
    pub fn next() -> Self {
        Self(Repr::Generated(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Wrap a host-provided tracker identity.
    pub fn from_raw(raw: u64) -> Self {
        Self(Repr::Host(raw))
    }

    /// The host identity, if this id came from [`EntryId::from_raw`].
    pub fn host_id(&self) -> Option<u64> {
        match self.0 {
            Repr::Host(raw) => Some(raw),
            Repr::Generated(_) => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.0, Repr::Generated(_))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Host(raw) => write!(f, "entry#{raw}"),
            Repr::Generated(n) => write!(f, "entry#gen-{n}"),
        }
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Host(raw) => write!(f, "EntryId({raw})"),
            Repr::Generated(n) => write!(f, "EntryId(gen {n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display_prefix() {
        let id = ChangeRecordId::new();
        assert!(id.to_string().starts_with("chg_"));
        assert_eq!(ChangeRecordId::from_uuid(id.as_uuid()), id);
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = EntryId::next();
        let b = EntryId::next();
        assert_ne!(a, b);
        assert!(a.is_generated());
        assert_eq!(a.host_id(), None);
    }

    #[test]
    fn test_host_ids_never_equal_generated_ids() {
        let generated: Vec<_> = (0..16).map(|_| EntryId::next()).collect();
        for raw in 0..64 {
            let host = EntryId::from_raw(raw);
            assert_eq!(host.host_id(), Some(raw));
            assert!(!generated.contains(&host));
        }
    }
}
