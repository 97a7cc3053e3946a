//! Tracked entity states and audited modification types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// State of a tracked entity at the moment the unit of work commits.
///
/// Hosts usually map their change tracker's states directly. States coming
/// from an untyped source (a raw code or string) that match none of the known
/// states are kept as [`EntityState::Unrecognized`] so the diff engine can
/// refuse them instead of dropping the mutation. Parsing is case-insensitive
/// and never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EntityState {
    /// Not tracked.
    Detached,
    /// Tracked, no pending change.
    Unchanged,
    /// Marked for deletion.
    Deleted,
    /// One or more properties changed.
    Modified,
    /// New entity, not yet persisted.
    Added,
    /// A state this crate does not know about.
    #[strum(default)]
    Unrecognized(String),
}

impl EntityState {
    /// Whether the state is one that produces an audit record.
    pub fn is_auditable(&self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }

    /// Whether the state is known to this crate.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

/// Kind of change stored in a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
pub enum ModificationType {
    Added,
    Modified,
    Deleted,
}

impl ModificationType {
    /// Whether records of this kind carry an `updated_values` document.
    pub fn has_updated_values(&self) -> bool {
        matches!(self, Self::Modified)
    }
}

/// Raised when converting a non-auditable state into a modification type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("state {state} is not an auditable modification")]
pub struct NotAuditable {
    pub state: EntityState,
}

impl TryFrom<&EntityState> for ModificationType {
    type Error = NotAuditable;

    fn try_from(state: &EntityState) -> Result<Self, Self::Error> {
        match state {
            EntityState::Added => Ok(Self::Added),
            EntityState::Modified => Ok(Self::Modified),
            EntityState::Deleted => Ok(Self::Deleted),
            other => Err(NotAuditable {
                state: other.clone(),
            }),
        }
    }
}

impl From<ModificationType> for EntityState {
    fn from(kind: ModificationType) -> Self {
        match kind {
            ModificationType::Added => Self::Added,
            ModificationType::Modified => Self::Modified,
            ModificationType::Deleted => Self::Deleted,
        }
    }
}
