//! Entity snapshot and change record types for auditrail.

mod entity;
mod id;
mod record;
mod snapshot;
mod state;

pub use entity::{Entity, EntityProperty, EntityType};
pub use id::{ChangeRecordId, EntryId};
pub use record::{ChangeRecord, ChangeRecordBuilder, NoEnrichment, RecordEnricher};
pub use snapshot::{OwnedReference, PropertyEntry, SnapshotBuilder, TrackedEntitySnapshot};
pub use state::{EntityState, ModificationType, NotAuditable};
