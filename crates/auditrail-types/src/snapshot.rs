//! Read-only views of tracked entity mutations.

use crate::{Entity, EntityState, EntityType, EntryId};
use serde::Serialize;
use serde_json::Value;

/// One property of a tracked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    pub name: String,
    pub original_value: Value,
    pub current_value: Value,
    pub is_modified: bool,
    pub is_key: bool,
}

impl PropertyEntry {
    /// Create an unmodified, non-key property.
    pub fn new(name: impl Into<String>, original_value: Value, current_value: Value) -> Self {
        Self {
            name: name.into(),
            original_value,
            current_value,
            is_modified: false,
            is_key: false,
        }
    }

    /// Create a property from typed values.
    pub fn from_values<T: Serialize + ?Sized>(
        name: impl Into<String>,
        original_value: &T,
        current_value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            name,
            serde_json::to_value(original_value)?,
            serde_json::to_value(current_value)?,
        ))
    }

    /// Mark the property as modified.
    pub fn modified(mut self) -> Self {
        self.is_modified = true;
        self
    }

    /// Mark the property as part of the primary key.
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }
}

/// An owned sub-entity reachable from its owner through `property_name`.
#[derive(Debug, Clone)]
pub struct OwnedReference {
    pub property_name: String,
    pub snapshot: TrackedEntitySnapshot,
}

/// Snapshot of one entity participating in a unit of work.
#[derive(Debug, Clone)]
pub struct TrackedEntitySnapshot {
    entry_id: EntryId,
    entity_type: EntityType,
    state: EntityState,
    table_name: String,
    primary_key: String,
    is_owned: bool,
    properties: Vec<PropertyEntry>,
    owned_references: Vec<OwnedReference>,
}

impl TrackedEntitySnapshot {
    /// Start a snapshot of an `E` in the given state.
    pub fn builder<E: Entity>(state: EntityState) -> SnapshotBuilder {
        SnapshotBuilder::new(EntityType::of::<E>(), state)
    }

    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn state(&self) -> &EntityState {
        &self.state
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// String form of the single key column, empty when the entity has zero
    /// or several key columns.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn is_owned(&self) -> bool {
        self.is_owned
    }

    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    pub fn owned_references(&self) -> &[OwnedReference] {
        &self.owned_references
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyEntry> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether any property is flagged as modified.
    pub fn has_modified_properties(&self) -> bool {
        self.properties.iter().any(|p| p.is_modified)
    }
}

/// Builder for [`TrackedEntitySnapshot`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    entry_id: Option<EntryId>,
    entity_type: EntityType,
    state: EntityState,
    table_name: Option<String>,
    primary_key: Option<String>,
    is_owned: bool,
    properties: Vec<PropertyEntry>,
    owned_references: Vec<OwnedReference>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new(entity_type: EntityType, state: EntityState) -> Self {
        Self {
            entry_id: None,
            entity_type,
            state,
            table_name: None,
            primary_key: None,
            is_owned: false,
            properties: Vec::new(),
            owned_references: Vec::new(),
        }
    }

    /// Use the host's tracker identity instead of a fresh one.
    pub fn entry_id(mut self, id: EntryId) -> Self {
        self.entry_id = Some(id);
        self
    }

    /// Set the table name (defaults to the entity type name).
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the primary key string (defaults to the single key property).
    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    /// Flag the snapshot as an owned entity.
    pub fn owned(mut self, is_owned: bool) -> Self {
        self.is_owned = is_owned;
        self
    }

    /// Add a property.
    pub fn property(mut self, entry: PropertyEntry) -> Self {
        self.properties.push(entry);
        self
    }

    /// Add a key property.
    pub fn key(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.property(PropertyEntry::new(name, value.clone(), value).key())
    }

    /// Add an unmodified property.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.property(PropertyEntry::new(name, value.clone(), value))
    }

    /// Add a modified property.
    pub fn changed(
        self,
        name: impl Into<String>,
        original: impl Into<Value>,
        current: impl Into<Value>,
    ) -> Self {
        self.property(PropertyEntry::new(name, original.into(), current.into()).modified())
    }

    /// Attach an owned sub-entity. The nested snapshot is flagged as owned.
    pub fn owns(mut self, property_name: impl Into<String>, snapshot: TrackedEntitySnapshot) -> Self {
        let mut snapshot = snapshot;
        snapshot.is_owned = true;
        self.owned_references.push(OwnedReference {
            property_name: property_name.into(),
            snapshot,
        });
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> TrackedEntitySnapshot {
        let primary_key = self
            .primary_key
            .unwrap_or_else(|| single_key_value(&self.properties));

        TrackedEntitySnapshot {
            entry_id: self.entry_id.unwrap_or_else(EntryId::next),
            table_name: self
                .table_name
                .unwrap_or_else(|| self.entity_type.name().to_string()),
            entity_type: self.entity_type,
            state: self.state,
            primary_key,
            is_owned: self.is_owned,
            properties: self.properties,
            owned_references: self.owned_references,
        }
    }
}

fn single_key_value(properties: &[PropertyEntry]) -> String {
    let mut keys = properties.iter().filter(|p| p.is_key);
    match (keys.next(), keys.next()) {
        (Some(key), None) => match &key.current_value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => String::new(),
    }
}
