//! Value document collection over an entity and its owned references.

use crate::error::{DiffError, Result};
use auditrail_config::{ConfigurationResolver, EntityAuditConfiguration, SerializerOptions};
use auditrail_types::{
    EntityState, EntryId, ModificationType, OwnedReference, PropertyEntry, TrackedEntitySnapshot,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Original and updated value documents of one entity.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ValueMaps {
    pub original: Map<String, Value>,
    pub updated: Map<String, Value>,
}

impl ValueMaps {
    fn is_empty(&self) -> bool {
        self.original.is_empty() && self.updated.is_empty()
    }
}

/// Walks one top-level entity and the tree of entities it owns.
///
/// Every entry is visited at most once per walk; reaching an entry a second
/// time means the ownership graph is not a tree and fails the diff.
pub(crate) struct OwnershipWalk<'a> {
    resolver: &'a ConfigurationResolver,
    options: &'a SerializerOptions,
    visited: HashSet<EntryId>,
}

impl<'a> OwnershipWalk<'a> {
    pub fn new(
        resolver: &'a ConfigurationResolver,
        options: &'a SerializerOptions,
        root: &TrackedEntitySnapshot,
    ) -> Self {
        let mut visited = HashSet::new();
        visited.insert(root.entry_id());
        Self {
            resolver,
            options,
            visited,
        }
    }

    /// Collect the value documents of `snapshot` in the given style.
    pub fn collect(
        &mut self,
        snapshot: &TrackedEntitySnapshot,
        config: &EntityAuditConfiguration,
        style: ModificationType,
    ) -> Result<ValueMaps> {
        let mut maps = ValueMaps::default();

        let audited = snapshot
            .properties()
            .iter()
            .filter(|p| !p.is_key && !config.is_ignored(&p.name));

        for property in audited {
            self.collect_property(&mut maps, property, style);
        }

        for reference in snapshot.owned_references() {
            self.merge_owned(&mut maps, snapshot, reference, style)?;
        }

        Ok(maps)
    }

    fn collect_property(&self, maps: &mut ValueMaps, property: &PropertyEntry, style: ModificationType) {
        match style {
            ModificationType::Added => {
                self.insert(&mut maps.original, &property.name, property.current_value.clone());
            }
            ModificationType::Deleted => {
                self.insert(&mut maps.original, &property.name, property.original_value.clone());
            }
            ModificationType::Modified if property.is_modified => {
                self.insert(&mut maps.original, &property.name, property.original_value.clone());
                self.insert(&mut maps.updated, &property.name, property.current_value.clone());
            }
            ModificationType::Modified => {}
        }
    }

    fn merge_owned(
        &mut self,
        maps: &mut ValueMaps,
        owner: &TrackedEntitySnapshot,
        reference: &OwnedReference,
        style: ModificationType,
    ) -> Result<()> {
        let nested = &reference.snapshot;

        if !self.visited.insert(nested.entry_id()) {
            return Err(DiffError::OwnershipCycle {
                table: owner.table_name().to_string(),
                property: reference.property_name.clone(),
                entry: nested.entry_id(),
            });
        }

        if let EntityState::Unrecognized(raw) = nested.state() {
            return Err(DiffError::UnrecognizedState {
                state: raw.clone(),
                table: nested.table_name().to_string(),
            });
        }

        // Owned values belong to the owner's document: only the nested
        // type's ignored properties apply, never its exclusion flag.
        let config = self.resolver.resolve(nested.entity_type());
        let key = &reference.property_name;

        match style {
            ModificationType::Added | ModificationType::Deleted => {
                let values = self.collect(nested, &config, style)?;
                self.insert(&mut maps.original, key, Value::Object(values.original));
            }
            ModificationType::Modified => match nested.state() {
                EntityState::Added => {
                    let values = self.collect(nested, &config, ModificationType::Added)?;
                    self.insert(&mut maps.original, key, Value::Null);
                    self.insert(&mut maps.updated, key, Value::Object(values.original));
                }
                EntityState::Deleted => {
                    let values = self.collect(nested, &config, ModificationType::Deleted)?;
                    self.insert(&mut maps.original, key, Value::Object(values.original));
                    self.insert(&mut maps.updated, key, Value::Null);
                }
                _ => {
                    let values = self.collect(nested, &config, ModificationType::Modified)?;
                    if !values.is_empty() {
                        self.insert(&mut maps.original, key, Value::Object(values.original));
                        self.insert(&mut maps.updated, key, Value::Object(values.updated));
                    }
                }
            },
        }

        Ok(())
    }

    fn insert(&self, map: &mut Map<String, Value>, name: &str, value: Value) {
        if self.options.ignore_null_values && value.is_null() {
            return;
        }
        map.insert(self.options.property_naming.apply(name), value);
    }
}
