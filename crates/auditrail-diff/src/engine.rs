//! The diff engine.

use crate::encode::encode;
use crate::error::{DiffError, Result};
use crate::values::OwnershipWalk;
use auditrail_config::ConfigurationResolver;
use auditrail_types::{
    ChangeRecord, EntityState, ModificationType, NoEnrichment, RecordEnricher, TrackedEntitySnapshot,
};
use tracing::{debug, trace};

/// Turns tracked entity snapshots into change records.
///
/// The engine holds no state of its own besides the resolver, so one engine
/// can serve any number of concurrent units of work.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    resolver: ConfigurationResolver,
}

impl DiffEngine {
    pub fn new(resolver: ConfigurationResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ConfigurationResolver {
        &self.resolver
    }

    /// Diff one snapshot.
    ///
    /// Returns `Ok(None)` for snapshots that are not audited: unchanged or
    /// detached entities, owned entities (they are folded into their owner's
    /// record) and entity types excluded by configuration.
    pub fn process(&self, snapshot: &TrackedEntitySnapshot) -> Result<Option<ChangeRecord>> {
        self.process_with(snapshot, &NoEnrichment)
    }

    /// Diff one snapshot, letting `enricher` decorate the record.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(table = %snapshot.table_name(), state = %snapshot.state())
    )]
    pub fn process_with<R>(
        &self,
        snapshot: &TrackedEntitySnapshot,
        enricher: &R,
    ) -> Result<Option<ChangeRecord>>
    where
        R: RecordEnricher + ?Sized,
    {
        let modification = match snapshot.state() {
            EntityState::Added => ModificationType::Added,
            EntityState::Modified => ModificationType::Modified,
            EntityState::Deleted => ModificationType::Deleted,
            EntityState::Unchanged | EntityState::Detached => {
                trace!("entity not modified, skipping");
                return Ok(None);
            }
            EntityState::Unrecognized(raw) => {
                return Err(DiffError::UnrecognizedState {
                    state: raw.clone(),
                    table: snapshot.table_name().to_string(),
                });
            }
        };

        if snapshot.is_owned() {
            trace!("owned entity, audited through its owner");
            return Ok(None);
        }

        let config = self.resolver.resolve(snapshot.entity_type());
        if config.exclude_entity() {
            debug!(entity = %snapshot.entity_type(), "entity type excluded from audit");
            return Ok(None);
        }

        let settings = self.resolver.settings().get();
        let options = &settings.serializer;

        let mut walk = OwnershipWalk::new(&self.resolver, options, snapshot);
        let values = walk.collect(snapshot, &config, modification)?;

        let mut builder = ChangeRecord::builder(snapshot.table_name(), modification)
            .entity_id(snapshot.primary_key())
            .owned(snapshot.is_owned())
            .original_values(encode(values.original, options)?);

        if modification.has_updated_values() {
            builder = builder.updated_values(encode(values.updated, options)?);
        }

        let record = enricher.enrich(builder).build();
        debug!(record = %record.id(), entity_id = %record.entity_id(), "change record produced");

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditrail_config::{AuditSettings, AuditTypeConfigurationBuilder, ConfigurationStore};
    use auditrail_types::{audited_entity, EntryId};
    use serde_json::json;

    struct Note;
    struct Tag;

    audited_entity! {
        Note => NoteProperty { Id, Title, Draft }
    }

    audited_entity! {
        Tag => TagProperty { Label, Secret }
    }

    fn engine(store: ConfigurationStore) -> DiffEngine {
        DiffEngine::new(ConfigurationResolver::with_settings(store, AuditSettings::default()))
    }

    #[test]
    fn test_added_snapshot() {
        let snapshot = TrackedEntitySnapshot::builder::<Note>(EntityState::Added)
            .key("Id", 5)
            .value("Title", "hello")
            .build();

        let record = engine(ConfigurationStore::new()).process(&snapshot).unwrap().unwrap();
        assert_eq!(record.modification_type(), ModificationType::Added);
        assert_eq!(record.entity_id(), "5");
        assert_eq!(record.table_name(), "Note");
        assert_eq!(record.original_json().unwrap(), json!({"Title": "hello"}));
        assert!(record.updated_values().is_none());
    }

    #[test]
    fn test_ignored_property_left_out() {
        let mut store = ConfigurationStore::new();
        store.register::<Note, _>(|b: &mut AuditTypeConfigurationBuilder<Note>| {
            b.ignore_property(NoteProperty::Draft);
        });

        let snapshot = TrackedEntitySnapshot::builder::<Note>(EntityState::Deleted)
            .key("Id", 1)
            .value("Title", "t")
            .value("Draft", "secret")
            .build();

        let record = engine(store).process(&snapshot).unwrap().unwrap();
        assert_eq!(record.original_json().unwrap(), json!({"Title": "t"}));
    }

    #[test]
    fn test_unrecognized_state_fails() {
        let snapshot = TrackedEntitySnapshot::builder::<Note>("Archived".parse().unwrap()).build();
        let err = engine(ConfigurationStore::new()).process(&snapshot).unwrap_err();
        assert!(matches!(err, DiffError::UnrecognizedState { ref state, .. } if state == "Archived"));
    }

    #[test]
    fn test_unrecognized_state_fails_even_when_excluded() {
        let mut store = ConfigurationStore::new();
        store.register::<Note, _>(|b: &mut AuditTypeConfigurationBuilder<Note>| {
            b.exclude_entity();
        });
        let snapshot = TrackedEntitySnapshot::builder::<Note>("???".parse().unwrap()).build();
        assert!(engine(store).process(&snapshot).is_err());
    }

    #[test]
    fn test_owned_snapshot_not_emitted() {
        let snapshot = TrackedEntitySnapshot::builder::<Tag>(EntityState::Added)
            .owned(true)
            .value("Label", "x")
            .build();
        assert!(engine(ConfigurationStore::new()).process(&snapshot).unwrap().is_none());
    }

    #[test]
    fn test_revisited_entry_is_a_cycle() {
        let root_id = EntryId::from_raw(9_001);
        let nested = TrackedEntitySnapshot::builder::<Tag>(EntityState::Added)
            .entry_id(root_id)
            .value("Label", "loop")
            .build();
        let snapshot = TrackedEntitySnapshot::builder::<Note>(EntityState::Added)
            .entry_id(root_id)
            .owns("Tag", nested)
            .build();

        let err = engine(ConfigurationStore::new()).process(&snapshot).unwrap_err();
        match err {
            DiffError::OwnershipCycle { table, property, entry } => {
                assert_eq!(table, "Note");
                assert_eq!(property, "Tag");
                assert_eq!(entry, root_id);
            }
            other => panic!("Expected OwnershipCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_owned_entry_is_rejected() {
        let shared = TrackedEntitySnapshot::builder::<Tag>(EntityState::Added)
            .value("Label", "shared")
            .build();
        let snapshot = TrackedEntitySnapshot::builder::<Note>(EntityState::Added)
            .owns("Primary", shared.clone())
            .owns("Secondary", shared)
            .build();

        let err = engine(ConfigurationStore::new()).process(&snapshot).unwrap_err();
        assert!(matches!(err, DiffError::OwnershipCycle { ref property, .. } if property == "Secondary"));
    }

    fn engine_ignoring_tag_secret() -> DiffEngine {
        let mut store = ConfigurationStore::new();
        store.register::<Tag, _>(|b: &mut AuditTypeConfigurationBuilder<Tag>| {
            b.ignore_property(TagProperty::Secret);
        });
        engine(store)
    }

    #[test]
    fn test_owned_change_to_ignored_property_only_is_dropped() {
        let tag = TrackedEntitySnapshot::builder::<Tag>(EntityState::Modified)
            .value("Label", "red")
            .changed("Secret", "a", "b")
            .build();
        let note = TrackedEntitySnapshot::builder::<Note>(EntityState::Modified)
            .key("Id", 1)
            .owns("Tag", tag)
            .build();

        let record = engine_ignoring_tag_secret().process(&note).unwrap().unwrap();
        assert_eq!(record.original_values(), "{}");
        assert_eq!(record.updated_values(), Some("{}"));
    }

    #[test]
    fn test_owned_change_keeps_audited_properties_only() {
        let tag = TrackedEntitySnapshot::builder::<Tag>(EntityState::Modified)
            .changed("Label", "red", "blue")
            .changed("Secret", "a", "b")
            .build();
        let note = TrackedEntitySnapshot::builder::<Note>(EntityState::Modified)
            .key("Id", 1)
            .owns("Tag", tag)
            .build();

        let record = engine_ignoring_tag_secret().process(&note).unwrap().unwrap();
        assert_eq!(record.original_json().unwrap(), json!({"Tag": {"Label": "red"}}));
        assert_eq!(record.updated_json().unwrap(), Some(json!({"Tag": {"Label": "blue"}})));
    }

    #[test]
    fn test_enricher_adds_metadata() {
        let snapshot = TrackedEntitySnapshot::builder::<Note>(EntityState::Added)
            .value("Title", "x")
            .build();
        let enricher = |b: auditrail_types::ChangeRecordBuilder| b.metadata("created_by", "system");

        let record = engine(ConfigurationStore::new())
            .process_with(&snapshot, &enricher)
            .unwrap()
            .unwrap();
        assert_eq!(record.metadata()["created_by"], json!("system"));
    }
}
