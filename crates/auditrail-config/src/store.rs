//! Registry of configuration sources.

use crate::source::{source, AuditConfiguration, ConfigurationSource};
use auditrail_types::{Entity, EntityType};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Mapping from entity type to its configuration source.
///
/// Fill the store during startup, then share it as `Arc<ConfigurationStore>`
/// with a [`ConfigurationResolver`](crate::ConfigurationResolver). Once
/// shared it can no longer be mutated.
#[derive(Default)]
pub struct ConfigurationStore {
    sources: HashMap<EntityType, Box<dyn ConfigurationSource>>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the configuration of `E`. A later registration for the same
    /// type replaces the earlier one.
    pub fn register<E, C>(&mut self, configuration: C) -> &mut Self
    where
        E: Entity,
        C: AuditConfiguration<E>,
    {
        self.register_source(source::<E, C>(configuration))
    }

    /// Register an already erased source.
    pub fn register_source(&mut self, source: Box<dyn ConfigurationSource>) -> &mut Self {
        let entity_type = source.entity_type();
        if self.sources.insert(entity_type, source).is_some() {
            warn!(entity = %entity_type, "replacing audit configuration");
        } else {
            debug!(entity = %entity_type, "registered audit configuration");
        }
        self
    }

    /// Register a batch of sources. Duplicates resolve to the last one.
    pub fn register_all<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn ConfigurationSource>>,
    {
        for source in sources {
            self.register_source(source);
        }
        self
    }

    pub fn lookup(&self, entity_type: &EntityType) -> Option<&dyn ConfigurationSource> {
        self.sources.get(entity_type).map(|s| s.as_ref())
    }

    pub fn contains(&self, entity_type: &EntityType) -> bool {
        self.sources.contains_key(entity_type)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registered entity types, in no particular order.
    pub fn entity_types(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.sources.keys().copied()
    }
}

impl std::fmt::Debug for ConfigurationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.sources.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuditTypeConfigurationBuilder;
    use auditrail_types::audited_entity;

    struct Ticket;
    struct Comment;

    audited_entity! {
        Ticket => TicketProperty { Id, Title, Body }
    }

    audited_entity! {
        Comment => CommentProperty { Id, Text }
    }

    fn ignore_body(b: &mut AuditTypeConfigurationBuilder<Ticket>) {
        b.ignore_property(TicketProperty::Body);
    }

    fn exclude_ticket(b: &mut AuditTypeConfigurationBuilder<Ticket>) {
        b.exclude_entity();
    }

    #[test]
    fn test_lookup_registered() {
        let mut store = ConfigurationStore::new();
        store.register::<Ticket, _>(ignore_body);

        let ticket = EntityType::of::<Ticket>();
        let found = store.lookup(&ticket).unwrap();
        assert!(found.build_configuration().is_ignored("Body"));
        assert!(store.lookup(&EntityType::of::<Comment>()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut store = ConfigurationStore::new();
        store
            .register::<Ticket, _>(ignore_body)
            .register::<Ticket, _>(exclude_ticket);

        assert_eq!(store.len(), 1);
        let config = store
            .lookup(&EntityType::of::<Ticket>())
            .unwrap()
            .build_configuration();
        assert!(config.exclude_entity());
        assert!(!config.is_ignored("Body"));
    }

    #[test]
    fn test_register_all() {
        let mut store = ConfigurationStore::new();
        store.register_all(vec![
            source::<Ticket, _>(ignore_body),
            source::<Comment, _>(|b: &mut AuditTypeConfigurationBuilder<Comment>| {
                b.ignore_property(CommentProperty::Text);
            }),
        ]);

        assert_eq!(store.len(), 2);
        assert!(store.contains(&EntityType::of::<Ticket>()));
        assert!(store.contains(&EntityType::of::<Comment>()));
        assert_eq!(store.entity_types().count(), 2);
    }
}
