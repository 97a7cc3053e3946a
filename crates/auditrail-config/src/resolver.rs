//! Resolution and memoization of per-entity audit configuration.

use crate::builder::EntityAuditConfiguration;
use crate::settings::{AuditSettings, SettingsHandle};
use crate::store::ConfigurationStore;
use auditrail_types::EntityType;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Memo cache of resolved configurations, one entry per entity type.
///
/// Created once at startup and kept for the life of the process. Entries are
/// never replaced or removed: the first value stored for a type is the value
/// every caller observes.
#[derive(Debug, Default)]
pub struct ConfigurationCache {
    entries: DashMap<EntityType, Arc<EntityAuditConfiguration>>,
}

impl ConfigurationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_type: &EntityType) -> Option<Arc<EntityAuditConfiguration>> {
        self.entries.get(entity_type).map(|entry| entry.value().clone())
    }

    /// Store `computed` unless a value is already cached, and return the
    /// cached value.
    pub fn get_or_insert(
        &self,
        entity_type: EntityType,
        computed: EntityAuditConfiguration,
    ) -> Arc<EntityAuditConfiguration> {
        self.entries
            .entry(entity_type)
            .or_insert_with(|| Arc::new(computed))
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves the audit configuration of entity types.
///
/// Cheap to clone; clones share the store, the cache and the settings.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    store: Arc<ConfigurationStore>,
    cache: Arc<ConfigurationCache>,
    settings: SettingsHandle,
}

impl ConfigurationResolver {
    pub fn new(
        store: Arc<ConfigurationStore>,
        cache: Arc<ConfigurationCache>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            store,
            cache,
            settings,
        }
    }

    /// Resolver over `store` with a fresh cache and the given settings.
    pub fn with_settings(store: ConfigurationStore, settings: AuditSettings) -> Self {
        Self::new(
            Arc::new(store),
            Arc::new(ConfigurationCache::new()),
            SettingsHandle::new(settings),
        )
    }

    /// Resolved configuration of `entity_type`.
    ///
    /// Concurrent first calls for the same type may each compute a value, but
    /// only the first one stored is ever returned.
    pub fn resolve(&self, entity_type: EntityType) -> Arc<EntityAuditConfiguration> {
        if let Some(cached) = self.cache.get(&entity_type) {
            trace!(entity = %entity_type, "audit configuration cache hit");
            return cached;
        }

        let computed = match self.store.lookup(&entity_type) {
            Some(source) => source.build_configuration(),
            None => {
                let only_configured = self.settings.get().only_configured_audited;
                EntityAuditConfiguration::unconfigured(only_configured)
            }
        };

        debug!(
            entity = %entity_type,
            configured = self.store.contains(&entity_type),
            excluded = computed.exclude_entity(),
            ignored = computed.ignored_properties().len(),
            "resolved audit configuration"
        );

        self.cache.get_or_insert(entity_type, computed)
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    pub fn cache(&self) -> &ConfigurationCache {
        &self.cache
    }
}
