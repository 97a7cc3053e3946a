//! Per-entity audit configuration and its builder.

use auditrail_types::{Entity, EntityProperty};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// Resolved audit policy for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityAuditConfiguration {
    ignored_properties: BTreeSet<String>,
    exclude_entity: bool,
}

impl EntityAuditConfiguration {
    pub fn new<I, S>(ignored_properties: I, exclude_entity: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_properties: ignored_properties.into_iter().map(Into::into).collect(),
            exclude_entity,
        }
    }

    /// Configuration of a type nobody configured: nothing ignored, excluded
    /// only when the global policy audits configured types exclusively.
    pub fn unconfigured(only_configured_audited: bool) -> Self {
        Self {
            ignored_properties: BTreeSet::new(),
            exclude_entity: only_configured_audited,
        }
    }

    pub fn ignored_properties(&self) -> &BTreeSet<String> {
        &self.ignored_properties
    }

    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignored_properties.contains(property)
    }

    pub fn exclude_entity(&self) -> bool {
        self.exclude_entity
    }
}

/// Collects the audit rules of entity type `E`.
#[derive(Debug)]
pub struct AuditTypeConfigurationBuilder<E: Entity> {
    ignored_properties: BTreeSet<String>,
    exclude_entity: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> AuditTypeConfigurationBuilder<E> {
    pub fn new() -> Self {
        Self {
            ignored_properties: BTreeSet::new(),
            exclude_entity: false,
            _entity: PhantomData,
        }
    }

    /// Leave a property out of every change record of `E`.
    pub fn ignore_property(&mut self, property: E::Property) -> &mut Self {
        self.ignored_properties.insert(property.name().to_string());
        self
    }

    /// Do not audit `E` at all.
    pub fn exclude_entity(&mut self) -> &mut Self {
        self.exclude_entity = true;
        self
    }

    pub fn build(self) -> EntityAuditConfiguration {
        EntityAuditConfiguration {
            ignored_properties: self.ignored_properties,
            exclude_entity: self.exclude_entity,
        }
    }
}

impl<E: Entity> Default for AuditTypeConfigurationBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditrail_types::audited_entity;

    struct Account;

    audited_entity! {
        Account => AccountProperty { Id, Login, Secret, Notes }
    }

    #[test]
    fn test_ignore_properties_repeatable() {
        let mut builder = AuditTypeConfigurationBuilder::<Account>::new();
        builder
            .ignore_property(AccountProperty::Secret)
            .ignore_property(AccountProperty::Notes)
            .ignore_property(AccountProperty::Secret);

        let config = builder.build();
        assert_eq!(config.ignored_properties().len(), 2);
        assert!(config.is_ignored("Secret"));
        assert!(config.is_ignored("Notes"));
        assert!(!config.is_ignored("Login"));
        assert!(!config.exclude_entity());
    }

    #[test]
    fn test_exclude_entity_idempotent() {
        let mut builder = AuditTypeConfigurationBuilder::<Account>::new();
        builder.exclude_entity().exclude_entity();
        let config = builder.build();
        assert!(config.exclude_entity());
        assert!(config.ignored_properties().is_empty());
    }

    #[test]
    fn test_unconfigured_follows_global_policy() {
        assert!(!EntityAuditConfiguration::unconfigured(false).exclude_entity());
        assert!(EntityAuditConfiguration::unconfigured(true).exclude_entity());
        assert!(EntityAuditConfiguration::unconfigured(true)
            .ignored_properties()
            .is_empty());
    }
}
