//! Configuration sources.
//!
//! A source is written against one statically known entity type by
//! implementing [`AuditConfiguration`]. The store keeps sources behind the
//! type-erased [`ConfigurationSource`], keyed by [`EntityType`].

use crate::builder::{AuditTypeConfigurationBuilder, EntityAuditConfiguration};
use auditrail_types::{Entity, EntityType};
use std::marker::PhantomData;

/// Audit rules for entity type `E`.
///
/// ```
/// use auditrail_config::{AuditConfiguration, AuditTypeConfigurationBuilder};
/// use auditrail_types::audited_entity;
///
/// pub struct User;
/// audited_entity! { User => UserProperty { Id, Name, Password } }
///
/// struct UserAuditConfiguration;
///
/// impl AuditConfiguration<User> for UserAuditConfiguration {
///     fn configure(&self, builder: &mut AuditTypeConfigurationBuilder<User>) {
///         builder.ignore_property(UserProperty::Password);
///     }
/// }
/// ```
pub trait AuditConfiguration<E: Entity>: Send + Sync + 'static {
    fn configure(&self, builder: &mut AuditTypeConfigurationBuilder<E>);
}

impl<E, F> AuditConfiguration<E> for F
where
    E: Entity,
    F: Fn(&mut AuditTypeConfigurationBuilder<E>) + Send + Sync + 'static,
{
    fn configure(&self, builder: &mut AuditTypeConfigurationBuilder<E>) {
        self(builder)
    }
}

/// Type-erased configuration source.
pub trait ConfigurationSource: Send + Sync {
    /// Entity type this source configures.
    fn entity_type(&self) -> EntityType;

    /// Run the source against a fresh builder.
    fn build_configuration(&self) -> EntityAuditConfiguration;
}

struct TypedSource<E, C> {
    configuration: C,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C> ConfigurationSource for TypedSource<E, C>
where
    E: Entity,
    C: AuditConfiguration<E>,
{
    fn entity_type(&self) -> EntityType {
        EntityType::of::<E>()
    }

    fn build_configuration(&self) -> EntityAuditConfiguration {
        let mut builder = AuditTypeConfigurationBuilder::<E>::new();
        self.configuration.configure(&mut builder);
        builder.build()
    }
}

/// Erase an [`AuditConfiguration`] into a registrable source.
pub fn source<E, C>(configuration: C) -> Box<dyn ConfigurationSource>
where
    E: Entity,
    C: AuditConfiguration<E>,
{
    Box::new(TypedSource::<E, C> {
        configuration,
        _entity: PhantomData,
    })
}
