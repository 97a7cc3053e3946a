//! Sample domain: users owning an address, which owns a building, plus cars
//! and roles as ordinary entities.

use auditrail_config::{AuditConfiguration, AuditTypeConfigurationBuilder, ConfigurationStore};
use auditrail_types::audited_entity;

pub struct User;
pub struct Address;
pub struct Building;
pub struct Car;
pub struct UserRole;

audited_entity! {
    User => UserProperty { Id, Name, Password, AdditionalInformation, CarId }
}

audited_entity! {
    Address => AddressProperty { UserId, City, Street }
}

audited_entity! {
    Building => BuildingProperty { AddressUserId, Name, Number }
}

audited_entity! {
    Car => CarProperty { Id, Name }
}

audited_entity! {
    UserRole => UserRoleProperty { Id, Role, UserId }
}

/// Keeps passwords out of the audit trail.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAuditConfiguration;

impl AuditConfiguration<User> for UserAuditConfiguration {
    fn configure(&self, builder: &mut AuditTypeConfigurationBuilder<User>) {
        builder.ignore_property(UserProperty::Password);
    }
}

/// Store holding the sample domain's registered configurations.
pub fn sample_store() -> ConfigurationStore {
    let mut store = ConfigurationStore::new();
    store.register::<User, _>(UserAuditConfiguration);
    store
}
