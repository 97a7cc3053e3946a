//! Audit settings and per-entity audit configuration for auditrail.
//!
//! Startup registers one [`AuditConfiguration`] per entity type that needs
//! rules into a [`ConfigurationStore`], picks the process-wide
//! [`AuditSettings`] and hands both to a [`ConfigurationResolver`]. From then
//! on the resolver answers, for any entity type, which properties to ignore
//! and whether to skip the type entirely.
//!
//! ```
//! use auditrail_config::{
//!     AuditConfiguration, AuditSettings, AuditTypeConfigurationBuilder, ConfigurationResolver,
//!     ConfigurationStore,
//! };
//! use auditrail_types::{audited_entity, EntityType};
//!
//! pub struct User;
//! audited_entity! { User => UserProperty { Id, Name, Password } }
//!
//! struct UserAuditConfiguration;
//!
//! impl AuditConfiguration<User> for UserAuditConfiguration {
//!     fn configure(&self, builder: &mut AuditTypeConfigurationBuilder<User>) {
//!         builder.ignore_property(UserProperty::Password);
//!     }
//! }
//!
//! let mut store = ConfigurationStore::new();
//! store.register::<User, _>(UserAuditConfiguration);
//!
//! let resolver = ConfigurationResolver::with_settings(store, AuditSettings::default());
//! assert!(resolver.resolve(EntityType::of::<User>()).is_ignored("Password"));
//! ```

pub mod builder;
pub mod loader;
pub mod resolver;
pub mod settings;
pub mod source;
pub mod store;

pub use builder::{AuditTypeConfigurationBuilder, EntityAuditConfiguration};
pub use loader::{ConfigError, SettingsLoader, SETTINGS_FILE};
pub use resolver::{ConfigurationCache, ConfigurationResolver};
pub use settings::{AuditSettings, AuditSettingsBuilder, PropertyNaming, SerializerOptions, SettingsHandle};
pub use source::{source, AuditConfiguration, ConfigurationSource};
pub use store::ConfigurationStore;
