//! Test utilities for auditrail crates.

pub mod domain;
pub mod fixtures;

use auditrail_config::{AuditSettings, ConfigurationResolver, ConfigurationStore};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary settings file with given content.
///
/// Returns the directory holding the file, ready for `SettingsLoader::new`.
pub fn temp_settings(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join(auditrail_config::SETTINGS_FILE);
    std::fs::write(&path, content).expect("Failed to write settings file");
    (dir, path)
}

/// Resolver over the sample domain store with the given settings.
pub fn sample_resolver(settings: AuditSettings) -> ConfigurationResolver {
    ConfigurationResolver::with_settings(domain::sample_store(), settings)
}

/// Resolver with no registered configuration.
pub fn empty_resolver(settings: AuditSettings) -> ConfigurationResolver {
    ConfigurationResolver::with_settings(ConfigurationStore::new(), settings)
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditrail_types::{EntityType, Entity};
    use domain::{Address, Car, User};

    #[test]
    fn test_temp_settings_creation() {
        let (dir, path) = temp_settings("only_configured_audited: true\n");
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "only_configured_audited: true\n");
    }

    #[test]
    fn test_sample_resolver_ignores_password() {
        let resolver = sample_resolver(AuditSettings::default());
        let user = resolver.resolve(EntityType::of::<User>());
        assert!(user.is_ignored("Password"));
        assert!(!user.exclude_entity());
    }

    #[test]
    fn test_sample_store_leaves_other_types_unconfigured() {
        let resolver = sample_resolver(AuditSettings::builder().only_configured_audited(true).build());
        assert!(resolver.resolve(EntityType::of::<Car>()).exclude_entity());
        assert_eq!(Address::NAME, "Address");
    }

    #[test]
    fn test_assert_macros() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(assert_ok!(ok), 3);
        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(assert_err!(err), "boom");
    }
}
