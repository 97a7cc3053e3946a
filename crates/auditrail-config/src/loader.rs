//! Settings file loading and parsing.

use crate::settings::AuditSettings;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file name looked up in the configuration directory.
pub const SETTINGS_FILE: &str = "auditrail.yaml";

/// Environment variable names.
pub mod vars {
    pub const ONLY_CONFIGURED_AUDITED: &str = "AUDITRAIL_ONLY_CONFIGURED_AUDITED";
    pub const PRETTY_JSON: &str = "AUDITRAIL_PRETTY_JSON";
}

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read settings: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Loads [`AuditSettings`] from `auditrail.yaml`.
pub struct SettingsLoader {
    base_path: PathBuf,
}

impl SettingsLoader {
    /// Create a loader for the given configuration directory.
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: config_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.base_path.join(SETTINGS_FILE)
    }

    /// Load settings, falling back to defaults when no file exists.
    /// Environment overrides are applied in both cases.
    pub fn load(&self) -> Result<AuditSettings, ConfigError> {
        let path = self.settings_path();

        let settings = if path.exists() {
            self.load_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            AuditSettings::default()
        };

        apply_env_overrides(settings)
    }

    /// Load settings from an explicit file, which must exist.
    pub fn load_file(&self, path: &Path) -> Result<AuditSettings, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let expanded = expand_env_vars(&contents)?;

        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Save settings to the settings file.
    pub fn save(&self, settings: &AuditSettings) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.base_path)?;

        let yaml = serde_yaml::to_string(settings).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(self.settings_path(), yaml)?;
        Ok(())
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| ConfigError::ParseError {
        line: None,
        message: e.to_string(),
    })?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match cap.get(2) {
                Some(default) => default.as_str().to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}

fn apply_env_overrides(mut settings: AuditSettings) -> Result<AuditSettings, ConfigError> {
    if let Some(only_configured) = env_bool(vars::ONLY_CONFIGURED_AUDITED)? {
        settings.only_configured_audited = only_configured;
    }
    if let Some(pretty) = env_bool(vars::PRETTY_JSON)? {
        settings.serializer.pretty = pretty;
    }
    Ok(settings)
}

fn env_bool(var: &str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => match value.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            }),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyNaming;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // `load` reads the override variables; tests touching them serialize here.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_overrides<F: FnOnce()>(set: &[(&str, &str)], f: F) {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let keys = [vars::ONLY_CONFIGURED_AUDITED, vars::PRETTY_JSON];
        let saved: Vec<_> = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for key in keys {
            std::env::remove_var(key);
        }
        for (key, value) in set {
            std::env::set_var(key, value);
        }

        f();

        for (key, value) in saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        with_overrides(&[], || {
            let dir = tempdir().unwrap();
            let loader = SettingsLoader::new(dir.path());
            assert_eq!(loader.load().unwrap(), AuditSettings::default());
        });
    }

    #[test]
    fn test_load_applies_env_overrides_to_defaults() {
        with_overrides(
            &[(vars::ONLY_CONFIGURED_AUDITED, "true"), (vars::PRETTY_JSON, "1")],
            || {
                let dir = tempdir().unwrap();
                let settings = SettingsLoader::new(dir.path()).load().unwrap();
                assert!(settings.only_configured_audited);
                assert!(settings.serializer.pretty);
            },
        );
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        with_overrides(&[(vars::ONLY_CONFIGURED_AUDITED, "false")], || {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join(SETTINGS_FILE),
                "only_configured_audited: true\nserializer:\n  pretty: true\n",
            )
            .unwrap();

            let settings = SettingsLoader::new(dir.path()).load().unwrap();
            assert!(!settings.only_configured_audited);
            assert!(settings.serializer.pretty);
        });
    }

    #[test]
    fn test_invalid_override_fails_load() {
        with_overrides(&[(vars::PRETTY_JSON, "sometimes")], || {
            let dir = tempdir().unwrap();
            let err = SettingsLoader::new(dir.path()).load().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == vars::PRETTY_JSON));
        });
    }

    #[test]
    fn test_load_file_requires_existing_file() {
        let dir = tempdir().unwrap();
        let loader = SettingsLoader::new(dir.path());
        let settings = loader.load_file(&loader.settings_path());
        assert!(matches!(settings, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_settings_from_yaml_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"
only_configured_audited: true
serializer:
  pretty: true
  property_naming: snake_case
"#,
        )
        .unwrap();

        let loader = SettingsLoader::new(dir.path());
        let settings = loader.load_file(&loader.settings_path()).unwrap();

        assert!(settings.only_configured_audited);
        assert!(settings.serializer.pretty);
        assert_eq!(settings.serializer.property_naming, PropertyNaming::SnakeCase);
        assert!(!settings.serializer.ignore_null_values);
    }

    #[test]
    fn test_invalid_yaml_reports_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "serializer: [unclosed").unwrap();

        let loader = SettingsLoader::new(dir.path());
        let err = loader.load_file(&loader.settings_path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("AUDITRAIL_TEST_NAMING", "camel_case");
        let result = expand_env_vars("property_naming: ${AUDITRAIL_TEST_NAMING}").unwrap();
        assert_eq!(result, "property_naming: camel_case");
        std::env::remove_var("AUDITRAIL_TEST_NAMING");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("pretty: ${AUDITRAIL_NONEXISTENT:-false}").unwrap();
        assert_eq!(result, "pretty: false");
    }

    #[test]
    fn test_env_var_missing_error() {
        match expand_env_vars("pretty: ${AUDITRAIL_MISSING_VAR}").unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "AUDITRAIL_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let loader = SettingsLoader::new(dir.path().join("nested"));
        let settings = AuditSettings::builder().only_configured_audited(true).build();

        loader.save(&settings).unwrap();
        let reloaded = loader.load_file(&loader.settings_path()).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_env_bool_values() {
        std::env::set_var("AUDITRAIL_TEST_BOOL", "yes");
        assert_eq!(env_bool("AUDITRAIL_TEST_BOOL").unwrap(), Some(true));
        std::env::set_var("AUDITRAIL_TEST_BOOL", "0");
        assert_eq!(env_bool("AUDITRAIL_TEST_BOOL").unwrap(), Some(false));
        std::env::set_var("AUDITRAIL_TEST_BOOL", "maybe");
        assert!(matches!(
            env_bool("AUDITRAIL_TEST_BOOL"),
            Err(ConfigError::InvalidValue { .. })
        ));
        std::env::remove_var("AUDITRAIL_TEST_BOOL");
        assert_eq!(env_bool("AUDITRAIL_TEST_BOOL").unwrap(), None);
    }
}
