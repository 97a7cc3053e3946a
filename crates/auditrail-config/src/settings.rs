//! Process-wide audit settings.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How property names are written into value documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyNaming {
    /// Keep names as declared.
    #[default]
    AsIs,
    /// `FirstName` becomes `firstName`.
    CamelCase,
    /// `FirstName` becomes `first_name`.
    SnakeCase,
}

impl PropertyNaming {
    /// Apply the policy to a property name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::AsIs => name.to_string(),
            Self::CamelCase => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Self::SnakeCase => {
                let mut out = String::with_capacity(name.len() + 4);
                let mut prev_lower_or_digit = false;
                for c in name.chars() {
                    if c.is_uppercase() {
                        if prev_lower_or_digit {
                            out.push('_');
                        }
                        out.extend(c.to_lowercase());
                        prev_lower_or_digit = false;
                    } else {
                        out.push(c);
                        prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
                    }
                }
                out
            }
        }
    }
}

/// Options for encoding value documents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Indent encoded documents.
    pub pretty: bool,
    /// Naming policy for object keys.
    pub property_naming: PropertyNaming,
    /// Drop members whose value is `null`.
    pub ignore_null_values: bool,
}

/// Audit policy shared by every unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Encoding of value documents.
    pub serializer: SerializerOptions,
    /// Audit only entity types with a registered configuration.
    pub only_configured_audited: bool,
}

impl AuditSettings {
    /// Create a settings builder.
    pub fn builder() -> AuditSettingsBuilder {
        AuditSettingsBuilder::default()
    }
}

/// Builder for [`AuditSettings`].
#[derive(Debug, Default)]
pub struct AuditSettingsBuilder {
    settings: AuditSettings,
}

impl AuditSettingsBuilder {
    /// Set the serializer options.
    pub fn serializer_options(mut self, options: SerializerOptions) -> Self {
        self.settings.serializer = options;
        self
    }

    /// Audit only configured entity types.
    pub fn only_configured_audited(mut self, only_configured: bool) -> Self {
        self.settings.only_configured_audited = only_configured;
        self
    }

    pub fn build(self) -> AuditSettings {
        self.settings
    }
}

/// Shared handle to the current [`AuditSettings`].
///
/// Settings are replaced wholesale; readers get the value that was current
/// when they asked. Set them during startup, before diff traffic begins.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<AuditSettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: AuditSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Current settings.
    pub fn get(&self) -> Arc<AuditSettings> {
        self.current.read().clone()
    }

    /// Replace the settings.
    pub fn set(&self, settings: AuditSettings) {
        let only_configured_audited = settings.only_configured_audited;
        *self.current.write() = Arc::new(settings);
        tracing::debug!(only_configured_audited, "audit settings replaced");
    }
}
