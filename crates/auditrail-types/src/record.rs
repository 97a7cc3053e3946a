//! Change records produced for audited mutations.

use crate::{ChangeRecordId, ModificationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One audit row: the before/after view of a single audited mutation.
///
/// Records are immutable once built. Value documents are stored as encoded
/// JSON text, exactly as they will be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    id: ChangeRecordId,
    table_name: String,
    entity_id: String,
    modification_type: ModificationType,
    original_values: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_values: Option<String>,
    timestamp: DateTime<Utc>,
    is_owned: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl ChangeRecord {
    /// Create a new record builder.
    pub fn builder(
        table_name: impl Into<String>,
        modification_type: ModificationType,
    ) -> ChangeRecordBuilder {
        ChangeRecordBuilder::new(table_name, modification_type)
    }

    pub fn id(&self) -> ChangeRecordId {
        self.id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn modification_type(&self) -> ModificationType {
        self.modification_type
    }

    /// Encoded original values (current values for additions).
    pub fn original_values(&self) -> &str {
        &self.original_values
    }

    /// Encoded updated values, present for modifications only.
    pub fn updated_values(&self) -> Option<&str> {
        self.updated_values.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_owned(&self) -> bool {
        self.is_owned
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Decode the original values document.
    pub fn original_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.original_values)
    }

    /// Decode the updated values document, if any.
    pub fn updated_json(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        self.updated_values
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }
}

/// Builder for constructing change records.
#[derive(Debug)]
pub struct ChangeRecordBuilder {
    table_name: String,
    entity_id: String,
    modification_type: ModificationType,
    original_values: String,
    updated_values: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    is_owned: bool,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl ChangeRecordBuilder {
    /// Create a new builder.
    pub fn new(table_name: impl Into<String>, modification_type: ModificationType) -> Self {
        Self {
            table_name: table_name.into(),
            entity_id: String::new(),
            modification_type,
            original_values: String::from("{}"),
            updated_values: None,
            timestamp: None,
            is_owned: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the entity identifier.
    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = id.into();
        self
    }

    /// Set the encoded original values.
    pub fn original_values(mut self, json: impl Into<String>) -> Self {
        self.original_values = json.into();
        self
    }

    /// Set the encoded updated values.
    pub fn updated_values(mut self, json: impl Into<String>) -> Self {
        self.updated_values = Some(json.into());
        self
    }

    /// Override the timestamp (defaults to build time).
    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// Flag the record as describing an owned entity.
    pub fn owned(mut self, is_owned: bool) -> Self {
        self.is_owned = is_owned;
        self
    }

    /// Add metadata.
    ///
    /// Takes a JSON value so the builder never has to convert, and so never
    /// fails. Serialize richer values with `serde_json::to_value` first.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn modification_type(&self) -> ModificationType {
        self.modification_type
    }

    /// Build the record.
    pub fn build(self) -> ChangeRecord {
        ChangeRecord {
            id: ChangeRecordId::new(),
            table_name: self.table_name,
            entity_id: self.entity_id,
            modification_type: self.modification_type,
            original_values: self.original_values,
            updated_values: self.updated_values,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            is_owned: self.is_owned,
            metadata: self.metadata,
        }
    }
}

/// Host hook that decorates a record before it is finalized.
pub trait RecordEnricher: Send + Sync {
    fn enrich(&self, builder: ChangeRecordBuilder) -> ChangeRecordBuilder;
}

impl<F> RecordEnricher for F
where
    F: Fn(ChangeRecordBuilder) -> ChangeRecordBuilder + Send + Sync,
{
    fn enrich(&self, builder: ChangeRecordBuilder) -> ChangeRecordBuilder {
        self(builder)
    }
}

/// Enricher that leaves records untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl RecordEnricher for NoEnrichment {
    fn enrich(&self, builder: ChangeRecordBuilder) -> ChangeRecordBuilder {
        builder
    }
}
