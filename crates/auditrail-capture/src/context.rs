//! Per-unit-of-work record enrichment.

use auditrail_types::{ChangeRecordBuilder, RecordEnricher};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata key holding the acting user.
pub const CREATED_BY: &str = "created_by";
/// Metadata key holding the correlation id.
pub const CORRELATION_ID: &str = "correlation_id";

/// Who and what a unit of work runs on behalf of.
///
/// Stamped into the metadata of every record the unit of work produces.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    created_by: Option<String>,
    correlation_id: Option<String>,
    metadata: BTreeMap<String, Value>,
}

impl AuditContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acting user.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }

    /// Set the correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add a metadata value.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Serialize `value` and add it as metadata.
    pub fn with_serialized_metadata(
        self,
        key: impl Into<String>,
        value: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_value(value)?;
        Ok(self.with_metadata(key, json))
    }

    pub fn actor(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

impl RecordEnricher for AuditContext {
    fn enrich(&self, mut builder: ChangeRecordBuilder) -> ChangeRecordBuilder {
        if let Some(actor) = &self.created_by {
            builder = builder.metadata(CREATED_BY, actor.clone());
        }
        if let Some(id) = &self.correlation_id {
            builder = builder.metadata(CORRELATION_ID, id.clone());
        }
        for (key, value) in &self.metadata {
            builder = builder.metadata(key.clone(), value.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditrail_types::{ChangeRecord, ModificationType};
    use serde_json::json;

    #[test]
    fn test_empty_context_adds_nothing() {
        let builder = ChangeRecord::builder("Users", ModificationType::Added);
        let record = AuditContext::new().enrich(builder).build();
        assert!(record.metadata().is_empty());
    }

    #[test]
    fn test_context_stamps_metadata() {
        let context = AuditContext::new()
            .with_actor("alice")
            .with_correlation_id("req-42")
            .with_metadata("tenant", 7);

        let builder = ChangeRecord::builder("Users", ModificationType::Modified);
        let record = context.enrich(builder).build();

        assert_eq!(record.metadata()[CREATED_BY], json!("alice"));
        assert_eq!(record.metadata()[CORRELATION_ID], json!("req-42"));
        assert_eq!(record.metadata()["tenant"], json!(7));
        assert_eq!(context.actor(), Some("alice"));
    }

    #[test]
    fn test_serialized_metadata() {
        let context = AuditContext::new()
            .with_serialized_metadata("roles", &vec!["admin", "auditor"])
            .unwrap();
        let record = context
            .enrich(ChangeRecord::builder("Users", ModificationType::Added))
            .build();
        assert_eq!(record.metadata()["roles"], json!(["admin", "auditor"]));
    }

    #[test]
    fn test_unserializable_metadata_is_an_error() {
        let mut value = std::collections::HashMap::new();
        value.insert((1u8, 2u8), 3u8);

        let result = AuditContext::new().with_serialized_metadata("pairs", &value);
        assert!(result.is_err());
    }
}
