//! Pre-commit change capture.

use crate::sink::{ChangeRecordSink, SinkError};
use auditrail_common_log::spans::{entity_span, record_error, unit_of_work_span, Timer};
use auditrail_diff::{DiffEngine, DiffError};
use auditrail_types::{ChangeRecord, NoEnrichment, RecordEnricher, TrackedEntitySnapshot};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

/// Failure of a capture pass. Either way the surrounding commit must abort.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Hook run by the host right before it commits a unit of work.
///
/// Cheap to clone; clones share the engine and the enricher.
#[derive(Clone)]
pub struct AuditInterceptor {
    engine: DiffEngine,
    enricher: Arc<dyn RecordEnricher>,
}

impl AuditInterceptor {
    pub fn new(engine: DiffEngine) -> Self {
        Self {
            engine,
            enricher: Arc::new(NoEnrichment),
        }
    }

    /// Decorate every produced record with `enricher`.
    pub fn with_enricher(mut self, enricher: impl RecordEnricher + 'static) -> Self {
        self.enricher = Arc::new(enricher);
        self
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Diff every snapshot in order, stopping at the first failure.
    pub fn collect(&self, snapshots: &[TrackedEntitySnapshot]) -> Result<Vec<ChangeRecord>, CaptureError> {
        let mut records = Vec::with_capacity(snapshots.len());

        for snapshot in snapshots {
            let span = entity_span(snapshot.table_name(), &snapshot.state().to_string());
            let _guard = span.enter();

            match self.engine.process_with(snapshot, self.enricher.as_ref()) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    record_error(&e);
                    error!(error = %e, primary_key = %snapshot.primary_key(), "audit diff failed");
                    return Err(e.into());
                }
            }
        }

        Ok(records)
    }

    /// Capture a unit of work into `sink`.
    ///
    /// Every snapshot is diffed before anything reaches the sink, and records
    /// are handed over in one [`ChangeRecordSink::append_all`] call, so a
    /// failed capture leaves no partial unit of work behind. Returns the
    /// number of appended records.
    pub fn before_commit<S>(&self, snapshots: &[TrackedEntitySnapshot], sink: &mut S) -> Result<usize, CaptureError>
    where
        S: ChangeRecordSink + ?Sized,
    {
        let unit_id = Uuid::new_v4().to_string();
        let span = unit_of_work_span(&unit_id, snapshots.len());
        let _guard = span.enter();
        let timer = Timer::start("before_commit");

        let records = self.collect(snapshots)?;
        let count = sink.append_all(records).map_err(|e| {
            record_error(&e);
            error!(error = %e, "failed to append change records");
            e
        })?;

        span.record("records", count);
        timer.finish();
        debug!(records = count, "unit of work captured");

        Ok(count)
    }
}

impl std::fmt::Debug for AuditInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditInterceptor")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
