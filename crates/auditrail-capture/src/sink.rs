//! Destinations for change records.

use auditrail_types::ChangeRecord;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Failure to accept a change record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("change record sink is full")]
    Full,

    #[error("change record sink is closed")]
    Closed,

    #[error("change record rejected: {0}")]
    Rejected(String),
}

/// Receives change records in submission order.
///
/// Hosts typically implement this over the same transaction that persists
/// the audited changes.
pub trait ChangeRecordSink {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError>;

    /// Append a whole unit of work, all or nothing: on error no record of
    /// `records` may remain in the sink. Returns the number appended.
    ///
    /// The default appends one record at a time and is only all-or-nothing
    /// for sinks whose `append` cannot fail after a first success (for
    /// example a transaction the host rolls back on error). Other sinks
    /// must override it.
    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        let count = records.len();
        for record in records {
            self.append(record)?;
        }
        Ok(count)
    }
}

impl ChangeRecordSink for Vec<ChangeRecord> {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }

    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        let count = records.len();
        self.extend(records);
        Ok(count)
    }
}

impl<S: ChangeRecordSink + ?Sized> ChangeRecordSink for &mut S {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError> {
        (**self).append(record)
    }

    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        (**self).append_all(records)
    }
}

impl<S: ChangeRecordSink + ?Sized> ChangeRecordSink for Box<S> {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError> {
        (**self).append(record)
    }

    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        (**self).append_all(records)
    }
}

/// In-memory sink, mostly useful in tests and for hosts that flush records
/// themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ChangeRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take every stored record, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.records)
    }
}

impl ChangeRecordSink for MemorySink {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }

    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        self.records.append_all(records)
    }
}

/// Sink feeding a bounded channel, for hosts that persist records on a
/// separate task.
///
/// Appending never blocks: a full or closed channel fails the append.
/// [`ChangeRecordSink::append_all`] reserves a slot for every record before
/// sending any of them.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<ChangeRecord>,
}

impl ChannelSink {
    /// Create a sink and the receiving half of its channel.
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<ChangeRecord>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender.
    pub fn from_sender(sender: mpsc::Sender<ChangeRecord>) -> Self {
        Self { sender }
    }

    /// Check if the receiving side is still alive.
    pub fn is_healthy(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Get approximate buffer usage.
    pub fn buffer_usage(&self) -> f64 {
        let capacity = self.sender.capacity();
        let max_capacity = self.sender.max_capacity();
        1.0 - (capacity as f64 / max_capacity as f64)
    }
}

impl ChangeRecordSink for ChannelSink {
    fn append(&mut self, record: ChangeRecord) -> Result<(), SinkError> {
        let id = record.id();
        match self.sender.try_send(record) {
            Ok(()) => {
                debug!(record = %id, "change record queued");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(record = %id, "change record channel full");
                Err(SinkError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(record = %id, "change record channel closed");
                Err(SinkError::Closed)
            }
        }
    }

    fn append_all(&mut self, records: Vec<ChangeRecord>) -> Result<usize, SinkError> {
        let mut permits = Vec::with_capacity(records.len());
        for _ in 0..records.len() {
            match self.sender.try_reserve() {
                Ok(permit) => permits.push(permit),
                Err(mpsc::error::TrySendError::Full(())) => {
                    warn!(needed = records.len(), reserved = permits.len(), "change record channel full");
                    return Err(SinkError::Full);
                }
                Err(mpsc::error::TrySendError::Closed(())) => {
                    error!("change record channel closed");
                    return Err(SinkError::Closed);
                }
            }
        }

        let count = records.len();
        for (permit, record) in permits.into_iter().zip(records) {
            permit.send(record);
        }
        debug!(records = count, "change records queued");
        Ok(count)
    }
}
