//! Diagnostic hooks that observe processed events.
//!
//! The engine hands every popped event to an [`EventSink`] before applying its
//! transition. Sinks only observe; nothing they do feeds back into the run.

use crate::simulator::event_queue::{SimEvent, SimEventType};
use crossbeam_channel::Sender;
use serde::Serialize;
use triage_shared::{PatientId, SimTime};

/// One processed event, as reported to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub time: SimTime,
    pub kind: SimEventType,
    pub patient: Option<PatientId>,
}

impl From<&SimEvent> for EventRecord {
    fn from(event: &SimEvent) -> Self {
        Self {
            time: event.timestamp,
            kind: event.event_type,
            patient: event.patient,
        }
    }
}

pub trait EventSink {
    fn record(&mut self, record: &EventRecord);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _record: &EventRecord) {}
}

/// Logs each event at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, record: &EventRecord) {
        match record.patient {
            Some(patient) => tracing::trace!(time = %record.time, kind = %record.kind, %patient, "event"),
            None => tracing::trace!(time = %record.time, kind = %record.kind, "event"),
        }
    }
}

/// In-memory trace of the whole run.
impl EventSink for Vec<EventRecord> {
    fn record(&mut self, record: &EventRecord) {
        self.push(record.clone());
    }
}

/// Event bus: forwards records to whoever holds the receiver. A dropped
/// receiver is not an error, the run just stops publishing.
impl EventSink for Sender<EventRecord> {
    fn record(&mut self, record: &EventRecord) {
        self.send(record.clone()).ok();
    }
}
