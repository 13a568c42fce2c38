// Record observers: optional per-record hooks on the write paths.
//
// Diagnostics (like the CSV dumps) hang off these instead of being wired
// into the pipelines, so the store never depends on whether they're on.

use crate::db::models::DocumentInfoRecord;
use crate::vector::transform::DocumentVector;

/// Notified once for every record a pipeline is about to write.
pub trait RecordObserver {
    fn on_document(&mut self, _vector: &DocumentVector) {}

    fn on_document_info(&mut self, _record: &DocumentInfoRecord) {}
}

/// Observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RecordObserver for NullObserver {}

/// Keeps every observed record in memory.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    pub documents: Vec<DocumentVector>,
    pub document_info: Vec<DocumentInfoRecord>,
}

impl RecordObserver for CollectingObserver {
    fn on_document(&mut self, vector: &DocumentVector) {
        self.documents.push(vector.clone());
    }

    fn on_document_info(&mut self, record: &DocumentInfoRecord) {
        self.document_info.push(record.clone());
    }
}
