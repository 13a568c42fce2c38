// Pipelines: the top-level ingestion, metadata and global-term runs.
//
// Each run scans its inputs, applies the per-document failure policy, and
// hands the surviving records to the store as a single batch.

pub mod global_terms;
pub mod ingest;
pub mod observer;
pub mod resources;
