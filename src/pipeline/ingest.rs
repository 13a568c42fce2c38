// Document vector ingestion.
//
// Reads every frequency map in the token JSON directory, turns each into a
// document vector, and writes all of them to the store in one batch.
//
// Failure policy, per document:
//   - unreadable or malformed file → recorded as failed, batch continues
//   - zero-norm vector             → recorded as skipped, its stored rows
//                                    are removed in the same batch
//   - any store error              → whole batch rolls back, error returned

use std::path::PathBuf;

use tracing::{info, warn};

use super::observer::RecordObserver;
use crate::config::Config;
use crate::db::VectorStore;
use crate::error::{Error, Result};
use crate::output::progress_bar;
use crate::vector::frequency::{document_id_for, load_frequency_map, scan_directory};
use crate::vector::transform::DocumentVector;

/// What happened to each input file.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Document keys written to the store.
    pub ingested: Vec<String>,
    /// Document keys whose vector had zero norm. Any rows stored for them
    /// by an earlier run are removed.
    pub skipped: Vec<String>,
    /// Files that couldn't be read or parsed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Ingest every `.json` frequency map under `config.token_json_dir`.
pub fn run(
    config: &Config,
    store: &VectorStore,
    observer: &mut dyn RecordObserver,
    reset_schema: bool,
    show_progress: bool,
) -> Result<IngestReport> {
    let files = scan_directory(&config.token_json_dir, "json")?;
    info!(
        files = files.len(),
        dir = %config.token_json_dir.display(),
        "Computing relational distance"
    );

    let mut report = IngestReport::default();
    let mut vectors = Vec::with_capacity(files.len());
    let mut weights = Vec::new();

    let pb = progress_bar(files.len() as u64, "  Vectors", show_progress);
    for path in &files {
        let document_id = document_id_for(path);
        let outcome = load_frequency_map(path)
            .and_then(|map| DocumentVector::compute(&document_id, &map, &config.ingest_filter));

        match outcome {
            Ok(vector) => {
                observer.on_document(&vector);
                vectors.push(vector.vector_record());
                weights.extend(vector.weight_records());
                report.ingested.push(document_id);
            }
            Err(Error::DegenerateVector { .. }) => {
                warn!(document = document_id, "Frequency map has zero norm, skipping");
                report.skipped.push(document_id);
            }
            Err(e) if e.is_per_document() => {
                warn!(path = %path.display(), error = %e, "Failed to load frequency map, skipping");
                report.failed.push((path.clone(), e.to_string()));
            }
            Err(e) => return Err(e),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    store.ingest_documents(&vectors, &weights, &report.skipped, reset_schema)?;

    info!(
        ingested = report.ingested.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Relational distance computed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::CollectingObserver;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Config, VectorStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_root(dir.path());
        fs::create_dir_all(&config.token_json_dir).unwrap();
        let store = VectorStore::new(&config.db_path);
        (dir, config, store)
    }

    #[test]
    fn test_run_reports_each_outcome() {
        let (_dir, config, store) = setup();
        let json = &config.token_json_dir;
        fs::write(json.join("title_good.json"), r#"{"cat": 3, "dog": 4}"#).unwrap();
        fs::write(json.join("title_empty.json"), "{}").unwrap();
        fs::write(json.join("title_broken.json"), "{not json").unwrap();

        let mut observer = CollectingObserver::default();
        let report = run(&config, &store, &mut observer, true, false).unwrap();

        assert_eq!(report.ingested, vec!["title_good"]);
        assert_eq!(report.skipped, vec!["title_empty"]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("title_broken.json"));
        assert!(!report.is_clean());

        assert_eq!(observer.documents.len(), 1);
        let stored = store.document_vector("title_good").unwrap().unwrap();
        assert!((stored.norm - 5.0).abs() < f64::EPSILON);
        assert_eq!(store.token_weights_for("title_good").unwrap().len(), 2);
        assert!(store.document_vector("title_empty").unwrap().is_none());
    }

    #[test]
    fn test_run_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_root(dir.path());
        let store = VectorStore::new(&config.db_path);
        let result = run(&config, &store, &mut CollectingObserver::default(), true, false);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_run_is_idempotent() {
        let (_dir, config, store) = setup();
        fs::write(
            config.token_json_dir.join("title_a.json"),
            r#"{"apple": 5, "pear": 3}"#,
        )
        .unwrap();

        run(&config, &store, &mut CollectingObserver::default(), false, false).unwrap();
        run(&config, &store, &mut CollectingObserver::default(), false, false).unwrap();

        let counts = store.counts().unwrap();
        assert_eq!(counts.documents, 1);
        assert_eq!(counts.token_weights, 2);
    }
}
