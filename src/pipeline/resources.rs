// Document info run.
//
// Resolves chunk statistics, modification time and id for every source
// document, then writes the rows in one batch. Resolution reads the
// upstream chunk table on its own connection, which is closed before the
// write batch opens.

use std::path::PathBuf;

use tracing::info;

use super::observer::RecordObserver;
use crate::config::Config;
use crate::db::models::DocumentInfoRecord;
use crate::db::VectorStore;
use crate::error::Result;
use crate::metadata::resolver::{resolve_document_info, EPOCH_UNKNOWN};
use crate::output::progress_bar;
use crate::vector::frequency::scan_directory;

#[derive(Debug, Default)]
pub struct ResourceReport {
    pub records: Vec<DocumentInfoRecord>,
    /// Files whose modification time couldn't be read (id uses the sentinel).
    pub unknown_mtime: Vec<PathBuf>,
}

/// Resolve and store info for every `.pdf` under `config.resource_dir`.
pub fn run(
    config: &Config,
    store: &VectorStore,
    observer: &mut dyn RecordObserver,
    reset_schema: bool,
    show_progress: bool,
) -> Result<ResourceReport> {
    let files = scan_directory(&config.resource_dir, "pdf")?;
    info!(
        files = files.len(),
        dir = %config.resource_dir.display(),
        "Updating document info"
    );

    let mut report = ResourceReport::default();
    {
        let conn = store.connect()?;
        let pb = progress_bar(files.len() as u64, "  Documents", show_progress);
        for path in &files {
            let record = resolve_document_info(&conn, path, config.legacy_backslash_paths)?;
            if record.modified_epoch == EPOCH_UNKNOWN {
                report.unknown_mtime.push(path.clone());
            }
            observer.on_document_info(&record);
            report.records.push(record);
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    store.ingest_document_info(&report.records, reset_schema)?;
    info!(documents = report.records.len(), "Document info updated");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::CollectingObserver;
    use std::fs;

    #[test]
    fn test_run_resolves_chunks_and_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_data_root(dir.path());
        config.legacy_backslash_paths = false;
        fs::create_dir_all(&config.resource_dir).unwrap();
        let book = config.resource_dir.join("Walden.pdf");
        fs::write(&book, b"%PDF").unwrap();
        fs::write(config.resource_dir.join("notes.txt"), b"x").unwrap();

        let store = VectorStore::new(&config.db_path);
        let key = book.to_string_lossy().into_owned();
        store
            .connect()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TABLE pdf_chunks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    file_name TEXT, chunk_index INTEGER, chunk_text TEXT);
                 INSERT INTO pdf_chunks (file_name, chunk_index, chunk_text)
                    VALUES ('{key}', 0, 'a'), ('{key}', 1, 'b');"
            ))
            .unwrap();

        let mut observer = CollectingObserver::default();
        let report = run(&config, &store, &mut observer, true, false).unwrap();

        assert_eq!(report.records.len(), 1);
        assert!(report.unknown_mtime.is_empty());
        let record = &report.records[0];
        assert_eq!(record.file_name, "Walden");
        assert_eq!(record.chunk_count, 2);
        assert_eq!(record.starting_chunk_id, 1);
        assert_eq!(record.ending_chunk_id, 2);

        assert_eq!(observer.document_info.len(), 1);
        assert_eq!(store.document_info(&record.id).unwrap().as_ref(), Some(record));
        assert_eq!(
            store.list_documents().unwrap(),
            vec![(record.id.clone(), "Walden".to_string())]
        );
    }
}
