// CSV diagnostic dumps, as a record observer.
//
// Writes data_dumper.csv (one row per document vector), token_filter.csv
// (one row per kept token) and data_info.csv (one row per document info
// record) under the processed data directory. Files are truncated the first
// time a run writes to them. A write failure is logged once and turns that
// dump off; it never reaches the store.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::warn;

use crate::db::models::DocumentInfoRecord;
use crate::pipeline::observer::RecordObserver;
use crate::vector::transform::DocumentVector;

const VECTOR_HEADER: [&str; 4] = ["Path", "Sum", "Unique Tokens", "Relational Distance"];
const TOKEN_HEADER: [&str; 4] = ["Path", "Token", "Frequency", "Relational Distance"];
const INFO_HEADER: [&str; 7] = [
    "ID",
    "File Name",
    "File Path",
    "Epoch Time",
    "Chunk Count",
    "Starting ID",
    "Ending ID",
];

/// One lazily opened CSV file.
enum Dump {
    Closed(PathBuf),
    Open(Writer<File>),
    Failed,
}

impl Dump {
    fn new(path: PathBuf) -> Self {
        Self::Closed(path)
    }

    /// Open on first use, then write `row`.
    fn write<I, T>(&mut self, header: &[&str], row: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let opened = match self {
            Dump::Closed(path) => Some(match open_with_header(path, header) {
                Ok(writer) => Dump::Open(writer),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to open CSV dump, disabling it");
                    Dump::Failed
                }
            }),
            _ => None,
        };
        if let Some(next) = opened {
            *self = next;
        }

        if let Dump::Open(writer) = self {
            if let Err(e) = writer.write_record(row) {
                warn!(error = %e, "Failed to write CSV dump row, disabling it");
                *self = Dump::Failed;
            }
        }
    }

    fn flush(&mut self) {
        if let Dump::Open(writer) = self {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "Failed to flush CSV dump");
            }
        }
    }
}

fn open_with_header(path: &Path, header: &[&str]) -> csv::Result<Writer<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = Writer::from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

/// Dumps every observed record to CSV files in `dir`.
pub struct CsvDumpObserver {
    vectors: Dump,
    tokens: Dump,
    info: Dump,
}

impl CsvDumpObserver {
    pub fn new(dir: &Path) -> Self {
        Self {
            vectors: Dump::new(dir.join("data_dumper.csv")),
            tokens: Dump::new(dir.join("token_filter.csv")),
            info: Dump::new(dir.join("data_info.csv")),
        }
    }

    /// Flush all open dumps. Also happens on drop.
    pub fn flush(&mut self) {
        self.vectors.flush();
        self.tokens.flush();
        self.info.flush();
    }
}

impl RecordObserver for CsvDumpObserver {
    fn on_document(&mut self, vector: &DocumentVector) {
        self.vectors.write(
            &VECTOR_HEADER,
            [
                vector.document_id.clone(),
                vector.total_tokens.to_string(),
                vector.unique_tokens.to_string(),
                vector.norm.to_string(),
            ],
        );
        for token in &vector.tokens {
            self.tokens.write(
                &TOKEN_HEADER,
                [
                    vector.document_id.clone(),
                    token.token.clone(),
                    token.frequency.to_string(),
                    token.weight.to_string(),
                ],
            );
        }
    }

    fn on_document_info(&mut self, record: &DocumentInfoRecord) {
        self.info.write(
            &INFO_HEADER,
            [
                record.id.clone(),
                record.file_name.clone(),
                record.file_path.clone(),
                record.modified_epoch.to_string(),
                record.chunk_count.to_string(),
                record.starting_chunk_id.to_string(),
                record.ending_chunk_id.to_string(),
            ],
        );
    }
}

impl Drop for CsvDumpObserver {
    fn drop(&mut self) {
        self.flush();
    }
}
