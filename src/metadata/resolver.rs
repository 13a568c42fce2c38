// Metadata resolver: per-file chunk statistics and modification times.
//
// The chunk table (`pdf_chunks`) is written upstream by the text extractor,
// one row per chunk, keyed by the source file path. We only ever read it.
// A file with no chunks, or a database where the chunk table hasn't been
// created yet, resolves to zeros rather than an error.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::warn;

use super::identity::create_id;
use crate::db::models::DocumentInfoRecord;
use crate::db::schema::table_exists;
use crate::error::{Error, Result};

/// Name of the upstream chunk table.
pub const CHUNK_TABLE: &str = "pdf_chunks";

/// Returned by [`modified_epoch`] when the file can't be stat'ed.
pub const EPOCH_UNKNOWN: i64 = -1;

/// Chunk count and id range for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkStats {
    pub chunk_count: i64,
    pub starting_id: i64,
    pub ending_id: i64,
}

/// Look up a file's chunk statistics by its chunk-table key.
pub fn chunk_stats(conn: &Connection, chunk_key: &str) -> Result<ChunkStats> {
    if !table_exists(conn, CHUNK_TABLE)? {
        return Ok(ChunkStats::default());
    }

    let stats = conn.query_row(
        "SELECT COUNT(chunk_index), COALESCE(MIN(id), 0), COALESCE(MAX(id), 0)
         FROM pdf_chunks WHERE file_name = ?1",
        params![chunk_key],
        |row| {
            Ok(ChunkStats {
                chunk_count: row.get(0)?,
                starting_id: row.get(1)?,
                ending_id: row.get(2)?,
            })
        },
    )?;
    Ok(stats)
}

/// The key the chunk table uses for a file.
///
/// Legacy stores were written on Windows and record paths with
/// backslashes; `legacy_backslashes` reproduces that.
pub fn chunk_key(path: &Path, legacy_backslashes: bool) -> String {
    let key = path.to_string_lossy().into_owned();
    if legacy_backslashes {
        key.replace('/', "\\")
    } else {
        key
    }
}

/// A file's last-modified time in seconds since the Unix epoch.
pub fn try_modified_epoch(path: &Path) -> Result<i64> {
    let modified: SystemTime = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified).timestamp())
}

/// Like [`try_modified_epoch`], but logs and returns [`EPOCH_UNKNOWN`]
/// on failure so one unreadable file doesn't stop a metadata run.
pub fn modified_epoch(path: &Path) -> i64 {
    match try_modified_epoch(path) {
        Ok(epoch) => epoch,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read modification time");
            EPOCH_UNKNOWN
        }
    }
}

/// Build the `file_info` row for a source file.
pub fn resolve_document_info(
    conn: &Connection,
    path: &Path,
    legacy_backslashes: bool,
) -> Result<DocumentInfoRecord> {
    let file_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_path = chunk_key(path, legacy_backslashes);
    let modified_epoch = modified_epoch(path);
    let stats = chunk_stats(conn, &file_path)?;

    let id = create_id(
        &file_path,
        modified_epoch,
        stats.chunk_count,
        stats.starting_id,
    );

    Ok(DocumentInfoRecord {
        id,
        file_name,
        file_path,
        modified_epoch,
        chunk_count: stats.chunk_count,
        starting_chunk_id: stats.starting_id,
        ending_chunk_id: stats.ending_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn_with_chunks() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE pdf_chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_name TEXT,
                chunk_index INTEGER,
                chunk_text TEXT
            );
            INSERT INTO pdf_chunks (file_name, chunk_index, chunk_text) VALUES
                ('books\\a.pdf', 0, 'one'),
                ('books\\b.pdf', 0, 'uno'),
                ('books\\a.pdf', 1, 'two'),
                ('books\\a.pdf', 2, 'three');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_chunk_stats_for_known_file() {
        let conn = conn_with_chunks();
        let stats = chunk_stats(&conn, "books\\a.pdf").unwrap();
        assert_eq!(
            stats,
            ChunkStats {
                chunk_count: 3,
                starting_id: 1,
                ending_id: 4,
            }
        );
    }

    #[test]
    fn test_chunk_stats_unknown_file_is_zero() {
        let conn = conn_with_chunks();
        assert_eq!(
            chunk_stats(&conn, "books\\missing.pdf").unwrap(),
            ChunkStats::default()
        );
    }

    #[test]
    fn test_chunk_stats_without_chunk_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(chunk_stats(&conn, "a.pdf").unwrap(), ChunkStats::default());
    }

    #[test]
    fn test_chunk_key_legacy_separators() {
        let path = Path::new("books/a.pdf");
        assert_eq!(chunk_key(path, true), "books\\a.pdf");
        assert_eq!(chunk_key(path, false), "books/a.pdf");
    }

    #[test]
    fn test_modified_epoch_missing_file_is_sentinel() {
        assert_eq!(modified_epoch(Path::new("/nonexistent/book.pdf")), EPOCH_UNKNOWN);
        assert!(try_modified_epoch(Path::new("/nonexistent/book.pdf")).is_err());
    }

    #[test]
    fn test_resolve_document_info() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("Deep Work.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let conn = conn_with_chunks();
        let info = resolve_document_info(&conn, &pdf, false).unwrap();

        assert_eq!(info.file_name, "Deep Work");
        assert_eq!(info.chunk_count, 0);
        assert!(info.modified_epoch > 0);
        assert_eq!(
            info.id,
            create_id(&info.file_path, info.modified_epoch, 0, 0)
        );

        // Same inputs, same id
        let again = resolve_document_info(&conn, &pdf, false).unwrap();
        assert_eq!(info.id, again.id);
    }
}
