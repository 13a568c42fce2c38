// Store queries: reads and writes for the owned tables.
//
// Every SQL statement against the store lives here. Functions take a plain
// `&Connection`, so they run equally well inside a `Transaction` (which
// derefs to one) or on an in-memory database in tests.

use std::collections::{BTreeSet, HashMap};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::models::{
    DocumentInfoRecord, DocumentVectorRecord, GlobalTermRecord, StoreCounts, TokenWeightRecord,
};
use super::schema::table_exists;
use crate::error::Result;

/// Tokens per `IN (...)` list. Well under SQLite's bound-parameter limit.
const TOKEN_BATCH_SIZE: usize = 500;

// --- Document vectors ---

/// Insert or replace a document's `file_token` row.
pub fn upsert_document_vector(conn: &Connection, record: &DocumentVectorRecord) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO file_token (file_name, total_tokens, unique_tokens, relational_distance)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![
        record.document_id,
        record.total_tokens,
        record.unique_tokens,
        record.norm,
    ])?;
    Ok(())
}

/// Insert or replace token weight rows.
pub fn upsert_token_weights(conn: &Connection, records: &[TokenWeightRecord]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO relation_distance (file_name, token, frequency, relational_distance)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for record in records {
        stmt.execute(params![
            record.document_id,
            record.token,
            record.frequency,
            record.weight,
        ])?;
    }
    Ok(())
}

/// Remove every stored weight for the given documents.
///
/// Re-ingestion replaces a document's vector wholesale, so tokens that no
/// longer pass the filter must not linger from the previous run.
pub fn delete_token_weights(conn: &Connection, document_ids: &[&str]) -> Result<()> {
    let mut stmt = conn.prepare_cached("DELETE FROM relation_distance WHERE file_name = ?1")?;
    for id in document_ids {
        stmt.execute(params![id])?;
    }
    Ok(())
}

/// Remove the vector row and every weight for the given documents.
pub fn delete_document_vectors(conn: &Connection, document_ids: &[&str]) -> Result<()> {
    delete_token_weights(conn, document_ids)?;
    let mut stmt = conn.prepare_cached("DELETE FROM file_token WHERE file_name = ?1")?;
    for id in document_ids {
        stmt.execute(params![id])?;
    }
    Ok(())
}

/// Load a document's `file_token` row by key.
pub fn get_document_vector(
    conn: &Connection,
    document_id: &str,
) -> Result<Option<DocumentVectorRecord>> {
    let record = conn
        .query_row(
            "SELECT file_name, total_tokens, unique_tokens, relational_distance
             FROM file_token WHERE file_name = ?1",
            params![document_id],
            |row| {
                Ok(DocumentVectorRecord {
                    document_id: row.get(0)?,
                    total_tokens: row.get(1)?,
                    unique_tokens: row.get(2)?,
                    norm: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

/// All stored weights for one document, ordered by token.
pub fn token_weights_for(conn: &Connection, document_id: &str) -> Result<Vec<TokenWeightRecord>> {
    let mut stmt = conn.prepare(
        "SELECT file_name, token, frequency, relational_distance
         FROM relation_distance WHERE file_name = ?1
         ORDER BY token",
    )?;
    let rows = stmt.query_map(params![document_id], |row| {
        Ok(TokenWeightRecord {
            document_id: row.get(0)?,
            token: row.get(1)?,
            frequency: row.get(2)?,
            weight: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Stored weights for the given tokens, grouped by document key then token.
///
/// Only rows whose token is in `tokens` are read, so the cost follows the
/// size of the query rather than the corpus. Tokens are always bound as
/// parameters, never spliced into the SQL text.
pub fn token_weights_in(
    conn: &Connection,
    tokens: &BTreeSet<String>,
) -> Result<HashMap<String, HashMap<String, f64>>> {
    let mut weights: HashMap<String, HashMap<String, f64>> = HashMap::new();
    let tokens: Vec<&String> = tokens.iter().collect();

    for batch in tokens.chunks(TOKEN_BATCH_SIZE) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!(
            "SELECT file_name, token, relational_distance
             FROM relation_distance WHERE token IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(batch.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;
        for row in rows {
            let (document_id, token, weight) = row?;
            weights.entry(document_id).or_default().insert(token, weight);
        }
    }

    Ok(weights)
}

// --- Document info ---

/// Insert or replace a `file_info` row.
pub fn upsert_document_info(conn: &Connection, record: &DocumentInfoRecord) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO file_info (id, file_name, file_path, epoch_time, chunk_count, starting_id, ending_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        record.id,
        record.file_name,
        record.file_path,
        record.modified_epoch,
        record.chunk_count,
        record.starting_chunk_id,
        record.ending_chunk_id,
    ])?;
    Ok(())
}

/// Load a `file_info` row by id.
pub fn get_document_info(conn: &Connection, id: &str) -> Result<Option<DocumentInfoRecord>> {
    let record = conn
        .query_row(
            "SELECT id, file_name, file_path, epoch_time, chunk_count, starting_id, ending_id
             FROM file_info WHERE id = ?1",
            params![id],
            |row| {
                Ok(DocumentInfoRecord {
                    id: row.get(0)?,
                    file_name: row.get(1)?,
                    file_path: row.get(2)?,
                    modified_epoch: row.get(3)?,
                    chunk_count: row.get(4)?,
                    starting_chunk_id: row.get(5)?,
                    ending_chunk_id: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

/// Every `(id, file_name)` pair, in insertion order.
///
/// Rows with a NULL id or name are skipped.
pub fn list_documents(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT id, file_name FROM file_info ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, Option<String>>(1)?,
        ))
    })?;

    let mut documents = Vec::new();
    for row in rows {
        if let (Some(id), Some(file_name)) = row? {
            documents.push((id, file_name));
        }
    }
    Ok(documents)
}

// --- Global terms ---

/// Insert or replace global term rows.
pub fn upsert_global_terms(conn: &Connection, records: &[GlobalTermRecord]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO global_terms (term, count, frequency) VALUES (?1, ?2, ?3)",
    )?;
    for record in records {
        stmt.execute(params![record.term, record.count, record.frequency])?;
    }
    Ok(())
}

/// Global terms, most frequent first.
pub fn top_global_terms(conn: &Connection, limit: u32) -> Result<Vec<GlobalTermRecord>> {
    let mut stmt = conn.prepare(
        "SELECT term, count, frequency FROM global_terms
         ORDER BY count DESC, term ASC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(GlobalTermRecord {
            term: row.get(0)?,
            count: row.get(1)?,
            frequency: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

// --- Counts ---

/// Rows per owned table. Missing tables count as empty.
pub fn counts(conn: &Connection) -> Result<StoreCounts> {
    Ok(StoreCounts {
        documents: count_rows(conn, "file_token")?,
        token_weights: count_rows(conn, "relation_distance")?,
        document_info: count_rows(conn, "file_info")?,
        global_terms: count_rows(conn, "global_terms")?,
    })
}

fn count_rows(conn: &Connection, table: &'static str) -> Result<i64> {
    if !table_exists(conn, table)? {
        return Ok(0);
    }
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
