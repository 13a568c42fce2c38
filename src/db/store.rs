// VectorStore: the persisted side of the system.
//
// Holds only the database path. Each public operation opens a fresh
// connection, does its work, and drops the connection on return. Every
// mutating operation runs inside exactly one transaction: if any statement
// fails, the `Transaction` is dropped without commit and SQLite rolls the
// whole batch back.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::models::{
    DocumentInfoRecord, DocumentVectorRecord, GlobalTermRecord, StoreCounts, TokenWeightRecord,
};
use super::{queries, schema};
use crate::error::{Error, Result};
use crate::vector::frequency::FrequencyMap;
use crate::vector::transform::{self, TokenFilter};

#[derive(Debug, Clone)]
pub struct VectorStore {
    db_path: PathBuf,
}

impl VectorStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the store.
    ///
    /// Exposed for read-side collaborators such as the metadata resolver,
    /// which query the upstream chunk table in the same database.
    pub fn connect(&self) -> Result<Connection> {
        super::open(&self.db_path)
    }

    /// Opens a connection tuned for bulk writes.
    fn connect_for_bulk_load(&self) -> Result<Connection> {
        let conn = self.connect()?;
        // Durability is traded for speed; the batch is still atomic
        conn.pragma_update(None, "synchronous", "OFF")?;
        Ok(conn)
    }

    /// Create every owned table. Returns the number of tables in the file.
    pub fn initialize(&self) -> Result<i64> {
        let conn = self.connect()?;
        schema::create_tables(&conn)?;
        schema::table_count(&conn)
    }

    /// Write document vectors and their token weights in one batch.
    ///
    /// With `reset_schema`, both vector tables are dropped and recreated
    /// first. Otherwise each listed document's previous weights are removed
    /// before the new ones are written, so a re-ingested document never
    /// keeps tokens from an earlier run. Documents in `removed` (ingested
    /// before, no vector this run) lose their rows in the same batch.
    pub fn ingest_documents(
        &self,
        vectors: &[DocumentVectorRecord],
        weights: &[TokenWeightRecord],
        removed: &[String],
        reset_schema: bool,
    ) -> Result<()> {
        let mut conn = self.connect_for_bulk_load()?;
        let tx = conn.transaction()?;

        if reset_schema {
            schema::reset_vector_tables(&tx)?;
        } else {
            schema::create_vector_tables(&tx)?;
            let ids: Vec<&str> = vectors.iter().map(|v| v.document_id.as_str()).collect();
            queries::delete_token_weights(&tx, &ids)?;
            let removed: Vec<&str> = removed.iter().map(String::as_str).collect();
            queries::delete_document_vectors(&tx, &removed)?;
        }

        for vector in vectors {
            queries::upsert_document_vector(&tx, vector)?;
        }
        queries::upsert_token_weights(&tx, weights)?;

        tx.commit()?;
        info!(
            documents = vectors.len(),
            token_weights = weights.len(),
            removed = removed.len(),
            reset_schema,
            "Ingested document vectors"
        );
        Ok(())
    }

    /// Write document info rows in one batch.
    pub fn ingest_document_info(
        &self,
        records: &[DocumentInfoRecord],
        reset_schema: bool,
    ) -> Result<()> {
        let mut conn = self.connect_for_bulk_load()?;
        let tx = conn.transaction()?;

        if reset_schema {
            schema::reset_info_table(&tx)?;
        } else {
            schema::create_info_table(&tx)?;
        }

        for record in records {
            queries::upsert_document_info(&tx, record)?;
        }

        tx.commit()?;
        info!(
            documents = records.len(),
            reset_schema,
            "Ingested document info"
        );
        Ok(())
    }

    /// Rebuild `global_terms` from a corpus-wide frequency map.
    ///
    /// Terms are filtered like document tokens; each kept term's frequency
    /// is its count divided by the corpus total. The table is dropped and
    /// rebuilt every run, never merged. A corpus whose total is zero writes
    /// no rows. Returns the number of rows written.
    pub fn rebuild_global_terms(
        &self,
        corpus: &FrequencyMap,
        token_filter: &TokenFilter,
    ) -> Result<usize> {
        let total = transform::sum(corpus) as f64;
        let records: Vec<GlobalTermRecord> = match transform::filter(corpus, token_filter, total) {
            Ok(tokens) => tokens
                .into_iter()
                .map(|t| GlobalTermRecord {
                    term: t.token,
                    count: i64::from(t.frequency),
                    frequency: t.weight,
                })
                .collect(),
            Err(Error::DegenerateVector { .. }) => {
                warn!("Corpus frequency map is empty, global terms will be empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut conn = self.connect_for_bulk_load()?;
        let tx = conn.transaction()?;

        schema::reset_global_terms_table(&tx)?;
        queries::upsert_global_terms(&tx, &records)?;

        tx.commit()?;
        info!(terms = records.len(), "Rebuilt global terms");
        Ok(records.len())
    }

    /// Stored weights for the given tokens: document key → token → weight.
    pub fn query_token_weights(
        &self,
        tokens: &BTreeSet<String>,
    ) -> Result<HashMap<String, HashMap<String, f64>>> {
        if tokens.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "relation_distance")? {
            return Ok(HashMap::new());
        }
        let weights = queries::token_weights_in(&conn, tokens)?;
        debug!(
            tokens = tokens.len(),
            documents = weights.len(),
            "Fetched token weights"
        );
        Ok(weights)
    }

    // Reads never create tables: a store that hasn't been written yet
    // reads as empty.

    /// Every `(id, file_name)` pair from `file_info`, in insertion order.
    pub fn list_documents(&self) -> Result<Vec<(String, String)>> {
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "file_info")? {
            return Ok(Vec::new());
        }
        queries::list_documents(&conn)
    }

    pub fn document_info(&self, id: &str) -> Result<Option<DocumentInfoRecord>> {
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "file_info")? {
            return Ok(None);
        }
        queries::get_document_info(&conn, id)
    }

    pub fn document_vector(&self, document_id: &str) -> Result<Option<DocumentVectorRecord>> {
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "file_token")? {
            return Ok(None);
        }
        queries::get_document_vector(&conn, document_id)
    }

    pub fn token_weights_for(&self, document_id: &str) -> Result<Vec<TokenWeightRecord>> {
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "relation_distance")? {
            return Ok(Vec::new());
        }
        queries::token_weights_for(&conn, document_id)
    }

    pub fn top_global_terms(&self, limit: u32) -> Result<Vec<GlobalTermRecord>> {
        let conn = self.connect()?;
        if !schema::table_exists(&conn, "global_terms")? {
            return Ok(Vec::new());
        }
        queries::top_global_terms(&conn, limit)
    }

    pub fn counts(&self) -> Result<StoreCounts> {
        let conn = self.connect()?;
        queries::counts(&conn)
    }
}
