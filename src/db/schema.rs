// Store schema: table creation and resets.
//
// Table and column names match the legacy store so an existing database
// keeps working. The chunk table (`pdf_chunks`) is owned upstream and is
// never created or altered here.

use rusqlite::Connection;

use crate::error::Result;

const CREATE_FILE_TOKEN: &str = "
    CREATE TABLE IF NOT EXISTS file_token (
        file_name TEXT PRIMARY KEY,
        total_tokens INTEGER,
        unique_tokens INTEGER,
        relational_distance REAL
    );";

const CREATE_RELATION_DISTANCE: &str = "
    CREATE TABLE IF NOT EXISTS relation_distance (
        file_name TEXT,
        token TEXT,
        frequency INTEGER,
        relational_distance REAL,
        PRIMARY KEY (file_name, token)
    );
    CREATE INDEX IF NOT EXISTS idx_relation_distance_token
        ON relation_distance(token);";

const CREATE_FILE_INFO: &str = "
    CREATE TABLE IF NOT EXISTS file_info (
        id TEXT PRIMARY KEY,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL,
        epoch_time INTEGER NOT NULL,
        chunk_count INTEGER NOT NULL,
        starting_id INTEGER NOT NULL,
        ending_id INTEGER NOT NULL
    );";

const CREATE_GLOBAL_TERMS: &str = "
    CREATE TABLE IF NOT EXISTS global_terms (
        term TEXT PRIMARY KEY,
        count INTEGER,
        frequency REAL
    );";

/// Create every table the store owns if it doesn't exist yet.
///
/// Idempotent, so it runs on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    create_vector_tables(conn)?;
    create_info_table(conn)?;
    create_global_terms_table(conn)?;
    Ok(())
}

/// `file_token` and `relation_distance`.
pub fn create_vector_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_FILE_TOKEN)?;
    conn.execute_batch(CREATE_RELATION_DISTANCE)?;
    Ok(())
}

pub fn create_info_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_FILE_INFO)?;
    Ok(())
}

pub fn create_global_terms_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_GLOBAL_TERMS)?;
    Ok(())
}

/// Drop and recreate the two vector tables.
pub fn reset_vector_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS file_token;
         DROP TABLE IF EXISTS relation_distance;",
    )?;
    create_vector_tables(conn)
}

pub fn reset_info_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS file_info;")?;
    create_info_table(conn)
}

pub fn reset_global_terms_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS global_terms;")?;
    create_global_terms_table(conn)
}

/// Whether a table exists (used for the externally owned chunk table).
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // file_token, relation_distance, file_info, global_terms
        assert_eq!(table_count(&conn).unwrap(), 4);
    }

    #[test]
    fn test_reset_vector_tables_clears_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO file_token VALUES ('title_a', 10, 3, 4.5)",
            [],
        )
        .unwrap();

        reset_vector_tables(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM file_token", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "pdf_chunks").unwrap());
        create_tables(&conn).unwrap();
        assert!(table_exists(&conn, "file_info").unwrap());
        assert!(!table_exists(&conn, "pdf_chunks").unwrap());
    }
}
