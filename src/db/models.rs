// Data models: Rust structs that map to store rows.
//
// These are the types that flow between the transform, the resolver and the
// store. They're kept separate from the queries so other modules can build
// records without depending on rusqlite directly.

/// Per-document rows are keyed by the frequency file's stem, which the
/// upstream tokenizer names `title_<file_info id>`.
pub const DOCUMENT_KEY_PREFIX: &str = "title_";

/// The key under which a `file_info` id's vector rows are stored.
pub fn document_key(id: &str) -> String {
    format!("{DOCUMENT_KEY_PREFIX}{id}")
}

/// One row of `file_token`: the shape of a document's full vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVectorRecord {
    pub document_id: String,
    pub total_tokens: i64,
    pub unique_tokens: i64,
    /// Euclidean norm of the unfiltered counts ("relational distance").
    pub norm: f64,
}

/// One row of `relation_distance`: a kept token and its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWeightRecord {
    pub document_id: String,
    pub token: String,
    pub frequency: i64,
    pub weight: f64,
}

/// One row of `file_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfoRecord {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub modified_epoch: i64,
    pub chunk_count: i64,
    pub starting_chunk_id: i64,
    pub ending_chunk_id: i64,
}

/// One row of `global_terms`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalTermRecord {
    pub term: String,
    pub count: i64,
    /// Count divided by the corpus-wide total.
    pub frequency: f64,
}

/// Row counts for the tables the store owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub documents: i64,
    pub token_weights: i64,
    pub document_info: i64,
    pub global_terms: i64,
}
