use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::vector::transform::TokenFilter;

/// Central configuration.
///
/// Passed explicitly into every component, so several stores and corpora
/// can live in one process. `load` reads environment variables (the .env
/// file is loaded at startup via dotenvy); `with_data_root` builds the
/// defaults around a directory, which is what tests use.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of all derived paths (defaults to ./data).
    pub data_root: PathBuf,
    /// Directory of per-document frequency maps (`title_<id>.json`).
    pub token_json_dir: PathBuf,
    /// SQLite database shared with the upstream text extractor.
    pub db_path: PathBuf,
    /// Directory of source documents (PDFs) for metadata runs.
    pub resource_dir: PathBuf,
    /// Where diagnostic CSV dumps go.
    pub processed_data_dir: PathBuf,
    /// Frequency map of the current prompt.
    pub buffer_json_path: PathBuf,
    /// Corpus-wide frequency map for global terms.
    pub global_terms_path: PathBuf,
    /// Thresholds for documents and global terms.
    pub ingest_filter: TokenFilter,
    /// Thresholds for prompts.
    pub query_filter: TokenFilter,
    /// Default number of ranked results.
    pub top_n: usize,
    /// Record chunk-table keys with backslash separators, as legacy stores do.
    pub legacy_backslash_paths: bool,
}

impl Config {
    /// Defaults rooted at `data_root`.
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        Self {
            token_json_dir: data_root.join("token_json"),
            db_path: data_root.join("pdf_text.db"),
            resource_dir: data_root.join("resources"),
            processed_data_dir: data_root.join("processed_data"),
            buffer_json_path: data_root.join("buffer.json"),
            global_terms_path: data_root.join("global_word_freq.json"),
            ingest_filter: TokenFilter::INGEST,
            query_filter: TokenFilter::QUERY,
            top_n: 100,
            legacy_backslash_paths: true,
            data_root,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unparseable numbers are an error rather
    /// than silently falling back.
    pub fn load() -> Result<Self> {
        let data_root = env::var("RELDIST_DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let mut config = Self::with_data_root(data_root);

        if let Ok(path) = env::var("RELDIST_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("RELDIST_RESOURCE_DIR") {
            config.resource_dir = PathBuf::from(path);
        }

        config.ingest_filter = TokenFilter {
            max_length: env_or("RELDIST_MAX_LENGTH", config.ingest_filter.max_length)?,
            min_frequency: env_or("RELDIST_MIN_FREQUENCY", config.ingest_filter.min_frequency)?,
        };
        config.query_filter = TokenFilter {
            max_length: env_or("RELDIST_QUERY_MAX_LENGTH", config.query_filter.max_length)?,
            min_frequency: env_or(
                "RELDIST_QUERY_MIN_FREQUENCY",
                config.query_filter.min_frequency,
            )?,
        };
        config.top_n = env_or("RELDIST_TOP_N", config.top_n)?;
        config.legacy_backslash_paths =
            env_or("RELDIST_LEGACY_PATHS", config.legacy_backslash_paths)?;

        Ok(config)
    }

    /// Check that the frequency-map directory exists.
    /// Call this before ingesting document vectors.
    pub fn require_token_json(&self) -> Result<()> {
        require_dir(&self.token_json_dir, "RELDIST_DATA_ROOT/token_json")
    }

    /// Check that the source document directory exists.
    /// Call this before a metadata run.
    pub fn require_resources(&self) -> Result<()> {
        require_dir(&self.resource_dir, "RELDIST_RESOURCE_DIR")
    }
}

fn require_dir(dir: &Path, setting: &str) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "{} does not exist. Create it or point {} somewhere else.",
            dir.display(),
            setting
        )));
    }
    Ok(())
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw:?}"))),
        Err(_) => Ok(default),
    }
}
