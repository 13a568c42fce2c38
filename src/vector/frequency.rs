// Frequency-map input: the flat `{ "token": count }` JSON files written by
// the upstream tokenizer, one per document plus one for the current prompt.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Token → occurrence count. Ordered so that everything derived from it
/// (filtered tokens, persisted rows) comes out in a stable order.
pub type FrequencyMap = BTreeMap<String, u32>;

/// Parse a frequency map from a JSON string.
///
/// `path` is only used to label the error.
pub fn parse_frequency_map(json: &str, path: &Path) -> Result<FrequencyMap> {
    serde_json::from_str(json).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a frequency-map file from disk.
pub fn load_frequency_map(path: &Path) -> Result<FrequencyMap> {
    let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let map = parse_frequency_map(&json, path)?;
    debug!(path = %path.display(), tokens = map.len(), "Loaded frequency map");
    Ok(map)
}

/// List the files in `dir` with the given extension (without the dot),
/// sorted by path so that batches are reproducible.
pub fn scan_directory(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The document key for a frequency file: its file stem.
pub fn document_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
