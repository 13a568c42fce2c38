// Global terms run: persists the corpus-wide frequency table used by the
// downstream tagging stage. The corpus map itself is assembled upstream.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::db::VectorStore;
use crate::error::Result;
use crate::vector::frequency::load_frequency_map;

/// Rebuild `global_terms` from the corpus frequency map at `path`.
///
/// Uses the ingestion thresholds. Returns the number of terms written.
pub fn rebuild_from_file(config: &Config, store: &VectorStore, path: &Path) -> Result<usize> {
    let corpus = load_frequency_map(path)?;
    info!(
        path = %path.display(),
        terms = corpus.len(),
        "Rebuilding global terms"
    );
    store.rebuild_global_terms(&corpus, &config.ingest_filter)
}
