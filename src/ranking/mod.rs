// Query matching: ranks stored documents against a prompt's frequency map.
//
// The score is a weighted term overlap, not a cosine similarity:
//
//   score(doc) = Σ over kept query tokens of query_weight × stored_weight(doc, token)
//
// Document weights are precomputed at ingestion, so a query only has to
// weight its own tokens and read the stored rows for those tokens.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::models::document_key;
use crate::db::VectorStore;
use crate::error::{Error, Result};
use crate::vector::frequency::FrequencyMap;
use crate::vector::transform::{self, TokenFilter};

/// One entry of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub id: String,
    pub file_name: String,
    pub score: f64,
}

/// Ranks the documents of one store.
pub struct QueryMatcher<'a> {
    store: &'a VectorStore,
    token_filter: TokenFilter,
}

impl<'a> QueryMatcher<'a> {
    pub fn new(store: &'a VectorStore, token_filter: TokenFilter) -> Self {
        Self {
            store,
            token_filter,
        }
    }

    /// Score every document against `query` and return the best `top_n`.
    ///
    /// Documents with equal scores keep the order the store lists them in.
    /// A query with no counts at all can't be weighted; it is logged and
    /// ranks nothing.
    pub fn rank(&self, query: &FrequencyMap, top_n: usize) -> Result<Vec<RankedDocument>> {
        let query_norm = transform::norm(query);
        let query_tokens = match transform::filter(query, &self.token_filter, query_norm) {
            Ok(tokens) => tokens,
            Err(Error::DegenerateVector { .. }) => {
                warn!("Query has no token counts, nothing to rank");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let documents = self.store.list_documents()?;
        let token_set: BTreeSet<String> = query_tokens.iter().map(|t| t.token.clone()).collect();
        let stored = self.store.query_token_weights(&token_set)?;
        debug!(
            query_tokens = query_tokens.len(),
            documents = documents.len(),
            matched_documents = stored.len(),
            "Scoring documents"
        );

        let mut ranking: Vec<RankedDocument> = documents
            .into_iter()
            .map(|(id, file_name)| {
                let score = stored
                    .get(&document_key(&id))
                    .map(|weights| {
                        query_tokens
                            .iter()
                            .filter_map(|q| weights.get(&q.token).map(|w| q.weight * w))
                            .sum::<f64>()
                    })
                    .unwrap_or(0.0);
                RankedDocument {
                    id,
                    file_name,
                    score,
                }
            })
            .collect();

        // sort_by is stable, so ties keep retrieval order
        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranking.truncate(top_n);

        info!(results = ranking.len(), top_n, "Ranked documents");
        Ok(ranking)
    }
}

/// Render a ranking as a pretty-printed JSON array.
pub fn ranking_json(ranking: &[RankedDocument]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(ranking)
}
