// Frequency vector transform.
//
// A document's "relational distance" is the Euclidean norm of its raw
// token counts. Each token that survives filtering is weighted by
// frequency / norm, where the norm always comes from the *unfiltered* map:
// filtering decides which tokens are stored, not how long the vector is.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::frequency::FrequencyMap;
use crate::db::models::{DocumentVectorRecord, TokenWeightRecord};
use crate::error::{Error, Result};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z]+$").expect("token pattern is a valid regex"));

/// Thresholds a token must meet to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenFilter {
    /// Longest token (in bytes) that is kept.
    pub max_length: usize,
    /// Lowest count that is kept.
    pub min_frequency: u32,
}

impl TokenFilter {
    /// Thresholds for document ingestion and global terms.
    pub const INGEST: Self = Self {
        max_length: 14,
        min_frequency: 3,
    };

    /// Looser thresholds for prompts, which are short.
    pub const QUERY: Self = Self {
        max_length: 16,
        min_frequency: 1,
    };

    /// Whether a token with this frequency passes.
    pub fn accepts(&self, token: &str, frequency: u32) -> bool {
        is_token(token) && token.len() <= self.max_length && frequency >= self.min_frequency
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self::INGEST
    }
}

/// A token kept by the filter, with its normalized weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredToken {
    pub token: String,
    pub frequency: u32,
    pub weight: f64,
}

/// Lowercase ASCII letters only.
pub fn is_token(token: &str) -> bool {
    TOKEN_PATTERN.is_match(token)
}

/// Sum of all counts.
pub fn sum(map: &FrequencyMap) -> u64 {
    map.values().map(|&v| u64::from(v)).sum()
}

/// Number of distinct tokens.
pub fn unique_count(map: &FrequencyMap) -> usize {
    map.len()
}

/// Euclidean norm over every count in the map. 0.0 for an empty map.
pub fn norm(map: &FrequencyMap) -> f64 {
    map.values()
        .map(|&v| {
            let v = f64::from(v);
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

/// Keep the tokens that pass `filter` and weight them against `norm`.
///
/// `norm` must be the norm of the full map. A zero (or non-finite) norm
/// leaves the weights undefined and yields `Error::DegenerateVector`.
pub fn filter(
    map: &FrequencyMap,
    token_filter: &TokenFilter,
    norm: f64,
) -> Result<Vec<FilteredToken>> {
    if !norm.is_finite() || norm <= 0.0 {
        return Err(Error::degenerate("frequency map"));
    }

    Ok(map
        .iter()
        .filter(|&(token, &frequency)| token_filter.accepts(token, frequency))
        .map(|(token, &frequency)| FilteredToken {
            token: token.clone(),
            frequency,
            weight: f64::from(frequency) / norm,
        })
        .collect())
}

/// Everything computed for one document during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVector {
    pub document_id: String,
    pub total_tokens: u64,
    pub unique_tokens: usize,
    pub norm: f64,
    pub tokens: Vec<FilteredToken>,
}

impl DocumentVector {
    /// Compute the vector for one document's frequency map.
    pub fn compute(
        document_id: &str,
        map: &FrequencyMap,
        token_filter: &TokenFilter,
    ) -> Result<Self> {
        let norm = norm(map);
        let tokens = filter(map, token_filter, norm).map_err(|e| match e {
            Error::DegenerateVector { .. } => Error::degenerate(document_id),
            other => other,
        })?;

        Ok(Self {
            document_id: document_id.to_string(),
            total_tokens: sum(map),
            unique_tokens: unique_count(map),
            norm,
            tokens,
        })
    }

    /// The `file_token` row for this document.
    pub fn vector_record(&self) -> DocumentVectorRecord {
        DocumentVectorRecord {
            document_id: self.document_id.clone(),
            total_tokens: i64::try_from(self.total_tokens).unwrap_or(i64::MAX),
            unique_tokens: i64::try_from(self.unique_tokens).unwrap_or(i64::MAX),
            norm: self.norm,
        }
    }

    /// The `relation_distance` rows for this document, one per kept token.
    pub fn weight_records(&self) -> Vec<TokenWeightRecord> {
        self.tokens
            .iter()
            .map(|t| TokenWeightRecord {
                document_id: self.document_id.clone(),
                token: t.token.clone(),
                frequency: i64::from(t.frequency),
                weight: t.weight,
            })
            .collect()
    }
}
