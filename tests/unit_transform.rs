// Unit tests for the vector transform.
//
// Tests the pure functions on frequency maps: norm over the whole map,
// token filtering at both threshold sets, and weights against the
// unfiltered norm.

use reldist::error::Error;
use reldist::vector::frequency::{parse_frequency_map, FrequencyMap};
use reldist::vector::transform::{self, DocumentVector, TokenFilter};
use std::path::Path;

fn map(entries: &[(&str, u32)]) -> FrequencyMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ============================================================
// norm / sum / unique_count
// ============================================================

#[test]
fn norm_of_three_four_is_five() {
    assert_eq!(transform::norm(&map(&[("cat", 3), ("dog", 4)])), 5.0);
}

#[test]
fn norm_counts_tokens_the_filter_drops() {
    let m = map(&[("ab", 3), ("cd2", 10)]);
    assert!((transform::norm(&m) - 109f64.sqrt()).abs() < 1e-12);
}

#[test]
fn norm_of_empty_map_is_zero() {
    assert_eq!(transform::norm(&FrequencyMap::new()), 0.0);
}

#[test]
fn sum_and_unique_count() {
    let m = map(&[("a", 1), ("b", 2), ("c", 0)]);
    assert_eq!(transform::sum(&m), 3);
    assert_eq!(transform::unique_count(&m), 3);
}

// ============================================================
// Token filter
// ============================================================

#[test]
fn filter_rejects_non_lowercase_tokens() {
    assert!(!TokenFilter::INGEST.accepts("Cat2", 10));
    assert!(!TokenFilter::INGEST.accepts("Cat", 10));
    assert!(!TokenFilter::INGEST.accepts("cat-dog", 10));
    assert!(!TokenFilter::INGEST.accepts("", 10));
    assert!(TokenFilter::INGEST.accepts("cat", 10));
}

#[test]
fn filter_length_boundary_at_ingestion() {
    assert!(TokenFilter::INGEST.accepts(&"a".repeat(14), 3));
    assert!(!TokenFilter::INGEST.accepts(&"a".repeat(15), 3));
}

#[test]
fn filter_frequency_boundary_at_ingestion() {
    assert!(TokenFilter::INGEST.accepts("cat", 3));
    assert!(!TokenFilter::INGEST.accepts("cat", 2));
}

#[test]
fn query_filter_is_looser() {
    assert!(TokenFilter::QUERY.accepts(&"a".repeat(16), 1));
    assert!(!TokenFilter::QUERY.accepts(&"a".repeat(17), 1));
    assert!(!TokenFilter::QUERY.accepts("cat", 0));
}

// ============================================================
// Weights
// ============================================================

#[test]
fn only_valid_tokens_survive_with_full_norm_weight() {
    let m = map(&[("ab", 3), ("cd2", 10)]);
    let kept = transform::filter(&m, &TokenFilter::INGEST, transform::norm(&m)).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].token, "ab");
    assert_eq!(kept[0].frequency, 3);
    assert!((kept[0].weight - 3.0 / 109f64.sqrt()).abs() < 1e-12);
}

#[test]
fn weights_are_at_most_one() {
    let m = map(&[("apple", 50), ("pear", 3), ("plum", 7)]);
    let kept = transform::filter(&m, &TokenFilter::INGEST, transform::norm(&m)).unwrap();
    assert!(kept.iter().all(|t| t.weight > 0.0 && t.weight <= 1.0));
}

#[test]
fn zero_norm_is_degenerate() {
    let m = map(&[("cat", 0)]);
    let result = DocumentVector::compute("title_empty", &m, &TokenFilter::INGEST);
    assert!(matches!(
        result,
        Err(Error::DegenerateVector { ref document }) if document == "title_empty"
    ));
}

#[test]
fn document_vector_counts_the_whole_map() {
    let m = map(&[("cat", 3), ("dog", 4), ("x", 1)]);
    let vector = DocumentVector::compute("title_1", &m, &TokenFilter::INGEST).unwrap();
    assert_eq!(vector.total_tokens, 8);
    assert_eq!(vector.unique_tokens, 3);
    assert!((vector.norm - 26f64.sqrt()).abs() < 1e-12);
    assert_eq!(vector.weight_records().len(), 2);
    assert_eq!(vector.vector_record().total_tokens, 8);
}

// ============================================================
// Parsing
// ============================================================

#[test]
fn parse_rejects_non_count_values() {
    let result = parse_frequency_map(r#"{"cat": "three"}"#, Path::new("bad.json"));
    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn parse_accepts_flat_counts() {
    let m = parse_frequency_map(r#"{"cat": 3, "dog": 4}"#, Path::new("ok.json")).unwrap();
    assert_eq!(m.get("dog"), Some(&4));
}
