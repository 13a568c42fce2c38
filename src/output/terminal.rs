// Colored terminal output for rankings and run reports.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use colored::Colorize;

use crate::db::models::{GlobalTermRecord, StoreCounts};
use crate::pipeline::ingest::IngestReport;
use crate::pipeline::resources::ResourceReport;
use crate::ranking::RankedDocument;

/// Display a ranked document list.
pub fn display_ranking(ranking: &[RankedDocument], top_n: usize) {
    if ranking.is_empty() {
        println!("No matching documents. Run `reldist ingest` and `reldist update-info` first.");
        return;
    }

    println!("\n{}", format!("=== Top {top_n} Results ===").bold());
    println!();
    println!(
        "  {:>4}  {:<12} {:<48} {}",
        "Rank".dimmed(),
        "Score".dimmed(),
        "Name".dimmed(),
        "ID".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for (i, doc) in ranking.iter().enumerate() {
        let name = super::truncate_chars(&doc.file_name, 44);
        let score = format!("{:.6}", doc.score);
        let score = if doc.score > 0.0 {
            score.green()
        } else {
            score.dimmed()
        };
        println!(
            "  {:>4}. {:<12} [[{}.pdf]]{:<pad$} {}",
            i + 1,
            score,
            name,
            "",
            doc.id.dimmed(),
            pad = 44usize.saturating_sub(name.chars().count()),
        );
    }
    println!();
}

/// Summarize an ingestion run.
pub fn display_ingest_report(report: &IngestReport) {
    println!(
        "Ingested {} documents",
        report.ingested.len().to_string().bold()
    );
    if !report.skipped.is_empty() {
        println!(
            "  {} {} skipped (empty frequency map)",
            "~".yellow(),
            report.skipped.len()
        );
        for id in &report.skipped {
            println!("      {}", id.dimmed());
        }
    }
    if !report.failed.is_empty() {
        println!("  {} {} failed", "!".red().bold(), report.failed.len());
        for (path, reason) in &report.failed {
            println!("      {}: {}", path.display(), reason.dimmed());
        }
    }
}

/// Summarize a document info run.
pub fn display_resource_report(report: &ResourceReport) {
    println!(
        "Updated info for {} documents",
        report.records.len().to_string().bold()
    );
    let without_chunks = report.records.iter().filter(|r| r.chunk_count == 0).count();
    if without_chunks > 0 {
        println!(
            "  {} {} documents have no chunks yet",
            "~".yellow(),
            without_chunks
        );
    }
    for path in &report.unknown_mtime {
        println!(
            "  {} modification time unreadable: {}",
            "!".bright_red(),
            path.display()
        );
    }
}

/// Display store row counts.
pub fn display_counts(counts: &StoreCounts) {
    println!("  Documents (vectors):   {}", counts.documents);
    println!("  Token weights:         {}", counts.token_weights);
    println!("  Documents (info):      {}", counts.document_info);
    println!("  Global terms:          {}", counts.global_terms);
}

/// Display the most frequent global terms.
pub fn display_global_terms(terms: &[GlobalTermRecord]) {
    if terms.is_empty() {
        return;
    }
    println!("\n{}", "Top global terms:".bold());
    for term in terms {
        println!(
            "  {:<16} {:>8}  {:.4}",
            term.term,
            term.count,
            term.frequency
        );
    }
}
