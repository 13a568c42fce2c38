// System status display: store location, table sizes, input directories.

use std::path::Path;

use crate::config::Config;
use crate::db::VectorStore;
use crate::error::Result;
use crate::output::terminal;

/// Display system status to the terminal.
pub fn show(config: &Config, store: &VectorStore) -> Result<()> {
    let db_path = store.path();
    if !db_path.exists() {
        println!("Database: not initialized");
        println!("\nRun `reldist init` to set up the database.");
        return Ok(());
    }

    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path.display(), file_size);

    terminal::display_counts(&store.counts()?);

    println!();
    println!(
        "Frequency maps: {}",
        describe_dir(&config.token_json_dir, "json")
    );
    println!("Resources:      {}", describe_dir(&config.resource_dir, "pdf"));

    terminal::display_global_terms(&store.top_global_terms(10)?);
    Ok(())
}

fn describe_dir(dir: &Path, extension: &str) -> String {
    match crate::vector::frequency::scan_directory(dir, extension) {
        Ok(files) => format!("{} ({} .{} files)", dir.display(), files.len(), extension),
        Err(_) => format!("{} (missing)", dir.display()),
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
