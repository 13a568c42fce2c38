// Output formatting: terminal display, progress bars and diagnostic dumps.

pub mod csv_dump;
pub mod terminal;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar for `len` items, or a hidden one when `show` is false.
pub fn progress_bar(len: u64, label: &str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let template = format!("{label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})");
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        pb.set_style(style);
    }
    pb
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Éloge de l'ombre", 5), "Éloge...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_hidden_progress_bar() {
        let pb = progress_bar(10, "  Test", false);
        assert!(pb.is_hidden());
    }
}
