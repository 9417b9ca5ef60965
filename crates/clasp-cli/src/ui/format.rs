//! Formatting utilities for durations and plan summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Format duration in human-readable format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use clasp_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Print a module plan summary table to stderr.
///
/// `entries` holds `(module flag value, file count)` pairs in tree order.
///
/// ```no_run
/// use std::time::Duration;
/// use clasp_cli::ui::print_module_summary;
///
/// print_module_summary(
///     &[("root:12".to_string(), 12), ("lazy:3:root".to_string(), 3)],
///     Duration::from_millis(40),
/// );
/// ```
pub fn print_module_summary(entries: &[(String, usize)], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(80);
    let total: usize = entries.iter().map(|(_, count)| count).sum();

    if !colors_enabled() {
        eprintln!("\nModule Summary");
        eprintln!("{}", "-".repeat(width));
        for (flag, count) in entries {
            eprintln!("  {} {}", flag, files_label(*count));
        }
        eprintln!("{}", "-".repeat(width));
        eprintln!("  Total: {} in {}", files_label(total), format_duration(elapsed));
        return;
    }

    eprintln!("\n{}", "Module Summary".bold().underline());
    eprintln!("{}", "─".repeat(width));
    for (flag, count) in entries {
        eprintln!(
            "  {} {} {}",
            "▸".blue(),
            flag.bright_white().bold(),
            files_label(*count).dimmed()
        );
    }
    eprintln!("{}", "─".repeat(width));
    eprintln!(
        "  {} {} in {}",
        "Total:".bold(),
        files_label(total).green(),
        format_duration(elapsed).green()
    );
}

fn files_label(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "60.00s");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61m 1s");
    }

    #[test]
    fn test_files_label() {
        assert_eq!(files_label(1), "1 file");
        assert_eq!(files_label(0), "0 files");
        assert_eq!(files_label(7), "7 files");
    }
}
