//! Terminal UI utilities for status lines and summaries.
//!
//! Everything here writes to stderr. Command results (file lists, JSON,
//! compiler arguments) are printed to stdout by the commands themselves.
//!
//! # Examples
//!
//! ```no_run
//! use clasp_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Dependency order ready");
//! ui::error("Namespace never provided");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, print_module_summary};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    // NO_COLOR environment variable disables colors
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    // FORCE_COLOR enables colors even in non-TTY
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status output is colored.
///
/// `--no-color` always wins; otherwise [`should_use_color`] decides.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
