//! Clasp CLI - dependency ordering and module planning for Closure sources.
//!
//! This crate provides the command-line interface on top of `clasp-graph` and
//! `clasp-config`: it scans the file system for `goog.provide` /
//! `goog.require` declarations, hands the units to the planner and prints the
//! results for the Closure Compiler and the debug loader.
//!
//! # Architecture
//!
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status messages and summaries on stderr
//! - [`scan`] - File system scanner and declaration parser
//! - [`cache`] - Per-file metadata cache keyed by modification time
//! - [`compiler_args`] - Closure Compiler argument lists
//! - [`deps_writer`] - `deps.js` rendering
//! - [`module_deps`] - Debug file lists and the `moduleInfo` file
//! - `commands` - Individual CLI command implementations
//! - `config` - Settings file and environment handling
//!
//! # Example
//!
//! ```rust
//! use clasp_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     // CLI command implementations...
//!     Ok(())
//! }
//! ```

// Public modules
pub mod cache;
pub mod cli;
pub mod commands;
pub mod compiler_args;
pub mod config;
pub mod deps_writer;
pub mod error;
pub mod logger;
pub mod module_deps;
pub mod scan;
pub mod ui;

// Re-export commonly used types
pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
