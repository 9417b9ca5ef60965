//! Deps command implementation.

use clasp_graph::UnitScanner;
use tracing::debug;

use crate::cli::DepsArgs;
use crate::commands::utils;
use crate::deps_writer::DepsWriter;
use crate::error::{CliError, Result};
use crate::scan::{FsScanner, absolute};
use crate::ui;

/// Execute the deps command.
///
/// Every scanned file is listed under a path the debug loader can request:
///
/// - `--js` files relative to `--base-dir` (or the working directory)
/// - `--root-with-prefix` files relative to their root, under the prefix
/// - `--path-with-depspath` files under the explicit path
///
/// No namespaces are resolved, so a deps file can be written for sources that
/// do not build yet.
pub fn execute(args: DepsArgs) -> Result<()> {
    let cwd = utils::get_cwd()?;
    let settings = utils::load_settings(&cwd, &args.sources, None, false)?;
    let scanner = FsScanner::open(settings.cache_file.as_deref());
    let mut writer = DepsWriter::new();

    if !settings.js.is_empty() {
        let base_dir = absolute(args.base_dir.as_deref().unwrap_or(cwd.as_path()))?;
        let units = scanner.scan(&settings.js)?;
        writer.add_relative(&units, &base_dir, "");
    }

    for root in &args.roots_with_prefix {
        let root_dir = absolute(&root.root)?;
        let units = scanner.scan(std::slice::from_ref(&root_dir))?;
        debug!(root = %root_dir.display(), files = units.len(), "scanned prefixed root");
        writer.add_relative(&units, &root_dir, &root.prefix);
    }

    for entry in &args.paths_with_depspath {
        let mut units = scanner.scan(std::slice::from_ref(&entry.file))?;
        if units.len() != 1 {
            return Err(CliError::InvalidArgument(format!(
                "--path-with-depspath expects a single file, {} matched {} files",
                entry.file.display(),
                units.len()
            )));
        }
        writer.add_with_path(units.remove(0), entry.deps_path.clone());
    }

    if writer.is_empty() {
        return Err(CliError::InvalidArgument(
            "No sources given; pass --js, --root-with-prefix or --path-with-depspath".to_string(),
        ));
    }
    scanner.save_cache()?;

    let rendered = writer.render();
    match args.output.as_deref() {
        Some(path) => {
            utils::write_output(path, &rendered)?;
            ui::success(&format!("Wrote {} ({} files)", path.display(), writer.len()));
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
