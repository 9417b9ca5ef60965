//! Helpers shared by the command implementations.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clasp_config::{ConfigDiscovery, ModuleConfig};
use clasp_graph::BootstrapPolicy;
use serde::Serialize;

use crate::cli::{OutputFormat, SourceArgs};
use crate::config::{Settings, SettingsOverrides};
use crate::error::{BuildError, CliError, ConfigError, Result, ResultExt};

pub(crate) const PRODUCTION_URI_HINT: &str =
    "Modules are loaded from productionUri; add it to the module config";
pub(crate) const OUTPUT_PATH_HINT: &str =
    "Add outputPath to the module config so the compiler knows where to write modules";

/// Get the current working directory.
pub(crate) fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current working directory")
}

/// Merge the command's flags over the settings file and environment.
pub(crate) fn load_settings(
    cwd: &Path,
    sources: &SourceArgs,
    format: Option<OutputFormat>,
    no_bootstrap: bool,
) -> Result<Settings> {
    let overrides = SettingsOverrides {
        js: sources.js.clone(),
        cache_file: sources.cache.clone(),
        format,
        bootstrap: no_bootstrap.then_some(false),
    };
    Settings::load(cwd, sources.settings.as_deref(), &overrides)
}

pub(crate) fn bootstrap_policy(settings: &Settings) -> BootstrapPolicy {
    if settings.bootstrap {
        BootstrapPolicy::Required
    } else {
        BootstrapPolicy::Disabled
    }
}

/// Load and validate the module config at `path`, or discover one in `cwd`.
pub(crate) fn load_module_config(cwd: &Path, path: Option<&Path>) -> Result<ModuleConfig> {
    let config = match path {
        Some(path) if !path.is_file() => return Err(CliError::FileNotFound(path.to_path_buf())),
        Some(path) => clasp_config::load_from(path)?,
        None => ConfigDiscovery::new(cwd).load()?,
    };
    clasp_config::validate_fs(&config)?;
    Ok(config)
}

/// Attach `hint` to a missing config field.
pub(crate) fn required<'a>(value: clasp_config::Result<&'a str>, hint: &str) -> Result<&'a str> {
    value.map_err(|err| match err {
        clasp_config::ConfigError::MissingField(field) => ConfigError::MissingField {
            field: field.to_string(),
            hint: hint.to_string(),
        }
        .into(),
        other => other.into(),
    })
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Print `lines` on stdout, one per line.
pub(crate) fn print_lines<I, S>(lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{}", line)?;
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    let result = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).and_then(|()| fs::write(path, content)),
        None => fs::write(path, content),
    };
    result.map_err(|source| {
        BuildError::OutputNotWritable {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_output_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/deps/deps.js");
        write_output(&path, "// deps").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "// deps");
    }

    #[test]
    fn missing_explicit_module_config_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("modules.json");
        let err = load_module_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn required_reports_the_missing_field() {
        assert_eq!(required(Ok("build/"), "add it").unwrap(), "build/");
        let missing = Err(clasp_config::ConfigError::MissingField("outputPath"));
        match required(missing, "add it").unwrap_err() {
            CliError::Config(ConfigError::MissingField { field, hint }) => {
                assert_eq!(field, "outputPath");
                assert_eq!(hint, "add it");
            }
            other => panic!("expected MissingField, got {other}"),
        }
    }
}
