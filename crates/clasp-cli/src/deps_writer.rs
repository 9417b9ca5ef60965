//! `deps.js` generation for the Closure debug loader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clasp_graph::SourceUnit;

const HEADER: &str = "// This file was autogenerated by clasp deps.\n// Please do not edit.\n";

/// Collects units under the paths the loader should request them by.
#[derive(Debug, Default)]
pub struct DepsWriter {
    entries: BTreeMap<String, Arc<SourceUnit>>,
}

impl DepsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `units` under their path relative to `base_dir`, joined to
    /// `prefix` with a `/` when the prefix does not end in one.
    pub fn add_relative(&mut self, units: &[Arc<SourceUnit>], base_dir: &Path, prefix: &str) {
        for unit in units {
            let relative = relative_path(base_dir, unit.path());
            let deps_path = if prefix.is_empty() || prefix.ends_with('/') {
                format!("{}{}", prefix, relative.display())
            } else {
                format!("{}/{}", prefix, relative.display())
            };
            self.add_with_path(Arc::clone(unit), deps_path);
        }
    }

    /// Add `unit` under an explicit path. A later entry for the same path wins.
    pub fn add_with_path(&mut self, unit: Arc<SourceUnit>, deps_path: impl Into<String>) {
        self.entries.insert(deps_path.into().replace('\\', "/"), unit);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the file: the header, then one line per providing unit in path
    /// order.
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for (path, unit) in &self.entries {
            // Units that provide nothing cannot be requested by name.
            if !unit.provides().is_empty() {
                out.push_str(&deps_line(path, unit));
            }
        }
        out
    }
}

/// One `goog.addDependency` call, provides and requires sorted.
pub fn deps_line(path: &str, unit: &SourceUnit) -> String {
    let mut provides = unit.provides().to_vec();
    let mut requires = unit.requires().to_vec();
    provides.sort();
    requires.sort();

    format!(
        "goog.addDependency('{}', [{}], [{}], {});\n",
        path.replace('\\', "/"),
        quote_list(&provides),
        quote_list(&requires),
        unit.is_module()
    )
}

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `target` relative to `base`; both are expected to be absolute and clean.
/// Paths that cannot be related (e.g. different drive letters) come back
/// unchanged.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(path: &str, provides: &[&str], requires: &[&str]) -> Arc<SourceUnit> {
        SourceUnit::builder(path)
            .provides(provides.iter().copied())
            .requires(requires.iter().copied())
            .shared()
    }

    #[test]
    fn relative_paths_climb_out_of_the_base() {
        assert_eq!(
            relative_path(Path::new("/work/app"), Path::new("/work/app/src/a.js")),
            PathBuf::from("src/a.js")
        );
        assert_eq!(
            relative_path(Path::new("/work/app/out"), Path::new("/work/lib/b.js")),
            PathBuf::from("../../lib/b.js")
        );
        assert_eq!(
            relative_path(Path::new("/work/app/src"), Path::new("/work/app/src")),
            PathBuf::new()
        );
        assert_eq!(
            relative_path(Path::new("/work/app/src/a.js"), Path::new("/work/app/src")),
            PathBuf::from("..")
        );
    }

    #[test]
    fn unrelated_relative_target_is_returned_as_is() {
        // A relative target against an absolute base has no relative form.
        assert_eq!(
            relative_path(Path::new("/work/app"), Path::new("lib/b.js")),
            PathBuf::from("lib/b.js")
        );
    }

    #[test]
    fn deps_line_sorts_names() {
        let unit = SourceUnit::builder("x")
            .provides(["b", "a"])
            .requires(["z", "goog.dom"])
            .module(true)
            .build();
        assert_eq!(
            deps_line("lib\\x.js", &unit),
            "goog.addDependency('lib/x.js', ['a', 'b'], ['goog.dom', 'z'], true);\n"
        );
    }

    #[test]
    fn render_sorts_by_path_and_skips_units_without_provides() {
        let mut writer = DepsWriter::new();
        writer.add_relative(
            &[
                unit("/work/src/main.js", &[], &["app.b"]),
                unit("/work/src/b.js", &["app.b"], &["app.a"]),
                unit("/work/src/a.js", &["app.a"], &[]),
            ],
            Path::new("/work"),
            "../..",
        );
        writer.add_with_path(unit("/vendor/x.js", &["x"], &[]), "third_party/x.js");

        insta::assert_snapshot!(writer.render(), @r"
        // This file was autogenerated by clasp deps.
        // Please do not edit.
        goog.addDependency('../../src/a.js', ['app.a'], [], false);
        goog.addDependency('../../src/b.js', ['app.b'], ['app.a'], false);
        goog.addDependency('third_party/x.js', ['x'], [], false);
        ");
        assert_eq!(writer.len(), 4);
    }
}
