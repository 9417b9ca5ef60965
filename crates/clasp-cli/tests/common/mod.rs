//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BASE_JS: &str = "/**\n * @fileoverview Bootstrap for the Closure Library.\n * @provideGoog\n */\nvar goog = goog || {};\n";

/// A project with a Closure base.js under `lib/` and an app under `src/`:
///
/// - `src/main.js` provides `app.main`
/// - `src/shared.js` provides `app.shared`
/// - `src/a.js` and `src/b.js` both require `app.shared`
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("lib/goog/base.js", BASE_JS);
        project.write("src/main.js", "goog.provide('app.main');\n");
        project.write("src/shared.js", "goog.provide('app.shared');\n");
        project.write(
            "src/a.js",
            "goog.provide('app.a');\n\ngoog.require('app.shared');\n",
        );
        project.write(
            "src/b.js",
            "goog.provide(\"app.b\");\n// goog.require('app.unused');\ngoog.require(\"app.shared\");\n",
        );
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// `modules.json` with a root and two children sharing `app.shared`.
    pub fn write_module_config(&self) -> PathBuf {
        self.write(
            "modules.json",
            r#"{
                "outputPath": "build/",
                "productionUri": "https://cdn.example.com/js/",
                "modules": {
                    "root": { "inputs": ["src/main.js"] },
                    "a": { "deps": "root", "inputs": "src/a.js" },
                    "b": { "deps": ["root"], "inputs": ["src/b.js"] }
                }
            }"#,
        )
    }

    /// Every file name on stdout, in order, for path-per-line output.
    pub fn file_names(stdout: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(stdout)
            .lines()
            .filter_map(|line| {
                Path::new(line.trim())
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect()
    }
}
