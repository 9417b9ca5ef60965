use std::path::PathBuf;

use crate::compiler_args::Define;

/// A source root whose files are listed in `deps.js` under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootWithPrefix {
    pub root: PathBuf,
    pub prefix: String,
}

/// A single source file listed in `deps.js` under an explicit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathWithDepsPath {
    pub file: PathBuf,
    pub deps_path: String,
}

/// Parse a `--define` value of the form `KEY=VALUE`.
///
/// `true`/`false` become booleans, numbers stay numbers, anything else is
/// passed to the compiler as a string.
///
/// # Examples
///
/// Valid: `goog.DEBUG=false`, `app.VERSION=3`, `app.NAME=demo`
/// Invalid: `goog.DEBUG`, `=false`, `my key=1`
pub fn parse_define(s: &str) -> Result<Define, String> {
    s.parse()
}

/// Parse a `--root-with-prefix` value: `"<dir> <prefix>"`.
///
/// The last space separates the two parts, so directories may contain spaces.
pub fn parse_root_with_prefix(s: &str) -> Result<RootWithPrefix, String> {
    let (root, prefix) = split_pair(s, "--root-with-prefix", "<dir> <prefix>")?;
    Ok(RootWithPrefix {
        root: PathBuf::from(root),
        prefix: prefix.to_string(),
    })
}

/// Parse a `--path-with-depspath` value: `"<file> <path>"`.
pub fn parse_path_with_depspath(s: &str) -> Result<PathWithDepsPath, String> {
    let (file, deps_path) = split_pair(s, "--path-with-depspath", "<file> <path>")?;
    Ok(PathWithDepsPath {
        file: PathBuf::from(file),
        deps_path: deps_path.to_string(),
    })
}

fn split_pair<'a>(s: &'a str, flag: &str, shape: &str) -> Result<(&'a str, &'a str), String> {
    match s.trim().rsplit_once(' ') {
        Some((left, right)) if !left.trim().is_empty() && !right.is_empty() => {
            Ok((left.trim_end(), right))
        }
        _ => Err(format!("{} expects \"{}\", got '{}'", flag, shape, s)),
    }
}
