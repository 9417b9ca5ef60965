//! Closure Compiler argument generation.
//!
//! Module builds list every module in tree pre-order, then the output prefix,
//! then the `--js` files in the order the modules consume them. Single builds
//! list only the `--js` files. Defines, externs and extra flags come last.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clasp_graph::{ModuleTree, SourceUnit, WrapperOptions};
use serde::Serialize;

/// Value of a `--define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineValue {
    Bool(bool),
    /// Kept as written so `1.50` is not reformatted.
    Number(String),
    String(String),
}

/// A compile-time constant override, `KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub key: String,
    pub value: DefineValue,
}

impl FromStr for Define {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, raw) = s
            .split_once('=')
            .ok_or_else(|| format!("Define must look like KEY=VALUE: '{}'", s))?;

        if key.is_empty() {
            return Err(format!("Define key cannot be empty: '{}'", s));
        }
        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
        {
            return Err(format!(
                "Define key can only contain letters, numbers, '_', '$' or '.': '{}'",
                key
            ));
        }

        Ok(Self {
            key: key.to_string(),
            value: parse_define_value(raw),
        })
    }
}

fn parse_define_value(raw: &str) -> DefineValue {
    match raw {
        "true" => return DefineValue::Bool(true),
        "false" => return DefineValue::Bool(false),
        _ => {}
    }

    // Explicit quotes force a string.
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return DefineValue::String(raw[1..raw.len() - 1].to_string());
        }
    }

    let numeric_start = raw
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.');
    if numeric_start && raw.parse::<f64>().is_ok() {
        DefineValue::Number(raw.to_string())
    } else {
        DefineValue::String(raw.to_string())
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            DefineValue::Bool(value) => write!(f, "{}={}", self.key, value),
            DefineValue::Number(value) => write!(f, "{}={}", self.key, value),
            DefineValue::String(value) => {
                write!(f, "{}='{}'", self.key, value.replace('\'', "\\'"))
            }
        }
    }
}

/// One compiler flag with its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerArg {
    pub flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CompilerArg {
    pub fn new(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: Some(value.into()),
        }
    }

    /// A flag passed through as written, possibly `--name=value`.
    pub fn raw(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: None,
        }
    }
}

/// Renders as one shell-ready line.
impl fmt::Display for CompilerArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => f.write_str(&self.flag),
            Some(value) => write!(f, "{} {}", self.flag, shell_quote(value)),
        }
    }
}

/// Quote `value` for a POSIX shell when it needs quoting.
fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || "-_./:=,@%+".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// An ordered compiler argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerArgs {
    args: Vec<CompilerArg>,
}

impl CompilerArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments for a normalized module tree.
    ///
    /// Each module contributes `--module name:count[:parent]` and
    /// `--module_wrapper name:wrapper`; `--js` lists the root's full
    /// closure, which is the modules' files concatenated in pre-order.
    pub fn for_modules<S>(
        tree: &ModuleTree<S>,
        options: &WrapperOptions,
        output_path: Option<&str>,
    ) -> Self {
        let mut args = Self::new();
        let wrappers = tree.wrapper_values(options);
        for (id, wrapper) in wrappers {
            let node = tree.node(id);
            args.push(CompilerArg::new("--module", tree.module_flag_value(id)));
            args.push(CompilerArg::new(
                "--module_wrapper",
                format!("{}:{}", node.name(), wrapper),
            ));
        }
        if let Some(prefix) = output_path {
            args.push(CompilerArg::new("--module_output_path_prefix", prefix));
        }
        args.extend_js(&tree.get_deps(tree.root(), true));
        args
    }

    /// Arguments for a single output built from `units` in order.
    pub fn for_single(units: &[Arc<SourceUnit>]) -> Self {
        let mut args = Self::new();
        args.extend_js(units);
        args
    }

    pub fn push(&mut self, arg: CompilerArg) {
        self.args.push(arg);
    }

    fn extend_js(&mut self, units: &[Arc<SourceUnit>]) {
        self.args.extend(
            units
                .iter()
                .map(|unit| CompilerArg::new("--js", unit.path().display().to_string())),
        );
    }

    pub fn defines(mut self, defines: &[Define]) -> Self {
        self.args
            .extend(defines.iter().map(|d| CompilerArg::new("--define", d.to_string())));
        self
    }

    pub fn externs(mut self, externs: &[PathBuf]) -> Self {
        self.args.extend(
            externs
                .iter()
                .map(|path| CompilerArg::new("--externs", path.display().to_string())),
        );
        self
    }

    pub fn flags(mut self, flags: &[String]) -> Self {
        self.args.extend(flags.iter().cloned().map(CompilerArg::raw));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilerArg> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Flatten into an argv vector, ready for `std::process::Command::args`.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            argv.push(arg.flag.clone());
            if let Some(value) = &arg.value {
                argv.push(value.clone());
            }
        }
        argv
    }
}
