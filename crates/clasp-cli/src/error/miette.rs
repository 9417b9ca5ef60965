//! Miette diagnostic conversion for CLI errors.

use ::miette::Report;
use clasp_graph::GraphError;

use crate::error::{BuildError, CliError};

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => ::miette::miette!("Configuration error: {}", e),
        _ => ::miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Graph {
            source: GraphError::CircularDependency { path },
            hint,
        } => {
            // One namespace per line reads better than a long arrow chain.
            let cycle = path.join("\n  -> ");
            ::miette::miette!("Circular dependency detected:\n  {}\n\nHint: {}", cycle, hint)
        }
        BuildError::Graph {
            source: GraphError::DuplicateProvide {
                namespace,
                first,
                second,
            },
            hint,
        } => ::miette::miette!(
            "Namespace \"{}\" is provided twice:\n  {}\n  {}\n\nHint: {}",
            namespace,
            first.display(),
            second.display(),
            hint
        ),
        _ => ::miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cycle_is_rendered_one_namespace_per_line() {
        let err = BuildError::from(GraphError::CircularDependency {
            path: vec!["a".into(), "b".into(), "a".into()],
        });
        let report = build_error_to_miette(err).to_string();
        assert!(report.contains("a\n  -> b\n  -> a"));
        assert!(report.contains("Hint:"));
    }

    #[test]
    fn duplicate_provide_lists_both_files() {
        let err = CliError::from(GraphError::DuplicateProvide {
            namespace: "app".into(),
            first: PathBuf::from("a.js"),
            second: PathBuf::from("b.js"),
        });
        let report = cli_error_to_miette(err).to_string();
        assert!(report.contains("a.js"));
        assert!(report.contains("b.js"));
    }
}
