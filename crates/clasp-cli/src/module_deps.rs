//! Uncompiled module loading.
//!
//! In development each module is served as its own source files. A module's
//! debug file list names those files by the uri they are fetched from, found
//! by placing the source next to the module's production uri:
//!
//! ```text
//! dirname(productionUri + name + ".js") + "/" + relative(dirname(outputPath + name + ".js"), file)
//! ```
//!
//! The `moduleInfo` file is a `goog.module` with the declared module graph
//! and a trusted uri for every module, for use by the Closure module loader.

use std::path::Path;

use clasp_config::DeclaredModuleInfo;
use clasp_graph::ModuleTree;
use serde::Serialize;
use serde_json::Value;

use crate::deps_writer::relative_path;
use crate::scan::absolute;

/// One source file of a module, as the debug loader requests it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFile {
    pub uri: String,
    pub is_module: bool,
}

/// The files one module loads in development, dependency-first.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleFiles {
    pub name: String,
    pub parent: Option<String>,
    pub files: Vec<DebugFile>,
}

/// Debug file lists for every module of `tree`, in pre-order.
///
/// Only a module's own files are listed; files hoisted to an ancestor are
/// loaded with the ancestor.
pub fn module_files<S>(
    tree: &ModuleTree<S>,
    output_path: &str,
    production_uri: &str,
) -> std::io::Result<Vec<ModuleFiles>> {
    tree.pre_order()
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            let web_prefix = uri_dirname(&format!("{production_uri}{}.js", node.name())).to_string();
            let output_file = absolute(Path::new(&format!("{output_path}{}.js", node.name())))?;
            let output_dir = output_file.parent().unwrap_or(Path::new("/"));

            let files = tree
                .get_deps(id, false)
                .iter()
                .map(|unit| DebugFile {
                    uri: format!(
                        "{web_prefix}/{}",
                        relative_path(output_dir, unit.path()).display().to_string().replace('\\', "/")
                    ),
                    is_module: unit.is_module(),
                })
                .collect();

            Ok(ModuleFiles {
                name: node.name().to_string(),
                parent: node.parent().map(|parent| tree.node(parent).name().to_string()),
                files,
            })
        })
        .collect()
}

/// Everything before the last `/` of `uri`, or `.` when there is none.
fn uri_dirname(uri: &str) -> &str {
    match uri.rfind('/') {
        Some(0) => "/",
        Some(index) => &uri[..index],
        None => ".",
    }
}

/// Render the `moduleInfo` file for the declared module graph.
///
/// Modules are listed in declaration order; names and uris are written
/// between single quotes as they appear in the config.
pub fn render_module_info(declared: &DeclaredModuleInfo) -> String {
    let mut info = String::from("{\n");
    let mut uris = String::from("{\n");
    for (name, uri) in &declared.uris {
        let deps = declared
            .info
            .get(name)
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_str)
                    .map(|dep| format!("'{dep}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        info.push_str(&format!("    '{name}': [{deps}],\n"));
        uris.push_str(&format!(
            "    '{name}': TrustedResourceUrl.fromConstant(Const.from('{}')),\n",
            uri.as_str().unwrap_or_default()
        ));
    }
    info.push_str("  }");
    uris.push_str("  }");

    format!(
        "goog.module('moduleInfo');\n\n\
         const Const = goog.require('goog.string.Const');\n\
         const TrustedResourceUrl = goog.require('goog.html.TrustedResourceUrl');\n\n\
         exports = {{\n  moduleInfo: {info},\n  trustedUris: {uris},\n}};"
    )
}
