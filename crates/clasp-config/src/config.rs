//! The module config document.

use std::path::{Path, PathBuf};

use clasp_graph::{ModuleDescriptor, ModuleGraphBuilder, WrapperOptions, wrapper};
use path_clean::PathClean;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Parsed module config: build-wide options plus the module declarations.
///
/// ```json
/// {
///   "outputPath": "build/",
///   "productionUri": "https://cdn.example.com/js/",
///   "globalScopeName": "app",
///   "modules": {
///     "root":  { "inputs": ["src/main.js"] },
///     "child": { "deps": "root", "inputs": "src/child.js" }
///   }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Prefix for compiled module files, as given or resolved against the
    /// config directory.
    pub output_path: Option<String>,
    pub production_uri: Option<String>,
    pub global_scope_name: Option<String>,
    pub rename_prefix_namespace: String,
    /// Module declarations in document order.
    pub modules: Vec<ModuleDescriptor>,
    /// Directory relative paths were resolved against, if any.
    pub base_dir: Option<PathBuf>,
}

impl ModuleConfig {
    /// Parse a config document without touching the file system.
    ///
    /// Relative paths are kept as written; see [`ModuleConfig::resolve_paths`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some("the config document must be a JSON object".to_string()),
        })?;

        let global_scope_name = optional_string(object.get("globalScopeName"), "globalScopeName", "Wrong scope name.")?;
        let output_path = optional_string(object.get("outputPath"), "outputPath", "Empty output path.")?;
        let production_uri =
            optional_string(object.get("productionUri"), "productionUri", "Empty production uri.")?;
        let rename_prefix_namespace = optional_string(
            object.get("renamePrefixNamespace"),
            "renamePrefixNamespace",
            "Wrong field 'renamePrefixNamespace'.",
        )?
        .unwrap_or_else(|| wrapper::DEFAULT_RENAME_PREFIX_NAMESPACE.to_string());

        let modules = match object.get("modules") {
            Some(Value::Object(modules)) if !modules.is_empty() => modules
                .iter()
                .map(|(name, descriptor)| ModuleDescriptor::from_value(name, descriptor))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(Value::Object(_)) | None | Some(Value::Null) => {
                return Err(ConfigError::MissingModules);
            }
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    field: "modules".to_string(),
                    hint: Some("expected an object of module descriptors".to_string()),
                });
            }
        };

        Ok(Self {
            output_path,
            production_uri,
            global_scope_name,
            rename_prefix_namespace,
            modules,
            base_dir: None,
        })
    }

    /// Resolve relative inputs and the output path against `base_dir`.
    pub fn resolve_paths(mut self, base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        for module in &mut self.modules {
            for input in &mut module.inputs {
                *input = resolve(base_dir, input);
            }
        }
        if let Some(output) = self.output_path.take() {
            let trailing = output.ends_with('/') || output.ends_with('\\');
            let mut resolved = resolve(base_dir, Path::new(&output)).display().to_string();
            if trailing && !resolved.ends_with(std::path::MAIN_SEPARATOR) {
                resolved.push(std::path::MAIN_SEPARATOR);
            }
            self.output_path = Some(resolved);
        }
        self.base_dir = Some(base_dir.to_path_buf());
        self
    }

    /// Every module input, in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.modules.iter().flat_map(|m| m.inputs.iter())
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    /// Hand the declarations to the graph builder.
    pub fn builder(&self) -> ModuleGraphBuilder {
        self.modules
            .iter()
            .cloned()
            .fold(ModuleGraphBuilder::new(), ModuleGraphBuilder::module)
    }

    pub fn wrapper_options(&self) -> WrapperOptions {
        WrapperOptions {
            production_uri: self.production_uri.clone().unwrap_or_default(),
            global_scope_name: self.global_scope_name.clone(),
            rename_prefix_namespace: self.rename_prefix_namespace.clone(),
        }
    }

    pub fn require_output_path(&self) -> Result<&str> {
        self.output_path
            .as_deref()
            .ok_or(ConfigError::MissingField("outputPath"))
    }

    pub fn require_production_uri(&self) -> Result<&str> {
        self.production_uri
            .as_deref()
            .ok_or(ConfigError::MissingField("productionUri"))
    }

    /// Declared module info straight from the document, without scanning.
    ///
    /// Each module maps to its declared `deps` and production uri. Requires
    /// `productionUri`.
    pub fn declared_info(&self) -> Result<DeclaredModuleInfo> {
        let production_uri = self.require_production_uri()?;
        let mut info = serde_json::Map::new();
        let mut uris = serde_json::Map::new();
        for module in &self.modules {
            info.insert(module.name.clone(), Value::from(module.deps.clone()));
            uris.insert(
                module.name.clone(),
                Value::from(format!("{production_uri}{}.js", module.name)),
            );
        }
        Ok(DeclaredModuleInfo { info, uris })
    }
}

/// `MODULE_INFO` / `MODULE_URIS` maps computed from the declarations alone.
#[derive(Debug, Clone, Serialize)]
pub struct DeclaredModuleInfo {
    pub info: serde_json::Map<String, Value>,
    pub uris: serde_json::Map<String, Value>,
}

fn optional_string(value: Option<&Value>, field: &str, hint: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            hint: Some(hint.to_string()),
        }),
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        base_dir.join(path).clean()
    }
}
