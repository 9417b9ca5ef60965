//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use crate::config::ModuleConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ModuleConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use clasp_config::{ConfigValidator, ModuleConfig, SchemaValidator};
/// use serde_json::json;
///
/// let config = ModuleConfig::from_value(&json!({
///     "modules": { "root": { "inputs": "main.js" } }
/// }))
/// .unwrap();
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ModuleConfig) -> Result<()> {
        for module in &config.modules {
            if module.name.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "module names cannot be empty".to_string(),
                    hint: Some("Give every entry under 'modules' a name".to_string()),
                });
            }
            // `name:count:parent` is split on ':'
            if module.name.contains(':') {
                return Err(ConfigError::SchemaValidation {
                    message: format!("module name '{}' contains ':'", module.name),
                    hint: Some("Module names are passed to --module and cannot contain ':'".to_string()),
                });
            }
            if module.inputs.iter().any(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::SchemaValidation {
                    message: format!("module '{}' has an empty input path", module.name),
                    hint: Some("Remove empty strings from the 'inputs' array".to_string()),
                });
            }
        }

        if !is_identifier(&config.rename_prefix_namespace) {
            return Err(ConfigError::SchemaValidation {
                message: format!(
                    "renamePrefixNamespace '{}' is not a valid identifier",
                    config.rename_prefix_namespace
                ),
                hint: Some("Use a plain identifier such as 'z'".to_string()),
            });
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that every module input exists.
pub struct FsValidator;

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ModuleConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for module in &config.modules {
            for input in &module.inputs {
                let path = match &config.base_dir {
                    Some(base) if input.is_relative() => base.join(input),
                    _ => input.clone(),
                };
                if !path.exists() {
                    return Err(ConfigError::InputNotFound {
                        module: module.name.clone(),
                        path,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Convenience function for schema validation
pub fn validate_schema(config: &ModuleConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &ModuleConfig) -> Result<()> {
    FsValidator.validate(config)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn colon_in_module_name_is_rejected() {
        let config = ModuleConfig::from_value(&json!({
            "modules": { "root:main": { "inputs": "a.js" } }
        }))
        .unwrap();
        assert!(matches!(
            validate_schema(&config),
            Err(ConfigError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn rename_prefix_must_be_identifier() {
        let config = ModuleConfig::from_value(&json!({
            "renamePrefixNamespace": "1z",
            "modules": { "root": { "inputs": "a.js" } }
        }))
        .unwrap();
        assert!(validate_schema(&config).is_err());
        assert!(is_identifier("$app_1"));
    }
}
