use crate::config::{Settings, SettingsOverrides};
use crate::error::{CliError, ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::Path;
use tracing::debug;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "clasp.json";

const ENV_PREFIX: &str = "CLASP_";
const ENV_KEYS: &[&str] = &["js", "cache_file", "format", "bootstrap"];

impl Settings {
    /// Load settings from multiple sources.
    /// Priority: CLI args > environment variables > settings file > defaults
    ///
    /// `settings_file` replaces the `clasp.json` lookup in `root` and must
    /// exist. Relative paths are kept as written and resolved by the scanner
    /// against the working directory.
    pub fn load(
        root: &Path,
        settings_file: Option<&Path>,
        overrides: &SettingsOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let file = match settings_file {
            Some(path) if !path.is_file() => return Err(CliError::FileNotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = root.join(SETTINGS_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = &file {
            debug!(path = %path.display(), "merging settings file");
            figment = figment.merge(Json::file(path));
        }

        // CLASP_JS, CLASP_CACHE_FILE, CLASP_FORMAT, CLASP_BOOTSTRAP
        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));

        // CLI args override everything, but only the ones actually given
        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().map_err(|e| {
            let field = if e.path.is_empty() {
                "settings".to_string()
            } else {
                e.path.join(".")
            };
            ConfigError::InvalidValue {
                field,
                value: e.to_string(),
                hint: format!("Check {} and CLASP_* environment variables", SETTINGS_FILE_NAME),
            }
            .into()
        })
    }
}
