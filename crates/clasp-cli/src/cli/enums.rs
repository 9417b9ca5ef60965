use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How command results are printed on stdout
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One item per line
    #[default]
    #[value(name = "text")]
    Text,

    /// A single JSON document
    #[value(name = "json")]
    Json,
}
