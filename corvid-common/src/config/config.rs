// See config.toml for information on the variables here.

use std::path::Path;

use serde::Deserialize;

/// Framework configuration, deserialised from TOML.
///
/// The config is loaded once at startup and owned by the handler object.
/// Every part of the framework that needs it receives it through the
/// handler, never through ambient state.
#[derive(Clone, Debug, Deserialize)]
pub struct CorvidConfig {
    #[serde(default)]
    pub prefix: Prefixes,
    /// User IDs allowed to run owner-only commands.
    #[serde(default)]
    pub owners: Vec<u64>,
    #[serde(default)]
    pub dev: DevAttributes,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Prefixes {
    pub default: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Prefixes {
            default: "-".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DevAttributes {
    /// When set, disables all other prefixes.
    pub prefix_override: Option<String>,
    /// Process messages authored by other bots. Off unless you know you
    /// need it.
    #[serde(default)]
    pub process_bot_messages: bool,
}

impl CorvidConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<CorvidConfig>(raw)?)
    }
}

impl Default for CorvidConfig {
    fn default() -> Self {
        CorvidConfig {
            prefix: Prefixes::default(),
            owners: vec![],
            dev: DevAttributes::default(),
        }
    }
}
