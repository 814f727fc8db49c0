use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// A label that should exist with exactly these attributes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DesiredLabel {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub desc: String,
}

/// Retire label `from`; its role (and attached issues) move to `to`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReplaceRule {
    pub from: String,
    pub to: String,
}

/// The desired-state document, as written by the operator.
///
/// ```json
/// {
///   "labels":  [ {"name": "bug", "color": "d73a4a", "desc": "Something broken"} ],
///   "replace": [ {"from": "defect", "to": "bug"} ],
///   "ignore":  [ "won*" ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelSettings {
    #[serde(default)]
    pub labels: Vec<DesiredLabel>,
    #[serde(default)]
    pub replace: Vec<ReplaceRule>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl LabelSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::SettingsNotFound {
            path: path.display().to_string(),
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Malformed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
