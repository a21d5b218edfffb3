//! Grouping policy for the builder.
//!
//! Every collection name, mode name and group key the builder relies on lives
//! here so the policy can be read (and overridden from a JSON file) in one
//! place. [`BuildConfig::default`] is the policy the design files are
//! authored against.

use std::path::Path;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::store;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub color: ColorConfig,
    pub typography: CollectionConfig,
    pub size: SizeConfig,
    pub state: CollectionConfig,
    pub styles: StylesConfig,
    pub backups: BackupConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            color: ColorConfig::default(),
            typography: CollectionConfig {
                collection: "Typography".to_string(),
                mode: "Default".to_string(),
                groups: keys(&["family", "weight", "size", "height", "spacing"]),
            },
            size: SizeConfig::default(),
            state: CollectionConfig {
                collection: "State".to_string(),
                mode: "Mode 1".to_string(),
                groups: keys(&["interaction"]),
            },
            styles: StylesConfig::default(),
            backups: BackupConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Reads a policy file. Omitted sections keep their defaults, as do omitted
    /// fields of the colour, size, styles and backup sections; a typography or
    /// state section must be given in full.
    pub fn load(path: &Path) -> Result<Self> {
        let config = store::read_json(path)?;
        tracing::debug!(path = %path.display(), "loaded build config");
        Ok(config)
    }
}

/// A collection read from a single, fixed mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub collection: String,
    pub mode: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    pub collection: String,
    pub light_mode: String,
    pub dark_mode: String,
    pub groups: Vec<String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            collection: "Color".to_string(),
            light_mode: "Light".to_string(),
            dark_mode: "Dark".to_string(),
            groups: keys(&[
                "background",
                "border",
                "icon",
                "link",
                "skeleton",
                "text",
                "opacity",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeConfig {
    pub collection: String,
    pub mode: String,
    pub groups: Vec<String>,
    /// Group that also receives the colour collection's `<group>/` variables,
    /// read from its light mode.
    pub stroke_group: String,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            collection: "Size".to_string(),
            mode: "Mode 1".to_string(),
            groups: keys(&["spacing", "radius", "stroke"]),
            stroke_group: "stroke".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylesConfig {
    pub groups: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            groups: keys(&["heading", "body", "technical"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupConfig {
    /// Directory name, created next to the output file.
    pub dir: String,
    pub keep: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: ".backups".to_string(),
            keep: 10,
        }
    }
}

/// Display label for a group key, e.g. `background` -> `Background`.
pub fn group_label(key: &str) -> String {
    key.to_case(Case::Title)
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(group_label("background"), "Background");
        assert_eq!(group_label("interaction"), "Interaction");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: BuildConfig =
            serde_json::from_str(r#"{ "backups": { "keep": 3 }, "size": { "mode": "Base" } }"#)
                .unwrap();
        assert_eq!(config.backups.keep, 3);
        assert_eq!(config.backups.dir, ".backups");
        assert_eq!(config.size.mode, "Base");
        assert_eq!(config.size.stroke_group, "stroke");
        assert_eq!(config.color, ColorConfig::default());
        assert_eq!(config.typography.mode, "Default");
    }
}
