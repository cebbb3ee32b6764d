//! View parameters with TOML preset support.
//!
//! Everything the renderer needs besides the structure and the cards:
//! camera placement, world (background, fog, image size), shadows and
//! illustration outlines. Every field is a plain numeric leaf with no
//! cross-field invariants. Options serialize to/from TOML so a view can be
//! saved as a preset and reused across structures.

mod camera;
mod illustration;
mod world;

use std::path::Path;

pub use camera::{CameraOptions, CenterMode, Rotation};
pub use illustration::IllustrationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use world::{ShadowOptions, WorldOptions};

use crate::error::GenError;

/// Top-level view configuration. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[shadow]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ViewConfig {
    /// Centering, translation, scale and rotation.
    pub camera: CameraOptions,
    /// Background, fog and image size.
    pub world: WorldOptions,
    /// Cast shadows.
    pub shadow: ShadowOptions,
    /// Outline thresholds.
    pub illustration: IllustrationOptions,
}

impl ViewConfig {
    /// Generate JSON Schema describing the form fields.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewConfig)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the file cannot be read and
    /// [`GenError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let content = std::fs::read_to_string(path).map_err(GenError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GenError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GenError::OptionsParse`] if serialization fails and
    /// [`GenError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GenError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GenError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GenError::Io)?;
        }
        std::fs::write(path, content).map_err(GenError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewConfig::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
center = "cen"

[camera.rotation]
axes = "xyz"
x = 10.0
y = 20.0
z = 30.0

[shadow]
flag = 0
"#;
        let opts: ViewConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.center, CenterMode::Cen);
        assert_eq!(
            opts.camera.rotation,
            Rotation::Xyz {
                x: 10.0,
                y: 20.0,
                z: 30.0
            }
        );
        assert_eq!(opts.shadow.flag, 0);
        // Everything else should be default
        assert_eq!(opts.camera.scale, 12.0);
        assert_eq!(opts.shadow.contribution, 0.0023);
        assert_eq!(opts.world.size_x, -30);
        assert_eq!(opts.illustration.residue_diff, 6000.0);
    }

    #[test]
    fn presets_are_listed_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let mut flat = ViewConfig::default();
        flat.shadow.flag = 0;
        flat.save(&dir.path().join("flat.toml")).unwrap();
        ViewConfig::default()
            .save(&dir.path().join("classic.toml"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(ViewConfig::list_presets(dir.path()), ["classic", "flat"]);
        assert_eq!(ViewConfig::load(&dir.path().join("flat.toml")).unwrap(), flat);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(ViewConfig::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("world"));
        assert!(props.contains_key("shadow"));
        assert!(props.contains_key("illustration"));

        let shadow = &props["shadow"]["properties"];
        assert!(shadow.get("contribution").is_some());
        assert_eq!(shadow["angle"]["title"], "Shadow Angle");
    }
}
