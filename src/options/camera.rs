use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the renderer centers the molecule before translating it.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CenterMode {
    /// Center on the bounding box.
    #[default]
    Auto,
    /// Center on the coordinate centroid.
    Cen,
}

impl CenterMode {
    /// Keyword used in the script.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cen => "cen",
        }
    }

    /// Parse a script keyword.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.trim() {
            "auto" => Some(Self::Auto),
            "cen" => Some(Self::Cen),
            _ => None,
        }
    }
}

impl fmt::Display for CenterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation applied after centering, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "axes", rename_all = "snake_case")]
pub enum Rotation {
    /// Single rotation about the viewing axis.
    Z {
        /// Angle about z.
        z: f64,
    },
    /// Rotations about x, then y, then z.
    Xyz {
        /// Angle about x.
        x: f64,
        /// Angle about y.
        y: f64,
        /// Angle about z.
        z: f64,
    },
}

impl Default for Rotation {
    fn default() -> Self {
        Self::Z { z: 90.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Centering, translation, scale and rotation of the molecule.
pub struct CameraOptions {
    /// Centering mode.
    #[schemars(title = "Center Type")]
    pub center: CenterMode,
    /// Translation in angstroms after centering.
    #[schemars(title = "Translation")]
    pub translation: [f64; 3],
    /// Pixels per angstrom.
    #[schemars(title = "Scale Factor", range(min = 0.1, max = 100.0), extend("step" = 0.5))]
    pub scale: f64,
    /// Rotation in degrees.
    #[schemars(title = "Rotation")]
    pub rotation: Rotation,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            center: CenterMode::Auto,
            translation: [0.0, 0.0, 0.0],
            scale: 12.0,
            rotation: Rotation::default(),
        }
    }
}
