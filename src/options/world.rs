use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "World", inline)]
#[serde(default)]
/// Background, fog and image size.
pub struct WorldOptions {
    /// Background RGB.
    #[schemars(title = "Background Color")]
    pub background: [f64; 3],
    /// Fog RGB.
    #[schemars(title = "Fog Color")]
    pub fog: [f64; 3],
    /// Fog opacity at the front of the molecule.
    #[schemars(title = "Front Fog Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub fog_front: f64,
    /// Fog opacity at the back of the molecule.
    #[schemars(title = "Back Fog Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub fog_back: f64,
    /// Image width in pixels; negative values pad the molecule's extent.
    #[schemars(title = "Size X")]
    pub size_x: i32,
    /// Image height in pixels; negative values pad the molecule's extent.
    #[schemars(title = "Size Y")]
    pub size_y: i32,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            background: [1.0, 1.0, 1.0],
            fog: [1.0, 1.0, 1.0],
            fog_front: 1.0,
            fog_back: 1.0,
            size_x: -30,
            size_y: -30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Shadows", inline)]
#[serde(default)]
/// Cast-shadow parameters.
pub struct ShadowOptions {
    /// `1` enables shadows, `0` disables them.
    #[schemars(title = "Shadow Flag", range(min = 0, max = 1))]
    pub flag: i32,
    /// Darkening contributed per occluding atom.
    #[schemars(title = "Shadow Contribution", range(min = 0.0, max = 0.1), extend("step" = 0.0001))]
    pub contribution: f64,
    /// Cone angle of the shadow test.
    #[schemars(title = "Shadow Angle", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub angle: f64,
    /// Minimum z separation before an atom shadows another.
    #[schemars(title = "Shadow Z", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub z: f64,
    /// Maximum total darkening.
    #[schemars(title = "Shadow Max", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub max: f64,
}

impl Default for ShadowOptions {
    fn default() -> Self {
        Self {
            flag: 1,
            contribution: 0.0023,
            angle: 2.0,
            z: 1.0,
            max: 0.2,
        }
    }
}
