use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Illustration", inline)]
#[serde(default)]
/// Outline thresholds for contours, subunit borders and residue borders.
pub struct IllustrationOptions {
    #[schemars(title = "Contour Low", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Lower gradient threshold for contour outlines.
    pub contour_low: f64,
    #[schemars(title = "Contour High", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Upper gradient threshold for contour outlines.
    pub contour_high: f64,
    #[schemars(title = "Kernel", range(min = 1, max = 8))]
    /// Outline kernel size.
    pub kernel: i32,
    #[schemars(title = "Diff Min", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Minimum z difference for an outline.
    pub diff_min: f64,
    #[schemars(title = "Diff Max", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// z difference giving a full-strength outline.
    pub diff_max: f64,
    #[schemars(title = "Subunit Low", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Lower threshold for subunit outlines.
    pub subunit_low: f64,
    #[schemars(title = "Subunit High", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Upper threshold for subunit outlines.
    pub subunit_high: f64,
    #[schemars(title = "Residue Low", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Lower threshold for residue outlines.
    pub residue_low: f64,
    #[schemars(title = "Residue High", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    /// Upper threshold for residue outlines.
    pub residue_high: f64,
    #[schemars(title = "Residue Diff", range(min = 0.0, max = 10000.0), extend("step" = 100.0))]
    /// Residue number difference that starts a new outline group.
    pub residue_diff: f64,
}

impl Default for IllustrationOptions {
    fn default() -> Self {
        Self {
            contour_low: 3.0,
            contour_high: 10.0,
            kernel: 4,
            diff_min: 0.0,
            diff_max: 5.0,
            subunit_low: 3.0,
            subunit_high: 10.0,
            residue_low: 3.0,
            residue_high: 8.0,
            residue_diff: 6000.0,
        }
    }
}
