//! Per-atom-type colors and radii.

mod palette;
mod rgb;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use palette::{default_color, element_color, element_radius, palette_color};
pub use rgb::Rgb;

use crate::pdb::RecordKind;
use crate::select::TypeKey;

/// Radius for ATOM types with no assignment and no table entry.
pub const DEFAULT_ATOM_RADIUS: f32 = 1.6;
/// Radius for HETATM types with no assignment and no table entry.
pub const DEFAULT_HETATM_RADIUS: f32 = 1.5;

/// User-chosen style for one atom type. Unset fields fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    /// Explicit color.
    pub color: Option<Rgb>,
    /// Explicit radius in angstroms.
    pub radius: Option<f32>,
}

/// Colors and radii keyed by `(chain, atom type)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleAssignment {
    entries: BTreeMap<TypeKey, Style>,
}

impl StyleAssignment {
    /// Empty assignment: every type uses its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color for `key`.
    pub fn set_color(&mut self, key: TypeKey, color: Rgb) {
        self.entries.entry(key).or_default().color = Some(color);
    }

    /// Set the radius for `key`.
    pub fn set_radius(&mut self, key: TypeKey, radius: f32) {
        self.entries.entry(key).or_default().radius = Some(radius);
    }

    /// Drop any explicit style for `key`.
    pub fn clear(&mut self, key: &TypeKey) {
        let _ = self.entries.remove(key);
    }

    /// Explicit style for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &TypeKey) -> Option<&Style> {
        self.entries.get(key)
    }

    /// Effective color: explicit, else the chain-tinted default.
    #[must_use]
    pub fn color(&self, key: &TypeKey) -> Rgb {
        self.get(key)
            .and_then(|s| s.color)
            .unwrap_or_else(|| default_color(key.chain, &key.atom.to_string()))
    }

    /// Effective radius: explicit, else the element table, else the
    /// per-record-kind fallback.
    #[must_use]
    pub fn radius(&self, key: &TypeKey) -> f32 {
        if let Some(r) = self.get(key).and_then(|s| s.radius) {
            return r;
        }
        element_radius(&key.atom.to_string()).unwrap_or(match key.kind() {
            RecordKind::Atom => DEFAULT_ATOM_RADIUS,
            RecordKind::Hetatm => DEFAULT_HETATM_RADIUS,
        })
    }
}

/// Starting colors for a freshly populated job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// Chain base color tinted per element.
    #[default]
    Chain,
    /// Pastel palette of the chain, one entry per atom type in turn.
    Palette,
    /// Conventional element colors; chain tint for names outside the table.
    Element,
}

impl ColorScheme {
    /// Color for `key`, the `index`-th type offered in its chain.
    #[must_use]
    pub fn color(self, key: &TypeKey, index: usize) -> Rgb {
        let label = key.atom.to_string();
        match self {
            Self::Chain => default_color(key.chain, &label),
            Self::Palette => palette_color(key.chain, index),
            Self::Element => element_color(&label)
                .unwrap_or_else(|| default_color(key.chain, &label)),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chain => "chain",
            Self::Palette => "palette",
            Self::Element => "element",
        })
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chain" => Ok(Self::Chain),
            "palette" => Ok(Self::Palette),
            "element" => Ok(Self::Element),
            other => Err(format!(
                "unknown color scheme {other:?} (chain, palette or element)"
            )),
        }
    }
}
