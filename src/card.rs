//! Render directives ("cards") in the renderer's selection grammar.
//!
//! A card binds a wildcard pattern over PDB columns 13-22 to a color and a
//! radius:
//!
//! ```text
//! ATOM  -C-------A 0,9999, 1.0,0.7,0.7, 1.6
//! ^^^^^^ record    ^^^^^^ residue range
//!       ^^^^ atom name, then alt-loc, residue name, blank, chain
//! ```
//!
//! `-` matches any character. The renderer applies the first card that
//! matches an atom, so card order is significant.

use std::fmt;
use std::str::FromStr;

use crate::pdb::{RecordKind, WATER_RESIDUE};
use crate::style::Rgb;

/// Width of the wildcard pattern (PDB columns 13-22).
pub const PATTERN_WIDTH: usize = 10;

/// Residue range covering every residue number.
pub const ALL_RESIDUES: (i32, i32) = (0, 9999);

/// One line of the renderer's selection block.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Record type the card applies to.
    pub kind: RecordKind,
    /// Ten-column wildcard pattern.
    pub pattern: String,
    /// Inclusive residue number range.
    pub residues: (i32, i32),
    /// Color, one decimal per channel on output.
    pub color: Rgb,
    /// Sphere radius in angstroms; never negative.
    pub radius: f32,
}

impl Card {
    /// A card over every residue number. Negative or NaN radii become `0`.
    #[must_use]
    pub fn new(
        kind: RecordKind,
        pattern: String,
        color: Rgb,
        radius: f32,
    ) -> Self {
        Self {
            kind,
            pattern,
            residues: ALL_RESIDUES,
            color,
            radius: normalize_radius(radius),
        }
    }

    /// Hide every water atom.
    #[must_use]
    pub fn water_suppression() -> Self {
        Self::new(
            RecordKind::Hetatm,
            pattern("----", Some(WATER_RESIDUE), None),
            Rgb::NEUTRAL,
            0.0,
        )
    }

    /// Hide hydrogens under both naming conventions: name starting in column
    /// 14 (`-H--`) and in column 13 (`H---`).
    #[must_use]
    pub fn hydrogen_suppression() -> [Self; 2] {
        ["-H--", "H---"].map(|field| {
            Self::new(
                RecordKind::Atom,
                pattern(field, None, None),
                Rgb::NEUTRAL,
                0.0,
            )
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = self.residues;
        write!(
            f,
            "{}{} {lo},{hi}, {}, {:?}",
            self.kind.as_columns(),
            self.pattern,
            self.color,
            self.radius
        )
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let head_len = 6 + PATTERN_WIDTH;
        let head = line
            .get(..head_len)
            .ok_or_else(|| format!("card shorter than {head_len} columns"))?;
        let record = &head.as_bytes()[..6];
        let kind = RecordKind::from_columns(record).ok_or_else(|| {
            format!(
                "unknown record name {:?}",
                String::from_utf8_lossy(record)
            )
        })?;
        let pattern = head
            .get(6..)
            .ok_or_else(|| "pattern is not ASCII".to_owned())?
            .to_owned();

        let fields: Vec<&str> =
            line[head_len..].split(',').map(str::trim).collect();
        let [lo, hi, r, g, b, radius] = fields.as_slice() else {
            return Err(format!(
                "expected 6 comma-separated values, found {}",
                fields.len()
            ));
        };
        let int = |s: &str| {
            s.parse::<i32>().map_err(|e| format!("bad residue {s:?}: {e}"))
        };
        let real = |s: &str| {
            s.parse::<f32>().map_err(|e| format!("bad number {s:?}: {e}"))
        };

        Ok(Self {
            kind,
            pattern,
            residues: (int(*lo)?, int(*hi)?),
            color: Rgb::new(real(*r)?, real(*g)?, real(*b)?),
            radius: normalize_radius(real(*radius)?),
        })
    }
}

/// Assemble a ten-column pattern from an atom-name field, optional residue
/// and optional chain. Missing parts become wildcards.
#[must_use]
pub fn pattern(
    atom_field: &str,
    residue: Option<&str>,
    chain: Option<char>,
) -> String {
    let mut out = String::with_capacity(PATTERN_WIDTH);
    out.extend(pad(atom_field, 4));
    out.push('-');
    out.extend(pad(residue.unwrap_or(""), 3));
    out.push('-');
    out.push(chain.unwrap_or('-'));
    out
}

/// Format a card line from pre-normalized float channels at two decimals.
///
/// Channels are clamped to `[0, 1]` and the radius to `>= 0`.
#[must_use]
pub fn atom_descriptor(
    kind: RecordKind,
    pattern: &str,
    residues: (i32, i32),
    rgb: [f32; 3],
    radius: f32,
) -> String {
    let (lo, hi) = residues;
    let [r, g, b] = rgb;
    format!(
        "{}{pattern} {lo},{hi}, {}, {:?}",
        kind.as_columns(),
        Rgb::new(r, g, b).to_two_decimals(),
        normalize_radius(radius)
    )
}

fn pad(field: &str, width: usize) -> impl Iterator<Item = char> + '_ {
    field
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .chain(std::iter::repeat('-'))
        .take(width)
}

fn normalize_radius(r: f32) -> f32 {
    if r.is_nan() {
        0.0
    } else {
        r.max(0.0)
    }
}
