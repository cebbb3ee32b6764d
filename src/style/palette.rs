//! Fixed color and size tables used when the user has not chosen a style.
//!
//! Every chain `A`..`H` has a pastel base color; atom types within a chain
//! are tinted from it (nitrogen darker, oxygen lighter, sulfur more
//! saturated, phosphorus less saturated, anything else muted) so defaults are
//! distinct per atom type but consistent per chain.

use super::rgb::Rgb;

/// Pastel base color per chain, applied unchanged to carbon.
const CHAIN_BASE_COLORS: [(char, [u8; 3]); 8] = [
    ('A', [0xFF, 0xB3, 0xBA]),
    ('B', [0xBA, 0xE1, 0xFF]),
    ('C', [0xBA, 0xFF, 0xC9]),
    ('D', [0xFF, 0xD3, 0xB6]),
    ('E', [0xE2, 0xF0, 0xCB]),
    ('F', [0xC7, 0xCE, 0xEA]),
    ('G', [0xFF, 0xB3, 0xFF]),
    ('H', [0xFF, 0xFF, 0xBA]),
];

const PALETTE_1: [[u8; 3]; 5] = [
    [0xFF, 0xB3, 0xBA],
    [0xBA, 0xFF, 0xC9],
    [0xBA, 0xE1, 0xFF],
    [0xFF, 0xFF, 0xBA],
    [0xFF, 0xB3, 0xFF],
];
const PALETTE_2: [[u8; 3]; 5] = [
    [0xFF, 0xD3, 0xB6],
    [0xDC, 0xED, 0xC1],
    [0xB5, 0xEA, 0xD7],
    [0xC7, 0xCE, 0xEA],
    [0xE2, 0xF0, 0xCB],
];
const PALETTE_3: [[u8; 3]; 5] = [
    [0xF8, 0xB1, 0x95],
    [0xF6, 0x72, 0x80],
    [0xC0, 0x6C, 0x84],
    [0x6C, 0x5B, 0x7B],
    [0x35, 0x5C, 0x7D],
];
const PALETTE_4: [[u8; 3]; 5] = [
    [0xA8, 0xE6, 0xCF],
    [0xDC, 0xED, 0xC1],
    [0xFF, 0xD3, 0xB6],
    [0xFF, 0xAA, 0xA5],
    [0xFF, 0x8B, 0x94],
];
const PALETTE_5: [[u8; 3]; 5] = [
    [0xB5, 0xEA, 0xD7],
    [0xC7, 0xCE, 0xEA],
    [0xE2, 0xF0, 0xCB],
    [0xFF, 0xDA, 0xC1],
    [0xFF, 0xB7, 0xB2],
];

/// Five-color pastel palette per chain; `F`..`H` repeat `A`..`C`.
const CHAIN_PALETTES: [(char, &[[u8; 3]; 5]); 8] = [
    ('A', &PALETTE_1),
    ('B', &PALETTE_2),
    ('C', &PALETTE_3),
    ('D', &PALETTE_4),
    ('E', &PALETTE_5),
    ('F', &PALETTE_1),
    ('G', &PALETTE_2),
    ('H', &PALETTE_3),
];

/// Conventional pastel color per element symbol.
const ELEMENT_COLORS: [(&str, [u8; 3]); 20] = [
    ("C", [0xA0, 0xA0, 0xA0]),
    ("N", [0xA0, 0xA0, 0xFF]),
    ("O", [0xFF, 0xA0, 0xA0]),
    ("S", [0xFF, 0xFF, 0xA0]),
    ("P", [0xA0, 0xFF, 0xA0]),
    ("H", [0xFF, 0xFF, 0xFF]),
    ("F", [0xA0, 0xFF, 0xFF]),
    ("Cl", [0xA0, 0xFF, 0xA0]),
    ("Br", [0xFF, 0xA0, 0xA0]),
    ("I", [0xFF, 0xA0, 0xFF]),
    ("Na", [0xA0, 0xA0, 0xFF]),
    ("K", [0xA0, 0xA0, 0xFF]),
    ("Ca", [0xA0, 0xA0, 0xFF]),
    ("Mg", [0xA0, 0xA0, 0xFF]),
    ("Fe", [0xFF, 0xA0, 0xA0]),
    ("Zn", [0xA0, 0xA0, 0xA0]),
    ("Cu", [0xFF, 0xA0, 0xA0]),
    ("Mn", [0xA0, 0xA0, 0xA0]),
    ("Co", [0xA0, 0xA0, 0xA0]),
    ("Ni", [0xA0, 0xA0, 0xA0]),
];

/// Display radius in angstroms per element symbol.
const ELEMENT_RADII: [(&str, f32); 20] = [
    ("C", 1.6),
    ("N", 1.5),
    ("O", 1.5),
    ("S", 1.8),
    ("P", 1.8),
    ("H", 0.0),
    ("F", 0.5),
    ("Cl", 1.0),
    ("Br", 1.15),
    ("I", 1.4),
    ("Na", 1.5),
    ("K", 2.0),
    ("Ca", 1.8),
    ("Mg", 1.5),
    ("Fe", 2.0),
    ("Zn", 1.2),
    ("Cu", 1.2),
    ("Mn", 1.2),
    ("Co", 1.2),
    ("Ni", 1.2),
];

/// Default color for atom type `label` in `chain`.
///
/// Chains without a base color get [`Rgb::NEUTRAL`].
#[must_use]
pub fn default_color(chain: char, label: &str) -> Rgb {
    let Some(base) = chain_base(chain) else {
        return Rgb::NEUTRAL;
    };
    Rgb::from_bytes(tint(base, label))
}

/// Radius for an element symbol, matched case-insensitively (`FE` finds
/// `Fe`).
#[must_use]
pub fn element_radius(symbol: &str) -> Option<f32> {
    ELEMENT_RADII
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|&(_, r)| r)
}

/// Conventional color for an element symbol, matched case-insensitively.
#[must_use]
pub fn element_color(symbol: &str) -> Option<Rgb> {
    ELEMENT_COLORS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|&(_, c)| Rgb::from_bytes(c))
}

/// The `index`-th color of `chain`'s palette, cycling. Unknown chains use
/// chain `A`'s palette.
#[must_use]
pub fn palette_color(chain: char, index: usize) -> Rgb {
    let palette = CHAIN_PALETTES
        .iter()
        .find(|(c, _)| *c == chain)
        .map_or(&PALETTE_1, |&(_, p)| p);
    Rgb::from_bytes(palette[index % palette.len()])
}

fn chain_base(chain: char) -> Option<[u8; 3]> {
    CHAIN_BASE_COLORS
        .iter()
        .find(|(c, _)| *c == chain)
        .map(|&(_, base)| base)
}

fn tint(base: [u8; 3], label: &str) -> [u8; 3] {
    match label {
        "C" => base,
        "N" => base.map(|c| c.saturating_sub(40)),
        "O" => base.map(|c| c.saturating_add(40)),
        "S" => base.map(|c| scale(c, 12)),
        "P" => base.map(|c| scale(c, 8)),
        _ => base.map(|c| scale(c, 7)),
    }
}

/// `c * tenths / 10`, truncated and capped at 255.
fn scale(c: u8, tenths: u16) -> u8 {
    u8::try_from(u16::from(c) * tenths / 10).unwrap_or(u8::MAX)
}
