use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// An RGB color with channels in `[0, 1]`.
///
/// Serializes as a `#RRGGBB` hex string, the form colors are entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb([f32; 3]);

impl Rgb {
    /// Neutral gray used for suppression cards and unknown chains.
    pub const NEUTRAL: Self = Self([0.5, 0.5, 0.5]);

    /// Build a color, clamping every channel into `[0, 1]`.
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([clamp_unit(r), clamp_unit(g), clamp_unit(b)])
    }

    /// Build a color from 8-bit channels.
    #[must_use]
    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ])
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidColor`] unless the input is six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, GenError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GenError::InvalidColor(hex.to_owned()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| GenError::InvalidColor(hex.to_owned()))
        };
        Ok(Self::from_bytes([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// `#rrggbb` representation, rounding each channel to the nearest byte.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Channels rounded to the nearest byte.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        self.0.map(|c| (c * 255.0).round() as u8)
    }

    /// Raw channel values.
    #[must_use]
    pub const fn channels(self) -> [f32; 3] {
        self.0
    }

    /// Comma-joined channels at two decimals (`1.00,0.00,0.00`).
    #[must_use]
    pub fn to_two_decimals(self) -> String {
        let [r, g, b] = self.0;
        format!("{r:.2},{g:.2},{b:.2}")
    }
}

/// Comma-joined channels at one decimal (`1.0,0.0,0.0`), the precision used
/// on card lines.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r:.1},{g:.1},{b:.1}")
    }
}

impl FromStr for Rgb {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = GenError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_at_both_precisions() {
        let red = Rgb::from_hex("#FF0000").unwrap();
        assert_eq!(red.to_string(), "1.0,0.0,0.0");
        assert_eq!(red.to_two_decimals(), "1.00,0.00,0.00");
    }

    #[test]
    fn hex_round_trip_and_errors() {
        let c = Rgb::from_hex("ffb3ba").unwrap();
        assert_eq!(c.to_hex(), "#ffb3ba");
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn channels_are_clamped() {
        let c = Rgb::new(1.7, -0.2, f32::NAN);
        assert_eq!(c.channels(), [1.0, 0.0, 0.0]);
    }
}
