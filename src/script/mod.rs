//! Command script for the ILLUSTRATE renderer.
//!
//! [`emit`] turns a structure path, resolved cards and a [`ViewConfig`] into
//! the keyword/argument text the renderer reads on stdin. [`parse`] reads the
//! same grammar back, which makes saved scripts reusable as view presets.
//!
//! [`ViewConfig`]: crate::options::ViewConfig

mod emit;
mod parse;

pub use emit::{emit, illustration_lines, real, world_lines};
pub use parse::{parse, ParsedScript};

/// Image extension the renderer writes by default.
pub const IMAGE_EXTENSION: &str = "ppm";

/// Script extension used for generated scripts.
pub const SCRIPT_EXTENSION: &str = "inp";

/// Derive the output image name from an uploaded structure name.
///
/// A trailing `.pdb` is replaced by `.ppm`; any other name gets `.ppm`
/// appended.
#[must_use]
pub fn output_filename(name: &str) -> String {
    let stem = name.strip_suffix(".pdb").unwrap_or(name);
    format!("{stem}.{IMAGE_EXTENSION}")
}
