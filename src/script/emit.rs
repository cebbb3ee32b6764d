use crate::card::Card;
use crate::options::{Rotation, ViewConfig};

/// Build the complete command script.
///
/// The result is the exact text handed to the renderer; writing it anywhere
/// is up to the caller.
#[must_use]
pub fn emit(
    pdb_path: &str,
    cards: &[Card],
    view: &ViewConfig,
    output: &str,
) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(cards.len() + 32);

    lines.push("read".to_owned());
    lines.push(pdb_path.to_owned());
    lines.extend(cards.iter().map(ToString::to_string));
    lines.push("END".to_owned());

    let camera = &view.camera;
    lines.push("center".to_owned());
    lines.push(camera.center.as_str().to_owned());
    lines.push("trans".to_owned());
    lines.push(join(&camera.translation.map(real)));
    lines.push("scale".to_owned());
    lines.push(real(camera.scale));
    match camera.rotation {
        Rotation::Z { z } => {
            lines.push("zrot".to_owned());
            lines.push(real(z));
        }
        Rotation::Xyz { x, y, z } => {
            for (axis, angle) in [("xrot", x), ("yrot", y), ("zrot", z)] {
                lines.push(axis.to_owned());
                lines.push(real(angle));
            }
        }
    }

    lines.push("wor".to_owned());
    lines.extend(world_lines(view));

    lines.push("illustrate".to_owned());
    lines.extend(illustration_lines(view));

    lines.push("calculate".to_owned());
    lines.push(output.to_owned());

    lines.join("\n")
}

/// The three argument lines of `wor`: 8 color/fog fields, 5 shadow fields,
/// 2 image size fields.
#[must_use]
pub fn world_lines(view: &ViewConfig) -> [String; 3] {
    let w = &view.world;
    let s = &view.shadow;

    let mut colors: Vec<String> =
        w.background.iter().chain(&w.fog).map(|&v| real(v)).collect();
    colors.push(real(w.fog_front));
    colors.push(real(w.fog_back));

    [
        join(&colors),
        join(&[
            s.flag.to_string(),
            real(s.contribution),
            real(s.angle),
            real(s.z),
            real(s.max),
        ]),
        format!("{},{}", w.size_x, w.size_y),
    ]
}

/// The three argument lines of `illustrate`: contour, subunit and residue
/// outline thresholds.
#[must_use]
pub fn illustration_lines(view: &ViewConfig) -> [String; 3] {
    let i = &view.illustration;
    [
        join(&[
            real(i.contour_low),
            real(i.contour_high),
            i.kernel.to_string(),
            real(i.diff_min),
            real(i.diff_max),
        ]),
        join(&[real(i.subunit_low), real(i.subunit_high)]),
        join(&[
            real(i.residue_low),
            real(i.residue_high),
            real(i.residue_diff),
        ]),
    ]
}

/// Shortest round-trippable decimal, always with a fractional part
/// (`12.0`, `0.0023`).
#[must_use]
pub fn real(v: f64) -> String {
    format!("{v:?}")
}

fn join(parts: &[String]) -> String {
    parts.join(",")
}
