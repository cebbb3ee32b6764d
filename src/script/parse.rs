use std::str::FromStr;

use crate::card::Card;
use crate::error::GenError;
use crate::options::{CenterMode, Rotation, ViewConfig};

/// Everything recoverable from a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScript {
    /// Argument of `read`.
    pub pdb_path: String,
    /// Cards between `read` and `END`, in order.
    pub cards: Vec<Card>,
    /// View parameters; commands absent from the script keep defaults.
    pub view: ViewConfig,
    /// Argument of `calculate`.
    pub output: String,
}

/// Parse a script in the renderer's command grammar.
///
/// # Errors
///
/// Returns [`GenError::ScriptParse`] with the 1-based line of the first
/// unknown command, malformed argument line or missing `read`/`calculate`.
pub fn parse(text: &str) -> Result<ParsedScript, GenError> {
    let mut lines = Lines::new(text);
    let mut view = ViewConfig::default();
    let mut pdb_path = None;
    let mut cards = Vec::new();
    let mut output = None;
    let (mut xrot, mut yrot, mut zrot) = (None, None, None);

    while let Some((no, keyword)) = lines.next_nonblank() {
        match keyword.trim() {
            "read" => {
                pdb_path = Some(lines.arg("read")?.to_owned());
                loop {
                    let (no, line) = lines.arg_line("read")?;
                    if line.trim() == "END" {
                        break;
                    }
                    cards.push(line.parse::<Card>().map_err(|message| {
                        GenError::ScriptParse { line: no, message }
                    })?);
                }
            }
            "center" => {
                let (no, arg) = lines.arg_line("center")?;
                view.camera.center =
                    CenterMode::from_keyword(arg).ok_or_else(|| {
                        GenError::ScriptParse {
                            line: no,
                            message: format!("unknown center mode {arg:?}"),
                        }
                    })?;
            }
            "trans" => {
                let [x, y, z] = lines.reals::<3>("trans")?;
                view.camera.translation = [x, y, z];
            }
            "scale" => view.camera.scale = lines.reals::<1>("scale")?[0],
            "xrot" => xrot = Some(lines.reals::<1>("xrot")?[0]),
            "yrot" => yrot = Some(lines.reals::<1>("yrot")?[0]),
            "zrot" => zrot = Some(lines.reals::<1>("zrot")?[0]),
            "wor" => read_world(&mut lines, &mut view)?,
            "illustrate" => read_illustration(&mut lines, &mut view)?,
            "calculate" => output = Some(lines.arg("calculate")?.to_owned()),
            other => {
                return Err(GenError::ScriptParse {
                    line: no,
                    message: format!("unknown command {other:?}"),
                })
            }
        }
    }

    view.camera.rotation = match (xrot, yrot) {
        (None, None) => Rotation::Z {
            z: zrot.unwrap_or(0.0),
        },
        (x, y) => Rotation::Xyz {
            x: x.unwrap_or(0.0),
            y: y.unwrap_or(0.0),
            z: zrot.unwrap_or(0.0),
        },
    };

    let missing = |command: &str| GenError::ScriptParse {
        line: lines.last_line,
        message: format!("missing {command} command"),
    };
    Ok(ParsedScript {
        pdb_path: pdb_path.ok_or_else(|| missing("read"))?,
        cards,
        view,
        output: output.ok_or_else(|| missing("calculate"))?,
    })
}

fn read_world(lines: &mut Lines<'_>, view: &mut ViewConfig) -> Result<(), GenError> {
    let [br, bg, bb, fr, fg, fb, front, back] = lines.reals::<8>("wor")?;
    view.world.background = [br, bg, bb];
    view.world.fog = [fr, fg, fb];
    view.world.fog_front = front;
    view.world.fog_back = back;

    let (no, line) = lines.arg_line("wor")?;
    let [flag, contribution, angle, z, max] = split::<5>(no, line)?;
    view.shadow.flag = number(no, flag)?;
    view.shadow.contribution = number(no, contribution)?;
    view.shadow.angle = number(no, angle)?;
    view.shadow.z = number(no, z)?;
    view.shadow.max = number(no, max)?;

    let (no, line) = lines.arg_line("wor")?;
    let [x, y] = split::<2>(no, line)?;
    view.world.size_x = number(no, x)?;
    view.world.size_y = number(no, y)?;
    Ok(())
}

fn read_illustration(
    lines: &mut Lines<'_>,
    view: &mut ViewConfig,
) -> Result<(), GenError> {
    let ill = &mut view.illustration;

    let (no, line) = lines.arg_line("illustrate")?;
    let [low, high, kernel, diff_min, diff_max] = split::<5>(no, line)?;
    ill.contour_low = number(no, low)?;
    ill.contour_high = number(no, high)?;
    ill.kernel = number(no, kernel)?;
    ill.diff_min = number(no, diff_min)?;
    ill.diff_max = number(no, diff_max)?;

    [ill.subunit_low, ill.subunit_high] = lines.reals::<2>("illustrate")?;
    [ill.residue_low, ill.residue_high, ill.residue_diff] =
        lines.reals::<3>("illustrate")?;
    Ok(())
}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let (i, line) = self.inner.next()?;
        self.last_line = i + 1;
        Some((i + 1, line.strip_suffix('\r').unwrap_or(line)))
    }

    fn next_nonblank(&mut self) -> Option<(usize, &'a str)> {
        loop {
            let (no, line) = self.next_line()?;
            if !line.trim().is_empty() {
                return Some((no, line));
            }
        }
    }

    fn arg_line(&mut self, command: &str) -> Result<(usize, &'a str), GenError> {
        self.next_line().ok_or_else(|| GenError::ScriptParse {
            line: self.last_line,
            message: format!("{command} is missing an argument line"),
        })
    }

    fn arg(&mut self, command: &str) -> Result<&'a str, GenError> {
        self.arg_line(command).map(|(_, line)| line.trim())
    }

    fn reals<const N: usize>(
        &mut self,
        command: &str,
    ) -> Result<[f64; N], GenError> {
        let (no, line) = self.arg_line(command)?;
        let fields = split::<N>(no, line)?;
        let mut out = [0.0; N];
        for (slot, field) in out.iter_mut().zip(fields) {
            *slot = number(no, field)?;
        }
        Ok(out)
    }
}

fn split<const N: usize>(no: usize, line: &str) -> Result<[&str; N], GenError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    fields.try_into().map_err(|fields: Vec<&str>| GenError::ScriptParse {
        line: no,
        message: format!("expected {N} comma-separated values, found {}", fields.len()),
    })
}

fn number<T: FromStr>(no: usize, field: &str) -> Result<T, GenError> {
    field.parse().map_err(|_| GenError::ScriptParse {
        line: no,
        message: format!("{field:?} is not a number"),
    })
}
