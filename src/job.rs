//! TOML job files: everything needed to generate one script headlessly.
//!
//! ```toml
//! structure = "2hhb.pdb"
//! chains = ["A", "B"]
//! hetatm = ["A:HEM"]
//!
//! [[atoms]]
//! key = "A:C"
//! color = "#ffb2b2"
//! radius = 1.6
//!
//! [[atoms]]
//! key = "A:HEM:FE"
//! enabled = false
//!
//! [view.camera]
//! scale = 10.0
//!
//! [renderer]
//! driver = "run_illustrate.sh"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::options::ViewConfig;
use crate::pdb::Scan;
use crate::render::RendererConfig;
use crate::select::{catalogue, Selection, TypeKey};
use crate::session::Session;
use crate::style::{ColorScheme, Rgb, StyleAssignment};

/// Settings for one atom type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtomSpec {
    /// `CHAIN:ATOM` or `CHAIN:RESIDUE:ATOM`.
    pub key: String,
    /// Whether the type gets a card.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// `#RRGGBB`; the chain-tinted default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Radius in angstroms; the element default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
}

const fn enabled_by_default() -> bool {
    true
}

/// One generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Job {
    /// Structure file (or, with the `fetch` feature, a PDB id).
    pub structure: String,
    /// Output image name; derived from `structure` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Selected chains.
    pub chains: Vec<char>,
    /// Selected HETATM residues as `CHAIN:RESIDUE`.
    pub hetatm: Vec<String>,
    /// Per-type switches and styles.
    pub atoms: Vec<AtomSpec>,
    /// View parameters.
    pub view: ViewConfig,
    /// Renderer location and time limit.
    pub renderer: RendererConfig,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            structure: "2hhb.pdb".to_owned(),
            output: None,
            chains: Vec::new(),
            hetatm: Vec::new(),
            atoms: Vec::new(),
            view: ViewConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Job {
    /// Load a job from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the file cannot be read and
    /// [`GenError::OptionsParse`] if it is not a valid job.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a job from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::OptionsParse`] on malformed TOML or colors.
    pub fn from_toml(content: &str) -> Result<Self, GenError> {
        toml::from_str(content).map_err(|e| GenError::OptionsParse(e.to_string()))
    }

    /// Save the job as pretty-printed TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::OptionsParse`] if serialization fails and
    /// [`GenError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GenError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GenError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill chains, residues and atom types with everything in `scan`,
    /// each type enabled with a `scheme` color and its default radius
    /// written out.
    pub fn populate(&mut self, scan: &Scan, scheme: ColorScheme) {
        let mut selection = Selection::new();
        for &chain in &scan.chains {
            selection.select_chain(chain);
            for residue in scan.hetatm_residues(chain) {
                selection.select_hetatm(chain, residue);
            }
        }
        let style = StyleAssignment::new();

        self.chains = scan.chains.iter().copied().collect();
        self.hetatm = scan
            .hetatm_by_chain
            .iter()
            .flat_map(|(chain, residues)| {
                residues.iter().map(move |r| format!("{chain}:{r}"))
            })
            .collect();
        let mut offered: BTreeMap<char, usize> = BTreeMap::new();
        self.atoms = catalogue(scan, &selection)
            .keys()
            .map(|key| {
                let index = offered.entry(key.chain).or_default();
                let color = scheme.color(&key, *index);
                *index += 1;
                AtomSpec {
                    key: key.to_string(),
                    enabled: true,
                    color: Some(color),
                    radius: Some(style.radius(&key)),
                }
            })
            .collect();
    }

    /// The selection this job describes.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::OptionsParse`] for malformed residue or atom keys.
    pub fn selection(&self) -> Result<Selection, GenError> {
        let mut selection = Selection::new();
        for &chain in &self.chains {
            selection.select_chain(chain);
        }
        for spec in &self.hetatm {
            let (chain, residue) = parse_residue(spec)?;
            selection.select_hetatm(chain, residue);
        }
        for atom in self.atoms.iter().filter(|a| a.enabled) {
            selection.enable(parse_key(&atom.key)?);
        }
        Ok(selection)
    }

    /// Explicit colors and radii of this job.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::OptionsParse`] for malformed atom keys.
    pub fn style(&self) -> Result<StyleAssignment, GenError> {
        let mut style = StyleAssignment::new();
        for atom in &self.atoms {
            let key = parse_key(&atom.key)?;
            if let Some(color) = atom.color {
                style.set_color(key.clone(), color);
            }
            if let Some(radius) = atom.radius {
                style.set_radius(key, radius);
            }
        }
        Ok(style)
    }

    /// Open the structure in a new session under `scratch` and apply the
    /// job's selection, style, view and output name.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the structure or scratch directory is
    /// unusable, plus any error of [`Job::selection`] and [`Job::style`].
    pub fn session(&self, scratch: &Path) -> Result<Session, GenError> {
        let mut session = Session::new(scratch)?;
        #[cfg(feature = "fetch")]
        let structure = crate::pdb::resolve_structure_path(
            &self.structure,
            &scratch.join("structures"),
        )?;
        #[cfg(not(feature = "fetch"))]
        let structure = std::path::PathBuf::from(&self.structure);

        let _ = session.open(&structure)?;
        session.selection = self.selection()?;
        session.style = self.style()?;
        session.view = self.view.clone();
        session.output.clone_from(&self.output);
        Ok(session)
    }
}

fn parse_key(key: &str) -> Result<TypeKey, GenError> {
    key.parse()
        .map_err(|e| GenError::OptionsParse(format!("atom key: {e}")))
}

fn parse_residue(spec: &str) -> Result<(char, &str), GenError> {
    let bad = || {
        GenError::OptionsParse(format!(
            "hetatm entry must be CHAIN:RESIDUE, got {spec:?}"
        ))
    };
    let (chain, residue) = spec.split_once(':').ok_or_else(bad)?;
    let mut chars = chain.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !residue.trim().is_empty() => Ok((c, residue.trim())),
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::scan_text;
    use crate::select::AtomType;
    use crate::style::palette_color;

    const JOB: &str = r##"
structure = "1abc.pdb"
output = "figure.ppm"
chains = ["A"]
hetatm = ["A:HEM"]

[[atoms]]
key = "A:C"
color = "#FF0000"
radius = 1.8

[[atoms]]
key = "A:HEM:FE"
enabled = false

[view.shadow]
flag = 0

[renderer]
timeout_secs = 5
"##;

    #[test]
    fn parses_selection_and_style() {
        let job = Job::from_toml(JOB).unwrap();
        let selection = job.selection().unwrap();
        let carbon = TypeKey::atom('A', AtomType::Element('C'));
        let iron = TypeKey::hetero('A', "HEM", "FE".parse().unwrap());

        assert!(selection.has_chain('A'));
        assert!(selection.has_hetatm('A', "HEM"));
        assert!(selection.is_enabled(&carbon));
        assert!(!selection.is_enabled(&iron));

        let style = job.style().unwrap();
        assert_eq!(style.color(&carbon).to_string(), "1.0,0.0,0.0");
        assert!((style.radius(&carbon) - 1.8).abs() < f32::EPSILON);
        assert_eq!(job.view.shadow.flag, 0);
        assert_eq!(job.renderer.timeout_secs, 5);
        assert_eq!(job.output.as_deref(), Some("figure.ppm"));
    }

    #[test]
    fn bad_entries_are_reported() {
        let job = Job {
            hetatm: vec!["AB:HEM".to_owned()],
            ..Job::default()
        };
        assert!(matches!(job.selection(), Err(GenError::OptionsParse(_))));

        let job = Job {
            atoms: vec![AtomSpec {
                key: "A".to_owned(),
                enabled: true,
                color: None,
                radius: None,
            }],
            ..Job::default()
        };
        assert!(matches!(job.style(), Err(GenError::OptionsParse(_))));

        assert!(matches!(
            Job::from_toml("[[atoms]]\nkey = \"A:C\"\ncolor = \"red\"\n"),
            Err(GenError::OptionsParse(_))
        ));
    }

    #[test]
    fn populate_enables_everything() {
        let scan = scan_text(concat!(
            "ATOM      1  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n",
            "HETATM    2 FE   HEM A 142       8.128   7.371  -0.028  1.00 16.74          FE\n",
            "HETATM    3  O   HOH A 201       1.000   2.000   3.000  1.00  0.00           O\n",
        ));
        let mut job = Job::default();
        job.populate(&scan, ColorScheme::Chain);

        assert_eq!(job.chains, ['A']);
        assert_eq!(job.hetatm, ["A:HEM"]);
        let keys: Vec<&str> = job.atoms.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["A:C", "A:HEM:FE"]);
        assert!(job.atoms.iter().all(|a| a.enabled && a.color.is_some()));

        let text = toml::to_string_pretty(&job).unwrap();
        assert_eq!(Job::from_toml(&text).unwrap(), job);
    }

    #[test]
    fn populate_cycles_chain_palette() {
        let scan = scan_text(concat!(
            "ATOM      1  N   VAL A   1       6.204  16.869   4.854  1.00 49.05           N\n",
            "ATOM      2  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n",
            "ATOM      3  O   VAL A   1       6.913  17.759   4.607  1.00 43.14           O\n",
            "HETATM    4 FE   HEM A 142       8.128   7.371  -0.028  1.00 16.74          FE\n",
            "ATOM      5  CA  HIS B   1       9.000  18.000   5.000  1.00 43.14           C\n",
        ));
        let mut job = Job::default();
        job.populate(&scan, ColorScheme::Palette);

        let colors: Vec<(&str, Rgb)> = job
            .atoms
            .iter()
            .map(|a| (a.key.as_str(), a.color.unwrap()))
            .collect();
        assert_eq!(
            colors,
            [
                ("A:C", palette_color('A', 0)),
                ("A:N", palette_color('A', 1)),
                ("A:O", palette_color('A', 2)),
                ("B:C", palette_color('B', 0)),
                ("A:HEM:FE", palette_color('A', 3)),
            ]
        );
    }
}
