use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of the two coordinate record types a line came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum RecordKind {
    /// Standard polymer residue (`ATOM  `).
    #[serde(rename = "ATOM")]
    Atom,
    /// Non-standard residue: ligand, ion or water (`HETATM`).
    #[serde(rename = "HETATM")]
    Hetatm,
}

impl RecordKind {
    /// The six-column record name as it appears in PDB and script files.
    #[must_use]
    pub const fn as_columns(self) -> &'static str {
        match self {
            Self::Atom => "ATOM  ",
            Self::Hetatm => "HETATM",
        }
    }

    /// Classify the first six columns of a line.
    #[must_use]
    pub fn from_columns(prefix: &[u8]) -> Option<Self> {
        match prefix {
            b"ATOM  " => Some(Self::Atom),
            b"HETATM" => Some(Self::Hetatm),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_columns().trim_end())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(Self::Atom),
            "HETATM" => Ok(Self::Hetatm),
            other => Err(format!("unknown record kind {other:?}")),
        }
    }
}

/// One ATOM/HETATM line, reduced to the fixed-column fields the resolver
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRecord {
    /// Record type of the source line.
    pub kind: RecordKind,
    /// Chain identifier (column 22).
    pub chain: char,
    /// Atom name field exactly as written (columns 13-16), right-padded to
    /// four characters. Column alignment distinguishes e.g. `" CA "` (alpha
    /// carbon) from `"CA  "` (calcium).
    pub atom_field: String,
    /// Residue name (columns 18-20), trimmed.
    pub residue: String,
    /// Residue sequence number (columns 23-26); `None` when absent or not
    /// numeric.
    pub res_seq: Option<i32>,
}

impl AtomRecord {
    /// Atom name with surrounding blanks removed.
    #[must_use]
    pub fn atom_name(&self) -> &str {
        self.atom_field.trim()
    }

    /// Element symbol: the first character of the trimmed atom name.
    #[must_use]
    pub fn element(&self) -> Option<char> {
        self.atom_name().chars().next()
    }

    /// Whether the atom name starts at column 14, the PDB convention for
    /// one-letter elements.
    #[must_use]
    pub fn is_element_leading(&self) -> bool {
        self.atom_field.starts_with(' ')
    }

    /// Hydrogen under either naming convention: element-leading (`HB2`) or
    /// with a numeric prefix (`1HB`).
    #[must_use]
    pub fn is_hydrogen(&self) -> bool {
        let mut chars = self.atom_name().chars();
        match chars.next() {
            Some('H') => true,
            Some(c) if c.is_ascii_digit() => chars.next() == Some('H'),
            _ => false,
        }
    }

    /// Whether this record belongs to a water residue.
    #[must_use]
    pub fn is_water(&self) -> bool {
        self.residue == WATER_RESIDUE
    }
}

/// Residue name used for water molecules.
pub const WATER_RESIDUE: &str = "HOH";
