use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::pdb::{AtomRecord, RecordKind};

/// Elements collapsed to a single token regardless of atom name.
const COLLAPSED_ELEMENTS: [char; 4] = ['C', 'N', 'O', 'S'];

/// One selectable visual group within a chain.
///
/// Carbon, nitrogen, oxygen and sulfur collapse to their element symbol;
/// every other atom keeps its full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomType {
    /// Collapsed common element.
    Element(char),
    /// Full (trimmed) atom name.
    Name(String),
}

impl AtomType {
    /// Token for a record, or `None` for hydrogens and blank names.
    ///
    /// Element-leading names (column 13 blank) and bare one-letter names
    /// collapse, so left-aligned two-letter elements such as `CA  `
    /// (calcium) or `CL  ` keep their name.
    #[must_use]
    pub fn of(record: &AtomRecord) -> Option<Self> {
        if record.is_hydrogen() {
            return None;
        }
        let element = record.element()?;
        let bare = record.atom_name().chars().count() == 1;
        if COLLAPSED_ELEMENTS.contains(&element)
            && (bare || record.is_element_leading())
        {
            Some(Self::Element(element))
        } else {
            Some(Self::Name(record.atom_name().to_owned()))
        }
    }

    /// The element symbol's first character.
    #[must_use]
    pub fn element(&self) -> Option<char> {
        match self {
            Self::Element(c) => Some(*c),
            Self::Name(name) => name.chars().next(),
        }
    }

    /// Four-column atom-name field for a card, `-` marking wildcards.
    #[must_use]
    pub fn card_field(&self, atom_field: &str) -> String {
        match self {
            Self::Element(c) if atom_field.starts_with(' ') => {
                format!("-{c}--")
            }
            Self::Element(c) => format!("{c}---"),
            Self::Name(_) => format!("{atom_field:<4}")
                .chars()
                .take(4)
                .map(|c| if c == ' ' { '-' } else { c })
                .collect(),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Element(_) => 0,
            Self::Name(_) => 1,
        }
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(c) => write!(f, "{c}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for AtomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err("empty atom type".to_owned()),
            (Some(c), None) if COLLAPSED_ELEMENTS.contains(&c) => {
                Ok(Self::Element(c))
            }
            _ => Ok(Self::Name(s.to_owned())),
        }
    }
}

/// Tokens sort by their text, the order they are offered and emitted in.
impl Ord for AtomType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for AtomType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Composite key for per-type settings: chain, optional HETATM residue, and
/// atom type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey {
    /// Chain identifier.
    pub chain: char,
    /// HETATM residue name; `None` for ATOM types.
    pub residue: Option<String>,
    /// Atom type within the chain (and residue).
    pub atom: AtomType,
}

impl TypeKey {
    /// Key for an ATOM type.
    #[must_use]
    pub const fn atom(chain: char, atom: AtomType) -> Self {
        Self {
            chain,
            residue: None,
            atom,
        }
    }

    /// Key for an atom type of a HETATM residue.
    #[must_use]
    pub fn hetero(chain: char, residue: &str, atom: AtomType) -> Self {
        Self {
            chain,
            residue: Some(residue.to_owned()),
            atom,
        }
    }

    /// Which record kind this key selects.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        if self.residue.is_some() {
            RecordKind::Hetatm
        } else {
            RecordKind::Atom
        }
    }
}

/// `A:C` for ATOM types, `A:HEM:FE` for HETATM types.
impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.residue {
            Some(res) => write!(f, "{}:{res}:{}", self.chain, self.atom),
            None => write!(f, "{}:{}", self.chain, self.atom),
        }
    }
}

impl FromStr for TypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let chain = |p: &str| {
            let mut chars = p.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("chain must be one character in {s:?}")),
            }
        };
        match parts.as_slice() {
            [c, atom] => Ok(Self::atom(chain(*c)?, atom.parse()?)),
            [c, res, atom] => {
                Ok(Self::hetero(chain(*c)?, res.trim(), atom.parse()?))
            }
            _ => Err(format!(
                "expected CHAIN:ATOM or CHAIN:RESIDUE:ATOM, got {s:?}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind, atom_field: &str) -> AtomRecord {
        AtomRecord {
            kind,
            chain: 'A',
            atom_field: atom_field.to_owned(),
            residue: "HEM".to_owned(),
            res_seq: Some(1),
        }
    }

    #[test]
    fn common_elements_collapse() {
        let of = |f: &str| AtomType::of(&record(RecordKind::Atom, f));
        assert_eq!(of(" CA "), Some(AtomType::Element('C')));
        assert_eq!(of(" OD1"), Some(AtomType::Element('O')));
        assert_eq!(of(" P  "), Some(AtomType::Name("P".to_owned())));
        assert_eq!(of("FE  "), Some(AtomType::Name("FE".to_owned())));
        assert_eq!(of("CL  "), Some(AtomType::Name("CL".to_owned())));
        assert_eq!(of("C   "), Some(AtomType::Element('C')));
        assert_eq!(of("C1  "), Some(AtomType::Name("C1".to_owned())));
        assert_eq!(of(" HA "), None);
        assert_eq!(of("2HB "), None);
    }

    #[test]
    fn card_fields_keep_alignment() {
        assert_eq!(AtomType::Element('C').card_field(" CA "), "-C--");
        assert_eq!(AtomType::Element('C').card_field("C   "), "C---");
        assert_eq!(AtomType::Name("FE".to_owned()).card_field("FE  "), "FE--");
        assert_eq!(AtomType::Name("P".to_owned()).card_field(" P"), "-P--");
        assert_eq!(
            AtomType::Name("O5'".to_owned()).card_field(" O5'"),
            "-O5'"
        );
    }

    #[test]
    fn tokens_sort_by_text() {
        let mut tokens = vec![
            AtomType::Element('N'),
            AtomType::Name("FE".to_owned()),
            AtomType::Element('C'),
        ];
        tokens.sort();
        let text: Vec<String> =
            tokens.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["C", "FE", "N"]);
    }

    #[test]
    fn keys_parse_and_print() {
        let key: TypeKey = "A:HEM:FE".parse().unwrap();
        assert_eq!(key.kind(), RecordKind::Hetatm);
        assert_eq!(key.atom, AtomType::Name("FE".to_owned()));
        assert_eq!(key.to_string(), "A:HEM:FE");

        let key: TypeKey = "B:C".parse().unwrap();
        assert_eq!(key, TypeKey::atom('B', AtomType::Element('C')));
        assert!("AB:C".parse::<TypeKey>().is_err());

        // Every token a record can produce prints to a key that parses back
        // to the same token.
        for field in [" C  ", "C   ", " CA ", "CA  ", "FE  ", " OD1", "C1  "] {
            let rec = record(RecordKind::Atom, field);
            let key = TypeKey::atom('A', AtomType::of(&rec).unwrap());
            assert_eq!(key.to_string().parse::<TypeKey>().unwrap(), key, "{field:?}");
        }
        assert!("A".parse::<TypeKey>().is_err());
    }
}
