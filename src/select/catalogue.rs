use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use super::atom_type::{AtomType, TypeKey};
use super::selection::Selection;
use crate::pdb::{RecordKind, Scan};

/// Distinct atom types of one selected chain, each with the four-column
/// card field used to match it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainCatalogue {
    /// ATOM types.
    pub atom: BTreeMap<AtomType, String>,
    /// HETATM types of selected residues, keyed by `(residue, atom type)`.
    pub hetatm: BTreeMap<(String, AtomType), String>,
}

/// Atom types a front end should offer for the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    /// Per selected chain.
    pub chains: BTreeMap<char, ChainCatalogue>,
}

impl Catalogue {
    /// Every offered type as a settings key, ATOM types of all chains first.
    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        let atoms = self.chains.iter().flat_map(|(&chain, cat)| {
            cat.atom.keys().map(move |a| TypeKey::atom(chain, a.clone()))
        });
        let hetero = self.chains.iter().flat_map(|(&chain, cat)| {
            cat.hetatm
                .keys()
                .map(move |(res, a)| TypeKey::hetero(chain, res, a.clone()))
        });
        atoms.chain(hetero)
    }

    /// `{chain: {"ATOM": [...], "HETATM": ["RES:ATOM", ...]}}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (chain, cat) in &self.chains {
            let atom: Vec<String> =
                cat.atom.keys().map(ToString::to_string).collect();
            let hetatm: Vec<String> = cat
                .hetatm
                .keys()
                .map(|(res, a)| format!("{res}:{a}"))
                .collect();
            let _ = out.insert(
                chain.to_string(),
                json!({ "ATOM": atom, "HETATM": hetatm }),
            );
        }
        Value::Object(out)
    }
}

/// Collect the selectable atom types of every selected chain.
///
/// Hydrogens and water never appear. HETATM types only appear for residues
/// selected in that chain.
#[must_use]
pub fn catalogue(scan: &Scan, selection: &Selection) -> Catalogue {
    let mut out = Catalogue::default();
    for chain in selection.chains().filter(|c| scan.chains.contains(c)) {
        let _ = out.chains.insert(chain, ChainCatalogue::default());
    }

    for record in &scan.records {
        let Some(cat) = out.chains.get_mut(&record.chain) else {
            continue;
        };
        if record.is_water() {
            continue;
        }
        let Some(token) = AtomType::of(record) else {
            continue;
        };
        let field = token.card_field(&record.atom_field);
        match record.kind {
            RecordKind::Atom => {
                let _ = cat.atom.entry(token).or_insert(field);
            }
            RecordKind::Hetatm => {
                if selection.has_hetatm(record.chain, &record.residue) {
                    let _ = cat
                        .hetatm
                        .entry((record.residue.clone(), token))
                        .or_insert(field);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::scan_text;

    const PDB: &str = concat!(
        "ATOM      1  N   VAL A   1       6.204  16.869   4.854  1.00 49.05           N\n",
        "ATOM      2  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n",
        "ATOM      3  HA  VAL A   1       6.913  17.759   4.607  1.00 43.14           H\n",
        "ATOM      4  SG  CYS A   2       6.913  17.759   4.607  1.00 43.14           S\n",
        "ATOM      5  CA  HIS B   1       9.000  18.000   5.000  1.00 43.14           C\n",
        "HETATM    6 FE   HEM A 142       8.000  18.000   5.000  1.00 16.74          FE\n",
        "HETATM    7  CHA HEM A 142       8.000  18.000   5.000  1.00 16.74           C\n",
        "HETATM    8  O1  SO4 A 143       8.000  18.000   5.000  1.00 16.74           O\n",
        "HETATM    9  O   HOH A 201       1.000   2.000   3.000  1.00 30.00           O\n",
    );

    #[test]
    fn only_selected_chains_and_residues() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.select_hetatm('A', "HEM");
        let cat = catalogue(&scan, &sel);

        assert_eq!(cat.chains.keys().copied().collect::<Vec<_>>(), ['A']);
        let a = &cat.chains[&'A'];
        let atoms: Vec<String> =
            a.atom.keys().map(ToString::to_string).collect();
        assert_eq!(atoms, ["C", "N", "S"]);
        assert_eq!(a.hetatm.len(), 2);
        assert_eq!(
            a.hetatm[&("HEM".to_owned(), AtomType::Name("FE".to_owned()))],
            "FE--"
        );
    }

    #[test]
    fn json_shape() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.select_chain('B');
        sel.select_hetatm('A', "HEM");
        let json = catalogue(&scan, &sel).to_json();
        assert_eq!(json["A"]["ATOM"], json!(["C", "N", "S"]));
        assert_eq!(json["A"]["HETATM"], json!(["HEM:C", "HEM:FE"]));
        assert_eq!(json["B"]["HETATM"], json!([]));
    }

    #[test]
    fn keys_list_atoms_before_hetero() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.select_chain('B');
        sel.select_hetatm('A', "SO4");
        let keys: Vec<String> = catalogue(&scan, &sel)
            .keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, ["A:C", "A:N", "A:S", "B:C", "A:SO4:O"]);
    }
}
