use super::atom_type::TypeKey;
use super::catalogue::{catalogue, Catalogue};
use super::selection::Selection;
use crate::card::{pattern, Card};
use crate::pdb::Scan;
use crate::style::StyleAssignment;

/// Resolve a selection into the ordered card list for the renderer.
///
/// Order is fixed because the renderer applies the first matching card:
/// water suppression, hydrogen suppression, ATOM cards per chain, then
/// HETATM cards per chain. Types that are not switched on get no card.
#[must_use]
pub fn resolve(
    scan: &Scan,
    selection: &Selection,
    style: &StyleAssignment,
) -> Vec<Card> {
    resolve_catalogue(&catalogue(scan, selection), selection, style)
}

/// [`resolve`] against a catalogue that has already been built.
#[must_use]
pub fn resolve_catalogue(
    catalogue: &Catalogue,
    selection: &Selection,
    style: &StyleAssignment,
) -> Vec<Card> {
    let mut cards = vec![Card::water_suppression()];
    cards.extend(Card::hydrogen_suppression());

    for (&chain, cat) in &catalogue.chains {
        for (atom, field) in &cat.atom {
            let key = TypeKey::atom(chain, atom.clone());
            if selection.is_enabled(&key) {
                let pat = pattern(field, None, Some(chain));
                cards.push(card_for(&key, pat, style));
            }
        }
    }

    for (&chain, cat) in &catalogue.chains {
        for ((residue, atom), field) in &cat.hetatm {
            let key = TypeKey::hetero(chain, residue, atom.clone());
            if selection.is_enabled(&key) {
                let pat = pattern(field, Some(residue.as_str()), Some(chain));
                cards.push(card_for(&key, pat, style));
            }
        }
    }

    log::debug!("resolved {} cards", cards.len());
    cards
}

fn card_for(key: &TypeKey, pattern: String, style: &StyleAssignment) -> Card {
    Card::new(key.kind(), pattern, style.color(key), style.radius(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::scan_text;
    use crate::select::AtomType;
    use crate::style::{default_color, Rgb};

    const PDB: &str = concat!(
        "ATOM      1  N   VAL A   1       6.204  16.869   4.854  1.00 49.05           N\n",
        "ATOM      2  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n",
        "ATOM      3  HA  VAL A   1       6.913  17.759   4.607  1.00 43.14           H\n",
        "ATOM      4  CA  HIS B   1       9.000  18.000   5.000  1.00 43.14           C\n",
        "HETATM    5 FE   HEM A 142       8.000  18.000   5.000  1.00 16.74          FE\n",
        "HETATM    6  CHA HEM A 142       8.000  18.000   5.000  1.00 16.74           C\n",
        "HETATM    7  O   HOH A 201       1.000   2.000   3.000  1.00 30.00           O\n",
    );

    fn lines(cards: &[Card]) -> Vec<String> {
        cards.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_selection_still_suppresses() {
        let scan = scan_text(PDB);
        let cards = resolve(&scan, &Selection::new(), &StyleAssignment::new());
        assert_eq!(
            lines(&cards),
            [
                "HETATM-----HOH-- 0,9999, 0.5,0.5,0.5, 0.0",
                "ATOM  -H-------- 0,9999, 0.5,0.5,0.5, 0.0",
                "ATOM  H--------- 0,9999, 0.5,0.5,0.5, 0.0",
            ]
        );
    }

    #[test]
    fn atom_cards_precede_hetatm_cards() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.select_chain('B');
        sel.select_hetatm('A', "HEM");
        sel.enable_all(&catalogue(&scan, &sel));

        let mut style = StyleAssignment::new();
        style.set_color(
            TypeKey::hetero('A', "HEM", AtomType::Name("FE".to_owned())),
            Rgb::from_hex("#FF8000").unwrap(),
        );

        let cards = lines(&resolve(&scan, &sel, &style));
        assert_eq!(
            &cards[3..],
            [
                "ATOM  -C-------A 0,9999, 1.0,0.7,0.7, 1.6",
                "ATOM  -N-------A 0,9999, 0.8,0.5,0.6, 1.5",
                "ATOM  -C-------B 0,9999, 0.7,0.9,1.0, 1.6",
                "HETATM-C---HEM-A 0,9999, 1.0,0.7,0.7, 1.6",
                "HETATMFE---HEM-A 0,9999, 1.0,0.5,0.0, 2.0",
            ]
        );
    }

    #[test]
    fn untoggled_types_emit_nothing() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.enable(TypeKey::atom('A', AtomType::Element('N')));
        let cards = resolve(&scan, &sel, &StyleAssignment::new());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[3].pattern, "-N-------A");
        assert_eq!(cards[3].color, default_color('A', "N"));
    }

    #[test]
    fn idempotent() {
        let scan = scan_text(PDB);
        let mut sel = Selection::new();
        sel.select_chain('A');
        sel.select_hetatm('A', "HEM");
        sel.enable_all(&catalogue(&scan, &sel));
        let style = StyleAssignment::new();
        assert_eq!(
            lines(&resolve(&scan, &sel, &style)),
            lines(&resolve(&scan, &sel, &style))
        );
    }
}
