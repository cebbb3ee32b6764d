use std::collections::BTreeSet;

use super::atom_type::TypeKey;
use super::catalogue::Catalogue;

/// Which chains, HETATM residues and atom types the user has switched on.
///
/// A plain value built by the front end and passed into the resolver; it has
/// no life outside one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    chains: BTreeSet<char>,
    hetatm: BTreeSet<(char, String)>,
    enabled: BTreeSet<TypeKey>,
}

impl Selection {
    /// Nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Include `chain`.
    pub fn select_chain(&mut self, chain: char) {
        let _ = self.chains.insert(chain);
    }

    /// Include HETATM residue `residue` of `chain`.
    pub fn select_hetatm(&mut self, chain: char, residue: &str) {
        let _ = self.hetatm.insert((chain, residue.trim().to_owned()));
    }

    /// Switch an atom type on.
    pub fn enable(&mut self, key: TypeKey) {
        let _ = self.enabled.insert(key);
    }

    /// Switch an atom type off.
    pub fn disable(&mut self, key: &TypeKey) {
        let _ = self.enabled.remove(key);
    }

    /// Switch on every type the catalogue offers.
    pub fn enable_all(&mut self, catalogue: &Catalogue) {
        self.enabled.extend(catalogue.keys());
    }

    /// Whether `chain` is selected.
    #[must_use]
    pub fn has_chain(&self, chain: char) -> bool {
        self.chains.contains(&chain)
    }

    /// Whether `residue` of `chain` is selected.
    #[must_use]
    pub fn has_hetatm(&self, chain: char, residue: &str) -> bool {
        self.hetatm.contains(&(chain, residue.to_owned()))
    }

    /// Whether the atom type is switched on.
    #[must_use]
    pub fn is_enabled(&self, key: &TypeKey) -> bool {
        self.enabled.contains(key)
    }

    /// Selected chains, sorted.
    pub fn chains(&self) -> impl Iterator<Item = char> + '_ {
        self.chains.iter().copied()
    }

    /// Selected HETATM residues of `chain`, sorted.
    pub fn hetatm_residues(
        &self,
        chain: char,
    ) -> impl Iterator<Item = &str> + '_ {
        self.hetatm
            .iter()
            .filter(move |(c, _)| *c == chain)
            .map(|(_, res)| res.as_str())
    }
}
