//! Selection resolver.
//!
//! Turns the scanner output plus the user's chain/residue/atom-type choices
//! into the ordered card list. The catalogue step tells a front end which
//! atom types exist for the current chain and residue choices; the resolve
//! step emits one card per switched-on type after the fixed water and
//! hydrogen suppression cards.

mod atom_type;
mod catalogue;
mod resolve;
mod selection;

pub use atom_type::{AtomType, TypeKey};
pub use catalogue::{catalogue, Catalogue, ChainCatalogue};
pub use resolve::{resolve, resolve_catalogue};
pub use selection::Selection;
