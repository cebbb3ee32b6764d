//! PDB scanner.
//!
//! Only the fixed-column ATOM/HETATM fields the script generator needs are
//! read: atom name, residue name, chain identifier and residue number.
//! Coordinates and every other record type are ignored.

#[cfg(feature = "fetch")]
mod fetch;
mod record;
mod scan;

#[cfg(feature = "fetch")]
pub use fetch::resolve_structure_path;
pub use record::{AtomRecord, RecordKind, WATER_RESIDUE};
pub use scan::{atom_lines, scan, scan_text, Scan};
