// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Script generator for the ILLUSTRATE molecular renderer.
//!
//! Turns a PDB structure plus per-chain, per-atom-type choices into the
//! command script ILLUSTRATE reads, and optionally runs the renderer on it
//! under a time limit.
//!
//! # Key entry points
//!
//! - [`pdb::scan`] - read chains, HETATM residues and atom records
//! - [`select::resolve`] - turn a [`select::Selection`] and a
//!   [`style::StyleAssignment`] into ordered [`card::Card`]s
//! - [`script::emit`] - build the script text; [`script::parse`] reads it
//!   back
//! - [`render::render`] - run the renderer with a timeout
//! - [`session::Session`] - per-user state tying the steps together
//! - [`job::Job`] - the same inputs as a TOML file
//!
//! # Pipeline
//!
//! Scanner -> Resolver -> Emitter. Each step is a plain function of its
//! inputs, so the whole pipeline runs headlessly:
//!
//! ```
//! use illustrate_gen::{options::ViewConfig, pdb, script, select, style};
//!
//! let text = "ATOM      1  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n";
//! let scan = pdb::scan(text.as_bytes())?;
//!
//! let mut selection = select::Selection::new();
//! selection.select_chain('A');
//! let catalogue = select::catalogue(&scan, &selection);
//! selection.enable_all(&catalogue);
//!
//! let cards = select::resolve(&scan, &selection, &style::StyleAssignment::new());
//! let script = script::emit("1abc.pdb", &cards, &ViewConfig::default(), "1abc.ppm");
//! assert!(script.contains("ATOM  -C-------A 0,9999,"));
//! # Ok::<(), illustrate_gen::error::GenError>(())
//! ```

pub mod card;
pub mod error;
pub mod job;
pub mod options;
pub mod pdb;
pub mod render;
pub mod script;
pub mod select;
pub mod session;
pub mod style;
