use std::collections::{BTreeMap, BTreeSet};

use super::record::{AtomRecord, RecordKind};
use crate::error::GenError;

/// Shortest line that still reaches the chain identifier column.
const MIN_LINE_LEN: usize = 22;

/// Result of scanning one structure file.
///
/// Everything here is derived from the file bytes alone, so a scan can be
/// rebuilt at any time without re-uploading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Every ATOM/HETATM record in file order, water included.
    pub records: Vec<AtomRecord>,
    /// Distinct chain identifiers.
    pub chains: BTreeSet<char>,
    /// Distinct non-water HETATM residue names per chain.
    pub hetatm_by_chain: BTreeMap<char, BTreeSet<String>>,
}

impl Scan {
    /// HETATM residue names seen in `chain`, sorted.
    pub fn hetatm_residues(&self, chain: char) -> impl Iterator<Item = &str> {
        self.hetatm_by_chain
            .get(&chain)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

/// Scan raw uploaded bytes.
///
/// Fails only when the bytes are not text; malformed or short lines are
/// skipped.
///
/// # Errors
///
/// Returns [`GenError::FileDecode`] if the bytes are not UTF-8.
pub fn scan(bytes: &[u8]) -> Result<Scan, GenError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        GenError::FileDecode(format!("structure is not UTF-8 text: {e}"))
    })?;
    Ok(scan_text(text))
}

/// Scan already-decoded PDB text.
#[must_use]
pub fn scan_text(text: &str) -> Scan {
    let mut out = Scan::default();
    for line in atom_lines(text) {
        let Some(record) = parse_line(line) else {
            continue;
        };
        let _ = out.chains.insert(record.chain);
        if record.kind == RecordKind::Hetatm
            && !record.is_water()
            && !record.residue.is_empty()
        {
            let _ = out
                .hetatm_by_chain
                .entry(record.chain)
                .or_default()
                .insert(record.residue.clone());
        }
        out.records.push(record);
    }
    log::debug!(
        "scanned {} atom records across {} chains",
        out.records.len(),
        out.chains.len()
    );
    out
}

/// Raw ATOM/HETATM lines, for previewing what the scanner will read.
#[must_use]
pub fn atom_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| {
            line.as_bytes()
                .get(..6)
                .and_then(RecordKind::from_columns)
                .is_some()
        })
        .collect()
}

fn parse_line(line: &str) -> Option<AtomRecord> {
    if line.len() < MIN_LINE_LEN {
        return None;
    }
    let kind = RecordKind::from_columns(line.as_bytes().get(..6)?)?;
    let chain = line.get(21..22)?.chars().next()?;

    let atom_field = line.get(12..16).map_or_else(String::new, |s| {
        format!("{s:<4}")
    });
    let residue = line
        .get(17..20)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();
    let res_seq = line
        .get(22..line.len().min(26))
        .and_then(|s| s.trim().parse::<i32>().ok());

    Some(AtomRecord {
        kind,
        chain,
        atom_field,
        residue,
        res_seq,
    })
}
