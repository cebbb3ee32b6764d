use std::path::{Path, PathBuf};

use crate::error::GenError;

/// Resolve a command-line structure argument to a local file.
///
/// Existing paths are returned unchanged. A 4-character alphanumeric PDB id
/// is looked up in `cache_dir` and downloaded from RCSB when absent.
///
/// # Errors
///
/// Returns [`GenError::Fetch`] for inputs that are neither a path nor a PDB
/// id, or when the download fails, and [`GenError::Io`] if the cache cannot
/// be written.
pub fn resolve_structure_path(
    input: &str,
    cache_dir: &Path,
) -> Result<PathBuf, GenError> {
    let path = Path::new(input);
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    if input.len() != 4 || !input.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(GenError::Fetch(format!(
            "file not found and not a valid PDB code: {input}"
        )));
    }

    let pdb_id = input.to_lowercase();
    let local_path = cache_dir.join(format!("{pdb_id}.pdb"));
    if local_path.exists() {
        return Ok(local_path);
    }
    std::fs::create_dir_all(cache_dir)?;

    let url = format!("https://files.rcsb.org/download/{pdb_id}.pdb");
    log::info!("Downloading {} from RCSB...", pdb_id.to_uppercase());

    let content = ureq::get(&url)
        .call()
        .map_err(|e| GenError::Fetch(format!("failed to download {pdb_id}: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| GenError::Fetch(format!("failed to read response: {e}")))?;

    std::fs::write(&local_path, &content)?;
    log::info!("Downloaded to {}", local_path.display());
    Ok(local_path)
}
