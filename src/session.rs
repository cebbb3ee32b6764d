//! Per-user state between requests.
//!
//! A [`Session`] owns the uploaded structure, the cached scan, the user's
//! selection, style and view, plus the last generated script and preview
//! image. Files it writes go into its scratch directory under unique names.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::GenError;
use crate::options::ViewConfig;
use crate::pdb::{self, Scan};
use crate::render::{self, RendererConfig};
use crate::script::{self, SCRIPT_EXTENSION};
use crate::select::{self, Catalogue, Selection};
use crate::style::StyleAssignment;

/// The structure a session is working on.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// Name as given by the user; the output image name derives from it.
    pub name: String,
    /// Where the structure is read from.
    pub path: PathBuf,
    /// Size in KiB.
    pub size_kib: f64,
}

/// Result of [`Session::generate`].
///
/// A failed write does not lose the script: the text is always returned and
/// the failure is reported alongside it.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Script text.
    pub script: String,
    /// Where the script was written, if writing succeeded.
    pub path: Option<PathBuf>,
    /// Why the script could not be written.
    pub write_error: Option<GenError>,
}

/// State of one user working on one structure.
#[derive(Debug)]
pub struct Session {
    scratch: PathBuf,
    upload: Option<Upload>,
    scan: Option<Scan>,
    text: Option<String>,
    script: Option<String>,
    preview_image: Option<PathBuf>,
    /// Output image name overriding the one derived from the upload.
    pub output: Option<String>,
    /// Chains, HETATM residues and atom types to draw.
    pub selection: Selection,
    /// Colors and radii.
    pub style: StyleAssignment,
    /// Camera, world, shadow and outline parameters.
    pub view: ViewConfig,
}

impl Session {
    /// Start a session writing its artifacts under `scratch`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the directory cannot be created.
    pub fn new(scratch: impl AsRef<Path>) -> Result<Self, GenError> {
        std::fs::create_dir_all(scratch.as_ref())?;
        let scratch = std::fs::canonicalize(scratch.as_ref())?;
        Ok(Self {
            scratch,
            upload: None,
            scan: None,
            text: None,
            script: None,
            preview_image: None,
            output: None,
            selection: Selection::new(),
            style: StyleAssignment::new(),
            view: ViewConfig::default(),
        })
    }

    /// Store uploaded bytes as a uniquely named copy in the scratch
    /// directory and make it the current structure.
    ///
    /// The previous scan and selection are dropped; style and view are kept.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the copy cannot be written.
    pub fn upload(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> Result<&Upload, GenError> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("structure");
        let (mut file, path) = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(".pdb")
            .tempfile_in(&self.scratch)?
            .keep()
            .map_err(|e| e.error)?;
        file.write_all(bytes)?;

        self.replace_structure(Upload {
            name: name.to_owned(),
            path,
            size_kib: kib(bytes.len()),
        });
        self.upload.as_ref().ok_or(GenError::NoStructure)
    }

    /// Use a structure file in place, without copying it.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the file does not exist.
    pub fn open(&mut self, path: &Path) -> Result<&Upload, GenError> {
        let path = std::fs::canonicalize(path)?;
        let len = std::fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

        self.replace_structure(Upload {
            name,
            path,
            size_kib: kib(usize::try_from(len).unwrap_or(usize::MAX)),
        });
        self.upload.as_ref().ok_or(GenError::NoStructure)
    }

    fn replace_structure(&mut self, upload: Upload) {
        log::info!(
            "Loaded {} ({:.1} KiB) from {}",
            upload.name,
            upload.size_kib,
            upload.path.display()
        );
        self.upload = Some(upload);
        self.scan = None;
        self.text = None;
        self.script = None;
        self.preview_image = None;
        self.selection = Selection::new();
    }

    /// Current structure, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// Scratch directory.
    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    /// Last generated script.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Image from the last successful preview. Cleared when a preview fails.
    #[must_use]
    pub fn preview_image(&self) -> Option<&Path> {
        self.preview_image.as_deref()
    }

    /// Scan of the current structure, read and cached on first use.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::NoStructure`] before any upload,
    /// [`GenError::FileDecode`] for non-UTF-8 files and [`GenError::Io`] if the
    /// file cannot be read.
    pub fn scan(&mut self) -> Result<&Scan, GenError> {
        self.ensure_scanned()?;
        self.scan.as_ref().ok_or(GenError::NoStructure)
    }

    fn ensure_scanned(&mut self) -> Result<(), GenError> {
        if self.scan.is_some() {
            return Ok(());
        }
        let upload = self.upload.as_ref().ok_or(GenError::NoStructure)?;
        let bytes = std::fs::read(&upload.path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            GenError::FileDecode(format!(
                "{} is not UTF-8 text: {}",
                upload.name,
                e.utf8_error()
            ))
        })?;
        self.scan = Some(pdb::scan_text(&text));
        self.text = Some(text);
        Ok(())
    }

    /// Raw ATOM/HETATM lines of the current structure.
    ///
    /// # Errors
    ///
    /// Same as [`Session::scan`].
    pub fn atom_lines(&mut self) -> Result<Vec<&str>, GenError> {
        self.ensure_scanned()?;
        let text = self.text.as_deref().ok_or(GenError::NoStructure)?;
        Ok(pdb::atom_lines(text))
    }

    /// Atom types offered under the current selection.
    ///
    /// # Errors
    ///
    /// Same as [`Session::scan`].
    pub fn catalogue(&mut self) -> Result<Catalogue, GenError> {
        self.ensure_scanned()?;
        let scan = self.scan.as_ref().ok_or(GenError::NoStructure)?;
        Ok(select::catalogue(scan, &self.selection))
    }

    /// Output image name: the override, else derived from the upload name.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::NoStructure`] when there is neither an override
    /// nor an upload.
    pub fn output_name(&self) -> Result<String, GenError> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        self.upload
            .as_ref()
            .map(|u| script::output_filename(&u.name))
            .ok_or(GenError::NoStructure)
    }

    /// Build the script and write it to a fresh directory under scratch.
    ///
    /// Fails only when no structure is loaded or it cannot be scanned.
    ///
    /// # Errors
    ///
    /// Same as [`Session::scan`]. Write failures are reported in
    /// [`GenerateOutcome::write_error`] instead.
    pub fn generate(&mut self) -> Result<GenerateOutcome, GenError> {
        self.ensure_scanned()?;
        let (Some(upload), Some(scan)) = (&self.upload, &self.scan) else {
            return Err(GenError::NoStructure);
        };
        let output = self.output_name()?;
        let cards = select::resolve(scan, &self.selection, &self.style);
        let text = script::emit(
            &upload.path.to_string_lossy(),
            &cards,
            &self.view,
            &output,
        );
        log::debug!("generated script with {} cards", cards.len());

        let (path, write_error) = match self.write_script(&output, &text) {
            Ok(path) => {
                log::info!("Wrote script {}", path.display());
                (Some(path), None)
            }
            Err(e) => {
                log::warn!("Could not write script: {e}");
                (None, Some(e))
            }
        };
        self.script = Some(text.clone());
        Ok(GenerateOutcome {
            script: text,
            path,
            write_error,
        })
    }

    fn write_script(&self, output: &str, text: &str) -> Result<PathBuf, GenError> {
        let dir = tempfile::Builder::new()
            .prefix("gen-")
            .tempdir_in(&self.scratch)?
            .keep();
        let stem = Path::new(output)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("illustration");
        let path = dir.join(format!("{stem}.{SCRIPT_EXTENSION}"));
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Generate, then run the renderer on the written script.
    ///
    /// Any failure leaves no preview image behind.
    ///
    /// # Errors
    ///
    /// Any error of [`Session::generate`], the script write failure, or any
    /// error of [`render::render`].
    pub fn preview(
        &mut self,
        config: &RendererConfig,
    ) -> Result<&Path, GenError> {
        self.preview_image = None;
        let outcome = self.generate()?;
        if let Some(e) = outcome.write_error {
            return Err(e);
        }
        let (Some(script_path), Some(upload)) = (outcome.path, &self.upload)
        else {
            return Err(GenError::NoStructure);
        };
        let image = render::render(config, &script_path, &upload.path)?;
        log::info!("Preview image {}", image.display());
        Ok(self.preview_image.insert(image).as_path())
    }
}

#[allow(clippy::cast_precision_loss)]
fn kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDB: &str = "\
ATOM      1  N   VAL A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  VAL A   1      11.639   6.071  -5.147  1.00  0.00           C
HETATM    3 FE   HEM A 142       8.128   7.371  -0.028  1.00 16.74          FE
HETATM    4  O   HOH A 201       1.000   2.000   3.000  1.00  0.00           O
";

    #[test]
    fn generate_without_upload_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        assert!(matches!(session.generate(), Err(GenError::NoStructure)));
        assert!(matches!(session.output_name(), Err(GenError::NoStructure)));
    }

    #[test]
    fn upload_records_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        let bytes = vec![b' '; 2048];
        let upload = session.upload("2hhb.pdb", &bytes).unwrap().clone();
        assert_eq!(upload.name, "2hhb.pdb");
        assert!((upload.size_kib - 2.0).abs() < f64::EPSILON);
        assert!(upload.path.starts_with(session.scratch_dir()));
        assert_eq!(session.output_name().unwrap(), "2hhb.ppm");
    }

    #[test]
    fn upload_invalidates_cached_scan() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        let _ = session.upload("a.pdb", PDB.as_bytes()).unwrap();
        assert_eq!(session.scan().unwrap().records.len(), 4);

        let _ = session.upload("b.pdb", PDB.lines().next().unwrap().as_bytes()).unwrap();
        assert_eq!(session.scan().unwrap().records.len(), 1);
    }

    #[test]
    fn non_utf8_upload_blocks_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        let _ = session.upload("bad.pdb", &[0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(session.generate(), Err(GenError::FileDecode(_))));
    }

    #[test]
    fn generate_writes_script_named_after_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        let _ = session.upload("2hhb.pdb", PDB.as_bytes()).unwrap();
        session.selection.select_chain('A');
        let catalogue = session.catalogue().unwrap();
        session.selection.enable_all(&catalogue);

        let outcome = session.generate().unwrap();
        assert!(outcome.write_error.is_none());
        let path = outcome.path.unwrap();
        assert_eq!(path.file_name().unwrap(), "2hhb.inp");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), outcome.script);
        assert!(outcome.script.ends_with("calculate\n2hhb.ppm"));
        assert_eq!(session.script(), Some(outcome.script.as_str()));

        let again = session.generate().unwrap();
        assert_ne!(again.path.unwrap(), path);
    }

    #[test]
    fn write_failure_keeps_script() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().join("scratch")).unwrap();
        let _ = session.upload("2hhb.pdb", PDB.as_bytes()).unwrap();
        session.selection.select_chain('A');
        let catalogue = session.catalogue().unwrap();
        session.selection.enable_all(&catalogue);

        let scratch = session.scratch_dir().to_path_buf();
        std::fs::remove_dir_all(&scratch).unwrap();
        std::fs::write(&scratch, "not a directory").unwrap();

        let outcome = session.generate().unwrap();
        assert!(matches!(outcome.write_error, Some(GenError::Io(_))));
        assert!(outcome.path.is_none());
        assert!(outcome.script.ends_with("calculate\n2hhb.ppm"));
        assert_eq!(session.script(), Some(outcome.script.as_str()));
    }

    #[test]
    fn atom_lines_preview() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path()).unwrap();
        let _ = session.upload("a.pdb", PDB.as_bytes()).unwrap();
        let lines = session.atom_lines().unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("HETATM"));
    }
}
