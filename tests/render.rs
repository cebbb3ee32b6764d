#![cfg(unix)]

use std::path::{Path, PathBuf};

use illustrate_gen::error::GenError;
use illustrate_gen::render::RendererConfig;
use illustrate_gen::session::Session;
use tempfile::TempDir;

const PDB: &str = concat!(
    "ATOM      1  N   VAL A   1       6.204  16.869   4.854  1.00 49.05           N\n",
    "ATOM      2  CA  VAL A   1       6.913  17.759   4.607  1.00 43.14           C\n",
    "HETATM    3  O   HOH A 201      12.000   3.000   1.000  1.00 30.00           O\n",
);

/// Writes a 1x1 red PPM next to the script, like the real driver.
const GOOD_DRIVER: &str = r#"
[ -f "$ILLUSTRATE_BIN" ] || { echo "no renderer binary" >&2; exit 3; }
[ -f "$2" ] || { echo "no structure" >&2; exit 4; }
stem=$(basename "$1" .inp)
printf 'P6\n1 1\n255\nabc' > "$stem.ppm"
"#;

const SLOW_DRIVER: &str = r#"
echo "still rendering" >&2
exec sleep 5
"#;

const FAILING_DRIVER: &str = r#"
echo "illustrate: bad card on line 3" >&2
exit 2
"#;

const GARBAGE_DRIVER: &str = r#"
stem=$(basename "$1" .inp)
echo "ERROR" > "$stem.ppm"
"#;

struct Fixture {
    dir: TempDir,
    session: Session,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("illustrate"), "").unwrap();
        let mut session = Session::new(dir.path().join("scratch")).unwrap();
        let _ = session.upload("2hhb.pdb", PDB.as_bytes()).unwrap();
        session.selection.select_chain('A');
        let catalogue = session.catalogue().unwrap();
        session.selection.enable_all(&catalogue);
        Self { dir, session }
    }

    fn config(&self, name: &str, driver: &str, timeout_secs: u64) -> RendererConfig {
        let path = self.dir.path().join(name);
        std::fs::write(&path, driver).unwrap();
        RendererConfig {
            binary: self.dir.path().join("illustrate"),
            driver: path,
            timeout_secs,
        }
    }
}

/// Files with extension `ext` anywhere under `dir`.
fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(files_with_extension(&path, ext));
        } else if path.extension().is_some_and(|e| e == ext) {
            found.push(path);
        }
    }
    found
}

#[test]
fn successful_render_sets_preview_image() {
    let mut fx = Fixture::new();
    let config = fx.config("good.sh", GOOD_DRIVER, 10);

    let image = fx.session.preview(&config).unwrap().to_path_buf();
    assert_eq!(image.file_name().unwrap(), "2hhb.ppm");
    assert!(std::fs::read(&image).unwrap().starts_with(b"P6"));
    assert_eq!(fx.session.preview_image(), Some(image.as_path()));
}

#[test]
fn timeout_kills_renderer_and_clears_preview() {
    let mut fx = Fixture::new();
    let good = fx.config("good.sh", GOOD_DRIVER, 10);
    let _ = fx.session.preview(&good).unwrap();
    assert!(fx.session.preview_image().is_some());

    let slow = fx.config("slow.sh", SLOW_DRIVER, 1);
    let started = std::time::Instant::now();
    match fx.session.preview(&slow) {
        Err(GenError::RendererTimeout { timeout, .. }) => {
            assert_eq!(timeout.as_secs(), 1);
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(started.elapsed().as_secs() < 5);
    assert!(fx.session.preview_image().is_none());
}

#[test]
fn timeout_stops_renderer_started_by_driver() {
    let mut fx = Fixture::new();
    let marker = fx.dir.path().join("finished-late");
    let driver = format!(
        "echo \"reading 2hhb.pdb\" >&2\nsleep 3\ntouch '{}'\n",
        marker.display()
    );
    let config = fx.config("child.sh", &driver, 1);

    let started = std::time::Instant::now();
    match fx.session.preview(&config) {
        Err(GenError::RendererTimeout { stderr, .. }) => {
            assert!(stderr.contains("reading 2hhb.pdb"), "stderr: {stderr:?}");
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(started.elapsed().as_secs() < 3);
    assert!(fx.session.preview_image().is_none());

    std::thread::sleep(std::time::Duration::from_secs(4));
    assert!(!marker.exists());
}

#[test]
fn non_zero_exit_reports_stderr() {
    let mut fx = Fixture::new();
    let config = fx.config("fail.sh", FAILING_DRIVER, 10);
    let err = fx.session.preview(&config).unwrap_err();
    match &err {
        GenError::RendererFailed { code, stderr } => {
            assert_eq!(*code, Some(2));
            assert!(stderr.contains("bad card on line 3"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(err.to_string().contains("bad card on line 3"));
    assert!(fx.session.preview_image().is_none());
}

#[test]
fn invalid_image_is_deleted() {
    let mut fx = Fixture::new();
    let config = fx.config("garbage.sh", GARBAGE_DRIVER, 10);
    assert!(matches!(
        fx.session.preview(&config),
        Err(GenError::InvalidImage(_))
    ));

    let scripts = files_with_extension(fx.session.scratch_dir(), "inp");
    assert_eq!(scripts.len(), 1);
    assert!(!scripts[0].with_extension("ppm").exists());
    assert!(files_with_extension(fx.session.scratch_dir(), "ppm").is_empty());
    assert!(fx.session.preview_image().is_none());
}

#[test]
fn missing_driver_is_reported_before_running() {
    let mut fx = Fixture::new();
    let config = RendererConfig {
        binary: fx.dir.path().join("illustrate"),
        driver: fx.dir.path().join("absent.sh"),
        timeout_secs: 10,
    };
    match fx.session.preview(&config) {
        Err(GenError::RendererConfig(msg)) => assert!(msg.contains("absent.sh")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(fx.session.preview_image().is_none());
}

#[test]
fn missing_image_after_success_is_invalid() {
    let mut fx = Fixture::new();
    let config = fx.config("noop.sh", "exit 0\n", 10);
    assert!(matches!(
        fx.session.preview(&config),
        Err(GenError::InvalidImage(_))
    ));
}
