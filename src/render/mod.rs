//! Invocation of the external ILLUSTRATE renderer.
//!
//! The renderer is reached through a driver shell script called as
//! `sh <driver> <script> <pdb>` from the script's directory, with the
//! renderer binary passed in `ILLUSTRATE_BIN`. The driver either leaves an
//! image next to the script (same stem, `.ppm` or `.png`) and exits 0, or
//! exits non-zero with diagnostics on stderr. The run is bounded by
//! [`RendererConfig::timeout`]; an overdue driver is killed
//! together with everything it started.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::script::IMAGE_EXTENSION;

/// Environment variable carrying the renderer binary path to the driver.
pub const BINARY_ENV: &str = "ILLUSTRATE_BIN";

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long to wait for pipe readers once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(500);
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Where the renderer lives and how long it may run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Renderer", inline)]
#[serde(default)]
pub struct RendererConfig {
    /// ILLUSTRATE executable.
    #[schemars(title = "Renderer Binary")]
    pub binary: PathBuf,
    /// Driver script invoked as `sh <driver> <script> <pdb>`.
    #[schemars(title = "Driver Script")]
    pub driver: PathBuf,
    /// Seconds before the run is abandoned.
    #[schemars(title = "Timeout (s)", range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("illustrate"),
            driver: PathBuf::from("run_illustrate.sh"),
            timeout_secs: 30,
        }
    }
}

impl RendererConfig {
    /// Run time limit.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that the binary and driver exist and the timeout is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::RendererConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), GenError> {
        if !self.binary.is_file() {
            return Err(GenError::RendererConfig(format!(
                "renderer binary not found: {}",
                self.binary.display()
            )));
        }
        if !self.driver.is_file() {
            return Err(GenError::RendererConfig(format!(
                "driver script not found: {}",
                self.driver.display()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GenError::RendererConfig(
                "timeout must be at least one second".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Render `script_path` and return the path of the validated image.
///
/// The image is expected next to the script with the script's stem. A file
/// that is present but not a PPM or PNG is deleted before the error is
/// returned.
///
/// # Errors
///
/// Returns [`GenError::RendererConfig`] before spawning when the setup is
/// unusable, [`GenError::RendererTimeout`] or [`GenError::RendererFailed`]
/// with the captured stderr, and [`GenError::InvalidImage`] when no usable
/// image was produced.
pub fn render(
    config: &RendererConfig,
    script_path: &Path,
    pdb_path: &Path,
) -> Result<PathBuf, GenError> {
    config.validate()?;

    let driver = std::fs::canonicalize(&config.driver)?;
    let binary = std::fs::canonicalize(&config.binary)?;
    let script = std::fs::canonicalize(script_path)?;
    let pdb = std::fs::canonicalize(pdb_path)?;
    let workdir = script.parent().unwrap_or_else(|| Path::new("."));

    log::info!(
        "Running renderer {} on {}",
        driver.display(),
        script.display()
    );
    let mut command = Command::new("sh");
    let _ = command
        .arg(&driver)
        .arg(&script)
        .arg(&pdb)
        .current_dir(workdir)
        .env(BINARY_ENV, &binary)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // Own process group, so a timeout also stops whatever the driver started.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt as _;
        let _ = command.process_group(0);
    }
    let mut child = command.spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let started = Instant::now();

    let Some(status) = wait_until(&mut child, started + config.timeout())?
    else {
        log::warn!(
            "Renderer exceeded {}s, killing it",
            config.timeout_secs
        );
        kill_tree(&mut child);
        return Err(GenError::RendererTimeout {
            timeout: config.timeout(),
            stderr: collect(&stderr),
        });
    };

    let stderr = collect(&stderr);
    let stdout = collect(&stdout);
    if !stdout.is_empty() {
        log::debug!("renderer stdout:\n{stdout}");
    }
    if !status.success() {
        return Err(GenError::RendererFailed {
            code: status.code(),
            stderr,
        });
    }
    log::info!(
        "Renderer finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );

    let image = find_image(&script)?;
    check_image(&image)?;
    Ok(image)
}

/// Poll the child until it exits or `deadline` passes (`None`).
fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> Result<Option<ExitStatus>, GenError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Kill the driver and every process in its group, then reap it.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        match Command::new("kill")
            .args(["-s", "KILL", "--", &group])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("kill {group} exited with {status}"),
            Err(e) => log::warn!("could not run kill for group {group}: {e}"),
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Forward a pipe chunk by chunk from a background thread, so output written
/// before a kill is kept even if the pipe never reaches end of file.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        let _ = thread::spawn(move || {
            let mut buf = [0_u8; 4096];
            loop {
                match pipe.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }
    rx
}

/// Everything received until the pipe closes or the grace period ends.
fn collect(rx: &Receiver<Vec<u8>>) -> String {
    let deadline = Instant::now() + DRAIN_GRACE;
    let mut bytes = Vec::new();
    while let Some(left) = deadline.checked_duration_since(Instant::now()) {
        match rx.recv_timeout(left) {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&bytes).trim().to_owned()
}

fn find_image(script: &Path) -> Result<PathBuf, GenError> {
    [IMAGE_EXTENSION, "png"]
        .into_iter()
        .map(|ext| script.with_extension(ext))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            GenError::InvalidImage(format!(
                "renderer produced no image next to {}",
                script.display()
            ))
        })
}

fn check_image(path: &Path) -> Result<(), GenError> {
    let mut head = Vec::with_capacity(PNG_MAGIC.len());
    let _ = std::fs::File::open(path)?
        .take(PNG_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    if is_image(&head) {
        return Ok(());
    }
    log::warn!("Removing invalid image {}", path.display());
    std::fs::remove_file(path)?;
    Err(GenError::InvalidImage(format!(
        "{} is not a PPM or PNG image",
        path.display()
    )))
}

/// Whether `head` starts with a PPM (`P6`/`P3`) or PNG signature.
#[must_use]
pub fn is_image(head: &[u8]) -> bool {
    head.starts_with(b"P6") || head.starts_with(b"P3") || head.starts_with(PNG_MAGIC)
}
