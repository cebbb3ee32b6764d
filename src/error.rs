//! Crate-level error types.

use std::fmt;
use std::time::Duration;

/// Errors produced by the illustrate-gen crate.
#[derive(Debug)]
pub enum GenError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Uploaded structure bytes could not be decoded as text.
    FileDecode(String),
    /// Generation was requested before any structure was uploaded.
    NoStructure,
    /// A color string was not a `#RRGGBB` hex triple.
    InvalidColor(String),
    /// TOML options/job parsing or serialization failure.
    OptionsParse(String),
    /// A script did not follow the renderer command grammar.
    ScriptParse {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// Renderer binary or driver script is missing or unusable.
    RendererConfig(String),
    /// The renderer exceeded its time budget and was killed.
    RendererTimeout {
        /// Budget that was exceeded.
        timeout: Duration,
        /// Whatever the process wrote to stderr before it was killed.
        stderr: String,
    },
    /// The renderer exited with a non-zero status.
    RendererFailed {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Diagnostic text from the error stream.
        stderr: String,
    },
    /// The renderer claimed success but its image is missing or corrupt.
    InvalidImage(String),
    /// Downloading a structure failed.
    Fetch(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::FileDecode(msg) => write!(f, "file error: {msg}"),
            Self::NoStructure => {
                write!(f, "no structure file has been uploaded")
            }
            Self::InvalidColor(s) => {
                write!(f, "invalid color {s:?}: expected #RRGGBB")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ScriptParse { line, message } => {
                write!(f, "script parse error at line {line}: {message}")
            }
            Self::RendererConfig(msg) => {
                write!(f, "renderer configuration error: {msg}")
            }
            Self::RendererTimeout { timeout, stderr } => {
                write!(
                    f,
                    "renderer timed out after {}s",
                    timeout.as_secs_f32()
                )?;
                write_diagnostics(f, stderr)
            }
            Self::RendererFailed { code, stderr } => {
                match code {
                    Some(code) => {
                        write!(f, "renderer exited with status {code}")?;
                    }
                    None => write!(f, "renderer terminated by signal")?,
                }
                write_diagnostics(f, stderr)
            }
            Self::InvalidImage(msg) => write!(f, "invalid image: {msg}"),
            Self::Fetch(msg) => write!(f, "fetch error: {msg}"),
        }
    }
}

fn write_diagnostics(f: &mut fmt::Formatter<'_>, stderr: &str) -> fmt::Result {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        Ok(())
    } else {
        write!(f, ": {stderr}")
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GenError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
