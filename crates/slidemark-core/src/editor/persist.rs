//! Writing an export to a user-granted location or the fallback directory.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, SlidemarkError};

/// Where an export ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistOutcome {
    Granted(PathBuf),
    /// Granted location missing or failed; written to the fallback instead.
    Fallback(PathBuf),
}

impl PersistOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Granted(p) | Self::Fallback(p) => p,
        }
    }
}

impl fmt::Display for PersistOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted(p) => write!(f, "Saved to {}", p.display()),
            Self::Fallback(p) => write!(f, "Downloaded to {}", p.display()),
        }
    }
}

fn write_into(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(SlidemarkError::PersistUnavailable(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Try `granted` first; any failure there falls back to `fallback`, which is
/// created if needed.
pub fn persist_export(
    granted: Option<&Path>,
    fallback: &Path,
    name: &str,
    bytes: &[u8],
) -> Result<PersistOutcome> {
    if let Some(dir) = granted {
        match write_into(dir, name, bytes) {
            Ok(path) => {
                info!(path = %path.display(), "Export saved");
                return Ok(PersistOutcome::Granted(path));
            }
            Err(e) => warn!(dir = %dir.display(), error = %e, "Granted location failed, falling back"),
        }
    }
    std::fs::create_dir_all(fallback)?;
    let path = write_into(fallback, name, bytes)?;
    info!(path = %path.display(), "Export written to fallback location");
    Ok(PersistOutcome::Fallback(path))
}
