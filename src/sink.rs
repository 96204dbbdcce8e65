//! Output sinks: the seam between document generation and platform I/O.
//!
//! Rendering is pure; everything that touches the outside world (saving a
//! download, handing text to a print path, invoking a share mechanism) goes
//! through this trait so the layout logic stays unit-testable and each
//! target platform supplies one adapter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

/// Platform output operations. Implementations may block while the platform
/// shows a dialog; a dismissed dialog is a success, not an error.
pub trait OutputSink {
    /// Save bytes under the given file name (a download).
    fn persist(&self, bytes: &[u8], filename: &str) -> io::Result<()>;

    /// Hand fixed-width text to the platform print mechanism.
    fn present(&self, text: &str) -> io::Result<()>;

    /// Offer bytes to the platform share mechanism. Returns `false` when
    /// sharing is unavailable or was declined; the caller decides on a
    /// fallback.
    fn share(&self, bytes: &[u8], filename: &str, caption: &str) -> io::Result<bool>;
}

/// Replace characters that are unsafe in file names.
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' ');
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        "recibo".to_string()
    } else {
        trimmed
    }
}

/// Filesystem adapter: downloads land in a target directory, `present`
/// spools the text to a temporary file for the platform print path and
/// removes it afterwards, sharing is unsupported.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Hand-off point for the spooled print file. The host application
    /// wires the actual device here; the file is only valid for the
    /// duration of this call.
    fn hand_off(&self, spool: &Path) -> io::Result<()> {
        info!(path = %spool.display(), "thermal text spooled for printing");
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn persist(&self, bytes: &[u8], filename: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(sanitize_filename(filename));
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "document persisted");
        Ok(())
    }

    fn present(&self, text: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let spool = self.dir.join(format!("print-spool-{}.txt", Uuid::new_v4()));
        fs::write(&spool, text)?;
        let outcome = self.hand_off(&spool);
        // The spool file is scoped to this call; remove it even when the
        // hand-off failed.
        if let Err(err) = fs::remove_file(&spool) {
            warn!(path = %spool.display(), error = %err, "failed to remove print spool file");
        }
        outcome
    }

    fn share(&self, _bytes: &[u8], _filename: &str, _caption: &str) -> io::Result<bool> {
        Ok(false)
    }
}
