// ── Exported preview documents ────────────────────────────────────────────────
//
// A composed document is handed to a rendering surface, or to an external
// browser, through a short-lived exported resource with an address.  Every
// export is released exactly once: `ExportedDocument` is not `Clone`, and
// `HostEnvironment::revoke` consumes it.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;

use crate::error::Result;
use crate::host::HostEnvironment;

// ── ExportedDocument ──────────────────────────────────────────────────────────

/// Identity of an export, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportId(u64);

impl ExportId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// A live exported document.  Release it by passing it to
/// `HostEnvironment::revoke`.
#[derive(Debug, PartialEq, Eq)]
pub struct ExportedDocument {
    id: ExportId,
    address: String,
}

impl ExportedDocument {
    pub fn new(id: ExportId, address: String) -> Self {
        Self { id, address }
    }

    pub fn id(&self) -> ExportId {
        self.id
    }

    /// Address a surface or browser can load.
    pub fn address(&self) -> &str {
        &self.address
    }
}

// ── ExportTracker ─────────────────────────────────────────────────────────────

/// Exports opened in an external view, each with a release deadline.
#[derive(Debug, Default)]
pub struct ExportTracker {
    pending: Vec<(ExportedDocument, Instant)>,
}

impl ExportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, export: ExportedDocument, expires_at: Instant) {
        self.pending.push((export, expires_at));
    }

    /// Remove and return every export whose deadline is at or before `now`.
    pub fn take_expired(&mut self, now: Instant) -> Vec<ExportedDocument> {
        let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, deadline)| *deadline <= now);
        self.pending = live;
        expired.into_iter().map(|(export, _)| export).collect()
    }

    /// Remove one export regardless of its deadline.
    pub fn take(&mut self, id: ExportId) -> Option<ExportedDocument> {
        let pos = self.pending.iter().position(|(e, _)| e.id == id)?;
        Some(self.pending.remove(pos).0)
    }

    /// Remove every export.
    pub fn drain(&mut self) -> Vec<ExportedDocument> {
        self.pending.drain(..).map(|(export, _)| export).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// ── FileExportEnvironment ─────────────────────────────────────────────────────

/// Hands an exported address to whatever shows it.
pub type Opener = Box<dyn FnMut(&str) -> Result<()>>;

/// Where exported files live.  A `Private` directory was created fresh with
/// an unpredictable name and is removed, contents included, on drop.
enum ExportDir {
    Private(TempDir),
    Given(PathBuf),
}

impl ExportDir {
    fn path(&self) -> &Path {
        match self {
            ExportDir::Private(dir) => dir.path(),
            ExportDir::Given(dir) => dir,
        }
    }
}

/// Host environment that exports documents as HTML files in a directory and
/// opens them with the platform browser.
///
/// Files are always created new; an existing entry at the target path
/// (including a symlink) makes the export fail instead of being followed.
pub struct FileExportEnvironment {
    dir: ExportDir,
    next: u64,
    opener: Opener,
}

impl FileExportEnvironment {
    /// Export into `dir`, creating it if needed, and open addresses with the
    /// system browser.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_opener(dir, Box::new(|address: &str| crate::platform::open_external(address)))
    }

    /// Export into a freshly created private directory under the system
    /// temp dir.
    pub fn in_temp_dir() -> Result<Self> {
        Self::in_temp_dir_with_opener(Box::new(|address: &str| {
            crate::platform::open_external(address)
        }))
    }

    /// `in_temp_dir` with a custom opener.
    pub fn in_temp_dir_with_opener(opener: Opener) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("nexcode-").tempdir()?;
        log::debug!("exporting previews into {}", dir.path().display());
        Ok(Self {
            dir: ExportDir::Private(dir),
            next: 1,
            opener,
        })
    }

    /// Export into `dir` and open addresses with `opener`.
    pub fn with_opener(dir: impl Into<PathBuf>, opener: Opener) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: ExportDir::Given(dir),
            next: 1,
            opener,
        })
    }

    /// Directory the exported files are written to.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn path_for(&self, id: ExportId) -> PathBuf {
        self.dir().join(format!("preview-{}.html", id.0))
    }
}

impl HostEnvironment for FileExportEnvironment {
    fn export(&mut self, document: &str) -> Result<ExportedDocument> {
        let id = ExportId(self.next);
        self.next += 1;
        let path = self.path_for(id);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(document.as_bytes())?;
        log::debug!("exported preview to {}", path.display());
        Ok(ExportedDocument::new(id, file_url(&path)))
    }

    fn revoke(&mut self, export: ExportedDocument) -> Result<()> {
        let path = self.path_for(export.id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("export {} already removed", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn open_in_new_view(&mut self, address: &str) -> Result<()> {
        (self.opener)(address)
    }
}

impl Drop for FileExportEnvironment {
    fn drop(&mut self) {
        // A private dir is removed by `TempDir`; a given one only once empty.
        if let ExportDir::Given(dir) = &self.dir {
            let _ = fs::remove_dir(dir);
        }
    }
}

/// `file://` URL for an absolute path, with `\` normalised and spaces escaped.
pub fn file_url(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/").replace(' ', "%20");
    if s.starts_with('/') {
        format!("file://{s}")
    } else {
        format!("file:///{s}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
