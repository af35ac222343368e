// ── Settings persistence ──────────────────────────────────────────────────────
//
// Reads and writes `<config dir>/nexcode/settings.json`.
// Pure safe Rust + serde_json.  Only preferences live here;
// file buffers are never persisted.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::{HostOptions, SandboxPolicy};
use crate::preview::ScriptSources;

// ── Enumerations ──────────────────────────────────────────────────────────────

/// Editor colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Which panes are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Split,
    Editor,
    Preview,
}

impl PreviewMode {
    pub fn shows_editor(self) -> bool {
        matches!(self, PreviewMode::Split | PreviewMode::Editor)
    }

    pub fn shows_preview(self) -> bool {
        matches!(self, PreviewMode::Split | PreviewMode::Preview)
    }
}

// ── Font size ─────────────────────────────────────────────────────────────────

pub const MIN_FONT_SIZE: u16 = 10;
pub const MAX_FONT_SIZE: u16 = 24;
pub const DEFAULT_FONT_SIZE: u16 = 14;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Preview tuning and remote script references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Loading → errored after this many milliseconds.
    pub load_timeout_ms: u64,
    /// Lifetime of a document opened in the browser, in milliseconds.
    pub external_grace_ms: u64,
    #[serde(flatten)]
    pub sources: ScriptSources,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            load_timeout_ms: 10_000,
            external_grace_ms: 10_000,
            sources: ScriptSources::default(),
        }
    }
}

impl PreviewSettings {
    pub fn host_options(&self) -> HostOptions {
        HostOptions {
            load_timeout: Duration::from_millis(self.load_timeout_ms),
            external_grace: Duration::from_millis(self.external_grace_ms),
            policy: SandboxPolicy::preview(),
        }
    }
}

/// Root of the JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub theme: Theme,
    pub font_size: u16,
    pub preview_mode: PreviewMode,
    pub preview: PreviewSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            theme: Theme::default(),
            font_size: DEFAULT_FONT_SIZE,
            preview_mode: PreviewMode::default(),
            preview: PreviewSettings::default(),
        }
    }
}

impl Settings {
    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    fn normalised(mut self) -> Self {
        self.set_font_size(self.font_size);
        self
    }
}

// ── Format version ────────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the default settings path: `<config dir>/nexcode/settings.json`.
///
/// Returns `None` if the platform has no config directory.
pub fn settings_path() -> Option<PathBuf> {
    let mut p = dirs::config_dir()?;
    p.push("nexcode");
    p.push("settings.json");
    Some(p)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write `settings` to `path` as pretty JSON, creating parent directories.
pub fn save(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, settings)?;
    log::debug!("saved settings to {}", path.display());
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the settings file.
///
/// Returns `None` on any error: file missing, JSON parse failure, or an
/// unrecognised version number.
pub fn load(path: &Path) -> Option<Settings> {
    let data = fs::read(path).ok()?;
    let settings: Settings = match serde_json::from_slice(&data) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("ignoring malformed settings {}: {e}", path.display());
            return None;
        }
    };
    if settings.version != SETTINGS_VERSION {
        log::warn!(
            "ignoring settings {} with unknown version {}",
            path.display(),
            settings.version
        );
        return None;
    }
    Some(settings.normalised())
}

/// Load from `path`, or the default location when `None`, falling back to
/// defaults on any failure.
pub fn load_or_default(path: Option<&Path>) -> Settings {
    let path = path.map(Path::to_path_buf).or_else(settings_path);
    path.as_deref().and_then(load).unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
