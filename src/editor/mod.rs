// ── Editor component contract ─────────────────────────────────────────────────
//
// The text-editing surface itself is an external component.  This module
// describes what it is given at mount time and how external content changes
// (switching files, re-uploading one) are pushed into it without remounting.

use crate::languages::Language;
use crate::settings::Theme;

/// Everything a text-editing surface needs at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub language: Language,
    pub theme: Theme,
    pub font_size: u16,
    pub initial_content: String,
}

/// A mounted text-editing surface.
///
/// Edits made by the user are reported by the embedder through
/// `App::editor_changed`; this trait only covers the inbound direction.
pub trait EditorSurface {
    /// Current full text.
    fn text(&self) -> &str;

    /// Replace the full text without remounting.
    fn replace_all(&mut self, text: &str);
}

/// What the embedder has to do to bring a surface up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorUpdate {
    /// Language, theme or font size changed: create a new surface with this
    /// configuration.
    Remount(EditorConfig),
    /// The surface was handed new content in place.
    Replaced,
    /// Already up to date.
    Unchanged,
}

/// Keeps one editor surface in step with the active file.
#[derive(Debug, Default)]
pub struct EditorSync {
    mounted: Option<(Language, Theme, u16)>,
}

impl EditorSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a surface was created from `config`.
    pub fn mounted(&mut self, config: &EditorConfig) {
        self.mounted = Some((config.language, config.theme, config.font_size));
    }

    /// Forget the mounted surface (no active file).
    pub fn unmounted(&mut self) {
        self.mounted = None;
    }

    /// Bring `surface` up to date with `config`.
    ///
    /// Pushes content with `replace_all` only when it differs from what the
    /// surface already holds, so the user's caret is not disturbed by
    /// round-tripped edits.
    pub fn sync<S: EditorSurface + ?Sized>(
        &mut self,
        surface: Option<&mut S>,
        config: &EditorConfig,
    ) -> EditorUpdate {
        let key = (config.language, config.theme, config.font_size);
        let surface = match surface {
            Some(s) if self.mounted == Some(key) => s,
            _ => return EditorUpdate::Remount(config.clone()),
        };
        if surface.text() == config.initial_content {
            return EditorUpdate::Unchanged;
        }
        surface.replace_all(&config.initial_content);
        EditorUpdate::Replaced
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
