// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by the embedder for the
// lifetime of the editor.  All mutations happen on the UI thread; there is
// no global mutable state.
//
// Every workspace mutation recomposes the preview.  The render host is only
// reloaded when the composed document changed or its last load failed;
// `reload` always forces a fresh load.

use std::time::Instant;

use crate::editor::{EditorConfig, EditorSurface, EditorSync, EditorUpdate};
use crate::error::Result;
use crate::host::{ExportId, HostEnvironment, LoadGeneration, RenderHost, RenderSurface};
use crate::preview::{Composer, Composition, Strategy};
use crate::settings::{PreviewMode, Settings, Theme};
use crate::ui::tabs::{self, Tab};
use crate::workspace::{FileId, Workspace};

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference to every event handler so that all
/// application logic sees a single, explicit state root.
pub struct App<S: RenderSurface, E: HostEnvironment> {
    workspace: Workspace,
    settings: Settings,
    composer: Composer,
    host: RenderHost<S, E>,
    editor: EditorSync,
    composition: Composition,
}

impl<S: RenderSurface, E: HostEnvironment> App<S, E> {
    /// Wire `workspace` to a render host and load the first preview.
    pub fn new(workspace: Workspace, settings: Settings, surface: S, env: E, now: Instant) -> Self {
        let composer = Composer::with_sources(settings.preview.sources.clone());
        let host = RenderHost::new(surface, env, settings.preview.host_options());
        let mut app = Self {
            workspace,
            settings,
            composer,
            host,
            editor: EditorSync::new(),
            composition: Composition {
                strategy: Strategy::Empty,
                document: String::new(),
                unresolved: Vec::new(),
            },
        };
        app.refresh_preview(now);
        app
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &RenderHost<S, E> {
        &self.host
    }

    /// The host, for reporting surface completions and failures.
    pub fn host_mut(&mut self) -> &mut RenderHost<S, E> {
        &mut self.host
    }

    /// The most recent composition, including unresolved references.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No active file | `"NexCode"` |
    /// | Active, clean | `"name — NexCode"` |
    /// | Active, modified | `"*name — NexCode"` |
    pub fn window_title(&self) -> String {
        match self.workspace.active_file() {
            None => "NexCode".to_owned(),
            Some(file) => format!("{} \u{2014} NexCode", tabs::tab_label(file)),
        }
    }

    /// Status line for the active file, if any.
    pub fn status_text(&self) -> Option<String> {
        self.workspace.active_file().map(tabs::status_text)
    }

    pub fn tabs(&self) -> Vec<Tab> {
        tabs::tabs(&self.workspace)
    }

    // ── Workspace mutations ───────────────────────────────────────────────────

    /// Create a new file with starter content; it becomes active.
    pub fn add_file(&mut self, name: &str, now: Instant) -> Option<FileId> {
        let id = self.workspace.add(name)?;
        self.refresh_preview(now);
        Some(id)
    }

    /// The user typed into the editor showing the active file.
    pub fn editor_changed(&mut self, content: String, now: Instant) {
        if let Some(id) = self.workspace.active_id() {
            self.edit(id, content, now);
        }
    }

    pub fn edit(&mut self, id: FileId, content: String, now: Instant) {
        self.workspace.edit(id, content);
        self.refresh_preview(now);
    }

    pub fn rename(&mut self, id: FileId, new_name: &str, now: Instant) {
        self.workspace.rename(id, new_name);
        self.refresh_preview(now);
    }

    pub fn remove(&mut self, id: FileId, now: Instant) {
        self.workspace.remove(id);
        self.refresh_preview(now);
    }

    pub fn upload(&mut self, name: &str, content: String, now: Instant) -> FileId {
        let id = self.workspace.upload(name, content);
        self.refresh_preview(now);
        id
    }

    pub fn select(&mut self, id: FileId, now: Instant) {
        self.workspace.set_active(id);
        self.refresh_preview(now);
    }

    /// Mark a file saved.  Does not touch the preview.
    pub fn save(&mut self, id: FileId) {
        self.workspace.save(id);
    }

    // ── Preview ───────────────────────────────────────────────────────────────

    /// Recompose and load the result if it differs from what the host holds,
    /// or if the host's last load failed.
    ///
    /// Returns the new load's generation, or `None` when nothing was loaded.
    pub fn refresh_preview(&mut self, now: Instant) -> Option<LoadGeneration> {
        self.recompose();
        if self.composition.document == self.host.document() && self.host.last_error().is_none() {
            return None;
        }
        self.host.load(self.composition.document.clone(), now)
    }

    /// Recompose and load unconditionally.
    pub fn reload(&mut self, now: Instant) -> Option<LoadGeneration> {
        self.recompose();
        self.host.load(self.composition.document.clone(), now)
    }

    /// Apply timeouts and release expired external exports.
    pub fn poll(&mut self, now: Instant) {
        self.host.poll(now);
    }

    pub fn open_externally(&mut self, now: Instant) -> Result<Option<ExportId>> {
        self.host.open_externally(now)
    }

    fn recompose(&mut self) {
        self.composition = self
            .composer
            .compose_report(self.workspace.files(), self.workspace.active_file());
    }

    // ── Preferences ───────────────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
    }

    /// Set the editor font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: u16) {
        self.settings.set_font_size(size);
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.settings.preview_mode = mode;
    }

    // ── Editor surface ────────────────────────────────────────────────────────

    /// Mount-time configuration for the active file, if any.
    pub fn editor_config(&self) -> Option<EditorConfig> {
        let file = self.workspace.active_file()?;
        Some(EditorConfig {
            language: file.language,
            theme: self.settings.theme,
            font_size: self.settings.font_size,
            initial_content: file.content.clone(),
        })
    }

    /// The embedder created a surface from `config`.
    pub fn editor_mounted(&mut self, config: &EditorConfig) {
        self.editor.mounted(config);
    }

    /// Bring `surface` up to date with the active file.
    ///
    /// Returns `None` when there is no active file; the embedder should
    /// show an empty pane.
    pub fn sync_editor<T: EditorSurface + ?Sized>(
        &mut self,
        surface: Option<&mut T>,
    ) -> Option<EditorUpdate> {
        match self.editor_config() {
            Some(config) => Some(self.editor.sync(surface, &config)),
            None => {
                self.editor.unmounted();
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
