// ── Render host ───────────────────────────────────────────────────────────────
//
// Loads composed documents into an isolated rendering surface and tracks the
// load through `Idle → Loading → Loaded | Errored`.
//
// Load completions arrive asynchronously and in no guaranteed order, so every
// load is stamped with a `LoadGeneration`.  A completion is only honoured if
// it carries the generation of the newest load; anything older is stale.
//
// All methods run on the UI thread.  Time is passed in explicitly (`now`) so
// timeouts and grace periods are deterministic under test.

pub mod export;
pub mod headless;
pub mod sandbox;

use std::time::{Duration, Instant};

use crate::error::Result;

pub use export::{ExportId, ExportTracker, ExportedDocument, FileExportEnvironment};
pub use sandbox::SandboxPolicy;

// ── Collaborator contracts ────────────────────────────────────────────────────

/// An isolated surface that can load a document from an address.
///
/// The embedder reports the surface's "content ready" signal back through
/// `RenderHost::content_ready` with the generation returned by `load`.
pub trait RenderSurface {
    /// Start loading `address` under `policy`, abandoning any previous load.
    fn navigate(&mut self, address: &str, policy: SandboxPolicy);

    /// Show nothing.
    fn clear(&mut self);
}

/// Host-side primitives for exporting documents and opening new views.
pub trait HostEnvironment {
    /// Publish `document` under a fresh address.
    fn export(&mut self, document: &str) -> Result<ExportedDocument>;

    /// Release an export.  Consumes the handle so it cannot be revoked twice.
    fn revoke(&mut self, export: ExportedDocument) -> Result<()>;

    /// Ask the environment to open `address` in a new top-level view.
    fn open_in_new_view(&mut self, address: &str) -> Result<()>;
}

// ── Load state ────────────────────────────────────────────────────────────────

/// Stamp identifying one call to `RenderHost::load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadGeneration(u64);

/// Observable state of the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing to show.
    Idle,
    Loading {
        generation: LoadGeneration,
        started: Instant,
    },
    Loaded {
        generation: LoadGeneration,
    },
    Errored {
        generation: LoadGeneration,
        message: String,
    },
}

/// Tuning for a `RenderHost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOptions {
    /// How long a load may stay in `Loading` before it is marked errored.
    pub load_timeout: Duration,
    /// How long a document opened externally stays exported.
    pub external_grace: Duration,
    pub policy: SandboxPolicy,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(10),
            external_grace: Duration::from_secs(10),
            policy: SandboxPolicy::preview(),
        }
    }
}

// ── RenderHost ────────────────────────────────────────────────────────────────

/// Owns the rendering surface, the last composed document, and every export
/// made on its behalf.
pub struct RenderHost<S: RenderSurface, E: HostEnvironment> {
    surface: S,
    env: E,
    options: HostOptions,
    state: LoadState,
    document: String,
    next_generation: u64,
    /// Export backing the in-flight load, tagged with its generation.
    current: Option<(LoadGeneration, ExportedDocument)>,
    external: ExportTracker,
}

impl<S: RenderSurface, E: HostEnvironment> RenderHost<S, E> {
    pub fn new(surface: S, env: E, options: HostOptions) -> Self {
        Self {
            surface,
            env,
            options,
            state: LoadState::Idle,
            document: String::new(),
            next_generation: 0,
            current: None,
            external: ExportTracker::new(),
        }
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    /// `false` means "no preview available".
    pub fn has_content(&self) -> bool {
        !self.document.is_empty()
    }

    /// The most recently loaded document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Number of externally opened exports not yet released.
    pub fn pending_external(&self) -> usize {
        self.external.len()
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Load `document`, superseding any load in flight.
    ///
    /// Returns the generation the surface's completion must be reported with,
    /// or `None` for an empty document (the surface is cleared and the host
    /// goes `Idle`).
    pub fn load(&mut self, document: String, now: Instant) -> Option<LoadGeneration> {
        self.release_current();
        self.document = document;

        if self.document.is_empty() {
            self.surface.clear();
            self.state = LoadState::Idle;
            log::debug!("preview cleared");
            return None;
        }

        self.next_generation += 1;
        let generation = LoadGeneration(self.next_generation);

        match self.env.export(&self.document) {
            Ok(export) => {
                self.surface.navigate(export.address(), self.options.policy);
                self.current = Some((generation, export));
                self.state = LoadState::Loading {
                    generation,
                    started: now,
                };
                log::debug!("load {generation:?} started");
            }
            Err(e) => {
                log::warn!("load {generation:?} could not export the preview: {e}");
                self.state = LoadState::Errored {
                    generation,
                    message: e.to_string(),
                };
            }
        }
        Some(generation)
    }

    /// Load the most recent document again, even if it is unchanged.
    pub fn reload(&mut self, now: Instant) -> Option<LoadGeneration> {
        let document = std::mem::take(&mut self.document);
        self.load(document, now)
    }

    /// The surface finished loading the document of `generation`.
    pub fn content_ready(&mut self, generation: LoadGeneration) {
        if !self.is_current_load(generation) {
            log::trace!("ignoring stale completion for {generation:?}");
            return;
        }
        self.state = LoadState::Loaded { generation };
        self.release_current();
        log::debug!("load {generation:?} finished");
    }

    /// The surface reported that the document of `generation` failed to load.
    pub fn load_failed(&mut self, generation: LoadGeneration, message: impl Into<String>) {
        if !self.is_current_load(generation) {
            log::trace!("ignoring stale failure for {generation:?}");
            return;
        }
        let message = message.into();
        log::warn!("load {generation:?} failed: {message}");
        self.state = LoadState::Errored {
            generation,
            message,
        };
        self.release_current();
    }

    /// Apply the load timeout and release external exports whose grace
    /// period has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if let LoadState::Loading {
            generation,
            started,
        } = self.state
        {
            if now.saturating_duration_since(started) >= self.options.load_timeout {
                let secs = self.options.load_timeout.as_secs_f32();
                self.load_failed(
                    generation,
                    format!("Preview did not finish loading within {secs:.1}s"),
                );
            }
        }

        for export in self.external.take_expired(now) {
            self.revoke(export);
        }
    }

    fn is_current_load(&self, generation: LoadGeneration) -> bool {
        matches!(self.state, LoadState::Loading { generation: g, .. } if g == generation)
    }

    // ── External view ─────────────────────────────────────────────────────────

    /// Export the current document and open it in a new top-level view.
    ///
    /// The export stays alive for the grace period, or until
    /// `external_view_loaded` is called.  Returns `Ok(None)` when there is
    /// nothing to show.
    pub fn open_externally(&mut self, now: Instant) -> Result<Option<ExportId>> {
        if self.document.is_empty() {
            log::debug!("open externally: no preview available");
            return Ok(None);
        }
        let export = self.env.export(&self.document)?;
        if let Err(e) = self.env.open_in_new_view(export.address()) {
            self.revoke(export);
            return Err(e);
        }
        let id = export.id();
        self.external.track(export, now + self.options.external_grace);
        Ok(Some(id))
    }

    /// The external view finished loading; its export can go now.
    pub fn external_view_loaded(&mut self, id: ExportId) {
        if let Some(export) = self.external.take(id) {
            self.revoke(export);
        }
    }

    // ── Export bookkeeping ────────────────────────────────────────────────────

    fn release_current(&mut self) {
        if let Some((_, export)) = self.current.take() {
            self.revoke(export);
        }
    }

    fn revoke(&mut self, export: ExportedDocument) {
        let address = export.address().to_owned();
        if let Err(e) = self.env.revoke(export) {
            log::warn!("failed to release {address}: {e}");
        }
    }
}

impl<S: RenderSurface, E: HostEnvironment> Drop for RenderHost<S, E> {
    fn drop(&mut self) {
        self.release_current();
        for export in self.external.drain() {
            self.revoke(export);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
