// ── File registry ─────────────────────────────────────────────────────────────
//
// Owns the ordered list of in-memory files and the identity of the active
// one.  Every mutation is a plain state transition on `&mut Workspace`;
// unknown ids are ignored because the UI layer cannot guarantee an id is
// still live by the time its event is handled.

pub mod starter;

use crate::languages::{language_from_name, starter_content, Language};

// ── Identity ──────────────────────────────────────────────────────────────────

/// Opaque, never-reused identifier of a `FileRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

/// Monotonic id source owned by a single `Workspace`.
///
/// Ids are unique within the sequence that issued them; there is no global
/// counter.
#[derive(Debug)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1000 }
    }

    pub fn next_id(&mut self) -> FileId {
        let id = FileId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

// ── FileRecord ────────────────────────────────────────────────────────────────

/// One open file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: FileId,
    /// Display name, also used for cross-file reference matching.
    pub name: String,
    pub content: String,
    /// Derived from `name`; only changes on rename or upload.
    pub language: Language,
    /// `true` once the content has been edited and not yet saved.
    pub modified: bool,
}

impl FileRecord {
    fn new(id: FileId, name: String, content: String) -> Self {
        let language = language_from_name(&name);
        Self {
            id,
            name,
            content,
            language,
            modified: false,
        }
    }

    /// Number of lines as shown in the status bar (`split('\n')` semantics).
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

// ── Workspace ─────────────────────────────────────────────────────────────────

/// The authoritative file set plus the active-file pointer.
///
/// Invariant: `active`, when set, names a record in `files`.
#[derive(Debug, Default)]
pub struct Workspace {
    files: Vec<FileRecord>,
    active: Option<FileId>,
    ids: IdSequence,
}

impl Workspace {
    /// An empty workspace with no active file.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in insertion order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn get(&self, id: FileId) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    fn get_mut(&mut self, id: FileId) -> Option<&mut FileRecord> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    /// First record with exactly this name, in set order.
    pub fn find_by_name(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn active_id(&self) -> Option<FileId> {
        self.active
    }

    pub fn active_file(&self) -> Option<&FileRecord> {
        self.active.and_then(|id| self.get(id))
    }

    /// Make `id` the active file.  Unknown ids are ignored.
    pub fn set_active(&mut self, id: FileId) {
        if self.get(id).is_some() {
            self.active = Some(id);
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Create a file with starter content for its language and make it
    /// active.  Returns `None` when the trimmed name is blank.
    pub fn add(&mut self, name: &str) -> Option<FileId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let content = starter_content(language_from_name(name)).to_owned();
        Some(self.push(name.to_owned(), content))
    }

    /// Replace a file's content and mark it modified.
    pub fn edit(&mut self, id: FileId, content: String) {
        if let Some(file) = self.get_mut(id) {
            file.content = content;
            file.modified = true;
        }
    }

    /// Rename a file and re-derive its language.  Content and the modified
    /// flag are untouched.  Blank names are ignored.
    pub fn rename(&mut self, id: FileId, new_name: &str) {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return;
        }
        if let Some(file) = self.get_mut(id) {
            file.name = new_name.to_owned();
            file.language = language_from_name(new_name);
        }
    }

    /// Delete a file.  If it was active, the first remaining file becomes
    /// active, or nothing when the set is now empty.
    pub fn remove(&mut self, id: FileId) {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        if self.files.len() == before {
            return;
        }
        if self.active == Some(id) {
            self.active = self.files.first().map(|f| f.id);
            log::debug!("removed active {id}; active is now {:?}", self.active);
        }
    }

    /// Bring in externally supplied content.
    ///
    /// A file with exactly this name is re-synced in place (content,
    /// language, clean); otherwise a new clean file is appended.  Either way
    /// the file becomes active.
    pub fn upload(&mut self, name: &str, content: String) -> FileId {
        if let Some(file) = self.files.iter_mut().find(|f| f.name == name) {
            file.content = content;
            file.language = language_from_name(name);
            file.modified = false;
            let id = file.id;
            self.active = Some(id);
            return id;
        }
        self.push(name.to_owned(), content)
    }

    /// Clear the modified flag.
    pub fn save(&mut self, id: FileId) {
        if let Some(file) = self.get_mut(id) {
            file.modified = false;
        }
    }

    fn push(&mut self, name: String, content: String) -> FileId {
        let id = self.ids.next_id();
        self.files.push(FileRecord::new(id, name, content));
        self.active = Some(id);
        id
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
