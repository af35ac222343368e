// ── Tab bar state ─────────────────────────────────────────────────────────────
//
// Pure functions from file records to the strings shown around the editor.
// The embedder owns the actual controls.

use crate::workspace::{FileRecord, Workspace};

/// Compute the display label for a tab.
///
/// Format:
/// - Clean    → `"style.css"`
/// - Modified → `"*style.css"`
pub fn tab_label(file: &FileRecord) -> String {
    if file.modified {
        format!("*{}", file.name)
    } else {
        file.name.clone()
    }
}

/// Label prefixed with the language icon, as shown in the file list.
pub fn tab_label_with_icon(file: &FileRecord) -> String {
    format!("{} {}", file.language.icon(), tab_label(file))
}

/// One entry per open file, in workspace order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    pub icon: &'static str,
    pub active: bool,
}

pub fn tabs(workspace: &Workspace) -> Vec<Tab> {
    let active = workspace.active_id();
    workspace
        .files()
        .iter()
        .map(|f| Tab {
            label: tab_label(f),
            icon: f.language.icon(),
            active: Some(f.id) == active,
        })
        .collect()
}

/// Status line for the active file: `"CSS · 12 lines"`.
pub fn status_text(file: &FileRecord) -> String {
    let lines = file.line_count();
    let unit = if lines == 1 { "line" } else { "lines" };
    format!("{} \u{00B7} {lines} {unit}", file.language.status_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        let mut ws = Workspace::new();
        ws.upload("style.css", "a{}\nb{}".into());
        ws.upload("notes.md", "# hi".into());
        ws
    }

    #[test]
    fn label_marks_modified() {
        let mut ws = workspace();
        let id = ws.files()[0].id;
        assert_eq!(tab_label(&ws.files()[0]), "style.css");
        ws.edit(id, "c{}".into());
        let file = ws.get(id).expect("file");
        assert_eq!(tab_label(file), "*style.css");
        assert!(tab_label_with_icon(file).ends_with(" *style.css"));
    }

    #[test]
    fn tabs_follow_workspace_order_and_active() {
        let ws = workspace();
        let t = tabs(&ws);
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].label, "style.css");
        assert!(!t[0].active);
        assert!(t[1].active, "last upload is active");
        assert_eq!(t[1].icon, crate::languages::Language::Markdown.icon());
    }

    #[test]
    fn status_shows_language_and_lines() {
        let ws = workspace();
        assert_eq!(status_text(&ws.files()[0]), "CSS \u{00B7} 2 lines");
        assert_eq!(status_text(&ws.files()[1]), "MARKDOWN \u{00B7} 1 line");
    }
}
