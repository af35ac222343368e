// ── Preview composition ───────────────────────────────────────────────────────
//
// Turns the current file set plus the active file into one self-contained
// HTML document.  Composition is a pure function of its inputs: no counters,
// no timestamps, nothing carried between calls.  It never fails; "nothing to
// preview" is the empty string.
//
// Strategy, in priority order:
//   1. Any HTML file present → first HTML file with linked CSS/JS inlined.
//   2. Active file is JSX/TSX → component template (runtime + transpiler).
//   3. Active file is CSS / JavaScript / Markdown → its canned template.
//   4. Anything else → empty.

pub mod linking;
pub mod templates;

use std::sync::LazyLock;

pub use linking::{ReferenceKind, UnresolvedReference};
pub use templates::{ScriptSources, Template, TemplateSet};

use crate::languages::Language;
use crate::workspace::FileRecord;

// ── Strategy ──────────────────────────────────────────────────────────────────

/// Which composition path applies to a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Root HTML page with linked stylesheets and scripts inlined.
    LinkedHtml,
    /// Active JSX/TSX component mounted by an in-page transpiler.
    Component,
    /// Active stylesheet applied to sample markup.
    Stylesheet,
    /// Active script run with its console routed into the page.
    Script,
    /// Active Markdown rendered client-side.
    Markdown,
    /// Nothing previewable.
    Empty,
}

/// Decide the composition path without building anything.
pub fn select_strategy(files: &[FileRecord], active: Option<&FileRecord>) -> Strategy {
    if files.iter().any(|f| f.language == Language::Html) {
        return Strategy::LinkedHtml;
    }
    match active.map(|f| f.language) {
        Some(lang) if lang.is_component() => Strategy::Component,
        Some(Language::Css) => Strategy::Stylesheet,
        Some(Language::JavaScript) => Strategy::Script,
        Some(Language::Markdown) => Strategy::Markdown,
        _ => Strategy::Empty,
    }
}

// ── Composer ──────────────────────────────────────────────────────────────────

/// Result of a composition together with the soft warnings it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub strategy: Strategy,
    /// The document; empty when `strategy` is `Empty`.
    pub document: String,
    /// Relative references in a composed HTML page that no file satisfied.
    pub unresolved: Vec<UnresolvedReference>,
}

/// Holds the templates and remote script references used for composition.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    templates: TemplateSet,
    sources: ScriptSources,
}

impl Composer {
    pub fn new(templates: TemplateSet, sources: ScriptSources) -> Self {
        Self { templates, sources }
    }

    /// Default templates with the given script references.
    pub fn with_sources(sources: ScriptSources) -> Self {
        Self::new(TemplateSet::default(), sources)
    }

    /// Compose the preview document.
    pub fn compose(&self, files: &[FileRecord], active: Option<&FileRecord>) -> String {
        self.compose_report(files, active).document
    }

    /// Compose the preview document and collect unresolved references.
    pub fn compose_report(&self, files: &[FileRecord], active: Option<&FileRecord>) -> Composition {
        let strategy = select_strategy(files, active);

        let root = files.iter().find(|f| f.language == Language::Html);
        let (document, unresolved) = match (strategy, root, active) {
            (Strategy::LinkedHtml, Some(root), _) => (
                linking::inline_references(&root.content, files),
                linking::unresolved_references(&root.content, files),
            ),
            (Strategy::Empty | Strategy::LinkedHtml, _, _) | (_, _, None) => {
                (String::new(), Vec::new())
            }
            (_, _, Some(file)) => (self.single_file(file), Vec::new()),
        };
        for r in &unresolved {
            log::warn!("preview references {:?} {:?} but no such file is open", r.kind, r.target);
        }
        log::debug!("composed {strategy:?} preview ({} bytes)", document.len());

        Composition {
            strategy,
            document,
            unresolved,
        }
    }

    fn single_file(&self, file: &FileRecord) -> String {
        let Some(template) = self.templates.for_language(file.language) else {
            return String::new();
        };
        let s = &self.sources;
        match file.language {
            Language::Markdown => {
                let literal = templates::script_string_literal(&file.content);
                template.render(&[
                    ("markdown_url", s.markdown_url.as_str()),
                    ("content_json", literal.as_str()),
                ])
            }
            _ => template.render(&[
                ("react_url", s.react_url.as_str()),
                ("react_dom_url", s.react_dom_url.as_str()),
                ("transpiler_url", s.transpiler_url.as_str()),
                ("content", file.content.as_str()),
            ]),
        }
    }
}

static DEFAULT_COMPOSER: LazyLock<Composer> = LazyLock::new(Composer::default);

/// Compose with the built-in templates and script references.
pub fn compose(files: &[FileRecord], active: Option<&FileRecord>) -> String {
    DEFAULT_COMPOSER.compose(files, active)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;

    fn workspace(files: &[(&str, &str)]) -> Workspace {
        let mut ws = Workspace::new();
        for (name, content) in files {
            ws.upload(name, (*content).to_owned());
        }
        ws
    }

    fn compose_ws(ws: &Workspace) -> String {
        compose(ws.files(), ws.active_file())
    }

    #[test]
    fn empty_set_is_empty() {
        let ws = Workspace::new();
        assert_eq!(compose_ws(&ws), "");
        assert_eq!(select_strategy(ws.files(), None), Strategy::Empty);
    }

    #[test]
    fn html_without_references_is_returned_unchanged() {
        let page = "<!DOCTYPE html>\n<p>Hi &amp; {{content}} $1</p>\n";
        let ws = workspace(&[("index.html", page), ("notes.md", "# x")]);
        assert_eq!(compose_ws(&ws), page);
    }

    #[test]
    fn linked_stylesheet_is_inlined() {
        let ws = workspace(&[
            ("index.html", r#"<head><link rel="stylesheet" href="style.css"></head>"#),
            ("style.css", "body{color:red}"),
        ]);
        let out = compose_ws(&ws);
        assert!(out.contains("<style>\nbody{color:red}\n</style>"));
        assert!(!out.contains("style.css"));
    }

    #[test]
    fn missing_script_is_left_and_reported() {
        let html = r#"<body><script src="missing.js"></script></body>"#;
        let ws = workspace(&[("index.html", html)]);
        let c = Composer::default().compose_report(ws.files(), ws.active_file());
        assert_eq!(c.strategy, Strategy::LinkedHtml);
        assert_eq!(c.document, html);
        assert_eq!(
            c.unresolved,
            vec![UnresolvedReference {
                kind: ReferenceKind::Script,
                target: "missing.js".to_owned(),
            }]
        );
    }

    #[test]
    fn html_wins_even_when_component_is_active() {
        let mut ws = workspace(&[("index.html", "<p>page</p>"), ("App.jsx", "<App/>")]);
        let jsx = ws.find_by_name("App.jsx").expect("jsx").id;
        ws.set_active(jsx);
        assert_eq!(compose_ws(&ws), "<p>page</p>");
    }

    #[test]
    fn first_html_file_is_the_root() {
        let ws = workspace(&[("a.html", "<p>a</p>"), ("b.html", "<p>b</p>")]);
        assert_eq!(compose_ws(&ws), "<p>a</p>");
    }

    #[test]
    fn starter_workspace_inlines_both_siblings() {
        let ws = Workspace::starter();
        let c = Composer::default().compose_report(ws.files(), ws.active_file());
        assert!(c.document.contains("<style>\n* {"));
        assert!(c.document.contains("<script>\nlet clickCount = 0;"));
        assert!(c.unresolved.is_empty());
    }

    #[test]
    fn component_wraps_active_jsx() {
        let ws = workspace(&[("style.css", "a{}"), ("Main.tsx", "const A = () => <b/>;")]);
        let out = compose_ws(&ws);
        assert!(out.contains("<script type=\"text/babel\">\nconst A = () => <b/>;\n"));
        assert!(out.contains("https://unpkg.com/@babel/standalone/babel.min.js"));
        assert!(out.contains("react-dom@18"));
        assert!(!out.contains("a{}"));
    }

    #[test]
    fn stylesheet_preview_inlines_css_with_sample_markup() {
        let ws = workspace(&[("theme.css", "button{color:red}")]);
        let out = compose_ws(&ws);
        assert!(out.contains("<style>button{color:red}</style>"));
        assert!(out.contains("Sample Button"));
    }

    #[test]
    fn script_preview_captures_console_before_user_code() {
        let ws = workspace(&[("main.js", "console.log('hi')")]);
        let out = compose_ws(&ws);
        let hook = out.find("console.log = ").expect("console hook");
        let user = out.find("<script>console.log('hi')</script>").expect("user script");
        assert!(hook < user);
        assert!(out.contains("window.onerror"));
    }

    #[test]
    fn markdown_is_embedded_as_string_literal() {
        let ws = workspace(&[("README.md", "# Title\n</script>")]);
        let out = compose_ws(&ws);
        assert!(out.contains(r##"marked.parse("# Title\n<\/script>")"##));
        assert!(out.contains("marked.min.js"));
    }

    #[test]
    fn custom_sources_flow_into_templates() {
        let ws = workspace(&[("README.md", "x")]);
        let composer = Composer::with_sources(ScriptSources {
            markdown_url: "vendor/marked.js".to_owned(),
            ..ScriptSources::default()
        });
        let out = composer.compose(ws.files(), ws.active_file());
        assert!(out.contains(r#"<script src="vendor/marked.js"></script>"#));
    }

    #[test]
    fn unpreviewable_active_file_is_empty() {
        for name in ["data.json", "types.ts", "notes.txt"] {
            let ws = workspace(&[(name, "x")]);
            assert_eq!(compose_ws(&ws), "", "{name}");
        }
    }

    #[test]
    fn no_active_file_without_html_is_empty() {
        let ws = workspace(&[("a.css", "a{}"), ("b.js", "b()")]);
        assert_eq!(compose(ws.files(), None), "");
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::compose;
    use crate::workspace::Workspace;

    fn arb_name() -> impl Strategy<Value = String> {
        (
            "[a-z]{1,6}",
            prop::sample::select(vec!["css", "js", "jsx", "tsx", "md", "json", "txt"]),
        )
            .prop_map(|(stem, ext)| format!("{stem}.{ext}"))
    }

    proptest! {
        #[test]
        fn without_html_or_active_composition_is_empty(
            files in prop::collection::vec((arb_name(), ".{0,40}"), 0..6)
        ) {
            let mut ws = Workspace::new();
            for (name, content) in &files {
                ws.upload(name, content.clone());
            }
            prop_assert_eq!(compose(ws.files(), None), "");
        }

        #[test]
        fn composition_is_deterministic(
            files in prop::collection::vec((arb_name(), ".{0,40}"), 1..6),
            page in ".{0,60}",
        ) {
            let mut ws = Workspace::new();
            ws.upload("index.html", format!("{page}<script src=\"a.js\"></script>"));
            for (name, content) in &files {
                ws.upload(name, content.clone());
            }
            let first = compose(ws.files(), ws.active_file());
            let second = compose(ws.files(), ws.active_file());
            prop_assert_eq!(first, second);
        }
    }
}
