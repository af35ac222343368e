// ── Canned preview templates ──────────────────────────────────────────────────
//
// Each single-file preview is a fixed document skeleton with `{{name}}`
// placeholders.  The skeletons live in `assets/templates/` and are kept as
// data so they can be swapped or tested without touching the composer.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::languages::Language;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder pattern is valid")
});

// ── Template ──────────────────────────────────────────────────────────────────

/// A document skeleton with `{{name}}` interpolation points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: &'static str,
}

impl Template {
    pub const fn from_static(source: &'static str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &str {
        self.source
    }

    /// Substitute placeholders in a single pass over the skeleton.
    ///
    /// Substituted values are never rescanned, so user content containing
    /// `{{...}}` comes through verbatim.  Placeholders with no value are
    /// left as written.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(self.source, |caps: &Captures<'_>| {
                let key = &caps[1];
                match vars.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => (*value).to_owned(),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }
}

// ── Remote script references ──────────────────────────────────────────────────

/// External scripts the canned templates load inside the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSources {
    pub react_url: String,
    pub react_dom_url: String,
    /// Standalone JIT transpiler for JSX/TSX.
    pub transpiler_url: String,
    pub markdown_url: String,
}

impl Default for ScriptSources {
    fn default() -> Self {
        Self {
            react_url: "https://unpkg.com/react@18/umd/react.development.js".to_owned(),
            react_dom_url: "https://unpkg.com/react-dom@18/umd/react-dom.development.js"
                .to_owned(),
            transpiler_url: "https://unpkg.com/@babel/standalone/babel.min.js".to_owned(),
            markdown_url: "https://cdn.jsdelivr.net/npm/marked/marked.min.js".to_owned(),
        }
    }
}

// ── TemplateSet ───────────────────────────────────────────────────────────────

/// The tag → template mapping used for non-HTML previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub component: Template,
    pub stylesheet: Template,
    pub script: Template,
    pub markdown: Template,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            component: Template::from_static(include_str!("../../assets/templates/component.html")),
            stylesheet: Template::from_static(include_str!(
                "../../assets/templates/stylesheet.html"
            )),
            script: Template::from_static(include_str!("../../assets/templates/script.html")),
            markdown: Template::from_static(include_str!("../../assets/templates/markdown.html")),
        }
    }
}

impl TemplateSet {
    /// The template that previews a lone file of `lang`, if any.
    pub fn for_language(&self, lang: Language) -> Option<&Template> {
        match lang {
            Language::Jsx | Language::Tsx => Some(&self.component),
            Language::Css => Some(&self.stylesheet),
            Language::JavaScript => Some(&self.script),
            Language::Markdown => Some(&self.markdown),
            _ => None,
        }
    }
}

/// Encode `text` as a JavaScript string literal that is safe to place inside
/// a `<script>` element.
pub fn script_string_literal(text: &str) -> String {
    // Serialising a &str cannot fail.
    let json = serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""));
    json.replace("</", "<\\/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
