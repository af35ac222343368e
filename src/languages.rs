// ── Language detection ────────────────────────────────────────────────────────
//
// Maps file names to `Language` tags and provides the per-language data the
// rest of the crate needs: status-bar label, tab icon, starter body for a
// freshly added file.  Pure Rust; no I/O.

use serde::{Deserialize, Serialize};

// ── Language enum ─────────────────────────────────────────────────────────────

/// Declared language of a file, derived from its name.
///
/// Serialises as the lowercase tag (`"javascript"`, `"plaintext"`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Json,
    Markdown,
    PlainText,
}

impl Language {
    /// The lowercase language tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Jsx => "jsx",
            Language::Tsx => "tsx",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::PlainText => "plaintext",
        }
    }

    /// Upper-case label shown in the editor status bar.
    pub fn status_label(self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// Icon shown next to the file in the tab bar and file list.
    pub fn icon(self) -> &'static str {
        match self {
            Language::Html => "\u{1F310}",
            Language::Css => "\u{1F3A8}",
            Language::JavaScript => "\u{26A1}",
            Language::TypeScript => "\u{1F537}",
            Language::Jsx | Language::Tsx => "\u{269B}\u{FE0F}",
            Language::Json => "\u{1F4CB}",
            Language::Markdown => "\u{1F4DD}",
            Language::PlainText => "\u{1F4C4}",
        }
    }

    /// `true` for the two component languages the JIT transpiler handles.
    pub fn is_component(self) -> bool {
        matches!(self, Language::Jsx | Language::Tsx)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Language detection ────────────────────────────────────────────────────────

/// Detect the language from a file name.
///
/// Only the text after the last `.` is considered, compared
/// case-insensitively.  Names without a `.` and unknown extensions map to
/// `Language::PlainText`; there is no failure path.
pub fn language_from_name(name: &str) -> Language {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return Language::PlainText,
    };

    match ext.as_str() {
        "html" | "htm" => Language::Html,
        "css" => Language::Css,
        "js" | "mjs" => Language::JavaScript,
        "ts" => Language::TypeScript,
        "jsx" => Language::Jsx,
        "tsx" => Language::Tsx,
        "json" => Language::Json,
        "md" => Language::Markdown,
        _ => Language::PlainText,
    }
}

// ── Starter bodies ────────────────────────────────────────────────────────────

/// Canned content for a file created with `Workspace::add`.
pub fn starter_content(lang: Language) -> &'static str {
    match lang {
        Language::Html => HTML_STARTER,
        Language::Css => "/* New stylesheet */\n",
        Language::JavaScript => "// JavaScript file\n",
        Language::TypeScript => "// TypeScript file\n",
        Language::Jsx => JSX_STARTER,
        Language::Tsx => TSX_STARTER,
        Language::Json => "{\n  \n}",
        Language::Markdown => "# New Document\n\nStart writing here...\n",
        Language::PlainText => "",
    }
}

static HTML_STARTER: &str = concat!(
    "<!DOCTYPE html>\n",
    "<html lang=\"en\">\n",
    "<head>\n",
    "  <meta charset=\"UTF-8\">\n",
    "  <title>New File</title>\n",
    "</head>\n",
    "<body>\n",
    "  \n",
    "</body>\n",
    "</html>",
);

static JSX_STARTER: &str = "// React JSX component
function App() {
  return <div>Hello World</div>;
}
";

static TSX_STARTER: &str = "// React TSX component
const App: React.FC = () => {
  return <div>Hello World</div>;
};

export default App;
";

// ── Tests ─────────────────────────────────────────────────────────────────────
