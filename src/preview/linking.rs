// ── Cross-file reference substitution ─────────────────────────────────────────
//
// Inlines stylesheets and scripts that an HTML page references by file name,
// and finds the relative references that nothing in the workspace satisfied.
//
// Matching is pattern-based on raw tag text: `href` / `src` must be quoted
// and the script tag must be closed immediately by `</script>`.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::languages::Language;
use crate::workspace::FileRecord;

static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").expect("link pattern is valid"));

static SCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script\b[^>]*\bsrc\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("script pattern is valid")
});

static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).expect("href pattern is valid")
});

static STYLESHEET_REL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\brel\s*=\s*["']?[^"'>]*\bstylesheet\b"#).expect("rel pattern is valid")
});

static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:|//)").expect("url pattern is valid")
});

// ── Types ─────────────────────────────────────────────────────────────────────

/// Which kind of tag carried an unresolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Stylesheet,
    Script,
}

/// A relative `<link>` / `<script>` reference left in a composed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub target: String,
}

// ── Substitution ──────────────────────────────────────────────────────────────

fn link_pattern(name: &str) -> String {
    format!(r#"(?i)<link[^>]+href=["']{}["'][^>]*>"#, regex::escape(name))
}

fn script_pattern(name: &str) -> String {
    format!(r#"(?i)<script[^>]+src=["']{}["'][^>]*></script>"#, regex::escape(name))
}

/// Replace `<link ... href="NAME">` with an inline `<style>` block for every
/// CSS file, then `<script ... src="NAME"></script>` with an inline
/// `<script>` block for every JavaScript file, both in set order.
///
/// Once a tag is replaced it no longer matches, so among files sharing a
/// name the first in set order wins.
pub fn inline_references(html: &str, files: &[FileRecord]) -> String {
    let mut out = html.to_owned();

    for file in files.iter().filter(|f| f.language == Language::Css) {
        let replacement = format!("<style>\n{}\n</style>", file.content);
        out = replace_tags(&out, &link_pattern(&file.name), &replacement);
    }

    for file in files.iter().filter(|f| f.language == Language::JavaScript) {
        let replacement = format!("<script>\n{}\n</script>", file.content);
        out = replace_tags(&out, &script_pattern(&file.name), &replacement);
    }

    out
}

fn replace_tags(html: &str, pattern: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(html, NoExpand(replacement)).into_owned(),
        Err(e) => {
            // Only reachable for names long enough to blow the regex size limit.
            log::warn!("skipping reference substitution: {e}");
            html.to_owned()
        }
    }
}

/// `true` when `inline_references` would replace the tag starting at the
/// beginning of `tag` with the content of a file in `files`.
fn is_inlined(kind: ReferenceKind, tag: &str, files: &[FileRecord]) -> bool {
    let (language, pattern): (Language, fn(&str) -> String) = match kind {
        ReferenceKind::Stylesheet => (Language::Css, link_pattern),
        ReferenceKind::Script => (Language::JavaScript, script_pattern),
    };
    files.iter().filter(|f| f.language == language).any(|f| {
        Regex::new(&format!("^(?:{})", pattern(&f.name)))
            .map(|re| re.is_match(tag))
            .unwrap_or(false)
    })
}

// ── Unresolved references ─────────────────────────────────────────────────────

/// Relative stylesheet and script references in the page `html` that no
/// file in `files` will be inlined for, in document order, without
/// duplicates.  Absolute URLs (`scheme:` or `//`) are expected to resolve
/// over the network and are not reported.
///
/// Scans the page as written, so tag-like text inside inlined file bodies
/// is never mistaken for a reference.
pub fn unresolved_references(html: &str, files: &[FileRecord]) -> Vec<UnresolvedReference> {
    let mut found: Vec<(usize, UnresolvedReference)> = Vec::new();

    for tag in LINK_TAG.find_iter(html) {
        if !STYLESHEET_REL.is_match(tag.as_str()) {
            continue;
        }
        if is_inlined(ReferenceKind::Stylesheet, tag.as_str(), files) {
            continue;
        }
        if let Some(href) = HREF_ATTR.captures(tag.as_str()).and_then(|c| c.get(1)) {
            found.push((
                tag.start(),
                UnresolvedReference {
                    kind: ReferenceKind::Stylesheet,
                    target: href.as_str().to_owned(),
                },
            ));
        }
    }

    for caps in SCRIPT_SRC.captures_iter(html) {
        let (Some(tag), Some(src)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // The inlining pattern needs the closing tag, so look past the match.
        if is_inlined(ReferenceKind::Script, &html[tag.start()..], files) {
            continue;
        }
        found.push((
            tag.start(),
            UnresolvedReference {
                kind: ReferenceKind::Script,
                target: src.as_str().to_owned(),
            },
        ));
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut refs: Vec<UnresolvedReference> = Vec::new();
    for (_, r) in found {
        if r.target.is_empty() || ABSOLUTE_URL.is_match(&r.target) || refs.contains(&r) {
            continue;
        }
        refs.push(r);
    }
    refs
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

    #[test]
    fn stylesheet_link_becomes_style_block() {
        let ws = workspace(&[("style.css", "body{color:red}")]);
        let out = inline_references(
            r#"<head><link rel="stylesheet" href="style.css"></head>"#,
            ws.files(),
        );
        assert_eq!(out, "<head><style>\nbody{color:red}\n</style></head>");
    }

    #[test]
    fn script_tag_becomes_inline_script() {
        let ws = workspace(&[("app.js", "go();")]);
        let out = inline_references(r#"<SCRIPT defer SRC='app.js'></SCRIPT>"#, ws.files());
        assert_eq!(out, "<script>\ngo();\n</script>");
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let ws = workspace(&[("Style.css", "a{}")]);
        let out = inline_references(r#"<link rel="stylesheet" href="style.CSS">"#, ws.files());
        assert_eq!(out, "<style>\na{}\n</style>");
    }

    #[test]
    fn dollar_signs_in_content_are_literal() {
        let ws = workspace(&[("jq.js", "$('#x').text('$1 $0 ${name}');")]);
        let out = inline_references(r#"<script src="jq.js"></script>"#, ws.files());
        assert_eq!(out, "<script>\n$('#x').text('$1 $0 ${name}');\n</script>");
    }

    #[test]
    fn regex_metacharacters_in_names_are_escaped() {
        let ws = workspace(&[("a.css", "a{}"), ("a+b.css", "b{}")]);
        let out = inline_references(r#"<link rel="stylesheet" href="aXcss">"#, ws.files());
        assert_eq!(out, r#"<link rel="stylesheet" href="aXcss">"#);
        let out = inline_references(r#"<link rel="stylesheet" href="a+b.css">"#, ws.files());
        assert_eq!(out, "<style>\nb{}\n</style>");
    }

    #[test]
    fn unmatched_references_stay_untouched() {
        let ws = workspace(&[("style.css", "a{}")]);
        let html = r#"<script src="missing.js"></script>"#;
        assert_eq!(inline_references(html, ws.files()), html);
    }

    #[test]
    fn script_with_body_is_not_replaced() {
        let ws = workspace(&[("a.js", "x()")]);
        let html = r#"<script src="a.js"> </script>"#;
        assert_eq!(inline_references(html, ws.files()), html);
    }

    #[test]
    fn duplicate_names_first_in_order_wins() {
        let ws = workspace(&[("x.css", "first{}")]);
        let mut files = ws.files().to_vec();
        let mut dup = files[0].clone();
        dup.content = "second{}".to_owned();
        files.push(dup);
        let out = inline_references(r#"<link rel="stylesheet" href="x.css">"#, &files);
        assert_eq!(out, "<style>\nfirst{}\n</style>");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let ws = workspace(&[("a.js", "x()")]);
        let html = r#"<script src="a.js"></script><script src="a.js"></script>"#;
        assert_eq!(
            inline_references(html, ws.files()),
            "<script>\nx()\n</script><script>\nx()\n</script>"
        );
    }

    #[test]
    fn reports_relative_references_in_document_order() {
        let html = r#"
            <script src="late.js"></script>
            <link rel="icon" href="favicon.ico">
            <link rel="stylesheet" href="missing.css">
            <script src="https://cdn.example.com/lib.js"></script>
            <link rel="stylesheet" href="//cdn.example.com/x.css">
            <script src="late.js"></script>
        "#;
        let refs = unresolved_references(html, &[]);
        assert_eq!(
            refs,
            vec![
                UnresolvedReference {
                    kind: ReferenceKind::Script,
                    target: "late.js".to_owned(),
                },
                UnresolvedReference {
                    kind: ReferenceKind::Stylesheet,
                    target: "missing.css".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn inline_blocks_are_not_reported() {
        assert!(unresolved_references("<style>a{}</style><script>x()</script>", &[]).is_empty());
    }

    #[test]
    fn satisfied_references_are_not_reported() {
        let ws = workspace(&[("Style.css", "a{}"), ("app.js", "go()")]);
        let html = r#"<link rel="stylesheet" href="style.css"><script src="app.js"></script>"#;
        assert!(unresolved_references(html, ws.files()).is_empty());
    }

    #[test]
    fn script_with_body_is_reported_even_when_the_file_exists() {
        let ws = workspace(&[("a.js", "x()")]);
        let refs = unresolved_references(r#"<script src="a.js"> </script>"#, ws.files());
        assert_eq!(
            refs,
            vec![UnresolvedReference {
                kind: ReferenceKind::Script,
                target: "a.js".to_owned(),
            }]
        );
    }

    #[test]
    fn tag_text_inside_inlined_files_is_not_scanned() {
        let ws = workspace(&[
            ("app.js", r#"const tag = '<script src="plugin.js"></script>';"#),
            ("theme.css", r#"/* <link rel="stylesheet" href="old.css"> */"#),
        ]);
        let html = r#"<link rel="stylesheet" href="theme.css"><script src="app.js"></script>"#;
        assert!(unresolved_references(html, ws.files()).is_empty());
    }
}
