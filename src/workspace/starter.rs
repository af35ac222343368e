// ── Starter workspace ─────────────────────────────────────────────────────────
//
// The four files a fresh editor opens with: a page that links a stylesheet
// and a script by name, plus a standalone component.

use super::Workspace;

const STARTER_FILES: &[(&str, &str)] = &[
    ("index.html", include_str!("../../assets/starter/index.html")),
    ("style.css", include_str!("../../assets/starter/style.css")),
    ("script.js", include_str!("../../assets/starter/script.js")),
    ("App.jsx", include_str!("../../assets/starter/App.jsx")),
];

impl Workspace {
    /// A workspace pre-populated with the starter files, `index.html` active.
    pub fn starter() -> Self {
        let mut ws = Self::new();
        let ids: Vec<_> = STARTER_FILES
            .iter()
            .map(|(name, content)| ws.upload(name, (*content).to_owned()))
            .collect();
        if let Some(&first) = ids.first() {
            ws.set_active(first);
        }
        ws
    }
}
