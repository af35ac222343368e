// ── Sandbox policy ────────────────────────────────────────────────────────────
//
// Capabilities granted to a preview document.  There is no same-origin flag:
// a preview document never shares the host application's origin, storage or
// parent-frame DOM.

/// Capabilities a rendering surface grants to the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SandboxPolicy {
    pub scripts: bool,
    pub forms: bool,
    pub modals: bool,
    pub popups: bool,
}

impl SandboxPolicy {
    /// Everything denied.
    pub const fn locked() -> Self {
        Self {
            scripts: false,
            forms: false,
            modals: false,
            popups: false,
        }
    }

    /// What the JS, JSX and Markdown templates need to work.
    pub const fn preview() -> Self {
        Self {
            scripts: true,
            forms: true,
            modals: true,
            popups: false,
        }
    }

    /// Space-separated `sandbox` attribute tokens.
    pub fn to_attribute(self) -> String {
        let tokens = [
            (self.scripts, "allow-scripts"),
            (self.forms, "allow-forms"),
            (self.modals, "allow-modals"),
            (self.popups, "allow-popups"),
        ];
        tokens
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_policy_attribute() {
        assert_eq!(
            SandboxPolicy::preview().to_attribute(),
            "allow-scripts allow-forms allow-modals"
        );
    }

    #[test]
    fn preview_policy_never_grants_same_origin() {
        assert!(!SandboxPolicy::preview().to_attribute().contains("same-origin"));
    }

    #[test]
    fn locked_policy_is_empty_attribute() {
        assert_eq!(SandboxPolicy::locked().to_attribute(), "");
        assert_eq!(SandboxPolicy::default(), SandboxPolicy::locked());
    }
}
