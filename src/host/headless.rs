// ── Headless collaborators ────────────────────────────────────────────────────
//
// A rendering surface with no display and an in-memory host environment.
// The command-line front end uses `HeadlessSurface` (it only ever opens the
// preview externally); embedders use both to drive a `RenderHost` in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use crate::error::{NexcodeError, Result};
use crate::host::{
    ExportId, ExportedDocument, HostEnvironment, HostOptions, RenderHost, RenderSurface,
    SandboxPolicy,
};

// ── HeadlessSurface ───────────────────────────────────────────────────────────

/// Records navigations; never renders and never reports completion itself.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    navigations: Vec<(String, SandboxPolicy)>,
    clears: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> &[(String, SandboxPolicy)] {
        &self.navigations
    }

    pub fn last_navigation(&self) -> Option<(&str, SandboxPolicy)> {
        self.navigations.last().map(|(a, p)| (a.as_str(), *p))
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl RenderSurface for HeadlessSurface {
    fn navigate(&mut self, address: &str, policy: SandboxPolicy) {
        self.navigations.push((address.to_owned(), policy));
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

impl<E: HostEnvironment> RenderHost<HeadlessSurface, E> {
    /// A host holding `document` on a surface with nothing to render.
    ///
    /// The load is reported complete straight away, so `poll` never times
    /// it out; only `open_externally` does real work.
    pub fn headless(env: E, options: HostOptions, document: String, now: Instant) -> Self {
        let mut host = RenderHost::new(HeadlessSurface::new(), env, options);
        if let Some(generation) = host.load(document, now) {
            host.content_ready(generation);
        }
        host
    }
}

// ── MemoryEnvironment ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Ledger {
    live: BTreeMap<String, String>,
    revoked: usize,
    opened: Vec<String>,
}

/// Shared view of a `MemoryEnvironment`'s bookkeeping that outlives it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger(Rc<RefCell<Ledger>>);

impl MemoryLedger {
    /// Exports not yet revoked.
    pub fn live_exports(&self) -> usize {
        self.0.borrow().live.len()
    }

    /// Total successful revocations.
    pub fn revoked(&self) -> usize {
        self.0.borrow().revoked
    }

    /// Addresses passed to `open_in_new_view`, in order.
    pub fn opened(&self) -> Vec<String> {
        self.0.borrow().opened.clone()
    }

    pub fn document_at(&self, address: &str) -> Option<String> {
        self.0.borrow().live.get(address).cloned()
    }
}

/// Host environment that keeps exports in memory under `memory://` addresses.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    ledger: MemoryLedger,
    next: u64,
    fail_exports: bool,
    fail_opens: bool,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> MemoryLedger {
        self.ledger.clone()
    }

    /// Make every subsequent `export` fail.
    pub fn fail_exports(&mut self, fail: bool) {
        self.fail_exports = fail;
    }

    /// Make every subsequent `open_in_new_view` fail.
    pub fn fail_opens(&mut self, fail: bool) {
        self.fail_opens = fail;
    }

    pub fn live_exports(&self) -> usize {
        self.ledger.live_exports()
    }

    pub fn revoked(&self) -> usize {
        self.ledger.revoked()
    }

    pub fn opened(&self) -> Vec<String> {
        self.ledger.opened()
    }

    pub fn document_at(&self, address: &str) -> Option<String> {
        self.ledger.document_at(address)
    }
}

impl HostEnvironment for MemoryEnvironment {
    fn export(&mut self, document: &str) -> Result<ExportedDocument> {
        if self.fail_exports {
            return Err(NexcodeError::Export("export disabled".to_owned()));
        }
        self.next += 1;
        let address = format!("memory://preview/{}", self.next);
        self.ledger
            .0
            .borrow_mut()
            .live
            .insert(address.clone(), document.to_owned());
        Ok(ExportedDocument::new(ExportId::new(self.next), address))
    }

    fn revoke(&mut self, export: ExportedDocument) -> Result<()> {
        let mut ledger = self.ledger.0.borrow_mut();
        match ledger.live.remove(export.address()) {
            Some(_) => {
                ledger.revoked += 1;
                Ok(())
            }
            None => Err(NexcodeError::Export(format!(
                "{} is not a live export",
                export.address()
            ))),
        }
    }

    fn open_in_new_view(&mut self, address: &str) -> Result<()> {
        if self.fail_opens {
            return Err(NexcodeError::Open {
                address: address.to_owned(),
                reason: "opening disabled".to_owned(),
            });
        }
        self.ledger.0.borrow_mut().opened.push(address.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_exports_round_trip_through_the_ledger() {
        let mut env = MemoryEnvironment::new();
        let ledger = env.ledger();
        let e = env.export("<p>x</p>").expect("export");
        assert_eq!(ledger.document_at(e.address()).as_deref(), Some("<p>x</p>"));
        env.revoke(e).expect("revoke");
        assert_eq!(ledger.live_exports(), 0);
        assert_eq!(ledger.revoked(), 1);
    }

    #[test]
    fn revoking_a_foreign_export_is_an_error() {
        let mut env = MemoryEnvironment::new();
        let forged = ExportedDocument::new(ExportId::new(42), "memory://preview/42".into());
        assert!(env.revoke(forged).is_err());
    }

    #[test]
    fn headless_host_survives_the_grace_period_without_errors() {
        let env = MemoryEnvironment::new();
        let ledger = env.ledger();
        let now = Instant::now();
        let options = HostOptions::default();
        let mut host = RenderHost::headless(env, options, "<p>page</p>".into(), now);
        assert!(!host.is_loading());

        let id = host.open_externally(now).expect("open");
        assert!(id.is_some());
        assert_eq!(ledger.opened().len(), 1);

        host.poll(now + options.external_grace + options.load_timeout);
        assert!(host.last_error().is_none());
        assert_eq!(host.pending_external(), 0);
        assert_eq!(ledger.live_exports(), 0);
    }

    #[test]
    fn headless_host_with_empty_document_has_nothing_to_open() {
        let mut host = RenderHost::headless(
            MemoryEnvironment::new(),
            HostOptions::default(),
            String::new(),
            Instant::now(),
        );
        assert!(!host.has_content());
        assert_eq!(host.open_externally(Instant::now()).expect("ok"), None);
    }

    #[test]
    fn headless_surface_records() {
        let mut s = HeadlessSurface::new();
        s.navigate("memory://preview/1", SandboxPolicy::preview());
        s.clear();
        assert_eq!(
            s.last_navigation(),
            Some(("memory://preview/1", SandboxPolicy::preview()))
        );
        assert_eq!(s.clears(), 1);
    }
}
