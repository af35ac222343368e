//! `nexcode`: compose files into one preview document and show it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use nexcode::host::{FileExportEnvironment, RenderHost};
use nexcode::preview::{Composer, Composition};
use nexcode::settings::{self, Settings};
use nexcode::workspace::Workspace;
use nexcode::{logging, NexcodeError, Result};

/// Compose a set of files into a single self-contained preview page.
#[derive(Debug, Parser)]
#[command(name = "nexcode", version, about)]
struct Cli {
    /// Files to load, in order.  An HTML file links the others by name.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Make the named file active (default: the last file given).
    #[arg(long, value_name = "NAME")]
    active: Option<String>,

    /// Write the composed document to PATH instead of opening it.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Settings file to use instead of the per-user one.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("No preview available");
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("nexcode: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the files compose to nothing.
fn run(cli: &Cli) -> Result<bool> {
    let settings = settings::load_or_default(cli.settings.as_deref());
    let workspace = load_workspace(&cli.files, cli.active.as_deref())?;

    let composer = Composer::with_sources(settings.preview.sources.clone());
    let composition = composer.compose_report(workspace.files(), workspace.active_file());
    if composition.document.is_empty() {
        return Ok(false);
    }

    match &cli.output {
        Some(path) => write_document(composition, path),
        None => open_document(composition, &settings),
    }
}

fn load_workspace(paths: &[PathBuf], active: Option<&str>) -> Result<Workspace> {
    let mut ws = Workspace::new();
    for path in paths {
        let content = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        ws.upload(&name, content);
    }
    if let Some(name) = active {
        let id = ws
            .find_by_name(name)
            .map(|f| f.id)
            .ok_or_else(|| NexcodeError::UnknownFile(name.to_owned()))?;
        ws.set_active(id);
    }
    Ok(ws)
}

fn write_document(composition: Composition, path: &Path) -> Result<bool> {
    fs::write(path, &composition.document)?;
    log::info!(
        "wrote {:?} preview to {}",
        composition.strategy,
        path.display()
    );
    Ok(true)
}

fn open_document(composition: Composition, settings: &Settings) -> Result<bool> {
    let env = FileExportEnvironment::in_temp_dir()?;
    let options = settings.preview.host_options();
    let now = Instant::now();
    let mut host = RenderHost::headless(env, options, composition.document, now);

    if host.open_externally(now)?.is_none() {
        return Ok(false);
    }

    // The browser reads the exported file asynchronously; keep it until the
    // grace period is over, then let the host release it.
    std::thread::sleep(options.external_grace);
    host.poll(Instant::now());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_inputs(dir: &Path) -> Vec<PathBuf> {
        let page = dir.join("index.html");
        let css = dir.join("style.css");
        fs::write(&page, r#"<link rel="stylesheet" href="style.css">"#).expect("write html");
        fs::write(&css, "p{}").expect("write css");
        vec![page, css]
    }

    #[test]
    fn inputs_are_uploaded_by_file_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ws = load_workspace(&write_inputs(tmp.path()), None).expect("load");
        let names: Vec<_> = ws.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["index.html", "style.css"]);
        assert_eq!(ws.active_file().map(|f| f.name.as_str()), Some("style.css"));
    }

    #[test]
    fn active_selects_by_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ws = load_workspace(&write_inputs(tmp.path()), Some("index.html")).expect("load");
        assert_eq!(ws.active_file().map(|f| f.name.as_str()), Some("index.html"));
    }

    #[test]
    fn unknown_active_name_is_its_own_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = load_workspace(&write_inputs(tmp.path()), Some("app.js")).expect_err("missing");
        assert!(matches!(err, NexcodeError::UnknownFile(ref n) if n == "app.js"));
    }

    #[test]
    fn output_receives_the_composed_page() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ws = load_workspace(&write_inputs(tmp.path()), None).expect("load");
        let composition = Composer::default().compose_report(ws.files(), ws.active_file());
        let out = tmp.path().join("out.html");
        assert!(write_document(composition, &out).expect("write"));
        assert_eq!(fs::read_to_string(&out).expect("read"), "<style>\np{}\n</style>");
    }
}
