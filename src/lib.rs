// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32`   – ShellExecuteW FFI
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Multi-file live preview composition for an in-browser code editor.
//!
//! A [`workspace::Workspace`] holds the open files.  The
//! [`preview::Composer`] turns them into one self-contained HTML document,
//! and a [`host::RenderHost`] loads that document into an isolated surface,
//! tracking the load and releasing every exported copy exactly once.
//! [`app::App`] wires the three together behind a single state root.

pub mod app;
pub mod editor;
pub mod error;
pub mod host;
pub mod languages;
pub mod logging;
pub mod platform;
pub mod preview;
pub mod settings;
pub mod ui;
pub mod workspace;

pub use error::{NexcodeError, Result};
