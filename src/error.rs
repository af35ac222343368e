// ── Central error type ────────────────────────────────────────────────────────
//
// Only the outer edges of the crate are fallible: settings I/O, exporting a
// composed document, and asking the OS to open it.  The registry and the
// composer never fail; they represent every outcome as state.

use thiserror::Error;

/// Every error that NexCode can produce.
#[derive(Debug, Error)]
pub enum NexcodeError {
    /// A standard I/O error (settings file, exported document, input file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be serialised or parsed.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// The host environment refused to export a composed document.
    #[error("could not export preview document: {0}")]
    Export(String),

    /// The host environment could not open an address in a new view.
    #[error("could not open {address}: {reason}")]
    Open {
        /// The address that was being opened.
        address: String,
        /// Human-readable failure reason from the platform.
        reason: String,
    },

    /// A file was named on the command line but is not among the inputs.
    #[error("no input file is named {0:?}")]
    UnknownFile(String),

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code or HRESULT.
        code: u32,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NexcodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_names_the_address() {
        let e = NexcodeError::Open {
            address: "file:///tmp/preview-1.html".to_owned(),
            reason: "no browser".to_owned(),
        };
        assert_eq!(
            e.to_string(),
            "could not open file:///tmp/preview-1.html: no browser"
        );
    }

    #[test]
    fn unknown_file_is_not_reported_as_io() {
        let e = NexcodeError::UnknownFile("app.js".to_owned());
        assert_eq!(e.to_string(), "no input file is named \"app.js\"");
    }

    #[test]
    fn io_error_converts_with_question_mark() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(NexcodeError::Io(_))));
    }
}
