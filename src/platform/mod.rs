// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The one OS service the crate needs: open an address in a new top-level
// browser view.  All Win32 FFI is confined to the `win32` sub-module and never
// leaks outward; other targets go through the `open` crate.

#[cfg(windows)]
pub mod win32;

use crate::error::Result;

/// Open `address` with the user's default browser without blocking.
pub fn open_external(address: &str) -> Result<()> {
    log::info!("opening {address}");

    #[cfg(windows)]
    {
        win32::shell_open(address)
    }

    #[cfg(not(windows))]
    {
        open::that_detached(address).map_err(|e| crate::error::NexcodeError::Open {
            address: address.to_owned(),
            reason: e.to_string(),
        })
    }
}
