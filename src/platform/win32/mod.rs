// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::HWND,
        UI::{Shell::ShellExecuteW, WindowsAndMessaging::SW_SHOWNORMAL},
    },
};

use crate::error::{NexcodeError, Result};

/// `ShellExecuteW` return values at or below this are error codes.
const SHELL_EXECUTE_MAX_ERROR: isize = 32;

/// Hand `address` to the shell's "open" verb (default browser for URLs).
pub(crate) fn shell_open(address: &str) -> Result<()> {
    let wide: Vec<u16> = address.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: `wide` is a valid null-terminated UTF-16 string that outlives
    // the call; the verb is a static wide literal; the remaining pointers are
    // null, which ShellExecuteW documents as "use defaults".
    let result = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("open"),
            PCWSTR(wide.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // The HINSTANCE is not a real handle; its integer value is the status.
    let code = result.0 as isize;
    if code <= SHELL_EXECUTE_MAX_ERROR {
        return Err(NexcodeError::Win32 {
            function: "ShellExecuteW",
            code: code as u32,
        });
    }
    Ok(())
}
