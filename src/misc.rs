//! Library-wide state: version, error state, configuration and warnings.
//!
//! Warnings emitted by the native library are recoverable events (an
//! unknown atom type, a skipped record) that do not make a call fail. They
//! are delivered through a single process-wide callback. This module keeps
//! the user callback alive for as long as it is registered, and forwards
//! warnings to the `log` crate when no callback is set.

use crate::error::{Result, check};
use crate::ffi;
use crate::util::{cstr_to_string, path_to_cstring};
use libc::c_char;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

type WarningCallback = Box<dyn Fn(&str) + Send + Sync + 'static>;

static WARNING_CALLBACK: RwLock<Option<WarningCallback>> = RwLock::new(None);

/// Version of the native chemfiles library.
pub fn version() -> String {
    unsafe { cstr_to_string(ffi::chfl_version()) }
}

/// Message of the last error raised by the native library on this thread.
///
/// The message stays available until [`clear_errors`] is called; it is
/// empty when no error happened.
pub fn last_error() -> String {
    unsafe { cstr_to_string(ffi::chfl_last_error()) }
}

/// Clear the native error message.
pub fn clear_errors() -> Result<()> {
    check(unsafe { ffi::chfl_clear_errors() })
}

/// Read additional configuration data from the file at `path`.
///
/// Data from this file overrides existing configuration. Fails if the file
/// does not exist or is not a valid configuration file.
pub fn add_configuration(path: impl AsRef<Path>) -> Result<()> {
    let path = path_to_cstring(path.as_ref())?;
    check(unsafe { ffi::chfl_add_configuration(path.as_ptr()) })
}

/// Call `callback` on every warning emitted by the native library.
///
/// Replaces any previous callback. A panic inside the callback is caught
/// and logged, it never unwinds into native code.
pub fn set_warning_callback<F>(callback: F) -> Result<()>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    *WARNING_CALLBACK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
    install_trampoline()
}

/// Send native warnings to the `log` crate, at the `warn` level.
pub fn clear_warning_callback() -> Result<()> {
    *WARNING_CALLBACK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
    install_trampoline()
}

fn install_trampoline() -> Result<()> {
    check(unsafe { ffi::chfl_set_warning_callback(Some(warning_trampoline)) })
}

unsafe extern "C" fn warning_trampoline(message: *const c_char) {
    let message = unsafe { cstr_to_string(message) };
    let result = catch_unwind(AssertUnwindSafe(|| {
        let callback = WARNING_CALLBACK
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match callback.as_ref() {
            Some(callback) => callback(&message),
            None => log::warn!(target: "chemfiles", "{message}"),
        }
    }));

    if result.is_err() {
        log::error!(target: "chemfiles", "panic in warning callback, while handling: {message}");
    }
}
