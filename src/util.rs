//! String marshalling between Rust and the native library.

use crate::error::{Error, Result};
use libc::c_char;
use std::ffi::{CStr, CString};
use std::path::Path;

/// Initial buffer size for most string getters.
pub(crate) const DEFAULT_BUFFER_SIZE: usize = 32;

/// Read a string of unknown length from a native getter.
///
/// `fill` is called with a zeroed buffer and its size, and must write a
/// NUL-terminated string into it, truncating if needed. Truncation is
/// detected when the second-to-last byte is not NUL; the buffer size is
/// then doubled and `fill` is called again. The text is decoded up to the
/// first NUL.
///
/// Errors from `fill` are returned as-is, without retrying.
pub(crate) fn read_string<F>(initial: usize, mut fill: F) -> Result<String>
where
    F: FnMut(*mut c_char, u64) -> Result<()>,
{
    debug_assert!(initial >= 2, "string buffers need room for one byte and a NUL");
    let mut capacity = initial.max(2);
    loop {
        let mut buffer = vec![0 as c_char; capacity];
        fill(buffer.as_mut_ptr(), capacity as u64)?;
        if buffer[capacity - 2] == 0 {
            return decode(&buffer);
        }
        capacity *= 2;
    }
}

fn decode(buffer: &[c_char]) -> Result<String> {
    let bytes: Vec<u8> = buffer
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8(bytes).map_err(|_| Error::Utf8 {
        context: "string from chemfiles",
    })
}

/// Convert a Rust string to a C string.
pub(crate) fn to_cstring(value: &str, context: &'static str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::NulByte { context })
}

/// Convert a path to a C string.
///
/// The native library only takes UTF-8 paths.
pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
    let path = path.to_str().ok_or(Error::Utf8 { context: "path" })?;
    to_cstring(path, "path")
}

/// Copy a native C string, replacing invalid UTF-8.
///
/// A NULL pointer reads as the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a valid NUL-terminated string.
pub(crate) unsafe fn cstr_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
