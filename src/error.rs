//! Error handling for the binding layer.
//!
//! Two families of failures meet here. Pre-condition violations detected by
//! the binding itself (null handles, mutable access through a read-only
//! view, values that have no property representation) are raised before or
//! instead of a native call. Everything the native library reports goes
//! through [`check`], which turns a non-zero status into [`Error::Native`]
//! carrying the library's own message, untouched.

use crate::ffi;
use libc::c_int;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Status codes of the native library.
///
/// These codes are stable and match `chfl_status` in `chemfiles.h`.
/// Codes the binding does not know about decode to [`Status::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No error
    Success,
    /// Memory allocation failed
    MemoryError,
    /// Error while reading or writing a file
    FileError,
    /// Error in a file format
    FormatError,
    /// Error in a selection string
    SelectionError,
    /// Error in a configuration file
    ConfigurationError,
    /// Out of bounds index
    OutOfBounds,
    /// Error related to properties
    PropertyError,
    /// Any other error from chemfiles
    GenericError,
    /// Exception from the C++ standard library
    CxxError,
    /// A code this binding does not know about
    Unknown,
}

impl Status {
    /// Decode a raw `chfl_status` without trusting its range.
    pub fn from_code(code: c_int) -> Self {
        match code {
            ffi::CHFL_SUCCESS => Status::Success,
            ffi::CHFL_MEMORY_ERROR => Status::MemoryError,
            ffi::CHFL_FILE_ERROR => Status::FileError,
            ffi::CHFL_FORMAT_ERROR => Status::FormatError,
            ffi::CHFL_SELECTION_ERROR => Status::SelectionError,
            ffi::CHFL_CONFIGURATION_ERROR => Status::ConfigurationError,
            ffi::CHFL_OUT_OF_BOUNDS => Status::OutOfBounds,
            ffi::CHFL_PROPERTY_ERROR => Status::PropertyError,
            ffi::CHFL_GENERIC_ERROR => Status::GenericError,
            ffi::CHFL_CXX_ERROR => Status::CxxError,
            _ => Status::Unknown,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A native constructor or accessor returned NULL.
    #[error("got a NULL {kind} pointer from chemfiles: {message}")]
    NullHandle {
        kind: &'static str,
        /// Native last-error text at the time of the failure (may be empty)
        message: String,
    },

    /// Mutable access was requested through a read-only handle.
    #[error("attempted mutable access through a read-only {kind} handle")]
    Capability { kind: &'static str },

    /// A host value has no property representation.
    #[error("can not create a property from a value of type {type_name}")]
    UnsupportedPropertyType { type_name: String },

    /// The native side reported a property kind this binding does not know.
    ///
    /// The library and the binding are out of sync; this is not recoverable.
    #[error("unknown property kind {kind}, the chemfiles library and this binding disagree")]
    CorruptProperty { kind: c_int },

    /// A selection match does not have the arity of its selection.
    #[error("selection match contains {declared} atoms, but the selection size is {expected}")]
    MatchArity { declared: u64, expected: u64 },

    /// A selection reported a size outside of 1..=4.
    #[error("invalid selection size {size}, expected a value between 1 and 4")]
    SelectionArity { size: u64 },

    /// Atom listing was requested for a multi-atom selection.
    #[error("can not list single atoms with a selection of size {size}")]
    NotSingleAtom { size: u64 },

    /// An index checked on the Rust side is out of range.
    #[error("{kind} index {index} is out of bounds for a size of {size}")]
    IndexOutOfBounds {
        kind: &'static str,
        index: usize,
        size: usize,
    },

    /// The native side reported a cell shape this binding does not know.
    #[error("unknown cell shape {shape}")]
    UnknownCellShape { shape: c_int },

    /// A native call returned a non-zero status.
    #[error("{message}")]
    Native { status: Status, message: String },

    /// Text crossing the boundary was not valid UTF-8.
    #[error("invalid UTF-8 in {context}")]
    Utf8 { context: &'static str },

    /// A host string contained an interior NUL byte.
    #[error("interior NUL byte in {context}")]
    NulByte { context: &'static str },

    /// JSON options could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a null handle error, capturing the current native message.
    pub(crate) fn null_handle(kind: &'static str) -> Self {
        Error::NullHandle {
            kind,
            message: crate::misc::last_error(),
        }
    }

    /// Status of a native failure, `None` for binding-side errors.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Native { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Translate a native status into a `Result`.
///
/// The native error state is read, not cleared: it stays available through
/// [`crate::last_error`] until [`crate::clear_errors`] is called.
pub(crate) fn check(status: ffi::chfl_status) -> Result<()> {
    if status == ffi::CHFL_SUCCESS {
        Ok(())
    } else {
        Err(Error::Native {
            status: Status::from_code(status),
            message: crate::misc::last_error(),
        })
    }
}
