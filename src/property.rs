//! Named values attached to atoms, residues and frames.
//!
//! A property is one of four kinds: boolean, number, string or 3D vector.
//! The native side stores it behind an opaque `CHFL_PROPERTY` carrying an
//! explicit kind tag, which is always read before the payload.

use crate::error::{Error, Result, check};
use crate::ffi::{self, CHFL_PROPERTY, chfl_status};
use crate::handle::{ForeignHandle, NativeType, Wrapper};
use crate::util::{DEFAULT_BUFFER_SIZE, cstr_to_string, read_string, to_cstring};
use libc::c_char;
use serde::{Deserialize, Serialize};
use serde_json::Value;

unsafe impl NativeType for CHFL_PROPERTY {
    const NAME: &'static str = "property";
}

/// Value of a property.
///
/// Integers are stored as `f64`, the native library only knows doubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    Bool(bool),
    Double(f64),
    String(String),
    Vector3D([f64; 3]),
}

impl Property {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Property::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Property::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_vector3d(&self) -> Option<[f64; 3]> {
        match *self {
            Property::Vector3D(value) => Some(value),
            _ => None,
        }
    }

    /// Encode this value into a new native property.
    pub fn to_native(&self) -> Result<RawProperty> {
        let handle = match self {
            Property::Bool(value) => {
                let value = *value;
                unsafe { ForeignHandle::create_root(|| ffi::chfl_property_bool(value))? }
            }
            Property::Double(value) => {
                let value = *value;
                unsafe { ForeignHandle::create_root(|| ffi::chfl_property_double(value))? }
            }
            Property::String(value) => {
                let value = to_cstring(value, "property value")?;
                unsafe { ForeignHandle::create_root(|| ffi::chfl_property_string(value.as_ptr()))? }
            }
            Property::Vector3D(value) => unsafe {
                ForeignHandle::create_root(|| ffi::chfl_property_vector3d(value.as_ptr()))?
            },
        };
        Ok(RawProperty { handle })
    }

    /// Decode a native property.
    ///
    /// Fails with [`Error::CorruptProperty`] when the native kind tag is
    /// not one of the four known kinds.
    pub fn from_native(raw: &RawProperty) -> Result<Property> {
        let ptr = raw.handle.const_ptr();
        let kind = raw.kind()?;
        match kind {
            ffi::CHFL_PROPERTY_BOOL => {
                let mut value = false;
                check(unsafe { ffi::chfl_property_get_bool(ptr, &mut value) })?;
                Ok(Property::Bool(value))
            }
            ffi::CHFL_PROPERTY_DOUBLE => {
                let mut value = 0.0;
                check(unsafe { ffi::chfl_property_get_double(ptr, &mut value) })?;
                Ok(Property::Double(value))
            }
            ffi::CHFL_PROPERTY_STRING => {
                let value = read_string(DEFAULT_BUFFER_SIZE, |buffer, size| {
                    check(unsafe { ffi::chfl_property_get_string(ptr, buffer, size) })
                })?;
                Ok(Property::String(value))
            }
            ffi::CHFL_PROPERTY_VECTOR3D => {
                let mut value = [0.0; 3];
                check(unsafe { ffi::chfl_property_get_vector3d(ptr, value.as_mut_ptr()) })?;
                Ok(Property::Vector3D(value))
            }
            kind => Err(Error::CorruptProperty { kind }),
        }
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Property {
                fn from(value: $ty) -> Self {
                    Property::Double(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::String(value.to_owned())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::String(value)
    }
}

impl From<[f64; 3]> for Property {
    fn from(value: [f64; 3]) -> Self {
        Property::Vector3D(value)
    }
}

impl From<(f64, f64, f64)> for Property {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Property::Vector3D([x, y, z])
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unsupported(type_name: impl Into<String>) -> Error {
    Error::UnsupportedPropertyType {
        type_name: type_name.into(),
    }
}

impl TryFrom<&Value> for Property {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(value) => Ok(Property::Bool(*value)),
            Value::Number(number) => number
                .as_f64()
                .map(Property::Double)
                .ok_or_else(|| unsupported(format!("number {number}"))),
            Value::String(value) => Ok(Property::String(value.clone())),
            Value::Array(items) if items.len() == 3 => {
                let mut vector = [0.0; 3];
                for (slot, item) in vector.iter_mut().zip(items) {
                    *slot = item
                        .as_f64()
                        .ok_or_else(|| unsupported(format!("array containing {}", json_type(item))))?;
                }
                Ok(Property::Vector3D(vector))
            }
            Value::Array(items) => Err(unsupported(format!("array of length {}", items.len()))),
            other => Err(unsupported(json_type(other))),
        }
    }
}

impl TryFrom<Value> for Property {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(value) => Ok(Property::String(value)),
            other => Property::try_from(&other),
        }
    }
}

/// A native property handle, always root-owned.
#[derive(Debug)]
pub struct RawProperty {
    handle: ForeignHandle<CHFL_PROPERTY>,
}

impl RawProperty {
    /// Raw kind tag reported by the native side.
    pub fn kind(&self) -> Result<ffi::chfl_property_kind> {
        let mut kind = 0;
        check(unsafe { ffi::chfl_property_get_kind(self.handle.const_ptr(), &mut kind) })?;
        Ok(kind)
    }
}

impl Wrapper for RawProperty {
    type Native = CHFL_PROPERTY;

    fn from_handle(handle: ForeignHandle<CHFL_PROPERTY>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_PROPERTY> {
        &self.handle
    }
}

// Shared plumbing for the objects carrying properties. Each takes the
// native functions of one owner type.

type SetProperty<T> = unsafe extern "C" fn(*mut T, *const c_char, *const CHFL_PROPERTY) -> chfl_status;
type GetProperty<T> = unsafe extern "C" fn(*const T, *const c_char) -> *mut CHFL_PROPERTY;
type CountProperties<T> = unsafe extern "C" fn(*const T, *mut u64) -> chfl_status;
type ListProperties<T> = unsafe extern "C" fn(*const T, *mut *const c_char, u64) -> chfl_status;

pub(crate) fn set_property<T>(
    owner: *mut T,
    name: &str,
    value: Property,
    setter: SetProperty<T>,
) -> Result<()> {
    let name = to_cstring(name, "property name")?;
    let raw = value.to_native()?;
    check(unsafe { setter(owner, name.as_ptr(), raw.handle.const_ptr()) })
}

pub(crate) fn get_property<T>(owner: *const T, name: &str, getter: GetProperty<T>) -> Result<Property> {
    let name = to_cstring(name, "property name")?;
    let handle = unsafe { ForeignHandle::create_root(|| getter(owner, name.as_ptr()))? };
    Property::from_native(&RawProperty { handle })
}

pub(crate) fn properties_count<T>(owner: *const T, count: CountProperties<T>) -> Result<usize> {
    let mut value = 0;
    check(unsafe { count(owner, &mut value) })?;
    Ok(value as usize)
}

pub(crate) fn list_properties<T>(
    owner: *const T,
    count: CountProperties<T>,
    list: ListProperties<T>,
) -> Result<Vec<String>> {
    let size = properties_count(owner, count)?;
    let mut names = vec![std::ptr::null::<c_char>(); size];
    check(unsafe { list(owner, names.as_mut_ptr(), size as u64) })?;
    // the names point into the owner, copy them right away
    Ok(names
        .into_iter()
        .map(|name| unsafe { cstr_to_string(name) })
        .collect())
}
