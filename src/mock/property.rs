use super::{Backing, Failure, allocate, failure, object, out, pointer, status, text, vector3d, write_string};
use crate::ffi::{self, CHFL_PROPERTY, chfl_property_kind, chfl_status};
use libc::{c_char, c_double, c_int};
use std::collections::BTreeMap;
use std::ffi::CString;

#[derive(Debug, Clone)]
pub(crate) enum Property {
    Bool(bool),
    Double(f64),
    String(CString),
    Vector3D([f64; 3]),
    /// A kind tag no binding knows about
    Corrupt(c_int),
}

impl Backing for CHFL_PROPERTY {
    type Object = Property;
}

/// Properties stored on atoms, residues and frames.
pub(crate) type Properties = BTreeMap<CString, Property>;

/// Allocate a property carrying the unknown kind tag `kind`.
pub(crate) fn corrupt_property(kind: c_int) -> *mut CHFL_PROPERTY {
    allocate::<CHFL_PROPERTY>(Property::Corrupt(kind))
}

fn wrong_kind(expected: &str) -> Failure {
    failure(
        ffi::CHFL_PROPERTY_ERROR,
        format!("this property does not contain a {expected}"),
    )
}

pub(crate) unsafe fn set(properties: &mut Properties, name: *const c_char, property: *const CHFL_PROPERTY) -> Result<(), Failure> {
    let name = unsafe { text(name)? };
    let property = unsafe { object(property)? };
    properties.insert(CString::new(name).unwrap_or_default(), property.clone());
    Ok(())
}

pub(crate) unsafe fn get(properties: &Properties, name: *const c_char) -> *mut CHFL_PROPERTY {
    pointer(|| {
        let name = unsafe { text(name)? };
        let key = CString::new(name).unwrap_or_default();
        match properties.get(&key) {
            Some(property) => Ok(allocate::<CHFL_PROPERTY>(property.clone())),
            None => Err(failure(
                ffi::CHFL_PROPERTY_ERROR,
                format!("can not find a property named '{name}'"),
            )),
        }
    })
}

pub(crate) unsafe fn count(properties: &Properties, count: *mut u64) -> Result<(), Failure> {
    *unsafe { out(count)? } = properties.len() as u64;
    Ok(())
}

pub(crate) unsafe fn list(properties: &Properties, names: *mut *const c_char, count: u64) -> Result<(), Failure> {
    if count as usize != properties.len() {
        return Err(super::generic(format!(
            "wrong data size in list_properties: expected {}, got {count}",
            properties.len()
        )));
    }
    for (i, name) in properties.keys().enumerate() {
        unsafe { *names.add(i) = name.as_ptr() };
    }
    Ok(())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_bool(value: bool) -> *mut CHFL_PROPERTY {
    allocate::<CHFL_PROPERTY>(Property::Bool(value))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_double(value: c_double) -> *mut CHFL_PROPERTY {
    allocate::<CHFL_PROPERTY>(Property::Double(value))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_string(value: *const c_char) -> *mut CHFL_PROPERTY {
    pointer(|| {
        let value = unsafe { text(value)? };
        Ok(allocate::<CHFL_PROPERTY>(Property::String(
            CString::new(value).unwrap_or_default(),
        )))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_vector3d(value: *const c_double) -> *mut CHFL_PROPERTY {
    pointer(|| {
        let value = unsafe { vector3d(value)? };
        Ok(allocate::<CHFL_PROPERTY>(Property::Vector3D(value)))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_get_kind(
    property: *const CHFL_PROPERTY,
    kind: *mut chfl_property_kind,
) -> chfl_status {
    status(|| {
        let property = unsafe { object(property)? };
        *unsafe { out(kind)? } = match property {
            Property::Bool(_) => ffi::CHFL_PROPERTY_BOOL,
            Property::Double(_) => ffi::CHFL_PROPERTY_DOUBLE,
            Property::String(_) => ffi::CHFL_PROPERTY_STRING,
            Property::Vector3D(_) => ffi::CHFL_PROPERTY_VECTOR3D,
            Property::Corrupt(kind) => *kind,
        };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_get_bool(property: *const CHFL_PROPERTY, value: *mut bool) -> chfl_status {
    status(|| match unsafe { object(property)? } {
        Property::Bool(v) => {
            *unsafe { out(value)? } = *v;
            Ok(())
        }
        _ => Err(wrong_kind("bool")),
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_get_double(
    property: *const CHFL_PROPERTY,
    value: *mut c_double,
) -> chfl_status {
    status(|| match unsafe { object(property)? } {
        Property::Double(v) => {
            *unsafe { out(value)? } = *v;
            Ok(())
        }
        _ => Err(wrong_kind("double")),
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_get_string(
    property: *const CHFL_PROPERTY,
    buffer: *mut c_char,
    buffsize: u64,
) -> chfl_status {
    status(|| match unsafe { object(property)? } {
        Property::String(v) => unsafe { write_string(v.as_bytes(), buffer, buffsize) },
        _ => Err(wrong_kind("string")),
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_property_get_vector3d(
    property: *const CHFL_PROPERTY,
    value: *mut c_double,
) -> chfl_status {
    status(|| match unsafe { object(property)? } {
        Property::Vector3D(v) => {
            if value.is_null() {
                return Err(super::generic("unexpected NULL vector"));
            }
            unsafe { std::ptr::copy_nonoverlapping(v.as_ptr(), value, 3) };
            Ok(())
        }
        _ => Err(wrong_kind("vector3d")),
    })
}
