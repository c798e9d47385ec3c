//! Atoms: a name, a type, a mass, a charge and free-form properties.

use crate::error::{Result, check};
use crate::ffi::{self, CHFL_ATOM};
use crate::handle::{Duplicate, ForeignHandle, NativeType, View, ViewMut, Wrapper, view_mut_methods};
use crate::property::{self, Property};
use crate::util::{DEFAULT_BUFFER_SIZE, read_string, to_cstring};

unsafe impl NativeType for CHFL_ATOM {
    const NAME: &'static str = "atom";
}

unsafe impl Duplicate for CHFL_ATOM {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_atom_copy(ptr) }
    }
}

/// An atom, owned or living inside a frame or topology.
///
/// The atom name is usually an element symbol or a label like `CA`. The
/// atomic type defaults to the name, and is used to look up elemental data
/// (mass, radii, atomic number).
#[derive(Debug)]
pub struct Atom {
    handle: ForeignHandle<CHFL_ATOM>,
}

/// Read-only atom inside a frame or a topology.
pub type AtomRef<'a> = View<'a, Atom>;

/// Mutable atom inside a frame or a topology.
pub type AtomMut<'a> = ViewMut<'a, Atom>;

impl Wrapper for Atom {
    type Native = CHFL_ATOM;

    fn from_handle(handle: ForeignHandle<CHFL_ATOM>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_ATOM> {
        &self.handle
    }
}

view_mut_methods!(Atom {
    fn set_name(&mut self, name: &str) -> Result<()>;
    fn set_atomic_type(&mut self, atomic_type: &str) -> Result<()>;
    fn set_mass(&mut self, mass: f64) -> Result<()>;
    fn set_charge(&mut self, charge: f64) -> Result<()>;
    /// Add or replace the property `name`.
    fn set(&mut self, name: &str, value: impl Into<Property>) -> Result<()>;
});

impl Atom {
    pub fn new(name: &str) -> Result<Atom> {
        let name = to_cstring(name, "atom name")?;
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_atom(name.as_ptr()))? };
        Ok(Atom { handle })
    }

    /// Deep copy, independent from the frame or topology it came from.
    pub fn try_clone(&self) -> Result<Atom> {
        Ok(Atom {
            handle: self.handle.duplicate()?,
        })
    }

    pub fn name(&self) -> Result<String> {
        let ptr = self.handle.const_ptr();
        read_string(DEFAULT_BUFFER_SIZE, |buffer, size| {
            check(unsafe { ffi::chfl_atom_name(ptr, buffer, size) })
        })
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = to_cstring(name, "atom name")?;
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_atom_set_name(ptr, name.as_ptr()) })
    }

    pub fn atomic_type(&self) -> Result<String> {
        let ptr = self.handle.const_ptr();
        read_string(DEFAULT_BUFFER_SIZE, |buffer, size| {
            check(unsafe { ffi::chfl_atom_type(ptr, buffer, size) })
        })
    }

    pub fn set_atomic_type(&mut self, atomic_type: &str) -> Result<()> {
        let atomic_type = to_cstring(atomic_type, "atomic type")?;
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_atom_set_type(ptr, atomic_type.as_ptr()) })
    }

    /// Mass in atomic mass units.
    pub fn mass(&self) -> Result<f64> {
        let mut mass = 0.0;
        check(unsafe { ffi::chfl_atom_mass(self.handle.const_ptr(), &mut mass) })?;
        Ok(mass)
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_atom_set_mass(ptr, mass) })
    }

    /// Charge in number of electron charges.
    pub fn charge(&self) -> Result<f64> {
        let mut charge = 0.0;
        check(unsafe { ffi::chfl_atom_charge(self.handle.const_ptr(), &mut charge) })?;
        Ok(charge)
    }

    pub fn set_charge(&mut self, charge: f64) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_atom_set_charge(ptr, charge) })
    }

    /// Full element name (`"Zinc"` for `Zn`), empty for unknown types.
    pub fn full_name(&self) -> Result<String> {
        let ptr = self.handle.const_ptr();
        read_string(64, |buffer, size| {
            check(unsafe { ffi::chfl_atom_full_name(ptr, buffer, size) })
        })
    }

    /// Van der Waals radius, 0 for unknown types.
    pub fn vdw_radius(&self) -> Result<f64> {
        let mut radius = 0.0;
        check(unsafe { ffi::chfl_atom_vdw_radius(self.handle.const_ptr(), &mut radius) })?;
        Ok(radius)
    }

    /// Covalent radius, 0 for unknown types.
    pub fn covalent_radius(&self) -> Result<f64> {
        let mut radius = 0.0;
        check(unsafe { ffi::chfl_atom_covalent_radius(self.handle.const_ptr(), &mut radius) })?;
        Ok(radius)
    }

    /// Atomic number, 0 for unknown types.
    pub fn atomic_number(&self) -> Result<u64> {
        let mut number = 0;
        check(unsafe { ffi::chfl_atom_atomic_number(self.handle.const_ptr(), &mut number) })?;
        Ok(number)
    }

    /// Add or replace the property `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Property>) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        property::set_property(ptr, name, value.into(), ffi::chfl_atom_set_property)
    }

    /// Get a copy of the property `name`.
    pub fn get(&self, name: &str) -> Result<Property> {
        property::get_property(self.handle.const_ptr(), name, ffi::chfl_atom_get_property)
    }

    pub fn properties_count(&self) -> Result<usize> {
        property::properties_count(self.handle.const_ptr(), ffi::chfl_atom_properties_count)
    }

    pub fn list_properties(&self) -> Result<Vec<String>> {
        property::list_properties(
            self.handle.const_ptr(),
            ffi::chfl_atom_properties_count,
            ffi::chfl_atom_list_properties,
        )
    }
}
