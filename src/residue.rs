//! Residues: named groups of atoms, like an amino acid or a water molecule.

use crate::error::{Result, Status, check};
use crate::ffi::{self, CHFL_RESIDUE};
use crate::handle::{Duplicate, ForeignHandle, NativeType, View, Wrapper};
use crate::property::{self, Property};
use crate::util::{DEFAULT_BUFFER_SIZE, read_string, to_cstring};

unsafe impl NativeType for CHFL_RESIDUE {
    const NAME: &'static str = "residue";
}

unsafe impl Duplicate for CHFL_RESIDUE {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_residue_copy(ptr) }
    }
}

#[derive(Debug)]
pub struct Residue {
    handle: ForeignHandle<CHFL_RESIDUE>,
}

/// Read-only residue inside a topology.
pub type ResidueRef<'a> = View<'a, Residue>;

impl Wrapper for Residue {
    type Native = CHFL_RESIDUE;

    fn from_handle(handle: ForeignHandle<CHFL_RESIDUE>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_RESIDUE> {
        &self.handle
    }
}

impl Residue {
    /// Create a residue without identifier.
    pub fn new(name: &str) -> Result<Residue> {
        let name = to_cstring(name, "residue name")?;
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_residue(name.as_ptr()))? };
        Ok(Residue { handle })
    }

    /// Create a residue with the identifier `id`, usually its sequence number.
    pub fn with_id(name: &str, id: i64) -> Result<Residue> {
        let name = to_cstring(name, "residue name")?;
        let handle =
            unsafe { ForeignHandle::create_root(|| ffi::chfl_residue_with_id(name.as_ptr(), id))? };
        Ok(Residue { handle })
    }

    pub fn try_clone(&self) -> Result<Residue> {
        Ok(Residue {
            handle: self.handle.duplicate()?,
        })
    }

    pub fn name(&self) -> Result<String> {
        let ptr = self.handle.const_ptr();
        read_string(DEFAULT_BUFFER_SIZE, |buffer, size| {
            check(unsafe { ffi::chfl_residue_name(ptr, buffer, size) })
        })
    }

    /// Identifier of the residue, `None` if it was created without one.
    ///
    /// The native library reports a missing id as a generic error, so the
    /// last error message is left set after `Ok(None)`.
    pub fn id(&self) -> Result<Option<i64>> {
        let mut id = 0;
        match check(unsafe { ffi::chfl_residue_id(self.handle.const_ptr(), &mut id) }) {
            Ok(()) => Ok(Some(id)),
            Err(err) if err.status() == Some(Status::GenericError) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Number of atoms in this residue.
    pub fn size(&self) -> Result<usize> {
        let mut count = 0;
        check(unsafe { ffi::chfl_residue_atoms_count(self.handle.const_ptr(), &mut count) })?;
        Ok(count as usize)
    }

    /// Indices of the atoms in this residue, sorted.
    pub fn atoms(&self) -> Result<Vec<usize>> {
        let count = self.size()?;
        let mut atoms = vec![0u64; count];
        check(unsafe {
            ffi::chfl_residue_atoms(self.handle.const_ptr(), atoms.as_mut_ptr(), count as u64)
        })?;
        Ok(atoms.into_iter().map(|atom| atom as usize).collect())
    }

    pub fn add_atom(&mut self, atom: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_residue_add_atom(ptr, atom as u64) })
    }

    pub fn contains(&self, atom: usize) -> Result<bool> {
        let mut result = false;
        check(unsafe {
            ffi::chfl_residue_contains(self.handle.const_ptr(), atom as u64, &mut result)
        })?;
        Ok(result)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Property>) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        property::set_property(ptr, name, value.into(), ffi::chfl_residue_set_property)
    }

    pub fn get(&self, name: &str) -> Result<Property> {
        property::get_property(self.handle.const_ptr(), name, ffi::chfl_residue_get_property)
    }

    pub fn properties_count(&self) -> Result<usize> {
        property::properties_count(self.handle.const_ptr(), ffi::chfl_residue_properties_count)
    }

    pub fn list_properties(&self) -> Result<Vec<String>> {
        property::list_properties(
            self.handle.const_ptr(),
            ffi::chfl_residue_properties_count,
            ffi::chfl_residue_list_properties,
        )
    }
}
