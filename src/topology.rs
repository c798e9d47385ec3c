//! Topologies: atoms, the bonds between them and their residues.
//!
//! Angles and dihedrals are never set directly, the native library derives
//! them from the bonds.

use crate::atom::{Atom, AtomMut, AtomRef};
use crate::error::{Error, Result, check};
use crate::ffi::{self, CHFL_TOPOLOGY};
use crate::handle::{Duplicate, ForeignHandle, NativeType, View, ViewMut, Wrapper};
use crate::residue::{Residue, ResidueRef};

unsafe impl NativeType for CHFL_TOPOLOGY {
    const NAME: &'static str = "topology";
}

unsafe impl Duplicate for CHFL_TOPOLOGY {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_topology_copy(ptr) }
    }
}

#[derive(Debug)]
pub struct Topology {
    handle: ForeignHandle<CHFL_TOPOLOGY>,
}

/// Read-only topology inside a frame.
pub type TopologyRef<'a> = View<'a, Topology>;

impl Wrapper for Topology {
    type Native = CHFL_TOPOLOGY;

    fn from_handle(handle: ForeignHandle<CHFL_TOPOLOGY>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_TOPOLOGY> {
        &self.handle
    }
}

type ListConnectivity<const N: usize> =
    unsafe extern "C" fn(*const CHFL_TOPOLOGY, *mut [u64; N], u64) -> ffi::chfl_status;

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Result<Topology> {
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_topology())? };
        Ok(Topology { handle })
    }

    pub fn try_clone(&self) -> Result<Topology> {
        Ok(Topology {
            handle: self.handle.duplicate()?,
        })
    }

    /// Number of atoms.
    pub fn size(&self) -> Result<usize> {
        let mut count = 0;
        check(unsafe { ffi::chfl_topology_atoms_count(self.handle.const_ptr(), &mut count) })?;
        Ok(count as usize)
    }

    /// Resize to `natoms` atoms. New atoms have empty names and types;
    /// removed atoms take their bonds with them.
    pub fn resize(&mut self, natoms: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_resize(ptr, natoms as u64) })
    }

    /// Add a copy of `atom` at the end of this topology.
    pub fn add_atom(&mut self, atom: &Atom) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_add_atom(ptr, atom.handle().const_ptr()) })
    }

    /// Remove the atom at `index`, shifting the following indices down by one.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_remove(ptr, index as u64) })
    }

    pub fn atom(&self, index: usize) -> Result<AtomRef<'_>> {
        let ptr = unsafe {
            ffi::chfl_atom_from_topology(self.handle.const_ptr().cast_mut(), index as u64)
        };
        unsafe { View::from_const_view(self, ptr) }
    }

    /// Read-only views of every atom, in order.
    pub fn iter_atoms(&self) -> Result<impl ExactSizeIterator<Item = Result<AtomRef<'_>>> + '_> {
        let size = self.size()?;
        Ok((0..size).map(move |index| self.atom(index)))
    }

    pub fn atom_mut(&mut self, index: usize) -> Result<AtomMut<'_>> {
        let topology = self.handle.mutable_ptr()?;
        let ptr = unsafe { ffi::chfl_atom_from_topology(topology, index as u64) };
        unsafe { ViewMut::from_mutable_view(self, ptr) }
    }

    pub fn bonds_count(&self) -> Result<usize> {
        self.count(ffi::chfl_topology_bonds_count)
    }

    pub fn angles_count(&self) -> Result<usize> {
        self.count(ffi::chfl_topology_angles_count)
    }

    pub fn dihedrals_count(&self) -> Result<usize> {
        self.count(ffi::chfl_topology_dihedrals_count)
    }

    pub fn impropers_count(&self) -> Result<usize> {
        self.count(ffi::chfl_topology_impropers_count)
    }

    /// Bonds, as pairs of atom indices.
    pub fn bonds(&self) -> Result<Vec<[usize; 2]>> {
        self.connectivity(self.bonds_count()?, ffi::chfl_topology_bonds)
    }

    pub fn angles(&self) -> Result<Vec<[usize; 3]>> {
        self.connectivity(self.angles_count()?, ffi::chfl_topology_angles)
    }

    pub fn dihedrals(&self) -> Result<Vec<[usize; 4]>> {
        self.connectivity(self.dihedrals_count()?, ffi::chfl_topology_dihedrals)
    }

    /// Improper dihedrals, with the central atom second.
    pub fn impropers(&self) -> Result<Vec<[usize; 4]>> {
        self.connectivity(self.impropers_count()?, ffi::chfl_topology_impropers)
    }

    pub fn add_bond(&mut self, i: usize, j: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_add_bond(ptr, i as u64, j as u64) })
    }

    /// Removing a bond that does not exist is not an error.
    pub fn remove_bond(&mut self, i: usize, j: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_remove_bond(ptr, i as u64, j as u64) })
    }

    pub fn residues_count(&self) -> Result<usize> {
        self.count(ffi::chfl_topology_residues_count)
    }

    /// Add a copy of `residue`. Fails if one of its atoms already belongs
    /// to another residue.
    pub fn add_residue(&mut self, residue: &Residue) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_topology_add_residue(ptr, residue.handle().const_ptr()) })
    }

    pub fn residue(&self, index: usize) -> Result<ResidueRef<'_>> {
        let ptr = unsafe { ffi::chfl_residue_from_topology(self.handle.const_ptr(), index as u64) };
        unsafe { View::from_const_view(self, ptr) }
    }

    /// Residue containing the atom at `index`, if any.
    pub fn residue_for_atom(&self, index: usize) -> Result<Option<ResidueRef<'_>>> {
        let size = self.size()?;
        if index >= size {
            return Err(Error::IndexOutOfBounds {
                kind: "atom",
                index,
                size,
            });
        }

        let ptr = unsafe { ffi::chfl_residue_for_atom(self.handle.const_ptr(), index as u64) };
        if ptr.is_null() {
            return Ok(None);
        }
        unsafe { View::from_const_view(self, ptr).map(Some) }
    }

    /// Is there a bond between an atom of `first` and an atom of `second`?
    pub fn are_linked(&self, first: &Residue, second: &Residue) -> Result<bool> {
        let mut result = false;
        check(unsafe {
            ffi::chfl_topology_residues_linked(
                self.handle.const_ptr(),
                first.handle().const_ptr(),
                second.handle().const_ptr(),
                &mut result,
            )
        })?;
        Ok(result)
    }

    fn count(
        &self,
        function: unsafe extern "C" fn(*const CHFL_TOPOLOGY, *mut u64) -> ffi::chfl_status,
    ) -> Result<usize> {
        let mut count = 0;
        check(unsafe { function(self.handle.const_ptr(), &mut count) })?;
        Ok(count as usize)
    }

    fn connectivity<const N: usize>(
        &self,
        count: usize,
        list: ListConnectivity<N>,
    ) -> Result<Vec<[usize; N]>> {
        let mut data = vec![[0u64; N]; count];
        check(unsafe { list(self.handle.const_ptr(), data.as_mut_ptr(), count as u64) })?;
        Ok(data
            .into_iter()
            .map(|entry| entry.map(|index| index as usize))
            .collect())
    }
}
