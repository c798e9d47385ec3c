//! Frames: one simulation step with positions, velocities, a topology and
//! a unit cell.
//!
//! The atoms, topology and cell of a frame live in the frame's memory. They
//! are reached through views borrowing the frame; positions and velocities
//! are slices borrowing it in the same way.

use crate::atom::{Atom, AtomMut, AtomRef};
use crate::cell::{UnitCell, UnitCellMut, UnitCellRef};
use crate::error::{Result, check};
use crate::ffi::{self, CHFL_FRAME, chfl_vector3d};
use crate::handle::{Duplicate, ForeignHandle, NativeType, View, ViewMut, Wrapper};
use crate::property::{self, Property};
use crate::residue::Residue;
use crate::topology::{Topology, TopologyRef};

unsafe impl NativeType for CHFL_FRAME {
    const NAME: &'static str = "frame";
}

unsafe impl Duplicate for CHFL_FRAME {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_frame_copy(ptr) }
    }
}

#[derive(Debug)]
pub struct Frame {
    handle: ForeignHandle<CHFL_FRAME>,
}

impl Wrapper for Frame {
    type Native = CHFL_FRAME;

    fn from_handle(handle: ForeignHandle<CHFL_FRAME>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_FRAME> {
        &self.handle
    }
}

type ArrayGetter =
    unsafe extern "C" fn(*mut CHFL_FRAME, *mut *mut chfl_vector3d, *mut u64) -> ffi::chfl_status;

impl Frame {
    /// Create an empty frame with an infinite cell and no velocities.
    pub fn new() -> Result<Frame> {
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_frame())? };
        Ok(Frame { handle })
    }

    pub fn try_clone(&self) -> Result<Frame> {
        Ok(Frame {
            handle: self.handle.duplicate()?,
        })
    }

    pub(crate) fn as_mut_ptr(&mut self) -> Result<*mut CHFL_FRAME> {
        self.handle.mutable_ptr()
    }

    /// Number of atoms.
    pub fn size(&self) -> Result<usize> {
        let mut count = 0;
        check(unsafe { ffi::chfl_frame_atoms_count(self.handle.const_ptr(), &mut count) })?;
        Ok(count as usize)
    }

    /// Resize the positions, the velocities and the topology. New atoms
    /// sit at the origin.
    pub fn resize(&mut self, natoms: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_resize(ptr, natoms as u64) })
    }

    /// Add a copy of `atom` at `position`. `velocity` is ignored when the
    /// frame has no velocities.
    pub fn add_atom(
        &mut self,
        atom: &Atom,
        position: [f64; 3],
        velocity: Option<[f64; 3]>,
    ) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        let velocity = velocity.as_ref().map_or(std::ptr::null(), |v| v.as_ptr());
        check(unsafe {
            ffi::chfl_frame_add_atom(ptr, atom.handle().const_ptr(), position.as_ptr(), velocity)
        })
    }

    /// Remove the atom at `index`, shifting the following atoms down by one.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_remove(ptr, index as u64) })
    }

    pub fn atom(&self, index: usize) -> Result<AtomRef<'_>> {
        let ptr = unsafe { ffi::chfl_atom_from_frame(self.handle.const_ptr().cast_mut(), index as u64) };
        unsafe { View::from_const_view(self, ptr) }
    }

    /// Read-only views of every atom, in order.
    pub fn iter_atoms(&self) -> Result<impl ExactSizeIterator<Item = Result<AtomRef<'_>>> + '_> {
        let size = self.size()?;
        Ok((0..size).map(move |index| self.atom(index)))
    }

    pub fn atom_mut(&mut self, index: usize) -> Result<AtomMut<'_>> {
        let frame = self.handle.mutable_ptr()?;
        let ptr = unsafe { ffi::chfl_atom_from_frame(frame, index as u64) };
        unsafe { ViewMut::from_mutable_view(self, ptr) }
    }

    /// Positions of the atoms, in Ångströms.
    pub fn positions(&self) -> Result<&[[f64; 3]]> {
        let (data, size) = self.array(ffi::chfl_frame_positions)?;
        if size == 0 {
            return Ok(&[]);
        }
        Ok(unsafe { std::slice::from_raw_parts(data, size) })
    }

    pub fn positions_mut(&mut self) -> Result<&mut [[f64; 3]]> {
        self.handle.mutable_ptr()?;
        let (data, size) = self.array(ffi::chfl_frame_positions)?;
        if size == 0 {
            return Ok(&mut []);
        }
        Ok(unsafe { std::slice::from_raw_parts_mut(data, size) })
    }

    /// Velocities of the atoms. Fails if the frame has no velocities.
    pub fn velocities(&self) -> Result<&[[f64; 3]]> {
        let (data, size) = self.array(ffi::chfl_frame_velocities)?;
        if size == 0 {
            return Ok(&[]);
        }
        Ok(unsafe { std::slice::from_raw_parts(data, size) })
    }

    pub fn velocities_mut(&mut self) -> Result<&mut [[f64; 3]]> {
        self.handle.mutable_ptr()?;
        let (data, size) = self.array(ffi::chfl_frame_velocities)?;
        if size == 0 {
            return Ok(&mut []);
        }
        Ok(unsafe { std::slice::from_raw_parts_mut(data, size) })
    }

    fn array(&self, getter: ArrayGetter) -> Result<(*mut [f64; 3], usize)> {
        let mut data = std::ptr::null_mut();
        let mut size = 0;
        check(unsafe { getter(self.handle.const_ptr().cast_mut(), &mut data, &mut size) })?;
        Ok((data, size as usize))
    }

    /// Add zero-initialized velocities to this frame.
    pub fn add_velocities(&mut self) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_add_velocities(ptr) })
    }

    pub fn has_velocities(&self) -> Result<bool> {
        let mut result = false;
        check(unsafe { ffi::chfl_frame_has_velocities(self.handle.const_ptr(), &mut result) })?;
        Ok(result)
    }

    pub fn cell(&self) -> Result<UnitCellRef<'_>> {
        let ptr = unsafe { ffi::chfl_cell_from_frame(self.handle.const_ptr().cast_mut()) };
        unsafe { View::from_const_view(self, ptr) }
    }

    pub fn cell_mut(&mut self) -> Result<UnitCellMut<'_>> {
        let frame = self.handle.mutable_ptr()?;
        let ptr = unsafe { ffi::chfl_cell_from_frame(frame) };
        unsafe { ViewMut::from_mutable_view(self, ptr) }
    }

    /// Replace the cell with a copy of `cell`.
    pub fn set_cell(&mut self, cell: &UnitCell) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_set_cell(ptr, cell.handle().const_ptr()) })
    }

    pub fn topology(&self) -> Result<TopologyRef<'_>> {
        let ptr = unsafe { ffi::chfl_topology_from_frame(self.handle.const_ptr()) };
        unsafe { View::from_const_view(self, ptr) }
    }

    /// Replace the topology with a copy of `topology`, which must have the
    /// same number of atoms as this frame.
    pub fn set_topology(&mut self, topology: &Topology) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_set_topology(ptr, topology.handle().const_ptr()) })
    }

    pub fn step(&self) -> Result<usize> {
        let mut step = 0;
        check(unsafe { ffi::chfl_frame_step(self.handle.const_ptr(), &mut step) })?;
        Ok(step as usize)
    }

    pub fn set_step(&mut self, step: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_set_step(ptr, step as u64) })
    }

    /// Guess the bonds from the positions and the atomic radii, replacing
    /// the existing bonds.
    pub fn guess_bonds(&mut self) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_guess_bonds(ptr) })
    }

    /// Distance between atoms `i` and `j`, accounting for periodic
    /// boundary conditions.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        let mut distance = 0.0;
        check(unsafe {
            ffi::chfl_frame_distance(self.handle.const_ptr(), i as u64, j as u64, &mut distance)
        })?;
        Ok(distance)
    }

    /// Angle formed by atoms `i`, `j` and `k`, in radians.
    pub fn angle(&self, i: usize, j: usize, k: usize) -> Result<f64> {
        let mut angle = 0.0;
        check(unsafe {
            ffi::chfl_frame_angle(self.handle.const_ptr(), i as u64, j as u64, k as u64, &mut angle)
        })?;
        Ok(angle)
    }

    /// Dihedral angle formed by atoms `i`, `j`, `k` and `m`, in radians.
    pub fn dihedral(&self, i: usize, j: usize, k: usize, m: usize) -> Result<f64> {
        let mut dihedral = 0.0;
        check(unsafe {
            ffi::chfl_frame_dihedral(
                self.handle.const_ptr(),
                i as u64,
                j as u64,
                k as u64,
                m as u64,
                &mut dihedral,
            )
        })?;
        Ok(dihedral)
    }

    pub fn add_bond(&mut self, i: usize, j: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_add_bond(ptr, i as u64, j as u64) })
    }

    pub fn remove_bond(&mut self, i: usize, j: usize) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_remove_bond(ptr, i as u64, j as u64) })
    }

    pub fn add_residue(&mut self, residue: &Residue) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_frame_add_residue(ptr, residue.handle().const_ptr()) })
    }

    pub fn set(&mut self, name: &str, value: impl Into<Property>) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        property::set_property(ptr, name, value.into(), ffi::chfl_frame_set_property)
    }

    pub fn get(&self, name: &str) -> Result<Property> {
        property::get_property(self.handle.const_ptr(), name, ffi::chfl_frame_get_property)
    }

    pub fn properties_count(&self) -> Result<usize> {
        property::properties_count(self.handle.const_ptr(), ffi::chfl_frame_properties_count)
    }

    pub fn list_properties(&self) -> Result<Vec<String>> {
        property::list_properties(
            self.handle.const_ptr(),
            ffi::chfl_frame_properties_count,
            ffi::chfl_frame_list_properties,
        )
    }
}
