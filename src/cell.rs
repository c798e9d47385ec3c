//! Unit cells: the periodic boundary conditions of a frame.

use crate::error::{Error, Result, check};
use crate::ffi::{self, CHFL_CELL};
use crate::handle::{Duplicate, ForeignHandle, NativeType, View, ViewMut, Wrapper, view_mut_methods};

unsafe impl NativeType for CHFL_CELL {
    const NAME: &'static str = "cell";
}

unsafe impl Duplicate for CHFL_CELL {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_cell_copy(ptr) }
    }
}

/// Shape of a unit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// Three lengths, all angles at 90°
    Orthorhombic,
    /// Three lengths and three free angles
    Triclinic,
    /// No periodic boundary conditions
    Infinite,
}

impl CellShape {
    fn from_raw(shape: ffi::chfl_cellshape) -> Result<CellShape> {
        match shape {
            ffi::CHFL_CELL_ORTHORHOMBIC => Ok(CellShape::Orthorhombic),
            ffi::CHFL_CELL_TRICLINIC => Ok(CellShape::Triclinic),
            ffi::CHFL_CELL_INFINITE => Ok(CellShape::Infinite),
            shape => Err(Error::UnknownCellShape { shape }),
        }
    }

    fn as_raw(self) -> ffi::chfl_cellshape {
        match self {
            CellShape::Orthorhombic => ffi::CHFL_CELL_ORTHORHOMBIC,
            CellShape::Triclinic => ffi::CHFL_CELL_TRICLINIC,
            CellShape::Infinite => ffi::CHFL_CELL_INFINITE,
        }
    }
}

/// Lengths are in Ångströms, angles in degrees.
#[derive(Debug)]
pub struct UnitCell {
    handle: ForeignHandle<CHFL_CELL>,
}

/// Read-only cell of a frame.
pub type UnitCellRef<'a> = View<'a, UnitCell>;

/// Mutable cell of a frame.
pub type UnitCellMut<'a> = ViewMut<'a, UnitCell>;

impl Wrapper for UnitCell {
    type Native = CHFL_CELL;

    fn from_handle(handle: ForeignHandle<CHFL_CELL>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_CELL> {
        &self.handle
    }
}

view_mut_methods!(UnitCell {
    /// Fails on infinite cells.
    fn set_lengths(&mut self, lengths: [f64; 3]) -> Result<()>;
    /// Only triclinic cells accept new angles.
    fn set_angles(&mut self, angles: [f64; 3]) -> Result<()>;
    fn set_shape(&mut self, shape: CellShape) -> Result<()>;
});

impl UnitCell {
    /// Orthorhombic cell with the given `lengths`.
    pub fn new(lengths: [f64; 3]) -> Result<UnitCell> {
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_cell(lengths.as_ptr()))? };
        Ok(UnitCell { handle })
    }

    /// Triclinic cell. The shape stays triclinic even with 90° angles.
    pub fn triclinic(lengths: [f64; 3], angles: [f64; 3]) -> Result<UnitCell> {
        let handle = unsafe {
            ForeignHandle::create_root(|| ffi::chfl_cell_triclinic(lengths.as_ptr(), angles.as_ptr()))?
        };
        Ok(UnitCell { handle })
    }

    /// Cell without periodic boundary conditions.
    pub fn infinite() -> Result<UnitCell> {
        let mut cell = UnitCell::new([0.0; 3])?;
        cell.set_shape(CellShape::Infinite)?;
        Ok(cell)
    }

    pub fn try_clone(&self) -> Result<UnitCell> {
        Ok(UnitCell {
            handle: self.handle.duplicate()?,
        })
    }

    pub fn lengths(&self) -> Result<[f64; 3]> {
        let mut lengths = [0.0; 3];
        check(unsafe { ffi::chfl_cell_lengths(self.handle.const_ptr(), lengths.as_mut_ptr()) })?;
        Ok(lengths)
    }

    /// Fails on infinite cells.
    pub fn set_lengths(&mut self, lengths: [f64; 3]) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_cell_set_lengths(ptr, lengths.as_ptr()) })
    }

    pub fn angles(&self) -> Result<[f64; 3]> {
        let mut angles = [0.0; 3];
        check(unsafe { ffi::chfl_cell_angles(self.handle.const_ptr(), angles.as_mut_ptr()) })?;
        Ok(angles)
    }

    /// Only triclinic cells accept new angles.
    pub fn set_angles(&mut self, angles: [f64; 3]) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_cell_set_angles(ptr, angles.as_ptr()) })
    }

    /// Cell matrix, with the cell vectors as columns.
    pub fn matrix(&self) -> Result<[[f64; 3]; 3]> {
        let mut matrix = [[0.0; 3]; 3];
        check(unsafe { ffi::chfl_cell_matrix(self.handle.const_ptr(), matrix.as_mut_ptr()) })?;
        Ok(matrix)
    }

    pub fn shape(&self) -> Result<CellShape> {
        let mut shape = ffi::CHFL_CELL_INFINITE;
        check(unsafe { ffi::chfl_cell_shape(self.handle.const_ptr(), &mut shape) })?;
        CellShape::from_raw(shape)
    }

    pub fn set_shape(&mut self, shape: CellShape) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_cell_set_shape(ptr, shape.as_raw()) })
    }

    /// Volume in Å³, 0 for infinite cells.
    pub fn volume(&self) -> Result<f64> {
        let mut volume = 0.0;
        check(unsafe { ffi::chfl_cell_volume(self.handle.const_ptr(), &mut volume) })?;
        Ok(volume)
    }

    /// Wrap `vector` inside this cell, in place.
    pub fn wrap(&self, vector: &mut [f64; 3]) -> Result<()> {
        check(unsafe { ffi::chfl_cell_wrap(self.handle.const_ptr(), vector.as_mut_ptr()) })
    }
}
