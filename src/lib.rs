//! Safe Rust bindings to the chemfiles C library.
//!
//! Every chemfiles object (atom, residue, topology, frame, unit cell,
//! selection, trajectory, property) is wrapped in a type owning a
//! [`ForeignHandle`]. The handle records who owns the native memory and
//! whether it may be mutated, so that every object is released exactly once
//! and views into a parent object are never released at all.
//!
//! # Thread Safety
//!
//! Wrappers are NOT `Send` or `Sync`: the native objects carry no internal
//! locking, and the last-error message is per thread. Use a wrapper from the
//! thread that created it, or provide external synchronization.
//!
//! # Memory Management
//!
//! - Objects created by a constructor own their native memory and release it
//!   on drop, through `chfl_free` (or `chfl_trajectory_close` for
//!   trajectories).
//! - Objects reached through a parent (`frame.atom(0)`, `frame.cell()`,
//!   `topology.residue(1)`, ...) are views: [`View`] and [`ViewMut`] borrow
//!   the parent and never release anything.
//! - `try_clone` always produces an independent owner, even from a view.
//!
//! # Feature Flags
//!
//! - `native`: link against the system libchemfiles. Without it the unit
//!   tests run against an in-process stand-in exporting the same symbols.

#![allow(clippy::missing_safety_doc)]

mod atom;
mod cell;
mod error;
pub mod ffi;
mod frame;
mod handle;
mod misc;
mod property;
mod residue;
mod selection;
mod topology;
mod trajectory;
mod util;


pub use atom::{Atom, AtomMut, AtomRef};
pub use cell::{CellShape, UnitCell, UnitCellMut, UnitCellRef};
pub use error::{Error, Result, Status};
pub use frame::Frame;
pub use handle::{Capability, Duplicate, ForeignHandle, NativeType, View, ViewMut, Wrapper};
pub use misc::{
    add_configuration, clear_errors, clear_warning_callback, last_error, set_warning_callback,
    version,
};
pub use property::{Property, RawProperty};
pub use residue::{Residue, ResidueRef};
pub use selection::{MAX_MATCH_SIZE, Match, Selection};
pub use topology::{Topology, TopologyRef};
pub use trajectory::{Frames, Mode, Trajectory, TrajectoryOptions};
