//! Trajectory files: reading and writing frames.

use crate::cell::UnitCell;
use crate::error::{Result, check};
use crate::ffi::{self, CHFL_TRAJECTORY};
use crate::frame::Frame;
use crate::handle::{ForeignHandle, NativeType, Wrapper};
use crate::topology::Topology;
use crate::util::{cstr_to_string, path_to_cstring, to_cstring};
use libc::c_char;
use serde::{Deserialize, Serialize};
use std::path::Path;

unsafe impl NativeType for CHFL_TRAJECTORY {
    const NAME: &'static str = "trajectory";

    // Closing flushes buffered frames to disk.
    unsafe fn release(ptr: *mut Self) {
        unsafe { ffi::chfl_trajectory_close(ptr.cast_const()) }
    }
}

/// File opening mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "r")]
    Read,
    #[serde(alias = "w")]
    Write,
    #[serde(alias = "a")]
    Append,
}

impl Mode {
    fn as_raw(self) -> c_char {
        let mode = match self {
            Mode::Read => b'r',
            Mode::Write => b'w',
            Mode::Append => b'a',
        };
        mode as c_char
    }
}

/// Options for [`Trajectory::open_with_options`].
///
/// Every field is optional in JSON: `{}` opens for reading, guessing the
/// format from the extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrajectoryOptions {
    #[serde(default)]
    pub mode: Mode,
    /// Format name, empty to guess it from the file extension
    #[serde(default)]
    pub format: String,
}

impl TrajectoryOptions {
    pub fn from_json(json: &str) -> Result<TrajectoryOptions> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A file containing one or more frames.
///
/// The file is closed when the trajectory is dropped.
#[derive(Debug)]
pub struct Trajectory {
    handle: ForeignHandle<CHFL_TRAJECTORY>,
}

impl Wrapper for Trajectory {
    type Native = CHFL_TRAJECTORY;

    fn from_handle(handle: ForeignHandle<CHFL_TRAJECTORY>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_TRAJECTORY> {
        &self.handle
    }
}

impl Trajectory {
    /// Open the file at `path`, guessing its format from the extension.
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Trajectory> {
        let path = path_to_cstring(path.as_ref())?;
        let handle = unsafe {
            ForeignHandle::create_root(|| ffi::chfl_trajectory_open(path.as_ptr(), mode.as_raw()))?
        };
        log::debug!("opened trajectory {:?} in {:?} mode", path, mode);
        Ok(Trajectory { handle })
    }

    /// Open the file at `path` with an explicit `format`. An empty format
    /// guesses it from the extension.
    pub fn open_with_format(path: impl AsRef<Path>, mode: Mode, format: &str) -> Result<Trajectory> {
        let path = path_to_cstring(path.as_ref())?;
        let format = to_cstring(format, "format")?;
        let handle = unsafe {
            ForeignHandle::create_root(|| {
                ffi::chfl_trajectory_with_format(path.as_ptr(), mode.as_raw(), format.as_ptr())
            })?
        };
        log::debug!("opened trajectory {:?} in {:?} mode with format {:?}", path, mode, format);
        Ok(Trajectory { handle })
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: &TrajectoryOptions) -> Result<Trajectory> {
        Trajectory::open_with_format(path, options.mode, &options.format)
    }

    /// Path used to open this trajectory.
    pub fn path(&self) -> Result<String> {
        let mut path = std::ptr::null();
        check(unsafe { ffi::chfl_trajectory_path(self.handle.const_ptr(), &mut path) })?;
        // owned by the trajectory
        Ok(unsafe { cstr_to_string(path) })
    }

    /// Read the next frame into `frame`, reusing its allocation.
    pub fn read(&mut self, frame: &mut Frame) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        let frame = frame.as_mut_ptr()?;
        check(unsafe { ffi::chfl_trajectory_read(ptr, frame) })
    }

    /// Read the frame at `step` into `frame`.
    pub fn read_step(&mut self, step: usize, frame: &mut Frame) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        let frame = frame.as_mut_ptr()?;
        check(unsafe { ffi::chfl_trajectory_read_step(ptr, step as u64, frame) })
    }

    pub fn write(&mut self, frame: &Frame) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_trajectory_write(ptr, frame.handle().const_ptr()) })
    }

    /// Use a copy of `topology` for every frame read or written from now on.
    pub fn set_topology(&mut self, topology: &Topology) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_trajectory_set_topology(ptr, topology.handle().const_ptr()) })
    }

    /// Use the topology of the first frame of the file at `path`. An empty
    /// `format` guesses it from the extension.
    pub fn set_topology_file(&mut self, path: impl AsRef<Path>, format: &str) -> Result<()> {
        let path = path_to_cstring(path.as_ref())?;
        let format = to_cstring(format, "format")?;
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_trajectory_topology_file(ptr, path.as_ptr(), format.as_ptr()) })
    }

    /// Use a copy of `cell` for every frame read or written from now on.
    pub fn set_cell(&mut self, cell: &UnitCell) -> Result<()> {
        let ptr = self.handle.mutable_ptr()?;
        check(unsafe { ffi::chfl_trajectory_set_cell(ptr, cell.handle().const_ptr()) })
    }

    /// Number of frames in the file.
    pub fn nsteps(&mut self) -> Result<usize> {
        let ptr = self.handle.mutable_ptr()?;
        let mut nsteps = 0;
        check(unsafe { ffi::chfl_trajectory_nsteps(ptr, &mut nsteps) })?;
        Ok(nsteps as usize)
    }

    /// Read every frame of the file in order, starting from the first.
    pub fn frames(&mut self) -> Result<Frames<'_>> {
        let nsteps = self.nsteps()?;
        Ok(Frames {
            trajectory: self,
            step: 0,
            nsteps,
        })
    }

    /// Close the file now. Dropping the trajectory does the same.
    pub fn close(self) {
        drop(self);
    }
}

/// Iterator over the frames of a [`Trajectory`], created by
/// [`Trajectory::frames`].
#[derive(Debug)]
pub struct Frames<'a> {
    trajectory: &'a mut Trajectory,
    step: usize,
    nsteps: usize,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Result<Frame>> {
        if self.step >= self.nsteps {
            return None;
        }
        let step = self.step;
        self.step += 1;
        let frame = Frame::new().and_then(|mut frame| {
            self.trajectory.read_step(step, &mut frame)?;
            Ok(frame)
        });
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.nsteps - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}
