//! Atom selections and their matches.
//!
//! A selection evaluates to a list of matches. Every match of one selection
//! has the same arity, between 1 and 4, fixed by the selection context
//! (`atoms`, `pairs`, `angles`, `dihedrals`, ...). The native side hands
//! them out as fixed-width `chfl_match` records with the arity repeated in
//! each record.

use crate::error::{Error, Result, check};
use crate::ffi::{self, CHFL_SELECTION, chfl_match};
use crate::frame::Frame;
use crate::handle::{Duplicate, ForeignHandle, NativeType, Wrapper};
use crate::util::{read_string, to_cstring};
use std::ops::Deref;

/// Largest number of atoms in a match.
pub const MAX_MATCH_SIZE: usize = 4;

unsafe impl NativeType for CHFL_SELECTION {
    const NAME: &'static str = "selection";
}

unsafe impl Duplicate for CHFL_SELECTION {
    unsafe fn duplicate(ptr: *const Self) -> *mut Self {
        unsafe { ffi::chfl_selection_copy(ptr) }
    }
}

/// Indices of the atoms in one selection match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    size: usize,
    atoms: [usize; MAX_MATCH_SIZE],
}

impl Match {
    /// Create a match from up to four atom indices.
    ///
    /// # Panics
    ///
    /// If `atoms` contains more than four indices.
    pub fn new(atoms: &[usize]) -> Match {
        assert!(
            atoms.len() <= MAX_MATCH_SIZE,
            "a match holds at most {MAX_MATCH_SIZE} atoms, got {}",
            atoms.len()
        );
        let mut storage = [usize::MAX; MAX_MATCH_SIZE];
        storage[..atoms.len()].copy_from_slice(atoms);
        Match {
            size: atoms.len(),
            atoms: storage,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.deref().iter()
    }
}

impl Deref for Match {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.atoms[..self.size]
    }
}

impl<'a> IntoIterator for &'a Match {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Decode native match records for a selection of the given arity.
///
/// The order of `records` is kept. A record declaring another arity means
/// the library and the binding disagree, and fails the whole batch.
pub(crate) fn decode_matches(records: &[chfl_match], arity: u64) -> Result<Vec<Match>> {
    if arity == 0 || arity > MAX_MATCH_SIZE as u64 {
        return Err(Error::SelectionArity { size: arity });
    }

    records
        .iter()
        .map(|record| {
            if record.size != arity {
                return Err(Error::MatchArity {
                    declared: record.size,
                    expected: arity,
                });
            }
            let mut atoms = [usize::MAX; MAX_MATCH_SIZE];
            for (atom, &index) in atoms.iter_mut().zip(&record.atoms[..arity as usize]) {
                *atom = index as usize;
            }
            Ok(Match {
                size: arity as usize,
                atoms,
            })
        })
        .collect()
}

/// A compiled selection, evaluated against frames.
#[derive(Debug)]
pub struct Selection {
    handle: ForeignHandle<CHFL_SELECTION>,
}

impl Wrapper for Selection {
    type Native = CHFL_SELECTION;

    fn from_handle(handle: ForeignHandle<CHFL_SELECTION>) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ForeignHandle<CHFL_SELECTION> {
        &self.handle
    }
}

impl Selection {
    /// Compile `selection`. Syntax errors are reported by the native parser.
    pub fn new(selection: &str) -> Result<Selection> {
        let selection = to_cstring(selection, "selection")?;
        let handle = unsafe { ForeignHandle::create_root(|| ffi::chfl_selection(selection.as_ptr()))? };
        Ok(Selection { handle })
    }

    pub fn try_clone(&self) -> Result<Selection> {
        Ok(Selection {
            handle: self.handle.duplicate()?,
        })
    }

    /// Number of atoms in each match: 1 for `atoms`, 2 for `pairs` and
    /// `bonds`, 3 for `angles`, 4 for `dihedrals`.
    pub fn size(&self) -> Result<usize> {
        let mut size = 0;
        check(unsafe { ffi::chfl_selection_size(self.handle.const_ptr(), &mut size) })?;
        Ok(size as usize)
    }

    /// The string this selection was compiled from.
    pub fn string(&self) -> Result<String> {
        let ptr = self.handle.const_ptr();
        read_string(64, |buffer, size| {
            check(unsafe { ffi::chfl_selection_string(ptr, buffer, size) })
        })
    }

    /// Evaluate the selection on `frame`.
    pub fn evaluate(&mut self, frame: &Frame) -> Result<Vec<Match>> {
        let arity = self.size()? as u64;
        let ptr = self.handle.mutable_ptr()?;

        let mut count = 0;
        check(unsafe { ffi::chfl_selection_evaluate(ptr, frame.handle().const_ptr(), &mut count) })?;

        let mut records = vec![chfl_match::default(); count as usize];
        check(unsafe { ffi::chfl_selection_matches(ptr, records.as_mut_ptr(), count) })?;

        decode_matches(&records, arity)
    }

    /// Evaluate a single-atom selection and return the matching indices.
    pub fn list(&mut self, frame: &Frame) -> Result<Vec<usize>> {
        let size = self.size()?;
        if size != 1 {
            return Err(Error::NotSingleAtom { size: size as u64 });
        }
        Ok(self.evaluate(frame)?.iter().map(|m| m[0]).collect())
    }
}
