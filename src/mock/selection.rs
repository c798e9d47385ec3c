use super::frame::Frame;
use super::{Backing, Failure, allocate, failure, generic, object, object_mut, out, pointer, status, text, write_string};
use crate::ffi::{self, CHFL_FRAME, CHFL_SELECTION, chfl_match, chfl_status};
use libc::c_char;
use std::ffi::CString;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Context {
    Atoms,
    Pairs,
    Bonds,
    Angles,
    Dihedrals,
}

impl Context {
    fn parse(name: &str) -> Option<Context> {
        match name {
            "atoms" | "one" => Some(Context::Atoms),
            "pairs" | "two" => Some(Context::Pairs),
            "bonds" => Some(Context::Bonds),
            "angles" => Some(Context::Angles),
            "dihedrals" => Some(Context::Dihedrals),
            _ => None,
        }
    }

    fn size(self) -> u64 {
        match self {
            Context::Atoms => 1,
            Context::Pairs | Context::Bonds => 2,
            Context::Angles => 3,
            Context::Dihedrals => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn parse(op: &str) -> Option<Comparison> {
        match op {
            "<" => Some(Comparison::Less),
            "<=" => Some(Comparison::LessEqual),
            ">" => Some(Comparison::Greater),
            ">=" => Some(Comparison::GreaterEqual),
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            _ => None,
        }
    }

    fn apply(self, lhs: u64, rhs: u64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessEqual => lhs <= rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterEqual => lhs >= rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::NotEqual => lhs != rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    All,
    None,
    Name(String),
    Type(String),
    Index(Comparison, u64),
}

impl Predicate {
    fn parse(text: &str) -> Option<Predicate> {
        let words = text.split_whitespace().collect::<Vec<_>>();
        match words.as_slice() {
            ["all"] => Some(Predicate::All),
            ["none"] => Some(Predicate::None),
            ["name", name] => Some(Predicate::Name((*name).into())),
            ["type", name] => Some(Predicate::Type((*name).into())),
            ["index", op, value] => Some(Predicate::Index(Comparison::parse(op)?, value.parse().ok()?)),
            _ => None,
        }
    }

    fn is_match(&self, frame: &Frame, atom: u64) -> bool {
        let Some(data) = frame.topology.atoms.get(atom as usize) else {
            return false;
        };
        match self {
            Predicate::All => true,
            Predicate::None => false,
            Predicate::Name(name) => &data.name == name,
            Predicate::Type(name) => &data.atomic_type == name,
            Predicate::Index(comparison, value) => comparison.apply(atom, *value),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Selection {
    string: CString,
    context: Context,
    /// Every predicate must hold
    predicates: Vec<Predicate>,
    matches: Vec<chfl_match>,
}

impl Backing for CHFL_SELECTION {
    type Object = Selection;
}

impl Selection {
    fn parse(selection: &str) -> Result<Selection, Failure> {
        let invalid = || failure(ffi::CHFL_SELECTION_ERROR, format!("invalid selection '{selection}'"));

        let (context, body) = match selection.split_once(':') {
            Some((context, body)) => (Context::parse(context.trim()).ok_or_else(invalid)?, body),
            None => (Context::Atoms, selection),
        };
        let predicates = body
            .split(" and ")
            .map(|text| Predicate::parse(text).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Selection {
            string: CString::new(selection).map_err(|_| invalid())?,
            context,
            predicates,
            matches: Vec::new(),
        })
    }

    fn candidates(&self, frame: &Frame) -> Vec<Vec<u64>> {
        let natoms = frame.positions.len() as u64;
        match self.context {
            Context::Atoms => (0..natoms).map(|i| vec![i]).collect(),
            Context::Pairs => (0..natoms)
                .flat_map(|i| ((i + 1)..natoms).map(move |j| vec![i, j]))
                .collect(),
            Context::Bonds => frame.topology.bonds().into_iter().map(Vec::from).collect(),
            Context::Angles => frame.topology.angles().into_iter().map(Vec::from).collect(),
            Context::Dihedrals => frame.topology.dihedrals().into_iter().map(Vec::from).collect(),
        }
    }

    fn evaluate(&mut self, frame: &Frame) {
        let size = self.context.size();
        self.matches = self
            .candidates(frame)
            .into_iter()
            .filter(|atoms| {
                atoms
                    .iter()
                    .all(|&atom| self.predicates.iter().all(|p| p.is_match(frame, atom)))
            })
            .map(|atoms| {
                let mut record = chfl_match {
                    size,
                    atoms: [u64::MAX; 4],
                };
                record.atoms[..atoms.len()].copy_from_slice(&atoms);
                record
            })
            .collect();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection(selection: *const c_char) -> *mut CHFL_SELECTION {
    pointer(|| {
        let selection = Selection::parse(unsafe { text(selection)? })?;
        Ok(allocate::<CHFL_SELECTION>(selection))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection_copy(selection: *const CHFL_SELECTION) -> *mut CHFL_SELECTION {
    pointer(|| {
        let mut copy = unsafe { object(selection)? }.clone();
        copy.matches.clear();
        Ok(allocate::<CHFL_SELECTION>(copy))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection_size(selection: *const CHFL_SELECTION, size: *mut u64) -> chfl_status {
    status(|| {
        let selection = unsafe { object(selection)? };
        *unsafe { out(size)? } = selection.context.size();
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection_string(selection: *const CHFL_SELECTION, buffer: *mut c_char, buffsize: u64) -> chfl_status {
    status(|| {
        let selection = unsafe { object(selection)? };
        unsafe { write_string(selection.string.as_bytes(), buffer, buffsize) }
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection_evaluate(
    selection: *mut CHFL_SELECTION,
    frame: *const CHFL_FRAME,
    n_matches: *mut u64,
) -> chfl_status {
    status(|| {
        let selection = unsafe { object_mut(selection)? };
        let frame = unsafe { object(frame)? };
        selection.evaluate(frame);
        *unsafe { out(n_matches)? } = selection.matches.len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_selection_matches(
    selection: *const CHFL_SELECTION,
    matches: *mut chfl_match,
    n_matches: u64,
) -> chfl_status {
    status(|| {
        let selection = unsafe { object(selection)? };
        if n_matches as usize != selection.matches.len() {
            return Err(generic(format!(
                "wrong data size in chfl_selection_matches: expected {}, got {n_matches}",
                selection.matches.len()
            )));
        }
        if n_matches == 0 {
            return Ok(());
        }
        if matches.is_null() {
            return Err(generic("unexpected NULL matches"));
        }
        unsafe { std::ptr::copy_nonoverlapping(selection.matches.as_ptr(), matches, selection.matches.len()) };
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing() {
        let selection = Selection::parse("pairs: name O and index >= 3").unwrap();
        assert_eq!(selection.context, Context::Pairs);
        assert_eq!(
            selection.predicates,
            vec![
                Predicate::Name("O".into()),
                Predicate::Index(Comparison::GreaterEqual, 3)
            ]
        );
        assert!(Selection::parse("residues: all").is_err());
        assert!(Selection::parse("index ~ 3").is_err());
    }
}
