use super::atom::{Atom, Residue};
use super::{Backing, Failure, allocate, failure, generic, object, object_mut, out, out_of_bounds, pointer, status};
use crate::ffi::{self, CHFL_ATOM, CHFL_FRAME, CHFL_RESIDUE, CHFL_TOPOLOGY, chfl_status};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub(crate) struct Topology {
    pub atoms: Vec<Atom>,
    bonds: BTreeSet<[u64; 2]>,
    pub residues: Vec<Residue>,
}

impl Backing for CHFL_TOPOLOGY {
    type Object = Topology;
}

impl Topology {
    fn check_index(&self, index: u64) -> Result<(), Failure> {
        if (index as usize) < self.atoms.len() {
            Ok(())
        } else {
            Err(out_of_bounds("atomic", index, self.atoms.len()))
        }
    }

    pub fn resize(&mut self, size: usize) {
        self.atoms.resize_with(size, || Atom::new(""));
        let size = size as u64;
        self.bonds.retain(|bond| bond[1] < size);
        for residue in &mut self.residues {
            residue.atoms.retain(|&atom| atom < size);
        }
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn remove(&mut self, index: u64) -> Result<(), Failure> {
        self.check_index(index)?;
        self.atoms.remove(index as usize);
        let shift = |atom: u64| if atom > index { atom - 1 } else { atom };
        self.bonds = self
            .bonds
            .iter()
            .filter(|bond| !bond.contains(&index))
            .map(|bond| bond.map(shift))
            .collect();
        for residue in &mut self.residues {
            residue.atoms = residue
                .atoms
                .iter()
                .filter(|&&atom| atom != index)
                .map(|&atom| shift(atom))
                .collect();
        }
        Ok(())
    }

    pub fn bonds(&self) -> Vec<[u64; 2]> {
        self.bonds.iter().copied().collect()
    }

    pub fn add_bond(&mut self, i: u64, j: u64) -> Result<(), Failure> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Err(generic(format!("can not add a bond between atom {i} and itself")));
        }
        self.bonds.insert([i.min(j), i.max(j)]);
        Ok(())
    }

    pub fn remove_bond(&mut self, i: u64, j: u64) -> Result<(), Failure> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.bonds.remove(&[i.min(j), i.max(j)]);
        Ok(())
    }

    pub fn clear_bonds(&mut self) {
        self.bonds.clear();
    }

    fn neighbors(&self, atom: u64) -> Vec<u64> {
        self.bonds
            .iter()
            .filter_map(|&[i, j]| {
                if i == atom {
                    Some(j)
                } else if j == atom {
                    Some(i)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn angles(&self) -> Vec<[u64; 3]> {
        let mut angles = Vec::new();
        for center in 0..self.atoms.len() as u64 {
            let neighbors = self.neighbors(center);
            for (n, &i) in neighbors.iter().enumerate() {
                for &k in &neighbors[n + 1..] {
                    angles.push([i.min(k), center, i.max(k)]);
                }
            }
        }
        angles.sort_unstable();
        angles
    }

    pub fn dihedrals(&self) -> Vec<[u64; 4]> {
        let mut dihedrals = BTreeSet::new();
        for &[j, k] in &self.bonds {
            for i in self.neighbors(j).into_iter().filter(|&i| i != k) {
                for m in self.neighbors(k).into_iter().filter(|&m| m != j && m != i) {
                    let dihedral = [i, j, k, m];
                    let reversed = [m, k, j, i];
                    dihedrals.insert(dihedral.min(reversed));
                }
            }
        }
        dihedrals.into_iter().collect()
    }

    /// One improper per triple of neighbors around a central atom.
    pub fn impropers(&self) -> Vec<[u64; 4]> {
        let mut impropers = Vec::new();
        for center in 0..self.atoms.len() as u64 {
            let neighbors = self.neighbors(center);
            for (a, &i) in neighbors.iter().enumerate() {
                for (b, &k) in neighbors.iter().enumerate().skip(a + 1) {
                    for &m in &neighbors[b + 1..] {
                        impropers.push([i, center, k, m]);
                    }
                }
            }
        }
        impropers.sort_unstable();
        impropers
    }

    pub fn add_residue(&mut self, residue: Residue) -> Result<(), Failure> {
        for &atom in &residue.atoms {
            if self.residues.iter().any(|other| other.atoms.contains(&atom)) {
                return Err(generic(format!(
                    "can not add this residue: atom {atom} is already in another residue"
                )));
            }
        }
        self.residues.push(residue);
        Ok(())
    }

    fn linked(&self, first: &Residue, second: &Residue) -> bool {
        self.bonds.iter().any(|&[i, j]| {
            (first.atoms.contains(&i) && second.atoms.contains(&j))
                || (first.atoms.contains(&j) && second.atoms.contains(&i))
        })
    }
}

fn read(topology: *const CHFL_TOPOLOGY, body: impl FnOnce(&Topology) -> Result<(), Failure>) -> chfl_status {
    status(|| body(unsafe { object(topology)? }))
}

fn write(topology: *mut CHFL_TOPOLOGY, body: impl FnOnce(&mut Topology) -> Result<(), Failure>) -> chfl_status {
    status(|| body(unsafe { object_mut(topology)? }))
}

unsafe fn fill<const N: usize>(entries: Vec<[u64; N]>, data: *mut [u64; N], count: u64, function: &str) -> Result<(), Failure> {
    if count as usize != entries.len() {
        return Err(generic(format!(
            "wrong data size in {function}: expected {}, got {count}",
            entries.len()
        )));
    }
    if entries.is_empty() {
        return Ok(());
    }
    if data.is_null() {
        return Err(generic(format!("unexpected NULL data in {function}")));
    }
    unsafe { std::ptr::copy_nonoverlapping(entries.as_ptr(), data, entries.len()) };
    Ok(())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology() -> *mut CHFL_TOPOLOGY {
    allocate::<CHFL_TOPOLOGY>(Topology::default())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_from_frame(frame: *const CHFL_FRAME) -> *const CHFL_TOPOLOGY {
    pointer(|| {
        let frame = unsafe { object(frame)? };
        Ok((&frame.topology as *const Topology).cast_mut().cast())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_copy(topology: *const CHFL_TOPOLOGY) -> *mut CHFL_TOPOLOGY {
    pointer(|| Ok(allocate::<CHFL_TOPOLOGY>(unsafe { object(topology)? }.clone())))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_atoms_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.atoms.len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_resize(topology: *mut CHFL_TOPOLOGY, natoms: u64) -> chfl_status {
    write(topology, |topology| {
        topology.resize(natoms as usize);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_add_atom(topology: *mut CHFL_TOPOLOGY, atom: *const CHFL_ATOM) -> chfl_status {
    write(topology, |topology| {
        topology.push(unsafe { object(atom)? }.clone());
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_remove(topology: *mut CHFL_TOPOLOGY, index: u64) -> chfl_status {
    write(topology, |topology| topology.remove(index))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_bonds_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.bonds.len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_angles_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.angles().len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_dihedrals_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.dihedrals().len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_impropers_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.impropers().len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_bonds(topology: *const CHFL_TOPOLOGY, data: *mut [u64; 2], count: u64) -> chfl_status {
    read(topology, |topology| unsafe {
        fill(topology.bonds(), data, count, "chfl_topology_bonds")
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_angles(topology: *const CHFL_TOPOLOGY, data: *mut [u64; 3], count: u64) -> chfl_status {
    read(topology, |topology| unsafe {
        fill(topology.angles(), data, count, "chfl_topology_angles")
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_dihedrals(topology: *const CHFL_TOPOLOGY, data: *mut [u64; 4], count: u64) -> chfl_status {
    read(topology, |topology| unsafe {
        fill(topology.dihedrals(), data, count, "chfl_topology_dihedrals")
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_impropers(topology: *const CHFL_TOPOLOGY, data: *mut [u64; 4], count: u64) -> chfl_status {
    read(topology, |topology| unsafe {
        fill(topology.impropers(), data, count, "chfl_topology_impropers")
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_add_bond(topology: *mut CHFL_TOPOLOGY, i: u64, j: u64) -> chfl_status {
    write(topology, |topology| topology.add_bond(i, j))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_remove_bond(topology: *mut CHFL_TOPOLOGY, i: u64, j: u64) -> chfl_status {
    write(topology, |topology| topology.remove_bond(i, j))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_residues_count(topology: *const CHFL_TOPOLOGY, count: *mut u64) -> chfl_status {
    read(topology, |topology| {
        *unsafe { out(count)? } = topology.residues.len() as u64;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_add_residue(topology: *mut CHFL_TOPOLOGY, residue: *const CHFL_RESIDUE) -> chfl_status {
    write(topology, |topology| {
        let residue = unsafe { object(residue)? }.clone();
        if let Some(&atom) = residue.atoms.iter().find(|&&atom| atom as usize >= topology.atoms.len()) {
            return Err(failure(
                ffi::CHFL_OUT_OF_BOUNDS,
                format!("residue contains atom {atom} which is not in this topology"),
            ));
        }
        topology.add_residue(residue)
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn chfl_topology_residues_linked(
    topology: *const CHFL_TOPOLOGY,
    first: *const CHFL_RESIDUE,
    second: *const CHFL_RESIDUE,
    result: *mut bool,
) -> chfl_status {
    read(topology, |topology| {
        let first = unsafe { object(first)? };
        let second = unsafe { object(second)? };
        *unsafe { out(result)? } = topology.linked(first, second);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_an_atom_shifts_bonds() {
        let mut topology = Topology::default();
        topology.resize(4);
        topology.add_bond(0, 1).ok();
        topology.add_bond(2, 3).ok();
        topology.remove(1).ok();
        assert_eq!(topology.bonds(), vec![[1, 2]]);
    }

    #[test]
    fn derived_connectivity() {
        let mut topology = Topology::default();
        topology.resize(4);
        for (i, j) in [(0, 1), (0, 2), (0, 3)] {
            topology.add_bond(i, j).ok();
        }
        assert_eq!(topology.angles(), vec![[1, 0, 2], [1, 0, 3], [2, 0, 3]]);
        assert!(topology.dihedrals().is_empty());
    }
}
