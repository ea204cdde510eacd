//! Substructure test via VF2-style subgraph matching.

use super::smiles::{Atom, Bond, BondKind, Molecule};

/// Check whether `target` contains `pattern` as a substructure.
pub fn has_substructure(target: &Molecule, pattern: &Molecule) -> bool {
    if pattern.atom_count() > target.atom_count() || pattern.bond_count() > target.bond_count() {
        return false;
    }
    if !element_counts_compatible(target, pattern) {
        return false;
    }

    let mut state = MatchState {
        target,
        pattern,
        core_target: vec![None; target.atom_count()],
        core_pattern: vec![None; pattern.atom_count()],
    };
    state.extend(0)
}

/// Every non-wildcard element must occur at least as often in the target.
fn element_counts_compatible(target: &Molecule, pattern: &Molecule) -> bool {
    let mut counts = [0i32; 128];
    for atom in &target.atoms {
        counts[atom.atomic_number as usize & 127] += 1;
    }
    for atom in pattern.atoms.iter().filter(|a| !a.is_wildcard()) {
        counts[atom.atomic_number as usize & 127] -= 1;
    }
    counts[1..].iter().all(|&c| c >= 0)
}

struct MatchState<'a> {
    target: &'a Molecule,
    pattern: &'a Molecule,
    // core_target[t] = Some(p): target atom t is mapped to pattern atom p
    core_target: Vec<Option<usize>>,
    // core_pattern[p] = Some(t): pattern atom p is mapped to target atom t
    core_pattern: Vec<Option<usize>>,
}

impl MatchState<'_> {
    /// Map pattern atoms in index order; true as soon as a full mapping exists.
    fn extend(&mut self, depth: usize) -> bool {
        if depth == self.pattern.atom_count() {
            return true;
        }

        for candidate in self.candidates(depth) {
            if !self.feasible(depth, candidate) {
                continue;
            }
            self.core_pattern[depth] = Some(candidate);
            self.core_target[candidate] = Some(depth);

            if self.extend(depth + 1) {
                return true;
            }

            self.core_pattern[depth] = None;
            self.core_target[candidate] = None;
        }
        false
    }

    /// Unmapped target atoms adjacent to the images of the pattern atom's
    /// mapped neighbours; all unmapped atoms when none are mapped yet.
    fn candidates(&self, pattern_atom: usize) -> Vec<usize> {
        let mut candidates: Option<Vec<usize>> = None;

        for &(neighbor, _) in &self.pattern.adjacency[pattern_atom] {
            let Some(mapped) = self.core_pattern[neighbor] else {
                continue;
            };
            let around: Vec<usize> = self.target.adjacency[mapped]
                .iter()
                .map(|&(n, _)| n)
                .filter(|&n| self.core_target[n].is_none())
                .collect();
            candidates = Some(match candidates {
                None => around,
                Some(existing) => existing.into_iter().filter(|n| around.contains(n)).collect(),
            });
        }

        candidates.unwrap_or_else(|| {
            (0..self.target.atom_count())
                .filter(|&t| self.core_target[t].is_none())
                .collect()
        })
    }

    fn feasible(&self, pattern_atom: usize, target_atom: usize) -> bool {
        if self.core_target[target_atom].is_some() {
            return false;
        }
        if !atom_matches(
            &self.pattern.atoms[pattern_atom],
            &self.target.atoms[target_atom],
        ) {
            return false;
        }

        for &(neighbor, bond) in &self.pattern.adjacency[pattern_atom] {
            let Some(mapped) = self.core_pattern[neighbor] else {
                continue;
            };
            match self.target.bond_between(target_atom, mapped) {
                Some(target_bond) if bond_matches(&self.pattern.bonds[bond], target_bond) => {}
                _ => return false,
            }
        }
        true
    }
}

fn atom_matches(pattern: &Atom, target: &Atom) -> bool {
    if pattern.is_wildcard() {
        return true;
    }
    if pattern.atomic_number != target.atomic_number || pattern.aromatic != target.aromatic {
        return false;
    }
    // An unbracketed pattern atom says nothing about charge.
    !pattern.bracket || pattern.charge == target.charge
}

fn bond_matches(pattern: &Bond, target: &Bond) -> bool {
    match pattern.kind {
        BondKind::Any => true,
        // An omitted bond symbol means "single or aromatic".
        BondKind::Single if !pattern.explicit => {
            matches!(target.kind, BondKind::Single | BondKind::Aromatic)
        }
        kind => kind == target.kind,
    }
}
