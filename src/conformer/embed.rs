//! Initial 3D coordinates.
//!
//! The embedding seeds from the 2D layout: topology-respecting planar
//! coordinates scaled to a typical bond length, then perturbed out of
//! plane with a seeded deterministic jitter. Force-field minimization
//! does the actual geometry work; the jitter only has to break
//! planarity and symmetry so the minimizer can escape flat saddle
//! points. Identical seeds give identical conformers.

use crate::layout;
use crate::model::molecule::Molecule;

/// Å per 2D layout unit.
const LAYOUT_SCALE: f64 = 1.5;

/// Out-of-plane jitter amplitude (Å).
const Z_JITTER: f64 = 0.45;

/// In-plane jitter amplitude (Å).
const XY_JITTER: f64 = 0.15;

/// Deterministic xorshift64* generator; the embedding must reproduce
/// exactly for a given seed.
pub(crate) struct SplitRng {
    state: u64,
}

impl SplitRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            // Zero state would lock the generator.
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15).max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in [-1, 1).
    pub(crate) fn next_signed(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

/// Writes initial 3D positions into the molecule.
pub fn embed(mol: &mut Molecule, seed: u64) {
    let flat = layout::compute_2d_coords(mol);
    let mut rng = SplitRng::new(seed);

    for (atom, xy) in mol.atoms.iter_mut().zip(flat) {
        atom.position = [
            xy[0] * LAYOUT_SCALE + rng.next_signed() * XY_JITTER,
            xy[1] * LAYOUT_SCALE + rng.next_signed() * XY_JITTER,
            rng.next_signed() * Z_JITTER,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    #[test]
    fn embedding_is_deterministic() {
        let mut a = smiles::parse_with_hydrogens("CCO").unwrap();
        let mut b = smiles::parse_with_hydrogens("CCO").unwrap();
        embed(&mut a, 7);
        embed(&mut b, 7);
        for (x, y) in a.atoms.iter().zip(b.atoms.iter()) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = smiles::parse_with_hydrogens("CCO").unwrap();
        let mut b = smiles::parse_with_hydrogens("CCO").unwrap();
        embed(&mut a, 1);
        embed(&mut b, 2);
        let same = a
            .atoms
            .iter()
            .zip(b.atoms.iter())
            .all(|(x, y)| x.position == y.position);
        assert!(!same);
    }

    #[test]
    fn embedding_leaves_the_plane() {
        let mut mol = smiles::parse_with_hydrogens("CCCCCC").unwrap();
        embed(&mut mol, 1);
        assert!(mol.atoms.iter().any(|a| a.position[2].abs() > 1e-3));
    }

    #[test]
    fn bonded_atoms_start_near_bonding_distance() {
        let mut mol = smiles::parse_with_hydrogens("CCO").unwrap();
        embed(&mut mol, 1);
        for bond in &mol.bonds {
            let pa = mol.atoms[bond.i].position;
            let pb = mol.atoms[bond.j].position;
            let d: f64 = (0..3).map(|k| (pa[k] - pb[k]).powi(2)).sum::<f64>().sqrt();
            assert!(d > 0.5 && d < 3.0, "start distance {d}");
        }
    }

    #[test]
    fn rng_is_reproducible() {
        let mut a = SplitRng::new(42);
        let mut b = SplitRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let v = SplitRng::new(3).next_signed();
        assert!((-1.0..1.0).contains(&v));
    }
}
