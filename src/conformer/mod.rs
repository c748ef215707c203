//! 3D conformer generation.
//!
//! [`generate`] embeds one or more trial conformers, optionally
//! relaxes each with the selected force field, prunes near-duplicates
//! by aligned heavy-atom RMSD, and writes the lowest-energy survivor
//! back into the molecule.

mod config;
mod embed;
mod forcefield;

pub use config::{ConformerConfig, ForceField};
pub use forcefield::{EnergyModel, Minimization};

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::model::molecule::Molecule;

#[derive(Debug, Error)]
pub enum ConformerError {
    #[error("cannot generate a conformer for an empty molecule")]
    EmptyMolecule,

    #[error("geometry optimization produced a non-finite energy")]
    NonFiniteEnergy,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Copy)]
pub struct ConformerOutcome {
    /// Final energy in kcal/mol; `None` when optimization was skipped.
    pub energy: Option<f64>,
    /// Whether the reported conformer's minimization converged.
    pub converged: bool,
    /// Conformers surviving the RMSD prune.
    pub kept_conformers: usize,
}

struct Candidate {
    positions: Vec<Vector3<f64>>,
    energy: Option<f64>,
    converged: bool,
}

/// Embeds and (optionally) optimizes conformers, leaving the chosen
/// geometry on the molecule.
pub fn generate(
    mol: &mut Molecule,
    settings: &ConformerConfig,
    optimize: bool,
) -> Result<ConformerOutcome, ConformerError> {
    if mol.atom_count() == 0 {
        return Err(ConformerError::EmptyMolecule);
    }

    let model = optimize.then(|| EnergyModel::new(mol, settings.force_field));
    let count = settings.num_conformers.max(1);
    let mut candidates = Vec::with_capacity(count);

    for c in 0..count {
        let mut trial = mol.clone();
        embed::embed(&mut trial, settings.seed.wrapping_add(c as u64));
        let mut positions: Vec<Vector3<f64>> = trial
            .atoms
            .iter()
            .map(|a| Vector3::new(a.position[0], a.position[1], a.position[2]))
            .collect();

        let (energy, converged) = match &model {
            Some(model) => {
                let run = model.minimize(
                    &mut positions,
                    settings.max_iterations,
                    settings.grad_tolerance,
                );
                if !run.energy.is_finite() {
                    return Err(ConformerError::NonFiniteEnergy);
                }
                (Some(run.energy), run.converged)
            }
            None => (None, true),
        };

        candidates.push(Candidate {
            positions,
            energy,
            converged,
        });
    }

    // Best first, then drop anything within the prune radius of an
    // already-kept conformer.
    candidates.sort_by(|a, b| {
        a.energy
            .unwrap_or(f64::INFINITY)
            .partial_cmp(&b.energy.unwrap_or(f64::INFINITY))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let heavy: Vec<usize> = mol
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_hydrogen())
        .map(|(i, _)| i)
        .collect();

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let duplicate = kept.iter().any(|k| {
            aligned_rmsd(&candidate.positions, &k.positions, &heavy)
                < settings.prune_rms_threshold
        });
        if !duplicate {
            kept.push(candidate);
        }
    }

    let best = &kept[0];
    for (atom, p) in mol.atoms.iter_mut().zip(best.positions.iter()) {
        atom.position = [p.x, p.y, p.z];
    }

    Ok(ConformerOutcome {
        energy: best.energy,
        converged: best.converged,
        kept_conformers: kept.len(),
    })
}

/// Kabsch-aligned RMSD over the selected atom subset. Falls back to
/// all atoms when the subset is empty (hydrogen-only edge cases).
fn aligned_rmsd(a: &[Vector3<f64>], b: &[Vector3<f64>], subset: &[usize]) -> f64 {
    let indices: Vec<usize> = if subset.is_empty() {
        (0..a.len().min(b.len())).collect()
    } else {
        subset.to_vec()
    };
    if indices.is_empty() {
        return 0.0;
    }

    let n = indices.len() as f64;
    let centroid = |pts: &[Vector3<f64>]| {
        indices.iter().map(|&i| pts[i]).sum::<Vector3<f64>>() / n
    };
    let ca = centroid(a);
    let cb = centroid(b);

    let mut h = Matrix3::zeros();
    for &i in &indices {
        h += (a[i] - ca) * (b[i] - cb).transpose();
    }

    let svd = h.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return f64::INFINITY;
    };
    let mut d = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }
    let rotation = v_t.transpose() * d * u.transpose();

    let mut sum = 0.0;
    for &i in &indices {
        let diff = rotation * (a[i] - ca) - (b[i] - cb);
        sum += diff.norm_squared();
    }
    (sum / n).sqrt()
}
