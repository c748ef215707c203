//! Molecular-mechanics energy model and minimizer.
//!
//! Four term families: harmonic bond stretches, harmonic angle bends,
//! cosine torsions, and 12-6 Lennard-Jones nonbonded pairs with the
//! usual 1-2/1-3 exclusions and scaled 1-4 interactions. The MMFF94
//! and UFF selections differ in their stiffness and dispersion
//! parameter tables, not in functional form. Energies are nominal
//! kcal/mol.

use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

use super::config::ForceField;

/// 1-4 Lennard-Jones scaling.
const SCALE_14: f64 = 0.5;

/// Bond length contraction per bond order, applied to the sum of
/// covalent radii.
fn order_length_factor(order: BondOrder) -> f64 {
    match order {
        BondOrder::Single => 1.0,
        BondOrder::Aromatic => 0.91,
        BondOrder::Double => 0.87,
        BondOrder::Triple => 0.78,
    }
}

/// Well depths (kcal/mol) for the dispersion term, UFF-style values.
fn lj_well_depth(element: Element) -> f64 {
    match element {
        Element::H => 0.044,
        Element::C => 0.105,
        Element::N => 0.069,
        Element::O => 0.060,
        Element::F => 0.050,
        Element::P => 0.305,
        Element::S => 0.274,
        Element::Cl => 0.227,
        Element::Br => 0.251,
        Element::I => 0.339,
        Element::Si => 0.402,
        Element::B => 0.180,
        _ => 0.100,
    }
}

#[derive(Debug, Clone, Copy)]
struct FieldParams {
    k_bond: f64,
    k_angle: f64,
    /// Torsion barrier across rotatable single bonds.
    torsion_single: f64,
    /// Planarity barrier across double/aromatic bonds.
    torsion_conj: f64,
    lj_scale: f64,
}

impl FieldParams {
    fn for_field(field: ForceField) -> Self {
        match field {
            ForceField::Mmff94 => Self {
                k_bond: 650.0,
                k_angle: 70.0,
                torsion_single: 1.2,
                torsion_conj: 12.0,
                lj_scale: 1.0,
            },
            ForceField::Uff => Self {
                k_bond: 500.0,
                k_angle: 55.0,
                torsion_single: 2.0,
                torsion_conj: 10.0,
                lj_scale: 0.85,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BondTerm {
    i: usize,
    j: usize,
    r0: f64,
    k: f64,
}

#[derive(Debug, Clone, Copy)]
struct AngleTerm {
    i: usize,
    j: usize,
    k_atom: usize,
    theta0: f64,
    k: f64,
}

#[derive(Debug, Clone, Copy)]
struct TorsionTerm {
    i: usize,
    j: usize,
    k_atom: usize,
    l: usize,
    /// Barrier height and periodicity of `k/2 * (1 - cos(n φ - φ0))`.
    barrier: f64,
    periodicity: f64,
    phase: f64,
}

#[derive(Debug, Clone, Copy)]
struct PairTerm {
    i: usize,
    j: usize,
    r_min: f64,
    epsilon: f64,
}

/// Precomputed term lists for one molecule.
pub struct EnergyModel {
    bonds: Vec<BondTerm>,
    angles: Vec<AngleTerm>,
    torsions: Vec<TorsionTerm>,
    pairs: Vec<PairTerm>,
    atom_count: usize,
}

/// Outcome of a minimization run.
#[derive(Debug, Clone, Copy)]
pub struct Minimization {
    pub energy: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl EnergyModel {
    pub fn new(mol: &Molecule, field: ForceField) -> Self {
        let params = FieldParams::for_field(field);
        let adjacency = mol.adjacency();

        let bonds = mol
            .bonds
            .iter()
            .map(|b| {
                let ri = mol.atoms[b.i].element.covalent_radius();
                let rj = mol.atoms[b.j].element.covalent_radius();
                BondTerm {
                    i: b.i,
                    j: b.j,
                    r0: (ri + rj) * order_length_factor(b.order),
                    k: params.k_bond,
                }
            })
            .collect();

        let hybridization: Vec<f64> = (0..mol.atom_count())
            .map(|a| ideal_angle(mol, a, &adjacency))
            .collect();

        let mut angles = Vec::new();
        for j in 0..mol.atom_count() {
            let nbrs = &adjacency[j];
            for a in 0..nbrs.len() {
                for b in a + 1..nbrs.len() {
                    angles.push(AngleTerm {
                        i: nbrs[a],
                        j,
                        k_atom: nbrs[b],
                        theta0: hybridization[j],
                        k: params.k_angle,
                    });
                }
            }
        }

        let mut torsions = Vec::new();
        for bond in &mol.bonds {
            let (j, k) = (bond.i, bond.j);
            let conjugated = matches!(bond.order, BondOrder::Double | BondOrder::Aromatic);
            for &i in &adjacency[j] {
                if i == k {
                    continue;
                }
                for &l in &adjacency[k] {
                    if l == j || l == i {
                        continue;
                    }
                    // Dihedral zero is the eclipsed arrangement here:
                    // conjugated bonds want planarity (minima at 0 and
                    // π), single bonds want staggering (minima at ±60°
                    // and 180°).
                    let (barrier, periodicity, phase) = if conjugated {
                        (params.torsion_conj, 2.0, 0.0)
                    } else {
                        (params.torsion_single, 3.0, std::f64::consts::PI)
                    };
                    torsions.push(TorsionTerm {
                        i,
                        j,
                        k_atom: k,
                        l,
                        barrier,
                        periodicity,
                        phase,
                    });
                }
            }
        }

        let separation = bonded_separation(&adjacency, 3);
        let mut pairs = Vec::new();
        for i in 0..mol.atom_count() {
            for j in i + 1..mol.atom_count() {
                let sep = separation[i][j];
                if sep != 0 && sep <= 2 {
                    continue;
                }
                let scale = if sep == 3 { SCALE_14 } else { 1.0 };
                let r_min =
                    mol.atoms[i].element.vdw_radius() + mol.atoms[j].element.vdw_radius();
                let epsilon = (lj_well_depth(mol.atoms[i].element)
                    * lj_well_depth(mol.atoms[j].element))
                .sqrt()
                    * params.lj_scale
                    * scale;
                pairs.push(PairTerm {
                    i,
                    j,
                    r_min,
                    epsilon,
                });
            }
        }

        Self {
            bonds,
            angles,
            torsions,
            pairs,
            atom_count: mol.atom_count(),
        }
    }

    /// Total energy and per-atom gradient.
    pub fn energy_and_gradient(&self, positions: &[Vector3<f64>]) -> (f64, Vec<Vector3<f64>>) {
        let mut energy = 0.0;
        let mut grad = vec![Vector3::zeros(); self.atom_count];

        for term in &self.bonds {
            let d = positions[term.i] - positions[term.j];
            let r = d.norm().max(1e-9);
            let dr = r - term.r0;
            energy += term.k * dr * dr;
            let f = 2.0 * term.k * dr / r;
            grad[term.i] += d * f;
            grad[term.j] -= d * f;
        }

        for term in &self.angles {
            let u = positions[term.i] - positions[term.j];
            let v = positions[term.k_atom] - positions[term.j];
            let nu = u.norm().max(1e-9);
            let nv = v.norm().max(1e-9);
            let cos = (u.dot(&v) / (nu * nv)).clamp(-1.0, 1.0);
            let theta = cos.acos();
            let sin = (1.0 - cos * cos).sqrt().max(1e-6);

            let diff = theta - term.theta0;
            energy += term.k * diff * diff;
            let de_dtheta = 2.0 * term.k * diff;

            let gi = (u * (cos / nu) - v / nv) / (nu * sin);
            let gk = (v * (cos / nv) - u / nu) / (nv * sin);
            grad[term.i] += gi * de_dtheta;
            grad[term.k_atom] += gk * de_dtheta;
            grad[term.j] -= (gi + gk) * de_dtheta;
        }

        for term in &self.torsions {
            let b1 = positions[term.j] - positions[term.i];
            let b2 = positions[term.k_atom] - positions[term.j];
            let b3 = positions[term.l] - positions[term.k_atom];

            let n1 = b1.cross(&b2);
            let n2 = b2.cross(&b3);
            let n1sq = n1.norm_squared().max(1e-9);
            let n2sq = n2.norm_squared().max(1e-9);
            let b2n = b2.norm().max(1e-9);

            let phi = (n1.cross(&n2).dot(&b2) / b2n).atan2(n1.dot(&n2));

            let arg = term.periodicity * phi - term.phase;
            energy += term.barrier / 2.0 * (1.0 - arg.cos());
            let de_dphi = term.barrier / 2.0 * term.periodicity * arg.sin();

            let gi = n1 * (-b2n / n1sq);
            let gl = n2 * (b2n / n2sq);
            let c12 = b1.dot(&b2) / (b2n * b2n);
            let c32 = b3.dot(&b2) / (b2n * b2n);
            let gj = gi * (c12 - 1.0) - gl * c32;
            let gk = gl * (c32 - 1.0) - gi * c12;

            grad[term.i] += gi * de_dphi;
            grad[term.j] += gj * de_dphi;
            grad[term.k_atom] += gk * de_dphi;
            grad[term.l] += gl * de_dphi;
        }

        for term in &self.pairs {
            let d = positions[term.i] - positions[term.j];
            let r = d.norm().max(1e-6);
            let q = term.r_min / r;
            let q6 = q.powi(6);
            energy += term.epsilon * (q6 * q6 - 2.0 * q6);
            let de_dr = 12.0 * term.epsilon * (q6 - q6 * q6) / r;
            let f = de_dr / r;
            grad[term.i] += d * f;
            grad[term.j] -= d * f;
        }

        (energy, grad)
    }

    /// Gradient-descent minimization with an adaptive step and
    /// move-rejection, writing back into `positions`.
    pub fn minimize(
        &self,
        positions: &mut [Vector3<f64>],
        max_iterations: usize,
        grad_tolerance: f64,
    ) -> Minimization {
        let mut step = 0.02;
        let (mut energy, mut grad) = self.energy_and_gradient(positions);

        for iteration in 0..max_iterations {
            let max_grad = grad
                .iter()
                .map(|g| g.amax())
                .fold(0.0_f64, f64::max);
            if max_grad < grad_tolerance {
                return Minimization {
                    energy,
                    iterations: iteration,
                    converged: true,
                };
            }

            // Cap displacement so steep early gradients cannot fling
            // atoms apart.
            let scale = step / max_grad.max(1.0);
            let trial: Vec<Vector3<f64>> = positions
                .iter()
                .zip(grad.iter())
                .map(|(p, g)| p - g * scale)
                .collect();

            let (trial_energy, trial_grad) = self.energy_and_gradient(&trial);
            if trial_energy.is_finite() && trial_energy < energy {
                positions.copy_from_slice(&trial);
                energy = trial_energy;
                grad = trial_grad;
                step = (step * 1.2).min(0.25);
            } else {
                step *= 0.5;
                if step < 1e-8 {
                    return Minimization {
                        energy,
                        iterations: iteration,
                        converged: true,
                    };
                }
            }
        }

        Minimization {
            energy,
            iterations: max_iterations,
            converged: false,
        }
    }
}

/// Ideal bond angle at `atom` from its bonding pattern: linear for
/// triple bonds or two cumulated doubles, trigonal for any double or
/// aromatic participation, tetrahedral otherwise.
fn ideal_angle(mol: &Molecule, atom: usize, adjacency: &[Vec<usize>]) -> f64 {
    let mut doubles = 0;
    let mut has_triple = false;
    let mut has_aromatic = false;
    for bond in mol.bonds_of(atom) {
        match bond.order {
            BondOrder::Triple => has_triple = true,
            BondOrder::Double => doubles += 1,
            BondOrder::Aromatic => has_aromatic = true,
            BondOrder::Single => {}
        }
    }

    let degree = adjacency[atom].len();
    if has_triple || doubles >= 2 || degree <= 1 {
        std::f64::consts::PI
    } else if doubles == 1 || has_aromatic {
        120.0_f64.to_radians()
    } else {
        109.47_f64.to_radians()
    }
}

/// Graph distances up to `limit` bonds; 0 means "farther than limit"
/// for distinct atoms.
fn bonded_separation(adjacency: &[Vec<usize>], limit: u8) -> Vec<Vec<u8>> {
    let n = adjacency.len();
    let mut out = vec![vec![0u8; n]; n];
    for start in 0..n {
        let mut dist = vec![u8::MAX; n];
        dist[start] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            if dist[u] >= limit {
                continue;
            }
            for &v in &adjacency[u] {
                if dist[v] == u8::MAX {
                    dist[v] = dist[u] + 1;
                    queue.push_back(v);
                }
            }
        }
        for other in 0..n {
            if other != start && dist[other] != u8::MAX {
                out[start][other] = dist[other];
            }
        }
    }
    out
}
