use std::collections::BTreeMap;

use super::atom::Atom;
use super::types::{BondOrder, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// Returns the bond partner of `atom`, or `None` if the bond does
    /// not touch it.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.i == atom {
            Some(self.j)
        } else if self.j == atom {
            Some(self.i)
        } else {
            None
        }
    }
}

/// A single connected or multi-fragment molecule. Exactly one molecule
/// backs each generator instance; it is built once and then consumed
/// by a single generation run.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) {
        self.bonds.push(Bond::new(i, j, order));
    }

    /// Indices of atoms bonded to `atom`.
    pub fn neighbors(&self, atom: usize) -> Vec<usize> {
        self.bonds
            .iter()
            .filter_map(|b| b.partner(atom))
            .collect()
    }

    /// Bonds touching `atom`.
    pub fn bonds_of(&self, atom: usize) -> Vec<&Bond> {
        self.bonds
            .iter()
            .filter(|b| b.i == atom || b.j == atom)
            .collect()
    }

    /// Adjacency lists for all atoms, built in one pass.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.atoms.len()];
        for bond in &self.bonds {
            adj[bond.i].push(bond.j);
            adj[bond.j].push(bond.i);
        }
        adj
    }

    pub fn centroid(&self) -> [f64; 3] {
        if self.atoms.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0_f64; 3];
        for atom in &self.atoms {
            for k in 0..3 {
                sum[k] += atom.position[k];
            }
        }
        let n = self.atoms.len() as f64;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    /// Hill-order molecular formula (C first, then H, then the rest
    /// alphabetically), with charges ignored.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.symbol()).or_insert(0) += 1;
        }

        let mut out = String::new();
        let mut push = |symbol: &str, count: usize| {
            out.push_str(symbol);
            if count > 1 {
                out.push_str(&count.to_string());
            }
        };

        if let Some(c) = counts.remove(Element::C.symbol()) {
            push("C", c);
            if let Some(h) = counts.remove(Element::H.symbol()) {
                push("H", h);
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        let mut mol = Molecule::with_name("water");
        let o = mol.add_atom(Atom::new(Element::O, [0.0, 0.0, 0.0]));
        let h1 = mol.add_atom(Atom::new(Element::H, [0.96, 0.0, 0.0]));
        let h2 = mol.add_atom(Atom::new(Element::H, [-0.24, 0.93, 0.0]));
        mol.add_bond(o, h1, BondOrder::Single);
        mol.add_bond(o, h2, BondOrder::Single);
        mol
    }

    #[test]
    fn bond_normalizes_indices() {
        let bond = Bond::new(5, 2, BondOrder::Single);
        assert_eq!((bond.i, bond.j), (2, 5));
        assert_eq!(bond.partner(2), Some(5));
        assert_eq!(bond.partner(5), Some(2));
        assert_eq!(bond.partner(3), None);
    }

    #[test]
    fn counts_and_neighbors() {
        let mol = water();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.heavy_atom_count(), 1);

        let mut n = mol.neighbors(0);
        n.sort();
        assert_eq!(n, vec![1, 2]);
        assert_eq!(mol.neighbors(1), vec![0]);
    }

    #[test]
    fn adjacency_matches_bonds() {
        let mol = water();
        let adj = mol.adjacency();
        assert_eq!(adj[0].len(), 2);
        assert_eq!(adj[1], vec![0]);
        assert_eq!(adj[2], vec![0]);
    }

    #[test]
    fn formula_hill_order() {
        let mol = water();
        assert_eq!(mol.formula(), "H2O");

        let mut caffeine_ish = Molecule::new();
        for _ in 0..2 {
            caffeine_ish.add_atom(Atom::new(Element::C, [0.0; 3]));
        }
        for _ in 0..6 {
            caffeine_ish.add_atom(Atom::new(Element::H, [0.0; 3]));
        }
        caffeine_ish.add_atom(Atom::new(Element::O, [0.0; 3]));
        assert_eq!(caffeine_ish.formula(), "C2H6O");
    }

    #[test]
    fn centroid_of_empty_is_origin() {
        let mol = Molecule::new();
        assert_eq!(mol.centroid(), [0.0; 3]);
    }
}
