use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;
use crate::smiles::parser::ParsedSmiles;
use crate::smiles::tokenizer::BondSymbol;

/// Lowers a parsed SMILES onto the flat molecule model. Positions are
/// zeroed; layout and embedding fill them in later. Returns the
/// molecule together with per-atom implicit hydrogen counts.
pub fn build_molecule(parsed: &ParsedSmiles) -> (Molecule, Vec<u8>) {
    let mut mol = Molecule::new();

    for atom in &parsed.atoms {
        let mut a = Atom::new(atom.spec.element, [0.0; 3]);
        a.charge = atom.spec.charge;
        a.isotope = atom.spec.isotope;
        mol.add_atom(a);
    }

    for (i, atom) in parsed.atoms.iter().enumerate() {
        for neighbor in &atom.neighbors {
            let j = neighbor.atom;
            if i < j {
                let order = bond_order(
                    neighbor.bond,
                    atom.spec.aromatic && parsed.atoms[j].spec.aromatic,
                );
                mol.add_bond(i, j, order);
            }
        }
    }

    let hydrogens = implicit_hydrogens(parsed, &mol);
    (mol, hydrogens)
}

fn bond_order(symbol: Option<BondSymbol>, both_aromatic: bool) -> BondOrder {
    match symbol {
        Some(BondSymbol::Single) | Some(BondSymbol::Directional) => BondOrder::Single,
        Some(BondSymbol::Double) => BondOrder::Double,
        Some(BondSymbol::Triple) => BondOrder::Triple,
        Some(BondSymbol::Aromatic) => BondOrder::Aromatic,
        None => {
            if both_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        }
    }
}

/// Implicit hydrogen counts: explicit for bracket atoms, inferred from
/// the smallest standard valence that covers the bond order sum for
/// bare atoms, with one hydrogen absorbed by aromatic ring
/// participation.
fn implicit_hydrogens(parsed: &ParsedSmiles, mol: &Molecule) -> Vec<u8> {
    parsed
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            if atom.spec.bracket {
                return atom.spec.hcount.unwrap_or(0);
            }

            let valences = atom.spec.element.default_valences();
            if valences.is_empty() {
                return 0;
            }

            let order_sum: u8 = mol
                .bonds_of(i)
                .iter()
                .map(|b| b.order.integer_value())
                .sum();

            let target = valences
                .iter()
                .copied()
                .find(|&v| v >= order_sum)
                .unwrap_or(0);

            let mut h = target.saturating_sub(order_sum);
            if atom.spec.aromatic && h > 0 {
                h -= 1;
            }
            h
        })
        .collect()
}

/// Materializes implicit hydrogens as explicit H atoms bonded by
/// single bonds, appended after the heavy atoms. Needed before 3D
/// embedding; 2D depiction keeps hydrogens implicit in labels instead.
pub fn add_hydrogens(mol: &mut Molecule, hydrogens: &[u8]) {
    for (heavy, &count) in hydrogens.iter().enumerate() {
        for _ in 0..count {
            let h = mol.add_atom(Atom::new(crate::model::types::Element::H, [0.0; 3]));
            mol.add_bond(heavy, h, BondOrder::Single);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;
    use crate::smiles::parser::parse_tokens;
    use crate::smiles::tokenizer::tokenize;

    fn build(s: &str) -> (Molecule, Vec<u8>) {
        let parsed = parse_tokens(&tokenize(s).unwrap()).unwrap();
        build_molecule(&parsed)
    }

    #[test]
    fn methane_implicit_h() {
        let (mol, h) = build("C");
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(h, vec![4]);
    }

    #[test]
    fn ethanol_counts() {
        let (mol, h) = build("CCO");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(h, vec![3, 2, 1]);
    }

    #[test]
    fn ethene_and_acetylene() {
        let (_, h) = build("C=C");
        assert_eq!(h, vec![2, 2]);
        let (_, h) = build("C#C");
        assert_eq!(h, vec![1, 1]);
    }

    #[test]
    fn benzene_aromatic_bonds_and_h() {
        let (mol, h) = build("c1ccccc1");
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert_eq!(h, vec![1; 6]);
    }

    #[test]
    fn pyridine_nitrogen_has_no_h() {
        let (mol, h) = build("c1ccncc1");
        let n_idx = mol
            .atoms
            .iter()
            .position(|a| a.element == Element::N)
            .unwrap();
        assert_eq!(h[n_idx], 0);
    }

    #[test]
    fn bracket_h_is_explicit() {
        let (mol, h) = build("[CH4]");
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(h, vec![4]);
        let (_, h) = build("[C]");
        assert_eq!(h, vec![0]);
    }

    #[test]
    fn charged_atoms_keep_charge() {
        let (mol, _) = build("[NH4+]");
        assert_eq!(mol.atoms[0].charge, 1);
        let (mol, _) = build("[O-2]");
        assert_eq!(mol.atoms[0].charge, -2);
    }

    #[test]
    fn hypervalent_sulfur() {
        // Sulfuric acid core: S carries two double bonds and two singles.
        let (_, h) = build("OS(=O)(=O)O");
        assert_eq!(h, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn add_hydrogens_materializes_atoms() {
        let (mut mol, h) = build("CO");
        add_hydrogens(&mut mol, &h);
        // CH3-OH: 2 heavy + 4 hydrogens.
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 5);
        assert_eq!(mol.heavy_atom_count(), 2);
        assert_eq!(mol.neighbors(0).len(), 4);
        assert_eq!(mol.neighbors(1).len(), 2);
    }

    #[test]
    fn halogen_single_valence() {
        let (_, h) = build("ClCCl");
        assert_eq!(h, vec![0, 2, 0]);
    }
}
