//! SMILES line-notation parsing.
//!
//! Three phases: [`tokenizer`] splits the string into atom, bond,
//! branch, and ring-closure tokens; [`parser`] resolves branches and
//! ring bonds into an adjacency structure; [`builder`] lowers that
//! onto the flat [`Molecule`](crate::model::molecule::Molecule) model
//! and computes implicit hydrogen counts.
//!
//! Stereo descriptors (`@`, `/`, `\`) are accepted so isomeric SMILES
//! from database lookups parse cleanly, but they do not influence the
//! generated geometry.

mod builder;
mod parser;
mod tokenizer;

pub mod error;

pub use builder::add_hydrogens;
pub use error::SmilesError;

use crate::model::molecule::Molecule;

/// Parses a SMILES string into a molecule plus per-atom implicit
/// hydrogen counts (indexed like the molecule's atoms).
pub fn parse(smiles: &str) -> Result<(Molecule, Vec<u8>), SmilesError> {
    let tokens = tokenizer::tokenize(smiles)?;
    let parsed = parser::parse_tokens(&tokens)?;
    Ok(builder::build_molecule(&parsed))
}

/// Parses a SMILES string and materializes all implicit hydrogens as
/// explicit atoms, as required before 3D embedding.
pub fn parse_with_hydrogens(smiles: &str) -> Result<Molecule, SmilesError> {
    let (mut mol, hydrogens) = parse(smiles)?;
    add_hydrogens(&mut mol, &hydrogens);
    Ok(mol)
}

/// Cheap validity probe used by identifier resolution.
pub fn is_valid(smiles: &str) -> bool {
    parse(smiles).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_caffeine() {
        let (mol, _) = parse("CN1C=NC2=C1C(=O)N(C(=O)N2C)C").unwrap();
        assert_eq!(mol.atom_count(), 14);
        assert_eq!(mol.formula(), "C8N4O2");
    }

    #[test]
    fn parse_with_hydrogens_gives_full_formula() {
        let mol = parse_with_hydrogens("CN1C=NC2=C1C(=O)N(C(=O)N2C)C").unwrap();
        assert_eq!(mol.formula(), "C8H10N4O2");
    }

    #[test]
    fn validity_probe() {
        assert!(is_valid("CCO"));
        assert!(is_valid("c1ccccc1"));
        assert!(!is_valid("C(("));
        assert!(!is_valid("not a smiles"));
    }
}
