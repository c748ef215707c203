use std::path::{Path, PathBuf};

use mol_depict::fetch::CUSTOM_SMILES_NAME;

/// Derives the 3D output base name from a resolved compound name:
/// spaces become underscores, and raw-SMILES input gets a generic
/// base.
pub fn output_base(compound_name: &str) -> PathBuf {
    if compound_name == CUSTOM_SMILES_NAME {
        PathBuf::from("molecule_3d")
    } else {
        PathBuf::from(compound_name.replace(' ', "_"))
    }
}

/// Appends a suffix to the file name without touching any existing
/// dots; IUPAC-derived base names routinely contain them.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let name = path.file_name().unwrap_or_default();
    path.with_file_name(format!("{}{}", name.to_string_lossy(), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_replaces_spaces() {
        assert_eq!(
            output_base("2-acetyloxybenzoic acid"),
            PathBuf::from("2-acetyloxybenzoic_acid")
        );
    }

    #[test]
    fn raw_smiles_gets_a_generic_base() {
        assert_eq!(output_base(CUSTOM_SMILES_NAME), PathBuf::from("molecule_3d"));
    }

    #[test]
    fn suffix_preserves_dots_in_the_base() {
        let base = Path::new("out/1,2.3-something");
        assert_eq!(
            with_suffix(base, ".sdf"),
            PathBuf::from("out/1,2.3-something.sdf")
        );
    }
}
