//! Structure file I/O.
//!
//! SDF (molfile V2000) is the primary 3D output and the only structure
//! input; XYZ is a light secondary export. [`read_structure`] infers
//! the format from the file extension and rejects formats this tool
//! can only write.

pub mod error;
pub mod sdf;
pub mod xyz;

pub use error::Error;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::model::molecule::Molecule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sdf,
    Xyz,
    Svg,
    Png,
}

impl Format {
    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "sdf" | "sd" | "mol" => Some(Format::Sdf),
            "xyz" => Some(Format::Xyz),
            "svg" => Some(Format::Svg),
            "png" => Some(Format::Png),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Xyz => write!(f, "XYZ"),
            Format::Svg => write!(f, "SVG"),
            Format::Png => write!(f, "PNG"),
        }
    }
}

/// Reads a molecule from a structure file. Only SDF can be read:
/// recognized write-only extensions are rejected up front, and an
/// unrecognized extension is attempted as SDF.
pub fn read_structure(path: &Path) -> Result<Molecule, Error> {
    match Format::from_path(path) {
        Some(Format::Sdf) | None => {}
        Some(format) => return Err(Error::UnsupportedReadFormat(format)),
    }
    let file = File::open(path)?;
    sdf::read(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{BondOrder, Element};

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/mol.sdf")), Some(Format::Sdf));
        assert_eq!(Format::from_path(Path::new("MOL.SDF")), Some(Format::Sdf));
        assert_eq!(Format::from_path(Path::new("m.mol")), Some(Format::Sdf));
        assert_eq!(Format::from_path(Path::new("pts.xyz")), Some(Format::Xyz));
        assert_eq!(Format::from_path(Path::new("d.svg")), Some(Format::Svg));
        assert_eq!(Format::from_path(Path::new("i.png")), Some(Format::Png));
        assert_eq!(Format::from_path(Path::new("notes.txt")), None);
        assert_eq!(Format::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn read_structure_roundtrips_sdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("water.sdf");

        let mut mol = Molecule::with_name("water");
        let o = mol.add_atom(Atom::new(Element::O, [0.0, 0.0, 0.0]));
        let h = mol.add_atom(Atom::new(Element::H, [0.96, 0.0, 0.0]));
        mol.add_bond(o, h, BondOrder::Single);

        let mut block = Vec::new();
        sdf::write(&mut block, &mol).unwrap();
        std::fs::write(&path, block).unwrap();

        let parsed = read_structure(&path).unwrap();
        assert_eq!(parsed.name, "water");
        assert_eq!(parsed.atom_count(), 2);
        assert_eq!(parsed.bond_count(), 1);
    }

    #[test]
    fn read_structure_rejects_write_only_formats() {
        for name in ["image.png", "diagram.svg", "coords.xyz"] {
            let err = read_structure(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedReadFormat(_)),
                "{name} gave {err}"
            );
        }
    }

    #[test]
    fn read_structure_reports_missing_files() {
        let err = read_structure(Path::new("does_not_exist.sdf")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
