//! XYZ export.

use std::io::Write;

use crate::io::error::Error;
use crate::model::molecule::Molecule;

pub fn write<W: Write>(mut writer: W, mol: &Molecule) -> Result<(), Error> {
    writeln!(writer, "{}", mol.atom_count())?;
    writeln!(writer, "{}", mol.name)?;
    for atom in &mol.atoms {
        writeln!(
            writer,
            "{:<3} {:>12.6} {:>12.6} {:>12.6}",
            atom.element.symbol(),
            atom.position[0],
            atom.position[1],
            atom.position[2]
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::Element;

    #[test]
    fn writes_count_comment_and_atoms() {
        let mut mol = Molecule::with_name("hydrogen");
        mol.add_atom(Atom::new(Element::H, [0.0, 0.0, 0.0]));
        mol.add_atom(Atom::new(Element::H, [0.74, 0.0, 0.0]));

        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "hydrogen");
        assert!(lines[2].starts_with("H  "));
        assert!(lines[3].contains("0.740000"));
    }
}
