//! Molfile/SDF V2000 reading and writing.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::io::{error::Error, Format};
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};

pub fn write<W: Write>(mut writer: W, mol: &Molecule) -> Result<(), Error> {
    let title = if mol.name.is_empty() {
        "molecule"
    } else {
        mol.name.as_str()
    };

    writeln!(writer, "{title}")?;
    writeln!(writer, "  mol-depict")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count()
    )?;

    for atom in &mol.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element.symbol()
        )?;
    }

    for bond in &mol.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            bond.order.to_ctfile()
        )?;
    }

    let charged: Vec<(usize, i8)> = mol
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.charge != 0)
        .map(|(i, a)| (i, a.charge))
        .collect();
    for chunk in charged.chunks(8) {
        write!(writer, "M  CHG{:>3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(writer, "{:>4}{:>4}", idx + 1, charge)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    Ok(())
}

/// Reads the first molecule block. V3000 input is rejected.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let lines = collect_first_block(reader)?;
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            1,
            "SDF block must contain at least a header and counts line",
        ));
    }

    let name = lines[0].1.trim().to_string();
    let (counts_line_no, counts_line) = (&lines[3].0, &lines[3].1);
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            *counts_line_no,
            "V3000 is not supported",
        ));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, *counts_line_no)?;
    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    if lines.len() < bond_start + bond_count {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(*counts_line_no),
            "SDF block ended before atoms and bonds were fully specified",
        ));
    }

    let mut mol = Molecule::with_name(name);
    mol.atoms = parse_atoms(&lines[atom_start..bond_start])?;
    mol.bonds = parse_bonds(&lines[bond_start..bond_start + bond_count], atom_count)?;
    apply_properties(&mut mol, &lines[bond_start + bond_count..])?;
    Ok(mol)
}

fn collect_first_block<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line.map_err(|e| Error::Io { source: e })?;
        if content.trim() == "$$$$" && !lines.is_empty() {
            break;
        }
        lines.push((i + 1, content));
    }
    Ok(lines)
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    // Counts are fixed three-column fields, but wide counts can fuse
    // them; fall back to whitespace splitting only when unambiguous.
    let (a, b) = if line.len() >= 6 {
        (line[0..3].trim(), line[3..6].trim())
    } else {
        let mut tokens = line.split_whitespace();
        (
            tokens.next().unwrap_or_default(),
            tokens.next().unwrap_or_default(),
        )
    };

    let atoms = a
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = b
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[(usize, String)]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<40}");
        let coord = |range: std::ops::Range<usize>, what: &str| {
            padded[range]
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::parse(Format::Sdf, *ln, format!("invalid {what} coordinate")))
        };
        let x = coord(0..10, "x")?;
        let y = coord(10..20, "y")?;
        let z = coord(20..30, "z")?;
        let symbol = padded[31..34].trim();
        let element = Element::from_str(symbol)
            .map_err(|_| Error::parse(Format::Sdf, *ln, format!("unknown element '{symbol}'")))?;
        atoms.push(Atom::new(element, [x, y, z]));
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[(usize, String)], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<9}");
        let field = |range: std::ops::Range<usize>, what: &str| {
            padded[range]
                .trim()
                .parse::<i32>()
                .map_err(|_| Error::parse(Format::Sdf, *ln, format!("invalid {what}")))
        };
        let a1 = field(0..3, "first atom index")? as usize;
        let a2 = field(3..6, "second atom index")? as usize;
        let code = field(6..9, "bond order value")?;

        let order = BondOrder::from_ctfile(code)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported bond order"))?;
        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }
        bonds.push(Bond::new(a1 - 1, a2 - 1, order));
    }
    Ok(bonds)
}

/// Applies `M  CHG` property lines; everything else before `M  END`
/// is ignored.
fn apply_properties(mol: &mut Molecule, lines: &[(usize, String)]) -> Result<(), Error> {
    for (ln, raw) in lines {
        if raw.trim() == "M  END" {
            break;
        }
        if let Some(rest) = raw.strip_prefix("M  CHG") {
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            let count = tokens
                .first()
                .and_then(|t| t.parse::<usize>().ok())
                .ok_or_else(|| Error::parse(Format::Sdf, *ln, "invalid charge count"))?;
            if tokens.len() < 1 + count * 2 {
                return Err(Error::parse(Format::Sdf, *ln, "truncated charge line"));
            }
            for pair in tokens[1..1 + count * 2].chunks(2) {
                let idx = pair[0]
                    .parse::<usize>()
                    .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid charge atom index"))?;
                let charge = pair[1]
                    .parse::<i8>()
                    .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid charge value"))?;
                if idx == 0 || idx > mol.atom_count() {
                    return Err(Error::parse(
                        Format::Sdf,
                        *ln,
                        "charge references atom outside declared range",
                    ));
                }
                mol.atoms[idx - 1].charge = charge;
            }
        }
    }
    Ok(())
}
