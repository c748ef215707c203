//! Hand-written SVG emission for 2D diagrams.

use std::io::{self, Write};

use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

use super::config::SketchConfig;

/// Fraction of a bond length separating the strokes of a multiple
/// bond.
const MULTI_BOND_OFFSET: f64 = 0.09;

/// How much the inner stroke of an aromatic bond is shortened at each
/// end.
const AROMATIC_TRIM: f64 = 0.15;

pub(super) struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// 2D CPK label colors. Bonds stay black; only labels are tinted.
fn label_color(element: Element) -> &'static str {
    match element {
        Element::N => "#3050F8",
        Element::O => "#C00000",
        Element::S => "#999900",
        Element::P => "#FF8000",
        Element::F | Element::Cl => "#1FA01F",
        Element::Br => "#A62929",
        Element::I => "#940094",
        _ => "#000000",
    }
}

pub(super) struct Diagram<'a> {
    pub mol: &'a Molecule,
    pub hydrogens: &'a [u8],
    /// Pixel-space atom coordinates.
    pub coords: &'a [[f64; 2]],
    /// Centroid of the ring containing each aromatic bond, pixel
    /// space, indexed like `mol.bonds`.
    pub ring_centers: &'a [Option<[f64; 2]>],
    pub canvas: Canvas,
    pub config: &'a SketchConfig,
}

impl Diagram<'_> {
    pub(super) fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        let ppu = self.config.pixels_per_unit();
        let stroke = (ppu * 0.07).max(1.0);

        writeln!(w, "<?xml version='1.0' encoding='UTF-8'?>")?;
        writeln!(
            w,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}' viewBox='0 0 {} {}'>",
            self.canvas.width, self.canvas.height, self.canvas.width, self.canvas.height
        )?;

        if !self.config.transparent_background {
            writeln!(
                w,
                "  <rect width='{}' height='{}' fill='#FFFFFF'/>",
                self.canvas.width, self.canvas.height
            )?;
        }

        writeln!(
            w,
            "  <g stroke='#000000' stroke-width='{stroke:.2}' stroke-linecap='round' fill='none'>"
        )?;
        for (bond_idx, bond) in self.mol.bonds.iter().enumerate() {
            self.write_bond(&mut w, bond_idx, bond.i, bond.j, bond.order, ppu)?;
        }
        writeln!(w, "  </g>")?;

        self.write_labels(&mut w)?;

        writeln!(w, "</svg>")?;
        Ok(())
    }

    fn write_bond<W: Write>(
        &self,
        w: &mut W,
        bond_idx: usize,
        i: usize,
        j: usize,
        order: BondOrder,
        ppu: f64,
    ) -> io::Result<()> {
        let (a, b) = self.trimmed_endpoints(i, j);
        let offset = ppu * MULTI_BOND_OFFSET;

        match order {
            BondOrder::Single => self.line(w, a, b, [0.0, 0.0])?,
            BondOrder::Double => {
                let n = normal(a, b, offset);
                self.line(w, a, b, n)?;
                self.line(w, a, b, [-n[0], -n[1]])?;
            }
            BondOrder::Triple => {
                let n = normal(a, b, offset * 1.6);
                self.line(w, a, b, [0.0, 0.0])?;
                self.line(w, a, b, n)?;
                self.line(w, a, b, [-n[0], -n[1]])?;
            }
            BondOrder::Aromatic => {
                self.line(w, a, b, [0.0, 0.0])?;
                // Inner stroke toward the ring center, trimmed.
                let toward = self.ring_centers[bond_idx];
                let n = normal(a, b, offset * 2.0);
                let n = match toward {
                    Some(c) => {
                        let mid = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
                        let to_center = [c[0] - mid[0], c[1] - mid[1]];
                        if n[0] * to_center[0] + n[1] * to_center[1] >= 0.0 {
                            n
                        } else {
                            [-n[0], -n[1]]
                        }
                    }
                    None => n,
                };
                let (ta, tb) = trim(a, b, AROMATIC_TRIM);
                self.line(w, ta, tb, n)?;
            }
        }
        Ok(())
    }

    fn line<W: Write>(
        &self,
        w: &mut W,
        a: [f64; 2],
        b: [f64; 2],
        shift: [f64; 2],
    ) -> io::Result<()> {
        writeln!(
            w,
            "    <line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}'/>",
            a[0] + shift[0],
            a[1] + shift[1],
            b[0] + shift[0],
            b[1] + shift[1]
        )
    }

    /// Bond endpoints pulled back from labeled atoms so strokes do not
    /// run through the text.
    fn trimmed_endpoints(&self, i: usize, j: usize) -> ([f64; 2], [f64; 2]) {
        let a = self.coords[i];
        let b = self.coords[j];
        let d = [b[0] - a[0], b[1] - a[1]];
        let len = (d[0] * d[0] + d[1] * d[1]).sqrt().max(1e-9);
        let unit = [d[0] / len, d[1] / len];
        let clearance = self.config.font_size() * 0.42;

        let a = if self.label_text(i).is_some() {
            [a[0] + unit[0] * clearance, a[1] + unit[1] * clearance]
        } else {
            a
        };
        let b = if self.label_text(j).is_some() {
            [b[0] - unit[0] * clearance, b[1] - unit[1] * clearance]
        } else {
            b
        };
        (a, b)
    }

    fn write_labels<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let font = self.config.font_size();
        // The white stroke behind each glyph halos the label over any
        // bond stroke it sits on.
        let halo = font * 0.25;
        writeln!(
            w,
            "  <g font-family='Helvetica, Arial, sans-serif' font-size='{font:.1}' \
             text-anchor='middle' paint-order='stroke' stroke='#FFFFFF' \
             stroke-width='{halo:.1}' stroke-linejoin='round'>"
        )?;
        for atom in 0..self.mol.atom_count() {
            if let Some(text) = self.label_text(atom) {
                let color = if self.config.use_bw_palette {
                    "#000000"
                } else {
                    label_color(self.mol.atoms[atom].element)
                };
                let [x, y] = self.coords[atom];
                writeln!(
                    w,
                    "    <text x='{:.2}' y='{:.2}' fill='{}'>{}</text>",
                    x,
                    y + font * 0.35,
                    color,
                    text
                )?;
            }
        }
        writeln!(w, "  </g>")
    }

    /// Heteroatoms, charged atoms, isolated atoms, and terminal methyl
    /// groups get labels; skeletal carbons stay implicit.
    fn label_text(&self, atom: usize) -> Option<String> {
        let a = &self.mol.atoms[atom];
        let h = self.hydrogens.get(atom).copied().unwrap_or(0);
        let neighbors = self.mol.neighbors(atom);
        let terminal_methyl = neighbors.len() == 1 && h == 3;
        if a.element == Element::C && a.charge == 0 && !neighbors.is_empty() && !terminal_methyl {
            return None;
        }

        let mut text = a.element.symbol().to_string();
        if h == 1 {
            text.push('H');
        } else if h > 1 {
            text.push('H');
            text.push_str(&h.to_string());
        }
        match a.charge {
            0 => {}
            1 => text.push('+'),
            -1 => text.push('-'),
            c if c > 1 => text.push_str(&format!("{c}+")),
            c => text.push_str(&format!("{}-", -c)),
        }
        Some(text)
    }
}

fn normal(a: [f64; 2], b: [f64; 2], magnitude: f64) -> [f64; 2] {
    let d = [b[0] - a[0], b[1] - a[1]];
    let len = (d[0] * d[0] + d[1] * d[1]).sqrt().max(1e-9);
    [-d[1] / len * magnitude, d[0] / len * magnitude]
}

fn trim(a: [f64; 2], b: [f64; 2], fraction: f64) -> ([f64; 2], [f64; 2]) {
    let d = [b[0] - a[0], b[1] - a[1]];
    (
        [a[0] + d[0] * fraction, a[1] + d[1] * fraction],
        [b[0] - d[0] * fraction, b[1] - d[1] * fraction],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_perpendicular_with_magnitude() {
        let n = normal([0.0, 0.0], [10.0, 0.0], 2.0);
        assert!((n[0]).abs() < 1e-9);
        assert!((n[1].abs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn trim_shortens_symmetrically() {
        let (a, b) = trim([0.0, 0.0], [10.0, 0.0], 0.1);
        assert!((a[0] - 1.0).abs() < 1e-9);
        assert!((b[0] - 9.0).abs() < 1e-9);
    }
}
