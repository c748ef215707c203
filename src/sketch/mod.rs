//! 2D diagram generation.
//!
//! A [`Sketcher`] owns one molecule and renders it once: compute the
//! layout, rotate (fixed angle or PCA auto-orientation), map to pixel
//! space, and emit SVG.

mod config;
mod svg;

pub use config::SketchConfig;

use std::io::{self, Write};

use crate::layout;
use crate::model::molecule::Molecule;
use crate::orient;

/// What a render produced, for reporting.
#[derive(Debug, Clone, Copy)]
pub struct SketchSummary {
    pub width: u32,
    pub height: u32,
    pub atoms: usize,
    pub bonds: usize,
    /// Rotation that was actually applied, radians.
    pub rotation: f64,
}

pub struct Sketcher {
    mol: Molecule,
    hydrogens: Vec<u8>,
    config: SketchConfig,
}

impl Sketcher {
    /// Takes the heavy-atom molecule and its implicit hydrogen counts
    /// (as produced by [`crate::smiles::parse`]).
    pub fn new(mol: Molecule, hydrogens: Vec<u8>, config: SketchConfig) -> Self {
        Self {
            mol,
            hydrogens,
            config,
        }
    }

    pub fn molecule(&self) -> &Molecule {
        &self.mol
    }

    /// Renders the diagram as SVG into `w`.
    pub fn render_svg<W: Write>(&self, w: W) -> io::Result<SketchSummary> {
        let flat = layout::compute_2d_coords(&self.mol);

        let rotation = if self.config.auto_orient {
            orient::optimal_2d_rotation(&flat)
        } else {
            self.config.angle
        };

        // Rotate about the centroid, then flip y for screen space.
        let n = flat.len().max(1) as f64;
        let cx = flat.iter().map(|c| c[0]).sum::<f64>() / n;
        let cy = flat.iter().map(|c| c[1]).sum::<f64>() / n;
        let (sin, cos) = rotation.sin_cos();
        let rotated: Vec<[f64; 2]> = flat
            .iter()
            .map(|c| {
                let x = c[0] - cx;
                let y = c[1] - cy;
                [x * cos - y * sin, -(x * sin + y * cos)]
            })
            .collect();

        let (canvas, coords) = self.to_pixel_space(&rotated);

        let ring_centers = self.aromatic_ring_centers(&coords);
        let diagram = svg::Diagram {
            mol: &self.mol,
            hydrogens: &self.hydrogens,
            coords: &coords,
            ring_centers: &ring_centers,
            canvas,
            config: &self.config,
        };
        diagram.write(w)?;

        Ok(SketchSummary {
            width: diagram.canvas.width,
            height: diagram.canvas.height,
            atoms: self.mol.atom_count(),
            bonds: self.mol.bond_count(),
            rotation,
        })
    }

    /// Margin, scale, and padding turn layout units into the canvas.
    fn to_pixel_space(&self, rotated: &[[f64; 2]]) -> (svg::Canvas, Vec<[f64; 2]>) {
        let ppu = self.config.pixels_per_unit();
        let margin = self.config.margin;

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in rotated {
            min_x = min_x.min(c[0]);
            min_y = min_y.min(c[1]);
            max_x = max_x.max(c[0]);
            max_y = max_y.max(c[1]);
        }
        if rotated.is_empty() {
            min_x = 0.0;
            min_y = 0.0;
            max_x = 0.0;
            max_y = 0.0;
        }
        min_x -= margin;
        min_y -= margin;
        max_x += margin;
        max_y += margin;

        let inner_w = (max_x - min_x) * ppu;
        let inner_h = (max_y - min_y) * ppu;
        let pad_x = inner_w * self.config.padding;
        let pad_y = inner_h * self.config.padding;

        let coords = rotated
            .iter()
            .map(|c| [(c[0] - min_x) * ppu + pad_x, (c[1] - min_y) * ppu + pad_y])
            .collect();

        let canvas = svg::Canvas {
            width: (inner_w + 2.0 * pad_x).ceil().max(1.0) as u32,
            height: (inner_h + 2.0 * pad_y).ceil().max(1.0) as u32,
        };
        (canvas, coords)
    }

    /// For each aromatic bond, the pixel-space centroid of a ring
    /// containing it, so the inner stroke lands inside the ring.
    fn aromatic_ring_centers(&self, coords: &[[f64; 2]]) -> Vec<Option<[f64; 2]>> {
        let rings = layout::perceive_rings(&self.mol);
        self.mol
            .bonds
            .iter()
            .map(|bond| {
                if bond.order != crate::model::types::BondOrder::Aromatic {
                    return None;
                }
                rings
                    .iter()
                    .find(|r| r.contains(&bond.i) && r.contains(&bond.j))
                    .map(|r| {
                        let n = r.len() as f64;
                        let cx = r.iter().map(|&a| coords[a][0]).sum::<f64>() / n;
                        let cy = r.iter().map(|&a| coords[a][1]).sum::<f64>() / n;
                        [cx, cy]
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    fn sketch(s: &str, config: SketchConfig) -> (String, SketchSummary) {
        let (mol, hydrogens) = smiles::parse(s).unwrap();
        let sketcher = Sketcher::new(mol, hydrogens, config);
        let mut out = Vec::new();
        let summary = sketcher.render_svg(&mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn svg_has_root_and_dimensions() {
        let (svg, summary) = sketch("CCO", SketchConfig::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg xmlns="));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(summary.width > 0 && summary.height > 0);
    }

    #[test]
    fn heteroatoms_and_terminal_methyls_are_labeled() {
        let (svg, _) = sketch("CCO", SketchConfig::default());
        assert!(svg.contains(">OH</text>"));
        assert!(svg.contains(">CH3</text>"));
        // The skeletal middle carbon stays implicit.
        assert!(!svg.contains(">C</text>"));
        assert!(!svg.contains(">CH2</text>"));
    }

    #[test]
    fn labels_carry_a_white_halo() {
        let (svg, _) = sketch("CO", SketchConfig::default());
        assert!(svg.contains("paint-order='stroke'"));
        assert!(svg.contains("stroke='#FFFFFF'"));
    }

    #[test]
    fn charged_atom_label() {
        let (svg, _) = sketch("[NH4+]", SketchConfig::default());
        assert!(svg.contains(">NH4+</text>"));
    }

    #[test]
    fn transparent_background_omits_rect() {
        let (svg, _) = sketch("CC", SketchConfig::default());
        assert!(!svg.contains("<rect"));

        let (svg, _) = sketch(
            "CC",
            SketchConfig {
                transparent_background: false,
                ..Default::default()
            },
        );
        assert!(svg.contains("fill='#FFFFFF'"));
    }

    #[test]
    fn aromatic_rings_draw_inner_strokes() {
        let (svg, summary) = sketch("c1ccccc1", SketchConfig::default());
        assert_eq!(summary.bonds, 6);
        // 6 outer + 6 inner strokes.
        assert_eq!(svg.matches("<line ").count(), 12);
    }

    #[test]
    fn double_bonds_draw_two_strokes() {
        let (svg, _) = sketch("C=C", SketchConfig::default());
        assert_eq!(svg.matches("<line ").count(), 2);
    }

    #[test]
    fn auto_orient_overrides_fixed_angle() {
        let (_, fixed) = sketch("CCCCCCCC", SketchConfig::default());
        let (_, auto) = sketch(
            "CCCCCCCC",
            SketchConfig {
                auto_orient: true,
                angle: 1.234,
                ..Default::default()
            },
        );
        assert!((fixed.rotation - std::f64::consts::PI).abs() < 1e-12);
        assert!((auto.rotation - 1.234).abs() > 1e-6);
    }

    #[test]
    fn color_palette_tints_labels() {
        let (svg, _) = sketch(
            "CO",
            SketchConfig {
                use_bw_palette: false,
                ..Default::default()
            },
        );
        assert!(svg.contains("#C00000"));
    }
}
