//! Scene construction: molecule → sphere and stick impostors.

use nalgebra::{Matrix3, Vector3};

use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

use super::color::{named_color, Rgb};
use super::RenderConfig;

#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere {
        center: Vector3<f64>,
        radius: f64,
        color: Rgb,
        transparency: f64,
    },
    /// Open cylinder between two points; the end joints are always
    /// covered by atom spheres.
    Stick {
        a: Vector3<f64>,
        b: Vector3<f64>,
        radius: f64,
        color: Rgb,
        transparency: f64,
    },
}

/// Euler rotation in the viewer's turn order: x, then y, then z
/// (degrees).
pub fn rotation_matrix(x_deg: f64, y_deg: f64, z_deg: f64) -> Matrix3<f64> {
    let (sx, cx) = x_deg.to_radians().sin_cos();
    let (sy, cy) = y_deg.to_radians().sin_cos();
    let (sz, cz) = z_deg.to_radians().sin_cos();

    let rx = Matrix3::new(1.0, 0.0, 0.0, 0.0, cx, -sx, 0.0, sx, cx);
    let ry = Matrix3::new(cy, 0.0, sy, 0.0, 1.0, 0.0, -sy, 0.0, cy);
    let rz = Matrix3::new(cz, -sz, 0.0, sz, cz, 0.0, 0.0, 0.0, 1.0);
    rz * ry * rx
}

/// Builds the primitive list for a molecule whose coordinates have
/// already been centered and rotated into view space.
pub fn build_scene(
    mol: &Molecule,
    positions: &[Vector3<f64>],
    config: &RenderConfig,
) -> Vec<Primitive> {
    let mut primitives = Vec::with_capacity(mol.atom_count() + mol.bond_count() * 2);

    let element_color = |atom: usize| -> Rgb {
        let symbol = mol.atoms[atom].element.symbol();
        config
            .element_colors
            .get(symbol)
            .map(|name| named_color(name))
            .unwrap_or([0.5, 0.5, 0.5])
    };

    for (i, atom) in mol.atoms.iter().enumerate() {
        let ball = config.stick_radius * config.stick_ball_ratio;
        let radius = (atom.element.vdw_radius() * config.sphere_scale).max(ball);
        primitives.push(Primitive::Sphere {
            center: positions[i],
            radius,
            color: element_color(i),
            transparency: config.sphere_transparency.clamp(0.0, 1.0),
        });
    }

    let stick_color = config.stick_color.as_deref().map(named_color);
    for bond in &mol.bonds {
        let pa = positions[bond.i];
        let pb = positions[bond.j];

        // Valence display splits double/triple bonds into parallel
        // thinner sticks; otherwise one stick per bond.
        let strands: usize = if config.valence > 0.0 {
            match bond.order {
                BondOrder::Single => 1,
                BondOrder::Double | BondOrder::Aromatic => 2,
                BondOrder::Triple => 3,
            }
        } else {
            1
        };

        let (radius, offsets) = strand_offsets(pa, pb, strands, config.stick_radius);

        for offset in offsets {
            let mid = (pa + pb) / 2.0;
            for (from, to, color_atom) in [(pa, mid, bond.i), (mid, pb, bond.j)] {
                let color = stick_color.unwrap_or_else(|| element_color(color_atom));
                primitives.push(Primitive::Stick {
                    a: from + offset,
                    b: to + offset,
                    radius,
                    color,
                    transparency: config.stick_transparency.clamp(0.0, 1.0),
                });
            }
        }
    }

    primitives
}

/// Perpendicular offsets for multi-strand bonds, spread in the plane
/// facing the viewer so the strands stay visible.
fn strand_offsets(
    a: Vector3<f64>,
    b: Vector3<f64>,
    strands: usize,
    stick_radius: f64,
) -> (f64, Vec<Vector3<f64>>) {
    if strands <= 1 {
        return (stick_radius, vec![Vector3::zeros()]);
    }

    let axis = (b - a).normalize();
    let view = Vector3::z();
    let mut perp = axis.cross(&view);
    if perp.norm() < 1e-6 {
        perp = axis.cross(&Vector3::y());
    }
    let perp = perp.normalize();

    let radius = stick_radius * 0.55;
    let gap = stick_radius * 1.4;
    let offsets = match strands {
        2 => vec![perp * (gap / 2.0), perp * (-gap / 2.0)],
        _ => vec![Vector3::zeros(), perp * gap, perp * -gap],
    };
    (radius, offsets)
}

/// Centers coordinates on their centroid and applies the rotation.
pub fn view_positions(mol: &Molecule, rotation: &Matrix3<f64>) -> Vec<Vector3<f64>> {
    let centroid = mol.centroid();
    let centroid = Vector3::new(centroid[0], centroid[1], centroid[2]);
    mol.atoms
        .iter()
        .map(|a| {
            let p = Vector3::new(a.position[0], a.position[1], a.position[2]);
            rotation * (p - centroid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn identity_rotation() {
        let r = rotation_matrix(0.0, 0.0, 0.0);
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!((r * v - v).norm() < 1e-12);
    }

    #[test]
    fn z_rotation_quarter_turn() {
        let r = rotation_matrix(0.0, 0.0, 90.0);
        let v = r * Vector3::x();
        assert!(approx_eq(v.x, 0.0, 1e-12));
        assert!(approx_eq(v.y, 1.0, 1e-12));
    }

    #[test]
    fn scene_counts_for_simple_molecule() {
        let mut mol = smiles::parse_with_hydrogens("CC").unwrap();
        crate::conformer::generate(&mut mol, &Default::default(), false).unwrap();
        let config = RenderConfig::default();
        let positions = view_positions(&mol, &rotation_matrix(0.0, 0.0, 0.0));
        let scene = build_scene(&mol, &positions, &config);
        // 8 atoms, 7 bonds with two half-sticks each.
        assert_eq!(scene.len(), 8 + 14);
    }

    #[test]
    fn valence_mode_adds_strands() {
        let mut mol = smiles::parse_with_hydrogens("C=C").unwrap();
        crate::conformer::generate(&mut mol, &Default::default(), false).unwrap();
        let base = RenderConfig::default();
        let valence = RenderConfig {
            valence: 0.1,
            ..RenderConfig::default()
        };
        let positions = view_positions(&mol, &rotation_matrix(0.0, 0.0, 0.0));
        let plain = build_scene(&mol, &positions, &base).len();
        let split = build_scene(&mol, &positions, &valence).len();
        assert!(split > plain);
    }

    #[test]
    fn spheres_at_least_ball_sized() {
        let mut mol = smiles::parse_with_hydrogens("C").unwrap();
        crate::conformer::generate(&mut mol, &Default::default(), false).unwrap();
        let config = RenderConfig::default();
        let positions = view_positions(&mol, &rotation_matrix(0.0, 0.0, 0.0));
        for p in build_scene(&mol, &positions, &config) {
            if let Primitive::Sphere { radius, .. } = p {
                assert!(radius >= config.stick_radius * config.stick_ball_ratio - 1e-12);
            }
        }
    }
}
