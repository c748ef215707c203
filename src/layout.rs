//! 2D depiction coordinates.
//!
//! Rings are drawn as regular polygons with fused rings reflected
//! across their shared edge; acyclic atoms are grown breadth-first
//! with 120° chain angles. All bond lengths come out near 1.0; the
//! sketcher scales to pixels afterwards.

use std::collections::{HashSet, VecDeque};
use std::f64::consts::{PI, TAU};

use crate::model::molecule::Molecule;

/// Rings larger than this are treated as chains for layout purposes.
const MAX_RING: usize = 14;

/// Horizontal gap between disconnected fragments, in bond lengths.
const FRAGMENT_GAP: f64 = 1.5;

/// Computes 2D coordinates for every atom. Operates on the heavy-atom
/// graph it is given; implicit hydrogens stay implicit.
pub fn compute_2d_coords(mol: &Molecule) -> Vec<[f64; 2]> {
    let n = mol.atom_count();
    let mut coords: Vec<Option<[f64; 2]>> = vec![None; n];
    if n == 0 {
        return Vec::new();
    }

    let adjacency = mol.adjacency();
    let rings = perceive_rings(mol);

    let mut cursor_x = 0.0_f64;
    for fragment in fragments(&adjacency) {
        layout_fragment(&fragment, &adjacency, &rings, &mut coords);

        // Shift the fragment so fragments line up left to right.
        let (min_x, max_x, min_y) = fragment.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY),
            |(lo, hi, ylo), &a| {
                let [x, y] = coords[a].unwrap_or([0.0, 0.0]);
                (lo.min(x), hi.max(x), ylo.min(y))
            },
        );
        for &a in &fragment {
            if let Some(c) = coords[a].as_mut() {
                c[0] += cursor_x - min_x;
                c[1] -= min_y;
            }
        }
        cursor_x += (max_x - min_x) + FRAGMENT_GAP;
    }

    coords
        .into_iter()
        .map(|c| c.unwrap_or([0.0, 0.0]))
        .collect()
}

/// Smallest ring through each bond, deduplicated. Each ring comes back
/// as an ordered atom cycle.
pub fn perceive_rings(mol: &Molecule) -> Vec<Vec<usize>> {
    let adjacency = mol.adjacency();
    let mut rings: Vec<Vec<usize>> = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for bond in &mol.bonds {
        if let Some(path) = shortest_path_avoiding(&adjacency, bond.i, bond.j, (bond.i, bond.j)) {
            if path.len() > MAX_RING {
                continue;
            }
            let mut key = path.clone();
            key.sort_unstable();
            if seen.insert(key) {
                rings.push(path);
            }
        }
    }

    rings
}

/// True for every atom that sits on a perceived ring.
pub fn ring_membership(mol: &Molecule) -> Vec<bool> {
    let mut member = vec![false; mol.atom_count()];
    for ring in perceive_rings(mol) {
        for atom in ring {
            member[atom] = true;
        }
    }
    member
}

/// BFS shortest path from `from` to `to` that never crosses the
/// excluded edge. The returned path includes both endpoints, so it is
/// the ring cycle for that bond.
fn shortest_path_avoiding(
    adjacency: &[Vec<usize>],
    from: usize,
    to: usize,
    excluded: (usize, usize),
) -> Option<Vec<usize>> {
    let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut visited = vec![false; adjacency.len()];
    let mut queue = VecDeque::new();
    visited[from] = true;
    queue.push_back(from);

    while let Some(u) = queue.pop_front() {
        if u == to {
            let mut path = vec![to];
            let mut cur = to;
            while let Some(p) = parent[cur] {
                path.push(p);
                cur = p;
            }
            path.reverse();
            return Some(path);
        }
        for &v in &adjacency[u] {
            let edge = (u.min(v), u.max(v));
            if edge == (excluded.0.min(excluded.1), excluded.0.max(excluded.1)) {
                continue;
            }
            if !visited[v] {
                visited[v] = true;
                parent[v] = Some(u);
                queue.push_back(v);
            }
        }
    }
    None
}

fn fragments(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen = vec![false; adjacency.len()];
    let mut out = Vec::new();
    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        let mut fragment = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(u) = queue.pop_front() {
            fragment.push(u);
            for &v in &adjacency[u] {
                if !seen[v] {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
        out.push(fragment);
    }
    out
}

fn layout_fragment(
    fragment: &[usize],
    adjacency: &[Vec<usize>],
    rings: &[Vec<usize>],
    coords: &mut [Option<[f64; 2]>],
) {
    let in_fragment: HashSet<usize> = fragment.iter().copied().collect();
    let fragment_rings: Vec<&Vec<usize>> = rings
        .iter()
        .filter(|r| r.iter().all(|a| in_fragment.contains(a)))
        .collect();

    // Ring membership per atom, so chain growth leaves ring interiors
    // to the polygon placement below.
    let mut atom_rings: Vec<Vec<usize>> = vec![Vec::new(); coords.len()];
    for (ri, ring) in fragment_rings.iter().enumerate() {
        for &a in ring.iter() {
            atom_rings[a].push(ri);
        }
    }

    // Seed with a ring when there is one, otherwise with the first atom.
    let mut placed_rings = vec![false; fragment_rings.len()];
    if let Some(first_ring) = fragment_rings.first() {
        place_seed_ring(first_ring.as_slice(), coords);
        placed_rings[0] = true;
    } else {
        coords[fragment[0]] = Some([0.0, 0.0]);
    }

    // Attach remaining rings to already-placed geometry until no ring
    // can make progress, then grow chains, then repeat for spiro or
    // chain-linked ring systems.
    loop {
        let mut progressed = false;

        for (ri, ring) in fragment_rings.iter().enumerate() {
            if placed_rings[ri] {
                continue;
            }
            if try_place_ring(ring.as_slice(), coords) {
                placed_rings[ri] = true;
                progressed = true;
            }
        }

        // A ring atom may be grown as a chain endpoint only when its
        // rings are entirely unplaced; it then anchors the next ring.
        let chain_ok = |v: usize, coords: &[Option<[f64; 2]>]| {
            atom_rings[v].iter().all(|&ri| {
                fragment_rings[ri]
                    .iter()
                    .all(|&a| coords[a].is_none())
            })
        };
        if grow_chains(fragment, adjacency, coords, &chain_ok) {
            progressed = true;
        }

        if !progressed {
            break;
        }
    }

    // Anything still unplaced (isolated atoms in odd topologies) lands
    // next to the fragment.
    for &a in fragment {
        if coords[a].is_none() {
            coords[a] = Some([0.0, 0.0]);
        }
    }
}

fn place_seed_ring(ring: &[usize], coords: &mut [Option<[f64; 2]>]) {
    let n = ring.len() as f64;
    let radius = 0.5 / (PI / n).sin();
    for (k, &atom) in ring.iter().enumerate() {
        let theta = PI / 2.0 + TAU * k as f64 / n;
        coords[atom] = Some([radius * theta.cos(), radius * theta.sin()]);
    }
}

/// Places a ring that shares an edge or an atom with placed geometry.
/// Returns false when the ring has no placed anchor yet.
fn try_place_ring(ring: &[usize], coords: &mut [Option<[f64; 2]>]) -> bool {
    let n = ring.len();
    if ring.iter().all(|&a| coords[a].is_some()) {
        return true;
    }

    // Fused case: two adjacent ring atoms already placed.
    for k in 0..n {
        let a = ring[k];
        let b = ring[(k + 1) % n];
        if let (Some(pa), Some(pb)) = (coords[a], coords[b]) {
            place_polygon_from_edge(ring, k, pa, pb, coords);
            return true;
        }
    }

    // Spiro case: a single shared atom.
    if let Some(k) = ring.iter().position(|&a| coords[a].is_some()) {
        let anchor = coords[ring[k]].unwrap_or([0.0, 0.0]);
        let away = outward_direction(anchor, coords);
        let radius = 0.5 / (PI / n as f64).sin();
        let center = [anchor[0] + away[0] * radius, anchor[1] + away[1] * radius];
        let start = (anchor[1] - center[1]).atan2(anchor[0] - center[0]);
        for offset in 0..n {
            let atom = ring[(k + offset) % n];
            if coords[atom].is_none() {
                let theta = start + TAU * offset as f64 / n as f64;
                coords[atom] = Some([
                    center[0] + radius * theta.cos(),
                    center[1] + radius * theta.sin(),
                ]);
            }
        }
        return true;
    }

    false
}

/// Completes a regular polygon that starts with the placed edge
/// `ring[k] -> ring[k+1]`, choosing the side that points away from the
/// rest of the placed geometry.
fn place_polygon_from_edge(
    ring: &[usize],
    k: usize,
    pa: [f64; 2],
    pb: [f64; 2],
    coords: &mut [Option<[f64; 2]>],
) {
    let n = ring.len();
    let exterior = TAU / n as f64;

    let mut best: Option<(f64, Vec<[f64; 2]>)> = None;
    for sign in [1.0, -1.0] {
        let mut positions = vec![pa, pb];
        let mut dir = [pb[0] - pa[0], pb[1] - pa[1]];
        let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt().max(1e-9);
        dir = [dir[0] / len, dir[1] / len];

        let mut prev = pb;
        for _ in 2..n {
            dir = rotate(dir, sign * exterior);
            prev = [prev[0] + dir[0], prev[1] + dir[1]];
            positions.push(prev);
        }

        let cx = positions.iter().map(|p| p[0]).sum::<f64>() / n as f64;
        let cy = positions.iter().map(|p| p[1]).sum::<f64>() / n as f64;
        let score = nearest_placed_distance([cx, cy], coords, ring);
        if best.as_ref().map(|(s, _)| score > *s).unwrap_or(true) {
            best = Some((score, positions));
        }
    }

    if let Some((_, positions)) = best {
        for (offset, pos) in positions.into_iter().enumerate() {
            let atom = ring[(k + offset) % n];
            if coords[atom].is_none() {
                coords[atom] = Some(pos);
            }
        }
    }
}

/// Distance from `point` to the closest placed atom outside `exclude`;
/// large when nothing is placed nearby. Used to pick the emptier side.
fn nearest_placed_distance(point: [f64; 2], coords: &[Option<[f64; 2]>], exclude: &[usize]) -> f64 {
    let mut best = f64::INFINITY;
    for (i, c) in coords.iter().enumerate() {
        if exclude.contains(&i) {
            continue;
        }
        if let Some(p) = c {
            let d = ((p[0] - point[0]).powi(2) + (p[1] - point[1]).powi(2)).sqrt();
            best = best.min(d);
        }
    }
    best
}

/// Unit direction from the centroid of placed atoms through `from`;
/// +x when nothing else is placed.
fn outward_direction(from: [f64; 2], coords: &[Option<[f64; 2]>]) -> [f64; 2] {
    let placed: Vec<[f64; 2]> = coords.iter().flatten().copied().collect();
    if placed.len() < 2 {
        return [1.0, 0.0];
    }
    let cx = placed.iter().map(|p| p[0]).sum::<f64>() / placed.len() as f64;
    let cy = placed.iter().map(|p| p[1]).sum::<f64>() / placed.len() as f64;
    let d = [from[0] - cx, from[1] - cy];
    let len = (d[0] * d[0] + d[1] * d[1]).sqrt();
    if len < 1e-9 {
        [1.0, 0.0]
    } else {
        [d[0] / len, d[1] / len]
    }
}

/// BFS growth of acyclic neighbors from placed atoms. Substituents
/// take the direction bisecting the widest angular gap around their
/// anchor; bare chains zig-zag at 120°. Returns whether anything new
/// was placed.
fn grow_chains(
    fragment: &[usize],
    adjacency: &[Vec<usize>],
    coords: &mut [Option<[f64; 2]>],
    chain_ok: &dyn Fn(usize, &[Option<[f64; 2]>]) -> bool,
) -> bool {
    let mut progressed = false;
    let mut queue: VecDeque<usize> = fragment
        .iter()
        .copied()
        .filter(|&a| coords[a].is_some())
        .collect();
    let mut zig = false;

    while let Some(u) = queue.pop_front() {
        let Some(pu) = coords[u] else { continue };

        for &v in &adjacency[u] {
            if coords[v].is_some() || !chain_ok(v, coords) {
                continue;
            }

            let neighbor_dirs: Vec<[f64; 2]> = adjacency[u]
                .iter()
                .filter_map(|&w| coords[w])
                .map(|pw| {
                    let d = [pw[0] - pu[0], pw[1] - pu[1]];
                    let len = (d[0] * d[0] + d[1] * d[1]).sqrt().max(1e-9);
                    [d[0] / len, d[1] / len]
                })
                .collect();

            let dir = match neighbor_dirs.len() {
                0 => [1.0, 0.0],
                1 => {
                    // Continue the chain at 120°, alternating sides.
                    let incoming = [-neighbor_dirs[0][0], -neighbor_dirs[0][1]];
                    let angle = if zig { PI / 3.0 } else { -PI / 3.0 };
                    zig = !zig;
                    rotate(incoming, angle)
                }
                _ => widest_gap_bisector(&neighbor_dirs),
            };

            coords[v] = Some([pu[0] + dir[0], pu[1] + dir[1]]);
            progressed = true;
            queue.push_back(v);
        }
    }

    progressed
}

/// Direction bisecting the widest angular gap between unit vectors.
fn widest_gap_bisector(dirs: &[[f64; 2]]) -> [f64; 2] {
    let mut angles: Vec<f64> = dirs.iter().map(|d| d[1].atan2(d[0])).collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut best_gap = 0.0;
    let mut best_mid = 0.0;
    for i in 0..angles.len() {
        let a = angles[i];
        let b = if i + 1 < angles.len() {
            angles[i + 1]
        } else {
            angles[0] + TAU
        };
        let gap = b - a;
        if gap > best_gap {
            best_gap = gap;
            best_mid = a + gap / 2.0;
        }
    }
    [best_mid.cos(), best_mid.sin()]
}

fn rotate(v: [f64; 2], angle: f64) -> [f64; 2] {
    let (s, c) = angle.sin_cos();
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    fn bond_length(coords: &[[f64; 2]], i: usize, j: usize) -> f64 {
        let dx = coords[i][0] - coords[j][0];
        let dy = coords[i][1] - coords[j][1];
        (dx * dx + dy * dy).sqrt()
    }

    fn layout(s: &str) -> (crate::model::molecule::Molecule, Vec<[f64; 2]>) {
        let (mol, _) = smiles::parse(s).unwrap();
        let coords = compute_2d_coords(&mol);
        (mol, coords)
    }

    #[test]
    fn benzene_ring_perception() {
        let (mol, _) = smiles::parse("c1ccccc1").unwrap();
        let rings = perceive_rings(&mol);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn naphthalene_has_two_rings() {
        let (mol, _) = smiles::parse("c1ccc2ccccc2c1").unwrap();
        let rings = perceive_rings(&mol);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.len() == 6));
    }

    #[test]
    fn chain_has_no_rings() {
        let (mol, _) = smiles::parse("CCCCCC").unwrap();
        assert!(perceive_rings(&mol).is_empty());
        let member = ring_membership(&mol);
        assert!(member.iter().all(|&m| !m));
    }

    #[test]
    fn all_bonds_near_unit_length_in_chains() {
        let (mol, coords) = layout("CCCCCC");
        for bond in &mol.bonds {
            let d = bond_length(&coords, bond.i, bond.j);
            assert!((d - 1.0).abs() < 1e-6, "bond {bond:?} length {d}");
        }
    }

    #[test]
    fn benzene_is_a_regular_hexagon() {
        let (mol, coords) = layout("c1ccccc1");
        for bond in &mol.bonds {
            let d = bond_length(&coords, bond.i, bond.j);
            assert!((d - 1.0).abs() < 1e-6, "ring bond length {d}");
        }
        // All atoms equidistant from the ring centroid.
        let cx = coords.iter().map(|c| c[0]).sum::<f64>() / 6.0;
        let cy = coords.iter().map(|c| c[1]).sum::<f64>() / 6.0;
        for c in &coords {
            let r = ((c[0] - cx).powi(2) + (c[1] - cy).powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn atoms_do_not_collapse() {
        let (_, coords) = layout("CC(C)Cc1ccc(cc1)C(C)C(=O)O"); // ibuprofen
        for i in 0..coords.len() {
            for j in i + 1..coords.len() {
                let dx = coords[i][0] - coords[j][0];
                let dy = coords[i][1] - coords[j][1];
                let d = (dx * dx + dy * dy).sqrt();
                assert!(d > 0.2, "atoms {i} and {j} overlap (d = {d})");
            }
        }
    }

    #[test]
    fn fused_rings_share_an_edge_without_overlap() {
        let (mol, coords) = layout("c1ccc2ccccc2c1");
        for bond in &mol.bonds {
            let d = bond_length(&coords, bond.i, bond.j);
            assert!((d - 1.0).abs() < 0.05, "bond length {d}");
        }
    }

    #[test]
    fn fragments_are_separated() {
        let (mol, coords) = layout("[Na+].[Cl-]");
        assert_eq!(mol.atom_count(), 2);
        let dx = coords[0][0] - coords[1][0];
        assert!(dx.abs() >= FRAGMENT_GAP - 1e-9);
    }

    #[test]
    fn empty_molecule() {
        let mol = crate::model::molecule::Molecule::new();
        assert!(compute_2d_coords(&mol).is_empty());
    }
}
