//! Viewing-orientation heuristics.
//!
//! Principal-component analysis of the atomic coordinates picks a
//! rotation that presents the molecule's long axis to the viewer: in
//! 2D the dominant axis is laid horizontal, in 3D it is aligned with
//! the screen x axis and tilted slightly for depth perception. The
//! eigenvalue spread also drives the zoom buffer: elongated molecules
//! need less framing slack than compact ones.

use nalgebra::{Matrix2, Matrix3, SymmetricEigen, Vector3};

/// Extra tilt applied after axis alignment so flat molecules are not
/// viewed exactly edge-on (degrees).
const DEPTH_TILT_Y: f64 = 20.0;
const DEPTH_TILT_X: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct PrincipalAxes {
    /// Variances along the axes, descending.
    pub eigenvalues: [f64; 3],
    /// Unit axes matching `eigenvalues`.
    pub axes: [Vector3<f64>; 3],
}

/// PCA over 3D coordinates: covariance of the centered positions,
/// eigen-decomposed and sorted by descending variance.
pub fn principal_axes(coords: &[[f64; 3]]) -> PrincipalAxes {
    let fallback = PrincipalAxes {
        eigenvalues: [0.0; 3],
        axes: [Vector3::x(), Vector3::y(), Vector3::z()],
    };
    if coords.len() < 2 {
        return fallback;
    }

    let n = coords.len() as f64;
    let mut mean = [0.0_f64; 3];
    for c in coords {
        for k in 0..3 {
            mean[k] += c[k];
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut cov = Matrix3::zeros();
    for c in coords {
        let d = Vector3::new(c[0] - mean[0], c[1] - mean[1], c[2] - mean[2]);
        cov += d * d.transpose();
    }
    cov /= n - 1.0;

    let eigen = SymmetricEigen::new(cov);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let axis = |i: usize| eigen.eigenvectors.column(order[i]).into_owned();
    PrincipalAxes {
        eigenvalues: [
            eigen.eigenvalues[order[0]].max(0.0),
            eigen.eigenvalues[order[1]].max(0.0),
            eigen.eigenvalues[order[2]].max(0.0),
        ],
        axes: [axis(0), axis(1), axis(2)],
    }
}

/// Rotation (radians, in [0, 2π)) that lays the dominant 2D axis
/// horizontal.
pub fn optimal_2d_rotation(coords: &[[f64; 2]]) -> f64 {
    if coords.len() < 2 {
        return 0.0;
    }

    let n = coords.len() as f64;
    let (mx, my) = coords
        .iter()
        .fold((0.0, 0.0), |(x, y), c| (x + c[0], y + c[1]));
    let (mx, my) = (mx / n, my / n);

    let mut cov = Matrix2::zeros();
    for c in coords {
        let dx = c[0] - mx;
        let dy = c[1] - my;
        cov[(0, 0)] += dx * dx;
        cov[(0, 1)] += dx * dy;
        cov[(1, 0)] += dx * dy;
        cov[(1, 1)] += dy * dy;
    }
    cov /= n - 1.0;

    let eigen = SymmetricEigen::new(cov);
    let dominant = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        eigen.eigenvectors.column(0)
    } else {
        eigen.eigenvectors.column(1)
    };

    let angle = dominant[1].atan2(dominant[0]);
    (-angle).rem_euclid(std::f64::consts::TAU)
}

/// Euler angles (x, y, z in degrees) aligning the dominant axis with
/// the screen x axis, plus fixed depth tilts.
pub fn optimal_3d_orientation(coords: &[[f64; 3]]) -> (f64, f64, f64) {
    let pca = principal_axes(coords);
    let v1 = pca.axes[0];

    let y_rot = (-v1.z).atan2((v1.x * v1.x + v1.y * v1.y).sqrt());
    let z_rot = v1.y.atan2(v1.x);

    (
        DEPTH_TILT_X,
        y_rot.to_degrees() + DEPTH_TILT_Y,
        z_rot.to_degrees(),
    )
}

/// Elongation of the molecule: sqrt of the ratio of the two leading
/// variances. 1.0 for anything degenerate.
pub fn aspect_ratio(coords: &[[f64; 3]]) -> f64 {
    let pca = principal_axes(coords);
    if pca.eigenvalues[1] > 0.0 {
        (pca.eigenvalues[0] / pca.eigenvalues[1]).sqrt()
    } else {
        1.0
    }
}

/// Framing slack around the model, in Å. Linear molecules fill their
/// bounding box; compact ones need more breathing room.
pub fn optimal_zoom_buffer(coords: &[[f64; 3]]) -> f64 {
    let ratio = aspect_ratio(coords);
    if ratio > 5.0 {
        1.5
    } else if ratio > 3.0 {
        2.0
    } else {
        2.5
    }
}
