//! A small orthographic ray tracer over sphere and stick impostors.
//!
//! Rays march down -z. Shading is Phong: ambient plus direct diffuse,
//! a specular highlight, and a weak view-aligned fill scaled by the
//! reflect setting. Transparent primitives pass a weighted ray through
//! to whatever lies behind them; depth cueing blends distant geometry
//! toward the background color.

use image::{Rgba, RgbaImage};
use nalgebra::Vector3;

use super::color::Rgb;
use super::scene::Primitive;
use super::RenderConfig;

/// Transparent layers blended per ray before giving up.
const MAX_LAYERS: usize = 4;

/// Key light direction (towards the light, view space).
const LIGHT: [f64; 3] = [-0.35, 0.45, 1.0];

struct Hit {
    z: f64,
    point: Vector3<f64>,
    normal: Vector3<f64>,
    color: Rgb,
    transparency: f64,
}

pub(super) struct Tracer<'a> {
    scene: &'a [Primitive],
    config: &'a RenderConfig,
    background: Rgb,
    light: Vector3<f64>,
    z_near: f64,
    z_far: f64,
}

impl<'a> Tracer<'a> {
    pub(super) fn new(scene: &'a [Primitive], config: &'a RenderConfig, background: Rgb) -> Self {
        let mut z_near = f64::NEG_INFINITY;
        let mut z_far = f64::INFINITY;
        for p in scene {
            let (lo, hi) = primitive_z_range(p);
            z_near = z_near.max(hi);
            z_far = z_far.min(lo);
        }
        if !z_near.is_finite() {
            z_near = 1.0;
            z_far = -1.0;
        }

        Self {
            scene,
            config,
            background,
            light: Vector3::from(LIGHT).normalize(),
            z_near,
            z_far,
        }
    }

    /// Renders the scene into an RGBA image of the configured size,
    /// supersampled by the antialias level. Alpha is zero wherever no
    /// geometry was hit.
    pub(super) fn render(&self) -> RgbaImage {
        let width = self.config.width.max(1);
        let height = self.config.height.max(1);
        let samples = supersample_factor(self.config.antialias);

        let (scale, cx, cy) = self.framing(width, height);

        let mut img = RgbaImage::new(width, height);
        let inv = 1.0 / (samples * samples) as f64;

        for py in 0..height {
            for px in 0..width {
                let mut acc = [0.0_f64; 4];
                for sy in 0..samples {
                    for sx in 0..samples {
                        let fx = px as f64 + (sx as f64 + 0.5) / samples as f64;
                        let fy = py as f64 + (sy as f64 + 0.5) / samples as f64;
                        let wx = (fx - width as f64 / 2.0) * scale + cx;
                        let wy = -(fy - height as f64 / 2.0) * scale + cy;
                        let (rgb, alpha) = self.trace(wx, wy);
                        acc[0] += rgb[0] * alpha;
                        acc[1] += rgb[1] * alpha;
                        acc[2] += rgb[2] * alpha;
                        acc[3] += alpha;
                    }
                }
                let alpha = acc[3] * inv;
                let pixel = if alpha > 0.0 {
                    Rgba([
                        to_u8(acc[0] * inv / alpha),
                        to_u8(acc[1] * inv / alpha),
                        to_u8(acc[2] * inv / alpha),
                        to_u8(alpha),
                    ])
                } else {
                    Rgba([0, 0, 0, 0])
                };
                img.put_pixel(px, py, pixel);
            }
        }

        img
    }

    /// World units per pixel plus the scene center, honoring the zoom
    /// buffer.
    fn framing(&self, width: u32, height: u32) -> (f64, f64, f64) {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for p in self.scene {
            let (lo, hi) = primitive_xy_bounds(p);
            for k in 0..2 {
                min[k] = min[k].min(lo[k]);
                max[k] = max[k].max(hi[k]);
            }
        }
        if !min[0].is_finite() {
            return (1.0, 0.0, 0.0);
        }

        let buffer = self.config.zoom_buffer.max(0.0);
        let extent_x = (max[0] - min[0]) + 2.0 * buffer;
        let extent_y = (max[1] - min[1]) + 2.0 * buffer;
        let scale = (extent_x / width as f64).max(extent_y / height as f64);
        (
            scale.max(1e-9),
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
        )
    }

    /// One orthographic ray, compositing transparent layers front to
    /// back.
    fn trace(&self, x: f64, y: f64) -> (Rgb, f64) {
        let mut rgb = [0.0_f64; 3];
        let mut weight = 1.0;
        let mut ceiling = f64::INFINITY;

        for _ in 0..MAX_LAYERS {
            let Some(hit) = self.nearest_hit(x, y, ceiling) else {
                break;
            };
            let shaded = self.shade(&hit);
            let opacity = 1.0 - hit.transparency;
            for k in 0..3 {
                rgb[k] += shaded[k] * weight * opacity;
            }
            weight *= hit.transparency;
            if weight < 1e-3 {
                weight = 0.0;
                break;
            }
            ceiling = hit.z - 1e-6;
        }

        let alpha = 1.0 - weight;
        if alpha <= 0.0 {
            return ([0.0; 3], 0.0);
        }
        ([rgb[0] / alpha, rgb[1] / alpha, rgb[2] / alpha], alpha)
    }

    /// Topmost intersection strictly below `ceiling`.
    fn nearest_hit(&self, x: f64, y: f64, ceiling: f64) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for p in self.scene {
            if let Some(hit) = intersect(p, x, y, ceiling) {
                if best.as_ref().map(|b| hit.z > b.z).unwrap_or(true) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    fn shade(&self, hit: &Hit) -> Rgb {
        let cfg = self.config;
        let view = Vector3::z();

        let lit = !cfg.ray_shadows || !self.shadowed(hit);
        let diffuse = if lit {
            hit.normal.dot(&self.light).max(0.0)
        } else {
            0.0
        };

        let half = (self.light + view).normalize();
        let spec = if lit {
            hit.normal.dot(&half).max(0.0).powf(cfg.shininess.max(1.0)) * cfg.specular * 0.4
        } else {
            0.0
        };

        let fill = hit.normal.dot(&view).max(0.0) * cfg.reflect * 0.25;
        let intensity = (cfg.ambient + cfg.direct * diffuse + fill).min(1.3);

        let mut rgb = [
            (hit.color[0] * intensity + spec).clamp(0.0, 1.0),
            (hit.color[1] * intensity + spec).clamp(0.0, 1.0),
            (hit.color[2] * intensity + spec).clamp(0.0, 1.0),
        ];

        if cfg.depth_cue && cfg.fog_start < 1.0 {
            let range = (self.z_near - self.z_far).max(1e-9);
            let depth = ((self.z_near - hit.z) / range).clamp(0.0, 1.0);
            let fog = ((depth - cfg.fog_start) / (1.0 - cfg.fog_start)).clamp(0.0, 1.0) * 0.7;
            for k in 0..3 {
                rgb[k] = rgb[k] * (1.0 - fog) + self.background[k] * fog;
            }
        }

        rgb
    }

    /// Anything substantially opaque between the point and the light
    /// casts a shadow.
    fn shadowed(&self, hit: &Hit) -> bool {
        let origin = hit.point + hit.normal * 1e-4;
        self.scene.iter().any(|p| {
            primitive_transparency(p) < 0.5 && occludes(p, origin, self.light)
        })
    }
}

fn supersample_factor(antialias: u8) -> u32 {
    match antialias {
        0 => 1,
        1 | 2 => 2,
        3 => 3,
        _ => 4,
    }
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn primitive_transparency(p: &Primitive) -> f64 {
    match p {
        Primitive::Sphere { transparency, .. } | Primitive::Stick { transparency, .. } => {
            *transparency
        }
    }
}

fn primitive_xy_bounds(p: &Primitive) -> ([f64; 2], [f64; 2]) {
    match p {
        Primitive::Sphere { center, radius, .. } => (
            [center.x - radius, center.y - radius],
            [center.x + radius, center.y + radius],
        ),
        Primitive::Stick { a, b, radius, .. } => (
            [a.x.min(b.x) - radius, a.y.min(b.y) - radius],
            [a.x.max(b.x) + radius, a.y.max(b.y) + radius],
        ),
    }
}

fn primitive_z_range(p: &Primitive) -> (f64, f64) {
    match p {
        Primitive::Sphere { center, radius, .. } => (center.z - radius, center.z + radius),
        Primitive::Stick { a, b, radius, .. } => {
            (a.z.min(b.z) - radius, a.z.max(b.z) + radius)
        }
    }
}

/// Intersection of the vertical ray through (x, y) with a primitive;
/// returns the topmost surface point strictly below `ceiling`.
fn intersect(p: &Primitive, x: f64, y: f64, ceiling: f64) -> Option<Hit> {
    match p {
        Primitive::Sphere {
            center,
            radius,
            color,
            transparency,
        } => {
            let dx = x - center.x;
            let dy = y - center.y;
            let sq = radius * radius - dx * dx - dy * dy;
            if sq <= 0.0 {
                return None;
            }
            let dz = sq.sqrt();
            // Prefer the near (top) surface, fall back to the far one
            // when the near side is above the ceiling.
            for z in [center.z + dz, center.z - dz] {
                if z < ceiling {
                    let point = Vector3::new(x, y, z);
                    return Some(Hit {
                        z,
                        point,
                        normal: (point - center) / *radius,
                        color: *color,
                        transparency: *transparency,
                    });
                }
            }
            None
        }
        Primitive::Stick {
            a,
            b,
            radius,
            color,
            transparency,
        } => {
            let origin = Vector3::new(x, y, ceiling.min(1e6));
            let dir = Vector3::new(0.0, 0.0, -1.0);
            let t = ray_cylinder(origin, dir, *a, *b, *radius)?;
            let point = origin + dir * t;
            if point.z >= ceiling {
                return None;
            }
            let axis = b - a;
            let s = (point - a).dot(&axis) / axis.norm_squared();
            let foot = a + axis * s;
            Some(Hit {
                z: point.z,
                point,
                normal: (point - foot) / *radius,
                color: *color,
                transparency: *transparency,
            })
        }
    }
}

/// Ray / finite open cylinder intersection; returns the smallest
/// positive ray parameter.
fn ray_cylinder(
    origin: Vector3<f64>,
    dir: Vector3<f64>,
    a: Vector3<f64>,
    b: Vector3<f64>,
    radius: f64,
) -> Option<f64> {
    let d = b - a;
    let m = origin - a;
    let dd = d.norm_squared();
    if dd < 1e-12 {
        return None;
    }

    let nd = dir.dot(&d);
    let md = m.dot(&d);
    let nn = dir.norm_squared();
    let mn = m.dot(&dir);

    let a_coef = dd * nn - nd * nd;
    let b_coef = dd * mn - nd * md;
    let c_coef = dd * (m.norm_squared() - radius * radius) - md * md;

    if a_coef.abs() < 1e-12 {
        // Ray parallel to the axis; treat as a miss (sphere joints
        // cover the caps).
        return None;
    }

    let disc = b_coef * b_coef - a_coef * c_coef;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();

    for t in [
        (-b_coef - sqrt_disc) / a_coef,
        (-b_coef + sqrt_disc) / a_coef,
    ] {
        if t <= 0.0 {
            continue;
        }
        let s = (md + t * nd) / dd;
        if (0.0..=1.0).contains(&s) {
            return Some(t);
        }
    }
    None
}

/// Whether the primitive blocks a ray from `origin` towards `dir`.
fn occludes(p: &Primitive, origin: Vector3<f64>, dir: Vector3<f64>) -> bool {
    match p {
        Primitive::Sphere { center, radius, .. } => {
            let m = origin - center;
            let b = m.dot(&dir);
            let c = m.norm_squared() - radius * radius;
            if c > 0.0 && b > 0.0 {
                return false;
            }
            b * b - c > 0.0 && {
                let t = -b + (b * b - c).sqrt();
                t > 1e-6
            }
        }
        Primitive::Stick { a, b, radius, .. } => {
            ray_cylinder(origin, dir, *a, *b, *radius).map(|t| t > 1e-6).unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_at(z: f64, transparency: f64) -> Primitive {
        Primitive::Sphere {
            center: Vector3::new(0.0, 0.0, z),
            radius: 1.0,
            color: [1.0, 0.0, 0.0],
            transparency,
        }
    }

    fn test_config() -> RenderConfig {
        RenderConfig {
            width: 32,
            height: 32,
            antialias: 0,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn center_ray_hits_sphere() {
        let scene = vec![sphere_at(0.0, 0.0)];
        let config = test_config();
        let tracer = Tracer::new(&scene, &config, [1.0; 3]);
        let (_, alpha) = tracer.trace(0.0, 0.0);
        assert!(alpha > 0.99);
        let (_, miss_alpha) = tracer.trace(5.0, 5.0);
        assert_eq!(miss_alpha, 0.0);
    }

    #[test]
    fn nearest_of_two_spheres_wins() {
        let scene = vec![sphere_at(0.0, 0.0), sphere_at(5.0, 0.0)];
        let config = test_config();
        let tracer = Tracer::new(&scene, &config, [1.0; 3]);
        let hit = tracer.nearest_hit(0.0, 0.0, f64::INFINITY).unwrap();
        assert!((hit.z - 6.0).abs() < 1e-9);
    }

    #[test]
    fn transparent_sphere_lets_light_through() {
        let opaque = vec![sphere_at(0.0, 0.0)];
        let translucent = vec![sphere_at(0.0, 0.6)];
        let config = test_config();
        let t1 = Tracer::new(&opaque, &config, [1.0; 3]);
        let t2 = Tracer::new(&translucent, &config, [1.0; 3]);
        let (_, a1) = t1.trace(0.0, 0.0);
        let (_, a2) = t2.trace(0.0, 0.0);
        assert!(a1 > a2, "opaque {a1} vs translucent {a2}");
    }

    #[test]
    fn cylinder_intersection_basics() {
        let a = Vector3::new(-1.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        // Vertical ray above the middle of the stick.
        let t = ray_cylinder(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, -1.0),
            a,
            b,
            0.25,
        )
        .unwrap();
        assert!((t - 9.75).abs() < 1e-9);

        // Beyond the segment end: miss.
        assert!(ray_cylinder(
            Vector3::new(2.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, -1.0),
            a,
            b,
            0.25,
        )
        .is_none());
    }

    #[test]
    fn rendered_image_has_content_and_transparent_border() {
        let scene = vec![sphere_at(0.0, 0.0)];
        let config = test_config();
        let tracer = Tracer::new(&scene, &config, [1.0; 3]);
        let img = tracer.render();
        assert_eq!(img.width(), 32);
        let center = img.get_pixel(16, 16);
        assert!(center[3] > 0);
        let corner = img.get_pixel(0, 0);
        assert_eq!(corner[3], 0);
    }

    #[test]
    fn shadows_darken_occluded_surfaces() {
        // Big sphere below, small sphere between it and the light.
        let blocker_offset = Vector3::from(LIGHT).normalize() * 3.0;
        let scene = vec![
            sphere_at(0.0, 0.0),
            Primitive::Sphere {
                center: Vector3::new(blocker_offset.x, blocker_offset.y, blocker_offset.z),
                radius: 1.2,
                color: [0.0, 1.0, 0.0],
                transparency: 0.0,
            },
        ];
        let mut config = test_config();
        let no_shadow_tracer = Tracer::new(&scene, &config, [1.0; 3]);
        let (bright, _) = no_shadow_tracer.trace(0.0, 0.0);
        config.ray_shadows = true;
        let shadow_tracer = Tracer::new(&scene, &config, [1.0; 3]);
        let (dark, _) = shadow_tracer.trace(0.0, 0.0);
        assert!(
            dark[0] < bright[0],
            "shadowed {dark:?} vs lit {bright:?}"
        );
    }
}
