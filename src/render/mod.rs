//! Ray-traced 3D rendering of ball-and-stick models.

mod color;
mod raytrace;
mod scene;

pub use color::{default_element_colors, named_color};
pub use scene::Primitive;

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

use crate::model::molecule::Molecule;
use crate::orient;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render an empty molecule")]
    EmptyMolecule,

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// All knobs of the 3D renderer. Defaults give an opaque-geometry,
/// transparent-background render framed for a web preview.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Orient by PCA instead of the explicit rotations.
    pub auto_orient: bool,
    pub width: u32,
    pub height: u32,
    pub auto_crop: bool,
    /// Pixels kept around the geometry when cropping.
    pub crop_margin: u32,

    pub stick_radius: f64,
    /// Atom spheres are at least `stick_radius * stick_ball_ratio`.
    pub stick_ball_ratio: f64,
    /// Sphere radius as a fraction of the van der Waals radius.
    pub sphere_scale: f64,
    pub stick_transparency: f64,
    pub sphere_transparency: f64,
    /// When positive, double and triple bonds render as parallel
    /// strands.
    pub valence: f64,

    pub ray_shadows: bool,
    /// Antialias level 0-4 (supersampling).
    pub antialias: u8,

    pub ambient: f64,
    pub specular: f64,
    pub shininess: f64,
    pub direct: f64,
    pub reflect: f64,
    /// Blend distant geometry toward the background color.
    pub depth_cue: bool,
    /// Depth fraction where the fog ramp begins; 1.0 disables fog even
    /// with depth cueing on.
    pub fog_start: f64,

    /// Framing slack in Å; replaced by a shape-derived value under
    /// auto-orientation.
    pub zoom_buffer: f64,
    pub x_rotation: f64,
    pub y_rotation: f64,
    pub z_rotation: f64,

    /// Background color name, used for fog and report text; the PNG
    /// itself keeps a transparent background.
    pub bg_color: String,
    /// Element symbol → color name.
    pub element_colors: HashMap<String, String>,
    /// Uniform stick color; `None` colors each half stick by element.
    pub stick_color: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            auto_orient: true,
            width: 1320,
            height: 990,
            auto_crop: true,
            crop_margin: 10,
            stick_radius: 0.2,
            stick_ball_ratio: 1.8,
            sphere_scale: 0.3,
            stick_transparency: 0.0,
            sphere_transparency: 0.0,
            valence: 0.0,
            ray_shadows: false,
            antialias: 2,
            ambient: 0.25,
            specular: 1.0,
            shininess: 30.0,
            direct: 0.5,
            reflect: 0.5,
            depth_cue: false,
            fog_start: 0.4,
            zoom_buffer: 2.0,
            x_rotation: 0.0,
            y_rotation: 200.0,
            z_rotation: 0.0,
            bg_color: "white".to_string(),
            element_colors: default_element_colors(),
            stick_color: Some("gray40".to_string()),
        }
    }
}

/// What a render actually did, for reporting.
#[derive(Debug, Clone, Copy)]
pub struct RenderSummary {
    pub width: u32,
    pub height: u32,
    pub cropped: bool,
    /// Rotations applied (degrees).
    pub orientation: (f64, f64, f64),
    pub zoom_buffer: f64,
}

/// Renders the molecule to an RGBA image in memory.
pub fn render_image(
    mol: &Molecule,
    config: &RenderConfig,
) -> Result<(RgbaImage, RenderSummary), RenderError> {
    if mol.atom_count() == 0 {
        return Err(RenderError::EmptyMolecule);
    }

    let coords: Vec<[f64; 3]> = mol.atoms.iter().map(|a| a.position).collect();
    let (orientation, zoom_buffer) = if config.auto_orient {
        (
            orient::optimal_3d_orientation(&coords),
            orient::optimal_zoom_buffer(&coords),
        )
    } else {
        (
            (config.x_rotation, config.y_rotation, config.z_rotation),
            config.zoom_buffer,
        )
    };

    let rotation = scene::rotation_matrix(orientation.0, orientation.1, orientation.2);
    let positions = scene::view_positions(mol, &rotation);
    let primitives = scene::build_scene(mol, &positions, config);

    let framed = RenderConfig {
        zoom_buffer,
        ..config.clone()
    };
    let background = named_color(&config.bg_color);
    let mut img = raytrace::Tracer::new(&primitives, &framed, background).render();

    let mut cropped = false;
    if config.auto_crop {
        if let Some(trimmed) = autocrop(&img, config.crop_margin) {
            img = trimmed;
            cropped = true;
        }
    }

    let summary = RenderSummary {
        width: img.width(),
        height: img.height(),
        cropped,
        orientation,
        zoom_buffer,
    };
    Ok((img, summary))
}

/// Renders straight to a PNG file.
pub fn render_png(
    mol: &Molecule,
    config: &RenderConfig,
    path: &Path,
) -> Result<RenderSummary, RenderError> {
    let (img, summary) = render_image(mol, config)?;
    img.save(path)?;
    Ok(summary)
}

/// Crops to the bounding box of non-transparent pixels plus a margin.
/// Returns `None` when the image is fully transparent or already
/// tight.
fn autocrop(img: &RgbaImage, margin: u32) -> Option<RgbaImage> {
    let (w, h) = img.dimensions();
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] > 0 {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if !any {
        return None;
    }

    let min_x = min_x.saturating_sub(margin);
    let min_y = min_y.saturating_sub(margin);
    let max_x = (max_x + margin).min(w - 1);
    let max_y = (max_y + margin).min(h - 1);
    if min_x == 0 && min_y == 0 && max_x == w - 1 && max_y == h - 1 {
        return None;
    }

    let out_w = max_x - min_x + 1;
    let out_h = max_y - min_y + 1;
    let mut out = RgbaImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            out.put_pixel(x, y, *img.get_pixel(min_x + x, min_y + y));
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformer::{self, ConformerConfig};
    use crate::smiles;
    use image::Rgba;

    fn small_render_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 48,
            antialias: 0,
            auto_crop: false,
            ..RenderConfig::default()
        }
    }

    fn prepared(s: &str) -> Molecule {
        let mut mol = smiles::parse_with_hydrogens(s).unwrap();
        conformer::generate(&mut mol, &ConformerConfig::default(), true).unwrap();
        mol
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let mol = Molecule::new();
        assert!(matches!(
            render_image(&mol, &RenderConfig::default()),
            Err(RenderError::EmptyMolecule)
        ));
    }

    #[test]
    fn render_produces_visible_pixels() {
        let mol = prepared("CCO");
        let (img, summary) = render_image(&mol, &small_render_config()).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
        assert!(!summary.cropped);
        assert!(img.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn auto_crop_shrinks_canvas() {
        let mol = prepared("C");
        let config = RenderConfig {
            auto_crop: true,
            crop_margin: 2,
            width: 128,
            height: 128,
            antialias: 0,
            ..RenderConfig::default()
        };
        let (img, summary) = render_image(&mol, &config).unwrap();
        assert!(summary.cropped);
        assert!(img.width() < 128 || img.height() < 128);
    }

    #[test]
    fn auto_orient_reports_pca_angles() {
        let mol = prepared("CCCCCCCC");
        let config = RenderConfig {
            auto_orient: true,
            ..small_render_config()
        };
        let (_, summary) = render_image(&mol, &config).unwrap();
        // The fixed depth tilt always contributes.
        assert!((summary.orientation.0 - 10.0).abs() < 1e-9);

        let manual = RenderConfig {
            auto_orient: false,
            x_rotation: 15.0,
            y_rotation: 30.0,
            z_rotation: 45.0,
            ..small_render_config()
        };
        let (_, summary) = render_image(&mol, &manual).unwrap();
        assert_eq!(summary.orientation, (15.0, 30.0, 45.0));
        assert_eq!(summary.zoom_buffer, 2.0);
    }

    #[test]
    fn autocrop_helper_behaviour() {
        let mut img = RgbaImage::new(20, 20);
        assert!(autocrop(&img, 2).is_none());

        img.put_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let out = autocrop(&img, 2).unwrap();
        assert_eq!((out.width(), out.height()), (5, 5));
        assert_eq!(out.get_pixel(2, 2)[3], 255);
    }
}
