//! CLI flag → library config mapping.
//!
//! Explicit flags fill the config first, then a settings template and
//! finally a color template layer their fields on top, so a template
//! always wins over a flag it names.

use anyhow::{Context, Result};

use mol_depict::conformer::ConformerConfig;
use mol_depict::render::RenderConfig;
use mol_depict::sketch::SketchConfig;
use mol_depict::templates;

use crate::cli::{
    CanvasOptions, ConformerOptions, EffectsOptions, LightingOptions, OrientationOptions,
    RenderArgs, RenderingOptions, ThreeDArgs, TwoDArgs,
};

pub fn build_sketch_config(args: &TwoDArgs) -> Result<SketchConfig> {
    let d = &args.display;
    let mut config = SketchConfig {
        angle: d.angle.to_radians(),
        auto_orient: d.auto_orient,
        scale: d.scale,
        margin: d.margin,
        bond_length: d.bond_length,
        min_font_size: d.min_font_size,
        padding: d.padding,
        use_bw_palette: d.use_bw,
        transparent_background: d.transparent_bg,
    };

    if let Some(spec) = &args.compound.template {
        let template = load_settings(spec)?;
        template.apply_sketch(&mut config)?;
    }
    if let Some(spec) = &args.compound.color_template {
        let template = load_color(spec)?;
        template.apply_sketch(&mut config);
    }
    Ok(config)
}

/// The render-relevant flag groups, shared by `3d` and `render`.
pub struct RenderFlags<'a> {
    pub orientation: &'a OrientationOptions,
    pub rendering: &'a RenderingOptions,
    pub lighting: &'a LightingOptions,
    pub effects: &'a EffectsOptions,
    pub canvas: &'a CanvasOptions,
    pub template: Option<&'a str>,
    pub color_template: Option<&'a str>,
}

impl<'a> From<&'a ThreeDArgs> for RenderFlags<'a> {
    fn from(args: &'a ThreeDArgs) -> Self {
        Self {
            orientation: &args.orientation,
            rendering: &args.rendering,
            lighting: &args.lighting,
            effects: &args.effects,
            canvas: &args.canvas,
            template: args.compound.template.as_deref(),
            color_template: args.compound.color_template.as_deref(),
        }
    }
}

impl<'a> From<&'a RenderArgs> for RenderFlags<'a> {
    fn from(args: &'a RenderArgs) -> Self {
        Self {
            orientation: &args.orientation,
            rendering: &args.rendering,
            lighting: &args.lighting,
            effects: &args.effects,
            canvas: &args.canvas,
            template: args.template.as_deref(),
            color_template: args.color_template.as_deref(),
        }
    }
}

pub fn build_render_config(flags: RenderFlags<'_>) -> Result<RenderConfig> {
    let mut config = RenderConfig {
        auto_orient: flags.orientation.auto_orient,
        x_rotation: flags.orientation.x_rotation,
        y_rotation: flags.orientation.y_rotation,
        z_rotation: flags.orientation.z_rotation,

        stick_radius: flags.rendering.stick_radius,
        sphere_scale: flags.rendering.sphere_scale,
        stick_ball_ratio: flags.rendering.stick_ball_ratio,
        ray_shadows: flags.rendering.ray_shadows,
        antialias: flags.rendering.antialias,

        ambient: flags.lighting.ambient,
        specular: flags.lighting.specular,
        direct: flags.lighting.direct,
        reflect: flags.lighting.reflect,
        shininess: flags.lighting.shininess,

        stick_transparency: flags.effects.stick_transparency,
        sphere_transparency: flags.effects.sphere_transparency,
        valence: flags.effects.valence,
        depth_cue: flags.effects.depth_cue,

        width: flags.canvas.width,
        height: flags.canvas.height,
        bg_color: flags.canvas.bg_color.name().to_string(),
        auto_crop: !flags.canvas.no_crop,
        crop_margin: flags.canvas.crop_margin,

        ..RenderConfig::default()
    };

    if let Some(spec) = flags.template {
        let template = load_settings(spec)?;
        template.apply_render(&mut config)?;
    }
    if let Some(spec) = flags.color_template {
        let template = load_color(spec)?;
        template.apply_render(&mut config);
    }
    Ok(config)
}

pub fn build_conformer_config(opts: &ConformerOptions) -> ConformerConfig {
    ConformerConfig {
        seed: opts.seed,
        max_iterations: opts.max_iterations,
        num_conformers: opts.conformers,
        force_field: opts.force_field.into(),
        ..ConformerConfig::default()
    }
}

fn load_settings(spec: &str) -> Result<mol_depict::templates::SettingsTemplate> {
    templates::resolve_settings(spec)
        .with_context(|| format!("Failed to load settings template '{spec}'"))
}

fn load_color(spec: &str) -> Result<mol_depict::templates::ColorTemplate> {
    templates::resolve_color(spec)
        .with_context(|| format!("Failed to load color template '{spec}'"))
}
