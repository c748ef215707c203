//! Named rendering presets.
//!
//! Two template kinds exist: color templates restyle the palette
//! (element colors, stick color, background) and settings templates
//! override numeric drawing or rendering parameters. Both come from
//! the predefined registry or from JSON/TOML files, and both layer
//! field-wise onto a [`SketchConfig`] or [`RenderConfig`] after the
//! explicit options have been applied.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{default_element_colors, RenderConfig};
use crate::sketch::SketchConfig;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no predefined template or template file named '{0}'")]
    Unknown(String),

    #[error("failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON template: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML template: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize TOML template: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("template file must end in .json or .toml: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("'{spec}' is a {actual} template, expected a {expected} template")]
    WrongKind {
        spec: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("settings template '{name}' targets {actual} output, not {expected}")]
    DimensionMismatch {
        name: String,
        actual: Dimension,
        expected: Dimension,
    },
}

/// Output mode a settings template applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::TwoD => write!(f, "2D"),
            Dimension::ThreeD => write!(f, "3D"),
        }
    }
}

/// Palette override: element colors, stick color, and background.
/// Color templates are dimension-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Element symbol → color name; entries layer over the default
    /// map so partial palettes stay usable.
    #[serde(default)]
    pub element_colors: HashMap<String, String>,
    /// Uniform stick color; `None` colors each half stick by element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stick_color: Option<String>,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default)]
    pub use_bw_palette: bool,
    #[serde(default)]
    pub transparent_background: bool,
}

fn default_bg_color() -> String {
    "white".to_string()
}

impl ColorTemplate {
    pub fn apply_sketch(&self, config: &mut SketchConfig) {
        config.use_bw_palette = self.use_bw_palette;
        config.transparent_background = self.transparent_background;
    }

    pub fn apply_render(&self, config: &mut RenderConfig) {
        for (symbol, color) in &self.element_colors {
            config
                .element_colors
                .insert(symbol.clone(), color.clone());
        }
        config.stick_color = self.stick_color.clone();
        config.bg_color = self.bg_color.clone();
    }
}

/// Parameter overrides for one output mode. Every field is optional;
/// unset fields leave the target config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_orient: Option<bool>,

    // 2D
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_bw_palette: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent_background: Option<bool>,

    // 3D geometry representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stick_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sphere_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stick_ball_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stick_transparency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sphere_transparency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,

    // 3D quality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ray_shadows: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antialias: Option<u8>,

    // 3D lighting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specular: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shininess: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflect: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_cue: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog_start: Option<f64>,

    // 3D camera and canvas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_buffer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_crop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_margin: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dimension: Dimension,
    #[serde(default)]
    pub settings: Settings,
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl SettingsTemplate {
    fn expect_dimension(&self, expected: Dimension) -> Result<(), TemplateError> {
        if self.dimension == expected {
            Ok(())
        } else {
            Err(TemplateError::DimensionMismatch {
                name: self.name.clone(),
                actual: self.dimension,
                expected,
            })
        }
    }

    /// Layers the 2D fields onto a sketch config. The template must be
    /// a 2D template.
    pub fn apply_sketch(&self, config: &mut SketchConfig) -> Result<(), TemplateError> {
        self.expect_dimension(Dimension::TwoD)?;
        let s = &self.settings;

        if let Some(degrees) = s.angle {
            config.angle = degrees.to_radians();
        }
        set(&mut config.auto_orient, &s.auto_orient);
        set(&mut config.scale, &s.scale);
        set(&mut config.margin, &s.margin);
        set(&mut config.bond_length, &s.bond_length);
        set(&mut config.min_font_size, &s.min_font_size);
        set(&mut config.padding, &s.padding);
        set(&mut config.use_bw_palette, &s.use_bw_palette);
        set(&mut config.transparent_background, &s.transparent_background);
        Ok(())
    }

    /// Layers the 3D fields onto a render config. The template must be
    /// a 3D template.
    pub fn apply_render(&self, config: &mut RenderConfig) -> Result<(), TemplateError> {
        self.expect_dimension(Dimension::ThreeD)?;
        let s = &self.settings;

        set(&mut config.auto_orient, &s.auto_orient);
        set(&mut config.stick_radius, &s.stick_radius);
        set(&mut config.sphere_scale, &s.sphere_scale);
        set(&mut config.stick_ball_ratio, &s.stick_ball_ratio);
        set(&mut config.stick_transparency, &s.stick_transparency);
        set(&mut config.sphere_transparency, &s.sphere_transparency);
        set(&mut config.valence, &s.valence);
        set(&mut config.ray_shadows, &s.ray_shadows);
        set(&mut config.antialias, &s.antialias);
        set(&mut config.ambient, &s.ambient);
        set(&mut config.specular, &s.specular);
        set(&mut config.shininess, &s.shininess);
        set(&mut config.direct, &s.direct);
        set(&mut config.reflect, &s.reflect);
        set(&mut config.depth_cue, &s.depth_cue);
        set(&mut config.fog_start, &s.fog_start);
        set(&mut config.zoom_buffer, &s.zoom_buffer);
        set(&mut config.x_rotation, &s.x_rotation);
        set(&mut config.y_rotation, &s.y_rotation);
        set(&mut config.z_rotation, &s.z_rotation);
        set(&mut config.width, &s.width);
        set(&mut config.height, &s.height);
        set(&mut config.bg_color, &s.bg_color);
        set(&mut config.auto_crop, &s.auto_crop);
        set(&mut config.crop_margin, &s.crop_margin);
        Ok(())
    }
}

/// A template file's content; the `type` field selects the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Template {
    #[serde(rename = "color_style")]
    Color(ColorTemplate),
    #[serde(rename = "settings")]
    Settings(SettingsTemplate),
}

/// Loads a template file, picking the parser by extension.
pub fn load(path: &Path) -> Result<Template, TemplateError> {
    let text = fs::read_to_string(path)?;
    match extension_of(path) {
        Some("json") => Ok(serde_json::from_str(&text)?),
        Some("toml") => Ok(toml::from_str(&text)?),
        _ => Err(TemplateError::UnsupportedExtension(path.to_path_buf())),
    }
}

/// Saves a template for later reuse, picking the format by extension.
pub fn save(template: &Template, path: &Path) -> Result<(), TemplateError> {
    let text = match extension_of(path) {
        Some("json") => serde_json::to_string_pretty(template)?,
        Some("toml") => toml::to_string_pretty(template)?,
        _ => return Err(TemplateError::UnsupportedExtension(path.to_path_buf())),
    };
    fs::write(path, text)?;
    Ok(())
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Resolves a settings template: predefined names win, anything else
/// is treated as a file path.
pub fn resolve_settings(spec: &str) -> Result<SettingsTemplate, TemplateError> {
    if let Some(template) = predefined_settings(spec) {
        return Ok(template);
    }
    if !Path::new(spec).exists() {
        return Err(TemplateError::Unknown(spec.to_string()));
    }
    match load(Path::new(spec))? {
        Template::Settings(t) => Ok(t),
        Template::Color(_) => Err(TemplateError::WrongKind {
            spec: spec.to_string(),
            expected: "settings",
            actual: "color_style",
        }),
    }
}

/// Resolves a color template by the same rules as [`resolve_settings`].
pub fn resolve_color(spec: &str) -> Result<ColorTemplate, TemplateError> {
    if let Some(template) = predefined_color(spec) {
        return Ok(template);
    }
    if !Path::new(spec).exists() {
        return Err(TemplateError::Unknown(spec.to_string()));
    }
    match load(Path::new(spec))? {
        Template::Color(t) => Ok(t),
        Template::Settings(_) => Err(TemplateError::WrongKind {
            spec: spec.to_string(),
            expected: "color_style",
            actual: "settings",
        }),
    }
}

pub const COLOR_TEMPLATE_NAMES: [&str; 3] = ["cpk_standard", "minimal_bw", "dark_mode"];

pub const SETTINGS_TEMPLATE_NAMES: [&str; 6] = [
    "publication_2d",
    "web_optimized_2d",
    "high_quality_3d",
    "web_preview_3d",
    "dramatic_3d",
    "minimal_clean_3d",
];

pub fn predefined_color(name: &str) -> Option<ColorTemplate> {
    let template = match name {
        "cpk_standard" => ColorTemplate {
            name: "CPK Standard".to_string(),
            description: "Standard CPK coloring scheme for publication-quality renders"
                .to_string(),
            element_colors: default_element_colors(),
            stick_color: Some("gray40".to_string()),
            bg_color: "white".to_string(),
            use_bw_palette: false,
            transparent_background: false,
        },
        "minimal_bw" => ColorTemplate {
            name: "Minimal Black & White".to_string(),
            description: "Publication-ready black and white style for high contrast".to_string(),
            element_colors: HashMap::new(),
            stick_color: None,
            bg_color: "white".to_string(),
            use_bw_palette: true,
            transparent_background: true,
        },
        "dark_mode" => ColorTemplate {
            name: "Dark Mode".to_string(),
            description: "Dark background with bright colors for screen display".to_string(),
            element_colors: color_map(&[
                ("C", "gray70"),
                ("H", "white"),
                ("N", "cyan"),
                ("O", "red"),
                ("S", "yellow"),
                ("P", "orange"),
                ("F", "palegreen"),
                ("Cl", "green"),
                ("Br", "firebrick"),
                ("I", "purple"),
            ]),
            stick_color: Some("gray60".to_string()),
            bg_color: "black".to_string(),
            use_bw_palette: false,
            transparent_background: false,
        },
        _ => return None,
    };
    Some(template)
}

pub fn predefined_settings(name: &str) -> Option<SettingsTemplate> {
    let template = match name {
        "publication_2d" => SettingsTemplate {
            name: "Publication 2D".to_string(),
            description: "High-quality 2D rendering for academic publications".to_string(),
            dimension: Dimension::TwoD,
            settings: Settings {
                scale: Some(40.0),
                bond_length: Some(50.0),
                min_font_size: Some(40),
                padding: Some(0.05),
                margin: Some(0.8),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        "web_optimized_2d" => SettingsTemplate {
            name: "Web Optimized 2D".to_string(),
            description: "Optimized for web display with smaller file size".to_string(),
            dimension: Dimension::TwoD,
            settings: Settings {
                scale: Some(25.0),
                bond_length: Some(35.0),
                min_font_size: Some(28),
                padding: Some(0.03),
                margin: Some(0.5),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        "high_quality_3d" => SettingsTemplate {
            name: "High Quality 3D".to_string(),
            description: "Publication-quality 3D rendering with ray tracing".to_string(),
            dimension: Dimension::ThreeD,
            settings: Settings {
                stick_radius: Some(0.18),
                sphere_scale: Some(0.28),
                stick_ball_ratio: Some(1.8),
                antialias: Some(4),
                ambient: Some(0.25),
                specular: Some(1.0),
                direct: Some(0.5),
                reflect: Some(0.5),
                shininess: Some(30.0),
                ray_shadows: Some(true),
                depth_cue: Some(false),
                width: Some(2000),
                height: Some(1500),
                bg_color: Some("white".to_string()),
                auto_crop: Some(true),
                crop_margin: Some(10),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        "web_preview_3d" => SettingsTemplate {
            name: "Web Preview 3D".to_string(),
            description: "Fast rendering for quick web previews".to_string(),
            dimension: Dimension::ThreeD,
            settings: Settings {
                stick_radius: Some(0.2),
                sphere_scale: Some(0.3),
                stick_ball_ratio: Some(1.8),
                antialias: Some(2),
                ambient: Some(0.3),
                specular: Some(1.0),
                direct: Some(0.45),
                reflect: Some(0.45),
                shininess: Some(30.0),
                ray_shadows: Some(false),
                depth_cue: Some(false),
                width: Some(1320),
                height: Some(990),
                bg_color: Some("white".to_string()),
                auto_crop: Some(true),
                crop_margin: Some(10),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        "dramatic_3d" => SettingsTemplate {
            name: "Dramatic Lighting 3D".to_string(),
            description: "High contrast lighting for dramatic effect".to_string(),
            dimension: Dimension::ThreeD,
            settings: Settings {
                stick_radius: Some(0.2),
                sphere_scale: Some(0.3),
                stick_ball_ratio: Some(1.8),
                antialias: Some(3),
                ambient: Some(0.1),
                specular: Some(1.5),
                direct: Some(0.7),
                reflect: Some(0.3),
                shininess: Some(50.0),
                ray_shadows: Some(true),
                depth_cue: Some(true),
                width: Some(1320),
                height: Some(990),
                bg_color: Some("black".to_string()),
                auto_crop: Some(true),
                crop_margin: Some(10),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        "minimal_clean_3d" => SettingsTemplate {
            name: "Minimal Clean 3D".to_string(),
            description: "Clean, minimalist style with thin representations".to_string(),
            dimension: Dimension::ThreeD,
            settings: Settings {
                stick_radius: Some(0.15),
                sphere_scale: Some(0.20),
                stick_ball_ratio: Some(1.5),
                antialias: Some(2),
                ambient: Some(0.4),
                specular: Some(0.5),
                direct: Some(0.4),
                reflect: Some(0.3),
                shininess: Some(20.0),
                ray_shadows: Some(false),
                depth_cue: Some(false),
                width: Some(1320),
                height: Some(990),
                bg_color: Some("white".to_string()),
                auto_crop: Some(true),
                crop_margin: Some(10),
                auto_orient: Some(true),
                ..Settings::default()
            },
        },
        _ => return None,
    };
    Some(template)
}

fn color_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_predefined_name_resolves() {
        for name in COLOR_TEMPLATE_NAMES {
            assert!(predefined_color(name).is_some(), "missing {name}");
        }
        for name in SETTINGS_TEMPLATE_NAMES {
            assert!(predefined_settings(name).is_some(), "missing {name}");
        }
        assert!(predefined_color("publication_2d").is_none());
        assert!(predefined_settings("cpk_standard").is_none());
    }

    #[test]
    fn settings_template_layers_over_defaults() {
        let template = predefined_settings("publication_2d").unwrap();
        let mut config = SketchConfig::default();
        template.apply_sketch(&mut config).unwrap();

        assert_eq!(config.scale, 40.0);
        assert_eq!(config.bond_length, 50.0);
        assert_eq!(config.min_font_size, 40);
        assert!(config.auto_orient);
        // Untouched fields keep their defaults.
        assert!(config.use_bw_palette);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let template = predefined_settings("high_quality_3d").unwrap();
        let mut sketch = SketchConfig::default();
        let err = template.apply_sketch(&mut sketch).unwrap_err();
        assert!(matches!(err, TemplateError::DimensionMismatch { .. }));

        let template = predefined_settings("publication_2d").unwrap();
        let mut render = RenderConfig::default();
        assert!(template.apply_render(&mut render).is_err());
    }

    #[test]
    fn color_template_restyles_render_config() {
        let template = predefined_color("dark_mode").unwrap();
        let mut config = RenderConfig::default();
        template.apply_render(&mut config);

        assert_eq!(config.bg_color, "black");
        assert_eq!(config.stick_color.as_deref(), Some("gray60"));
        assert_eq!(config.element_colors.get("C").unwrap(), "gray70");
        // Elements the template does not name keep the default map.
        assert_eq!(config.element_colors.get("Fe").unwrap(), "darkorange");
    }

    #[test]
    fn minimal_bw_clears_the_stick_color() {
        let template = predefined_color("minimal_bw").unwrap();
        let mut config = RenderConfig::default();
        template.apply_render(&mut config);
        assert!(config.stick_color.is_none());

        let mut sketch = SketchConfig {
            use_bw_palette: false,
            transparent_background: false,
            ..SketchConfig::default()
        };
        template.apply_sketch(&mut sketch);
        assert!(sketch.use_bw_palette);
        assert!(sketch.transparent_background);
    }

    #[test]
    fn json_roundtrip_preserves_template() {
        let original = Template::Settings(predefined_settings("dramatic_3d").unwrap());
        let json = serde_json::to_string_pretty(&original).unwrap();
        assert!(json.contains("\"type\": \"settings\""));
        let parsed: Template = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn toml_template_parses() {
        let toml_text = r#"
type = "settings"
name = "thin sticks"
dimension = "3D"

[settings]
stick_radius = 0.12
ray_shadows = true
"#;
        let parsed: Template = toml::from_str(toml_text).unwrap();
        let Template::Settings(template) = parsed else {
            panic!("expected a settings template");
        };
        assert_eq!(template.dimension, Dimension::ThreeD);
        assert_eq!(template.settings.stick_radius, Some(0.12));
        assert_eq!(template.settings.ray_shadows, Some(true));
        assert_eq!(template.settings.width, None);
    }

    #[test]
    fn file_roundtrip_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let original = Template::Color(predefined_color("dark_mode").unwrap());

        for file_name in ["style.json", "style.toml"] {
            let path = dir.path().join(file_name);
            save(&original, &path).unwrap();
            let loaded = load(&path).unwrap();
            assert_eq!(loaded, original, "roundtrip via {file_name}");
        }

        let bad = dir.path().join("style.yaml");
        std::fs::write(&bad, "type: settings").unwrap();
        assert!(matches!(
            load(&bad),
            Err(TemplateError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn resolve_prefers_predefined_then_files() {
        let settings = resolve_settings("web_preview_3d").unwrap();
        assert_eq!(settings.dimension, Dimension::ThreeD);

        let err = resolve_settings("no_such_template").unwrap_err();
        assert!(matches!(err, TemplateError::Unknown(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        save(
            &Template::Color(predefined_color("cpk_standard").unwrap()),
            &path,
        )
        .unwrap();
        let spec = path.to_string_lossy().into_owned();
        assert!(resolve_color(&spec).is_ok());
        assert!(matches!(
            resolve_settings(&spec),
            Err(TemplateError::WrongKind { .. })
        ));
    }
}
