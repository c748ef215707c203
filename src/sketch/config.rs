/// Options for 2D diagram generation.
#[derive(Debug, Clone)]
pub struct SketchConfig {
    /// Rotation applied to the layout, radians. Ignored when
    /// `auto_orient` is set.
    pub angle: f64,
    /// Rotate so the molecule's long axis lies horizontal.
    pub auto_orient: bool,
    /// Pixels per layout unit.
    pub scale: f64,
    /// Canvas margin in layout units.
    pub margin: f64,
    /// Upper bound on the drawn bond length in pixels; layout bonds
    /// are one unit long, so the effective pixels-per-unit is the
    /// smaller of `scale` and `bond_length`.
    pub bond_length: f64,
    /// Minimum font size for atom labels, pixels.
    pub min_font_size: u32,
    /// Extra padding around the drawing as a fraction of the canvas.
    pub padding: f64,
    /// Draw everything in black instead of CPK label colors.
    pub use_bw_palette: bool,
    pub transparent_background: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            angle: std::f64::consts::PI,
            auto_orient: false,
            scale: 30.0,
            margin: 0.5,
            bond_length: 35.0,
            min_font_size: 36,
            padding: 0.01,
            use_bw_palette: true,
            transparent_background: true,
        }
    }
}

impl SketchConfig {
    pub(crate) fn pixels_per_unit(&self) -> f64 {
        self.scale.min(self.bond_length).max(1.0)
    }

    pub(crate) fn font_size(&self) -> f64 {
        (self.min_font_size as f64).min(self.pixels_per_unit() * 1.2)
    }
}
