use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use mol_depict::conformer::ForceField;

#[derive(Parser)]
#[command(
    name = "mdepict",
    about = "Generate 2D diagrams and ray-traced 3D renders of small molecules",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a 2D vector diagram (SVG)
    #[command(name = "2d")]
    TwoD(TwoDArgs),

    /// Generate a 3D structure (SDF) with an optional ray-traced PNG
    #[command(name = "3d")]
    ThreeD(ThreeDArgs),

    /// Ray-trace an existing SDF structure file to PNG
    Render(RenderArgs),

    /// List the predefined color and settings templates
    Templates,

    /// Batch-generate diagrams for a set of well-known compounds
    Gallery(GalleryArgs),
}

impl Command {
    /// Whether the user asked for script-friendly silence.
    pub fn quiet(&self) -> bool {
        match self {
            Command::TwoD(args) => args.compound.quiet,
            Command::ThreeD(args) => args.compound.quiet,
            Command::Render(args) => args.quiet,
            Command::Templates => false,
            Command::Gallery(args) => args.quiet,
        }
    }
}

/// Compound selection and template options shared by 2d and 3d.
#[derive(Args)]
pub struct CompoundOptions {
    /// PubChem CID, compound name, or SMILES string
    #[arg(short, long, value_name = "ID")]
    pub compound: String,

    /// Settings template (predefined name or JSON/TOML file)
    #[arg(long, value_name = "NAME|FILE")]
    pub template: Option<String>,

    /// Color template (predefined name or JSON/TOML file)
    #[arg(long = "color-template", value_name = "NAME|FILE")]
    pub color_template: Option<String>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct TwoDArgs {
    #[command(flatten)]
    pub compound: CompoundOptions,

    /// Output SVG file
    #[arg(short, long, value_name = "FILE", default_value = "molecule_2d.svg")]
    pub output: PathBuf,

    #[command(flatten)]
    pub display: SketchOptions,
}

/// 2D drawing options.
#[derive(Args)]
#[command(next_help_heading = "2D Display")]
pub struct SketchOptions {
    /// Rotation angle in degrees
    #[arg(
        long,
        value_name = "DEG",
        default_value = "180.0",
        allow_hyphen_values = true
    )]
    pub angle: f64,

    /// Pick the rotation by principal-component analysis instead
    #[arg(long)]
    pub auto_orient: bool,

    /// Pixels per coordinate unit
    #[arg(long, value_name = "PX", default_value = "30.0")]
    pub scale: f64,

    /// Canvas margin in coordinate units
    #[arg(long, value_name = "UNITS", default_value = "0.5")]
    pub margin: f64,

    /// Upper bound on the drawn bond length in pixels
    #[arg(long = "bond-length", value_name = "PX", default_value = "35.0")]
    pub bond_length: f64,

    /// Minimum font size for atom labels
    #[arg(long = "min-font-size", value_name = "PX", default_value = "36")]
    pub min_font_size: u32,

    /// Extra padding around the drawing as a canvas fraction
    #[arg(long, value_name = "FRAC", default_value = "0.01")]
    pub padding: f64,

    /// Draw labels in black instead of CPK colors
    #[arg(long = "use-bw")]
    pub use_bw: bool,

    /// Omit the opaque background rectangle
    #[arg(long = "transparent-bg")]
    pub transparent_bg: bool,
}

#[derive(Args)]
pub struct ThreeDArgs {
    #[command(flatten)]
    pub compound: CompoundOptions,

    /// Base name for output files (default: derived from the compound name)
    #[arg(long = "output-base", value_name = "BASE")]
    pub output_base: Option<PathBuf>,

    /// Also ray-trace the structure to <BASE>.png
    #[arg(long)]
    pub render: bool,

    #[command(flatten)]
    pub conformer: ConformerOptions,

    #[command(flatten)]
    pub orientation: OrientationOptions,

    #[command(flatten)]
    pub rendering: RenderingOptions,

    #[command(flatten)]
    pub lighting: LightingOptions,

    #[command(flatten)]
    pub effects: EffectsOptions,

    #[command(flatten)]
    pub canvas: CanvasOptions,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Input SDF structure file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output PNG file (default: input with a .png extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Settings template (predefined name or JSON/TOML file)
    #[arg(long, value_name = "NAME|FILE")]
    pub template: Option<String>,

    /// Color template (predefined name or JSON/TOML file)
    #[arg(long = "color-template", value_name = "NAME|FILE")]
    pub color_template: Option<String>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub orientation: OrientationOptions,

    #[command(flatten)]
    pub rendering: RenderingOptions,

    #[command(flatten)]
    pub lighting: LightingOptions,

    #[command(flatten)]
    pub effects: EffectsOptions,

    #[command(flatten)]
    pub canvas: CanvasOptions,
}

#[derive(Args)]
pub struct GalleryArgs {
    /// Directory for the generated files
    #[arg(short, long = "output-dir", value_name = "DIR", default_value = "gallery")]
    pub output_dir: PathBuf,

    /// Also ray-trace a PNG for every compound (slower)
    #[arg(long)]
    pub render: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Conformer embedding and optimization options.
#[derive(Args)]
#[command(next_help_heading = "Conformer Generation")]
pub struct ConformerOptions {
    /// Skip force-field geometry optimization
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Force field for geometry optimization
    #[arg(long = "force-field", value_name = "FF", default_value = "mmff94")]
    pub force_field: ForceFieldChoice,

    /// Maximum minimization iterations
    #[arg(long = "max-iterations", value_name = "N", default_value = "200")]
    pub max_iterations: usize,

    /// Random seed for conformer embedding
    #[arg(long, value_name = "SEED", default_value = "1")]
    pub seed: u64,

    /// Number of trial conformers; the lowest-energy survivor is kept
    #[arg(long, value_name = "N", default_value = "1")]
    pub conformers: usize,
}

/// Viewing orientation options.
#[derive(Args)]
#[command(next_help_heading = "Orientation")]
pub struct OrientationOptions {
    /// Orient the view by principal-component analysis
    #[arg(long)]
    pub auto_orient: bool,

    /// X-axis rotation in degrees
    #[arg(
        long = "x-rotation",
        value_name = "DEG",
        default_value = "0.0",
        allow_hyphen_values = true
    )]
    pub x_rotation: f64,

    /// Y-axis rotation in degrees
    #[arg(
        long = "y-rotation",
        value_name = "DEG",
        default_value = "200.0",
        allow_hyphen_values = true
    )]
    pub y_rotation: f64,

    /// Z-axis rotation in degrees
    #[arg(
        long = "z-rotation",
        value_name = "DEG",
        default_value = "0.0",
        allow_hyphen_values = true
    )]
    pub z_rotation: f64,
}

/// Ball-and-stick geometry and quality options.
#[derive(Args)]
#[command(next_help_heading = "Rendering")]
pub struct RenderingOptions {
    /// Stick radius in Å
    #[arg(long = "stick-radius", value_name = "R", default_value = "0.2")]
    pub stick_radius: f64,

    /// Sphere radius as a fraction of the van der Waals radius
    #[arg(long = "sphere-scale", value_name = "FRAC", default_value = "0.3")]
    pub sphere_scale: f64,

    /// Minimum sphere-to-stick radius ratio
    #[arg(long = "stick-ball-ratio", value_name = "RATIO", default_value = "1.8")]
    pub stick_ball_ratio: f64,

    /// Trace shadow rays (slower)
    #[arg(long = "ray-shadows")]
    pub ray_shadows: bool,

    /// Antialiasing level (0=off, 1-4=supersampling)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "2",
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub antialias: u8,
}

/// Lighting model options.
#[derive(Args)]
#[command(next_help_heading = "Lighting")]
pub struct LightingOptions {
    /// Ambient lighting (0.0-1.0)
    #[arg(long, value_name = "I", default_value = "0.25")]
    pub ambient: f64,

    /// Specular lighting (0.0-2.0)
    #[arg(long, value_name = "I", default_value = "1.0")]
    pub specular: f64,

    /// Direct lighting intensity (0.0-1.0)
    #[arg(long, value_name = "I", default_value = "0.5")]
    pub direct: f64,

    /// Reflection intensity (0.0-1.0)
    #[arg(long, value_name = "I", default_value = "0.5")]
    pub reflect: f64,

    /// Surface shininess exponent
    #[arg(long, value_name = "N", default_value = "30.0")]
    pub shininess: f64,
}

/// Visual effect options.
#[derive(Args)]
#[command(next_help_heading = "Effects")]
pub struct EffectsOptions {
    /// Stick transparency (0.0-1.0)
    #[arg(long = "stick-transparency", value_name = "T", default_value = "0.0")]
    pub stick_transparency: f64,

    /// Sphere transparency (0.0-1.0)
    #[arg(long = "sphere-transparency", value_name = "T", default_value = "0.0")]
    pub sphere_transparency: f64,

    /// Draw double and triple bonds as parallel strands (0 disables)
    #[arg(long, value_name = "V", default_value = "0.0")]
    pub valence: f64,

    /// Blend distant geometry toward the background (fog)
    #[arg(long = "depth-cue")]
    pub depth_cue: bool,
}

/// Canvas and cropping options.
#[derive(Args)]
#[command(next_help_heading = "Canvas")]
pub struct CanvasOptions {
    /// Render width in pixels
    #[arg(long, value_name = "PX", default_value = "1320")]
    pub width: u32,

    /// Render height in pixels
    #[arg(long, value_name = "PX", default_value = "990")]
    pub height: u32,

    /// Background color for fog and report text
    #[arg(long = "bg-color", value_name = "COLOR", default_value = "white")]
    pub bg_color: BgColor,

    /// Auto-crop margin in pixels
    #[arg(long = "crop-margin", value_name = "PX", default_value = "10")]
    pub crop_margin: u32,

    /// Keep the full canvas instead of cropping to the geometry
    #[arg(long = "no-crop")]
    pub no_crop: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ForceFieldChoice {
    /// Merck molecular force field parameter set
    #[default]
    Mmff94,
    /// Universal force field parameter set
    Uff,
}

impl From<ForceFieldChoice> for ForceField {
    fn from(choice: ForceFieldChoice) -> Self {
        match choice {
            ForceFieldChoice::Mmff94 => ForceField::Mmff94,
            ForceFieldChoice::Uff => ForceField::Uff,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum BgColor {
    #[default]
    White,
    Black,
    Gray,
}

impl BgColor {
    pub fn name(&self) -> &'static str {
        match self {
            BgColor::White => "white",
            BgColor::Black => "black",
            BgColor::Gray => "gray",
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
