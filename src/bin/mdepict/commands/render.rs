use anyhow::{Context, Result};

use mol_depict::io;
use mol_depict::render;

use crate::cli::RenderArgs;
use crate::config::build_render_config;
use crate::display::{print_structure_summary, Context as DisplayContext, Progress};

const TOTAL_STEPS: u8 = 2;

pub fn run_render(args: RenderArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_render_config((&args).into())?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading structure file");
    let mol = io::read_structure(&args.input)
        .with_context(|| format!("Failed to read '{}'", args.input.display()))?;

    let read_substeps = vec![
        format!("Parse SDF → {}", args.input.display()),
        format!(
            "{} ({} atoms, {} bonds)",
            if mol.name.is_empty() { "unnamed" } else { &mol.name },
            mol.atom_count(),
            mol.bond_count()
        ),
    ];
    let read_refs: Vec<&str> = read_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Reading structure file", &read_refs);

    if ctx.interactive {
        print_structure_summary(&[
            ("Compound", mol.name.clone()),
            ("Formula", mol.formula()),
            ("Atoms", mol.atom_count().to_string()),
            ("Bonds", mol.bond_count().to_string()),
        ]);
    }

    progress.step("Ray tracing image");
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("png"));
    let summary = render::render_png(&mol, &config, &output)
        .with_context(|| format!("Failed to render '{}'", output.display()))?;

    let render_substeps = vec![
        format!(
            "Orientation x {:.0}° y {:.0}° z {:.0}°{}",
            summary.orientation.0,
            summary.orientation.1,
            summary.orientation.2,
            if config.auto_orient { " (auto)" } else { "" }
        ),
        format!(
            "{}×{} px{}",
            summary.width,
            summary.height,
            if summary.cropped { " after crop" } else { "" }
        ),
        format!("Write PNG → {}", output.display()),
    ];
    let render_refs: Vec<&str> = render_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Ray tracing image", &render_refs);

    progress.finish();

    Ok(())
}
