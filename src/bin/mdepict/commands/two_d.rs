use std::fs;

use anyhow::{Context, Result};

use mol_depict::fetch::{self, PubChemClient};
use mol_depict::sketch::Sketcher;
use mol_depict::smiles;

use crate::cli::TwoDArgs;
use crate::config::build_sketch_config;
use crate::display::{print_structure_summary, Context as DisplayContext, Progress};

const TOTAL_STEPS: u8 = 3;

pub fn run_two_d(args: TwoDArgs, ctx: DisplayContext) -> Result<()> {
    // Fail on a bad template before any network round trip.
    let config = build_sketch_config(&args)?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Resolving compound");
    let client = PubChemClient::new()?;
    let resolved = fetch::resolve(&args.compound.compound, &client)?;
    let (mut mol, hydrogens) = smiles::parse(&resolved.smiles)
        .with_context(|| format!("Failed to parse the structure of '{}'", resolved.name))?;
    mol.name = resolved.name.clone();

    let formula = mol.formula();
    let resolve_substeps = vec![
        super::describe_resolution(&resolved),
        format!("{} ({})", resolved.name, formula),
    ];
    let resolve_refs: Vec<&str> = resolve_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Resolving compound", &resolve_refs);

    if ctx.interactive {
        print_structure_summary(&[
            ("Compound", resolved.name.clone()),
            (
                "CID",
                resolved
                    .cid
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Formula", formula),
            ("Heavy Atoms", mol.heavy_atom_count().to_string()),
            ("Bonds", mol.bond_count().to_string()),
        ]);
    }

    progress.step("Drawing 2D diagram");
    let sketcher = Sketcher::new(mol, hydrogens, config);
    let mut svg = Vec::new();
    let summary = sketcher
        .render_svg(&mut svg)
        .context("Failed to generate the SVG diagram")?;

    let draw_substeps = vec![
        "Compute 2D layout".to_string(),
        format!("Rotation {:.1}°", summary.rotation.to_degrees()),
        format!("Canvas {}×{} px", summary.width, summary.height),
    ];
    let draw_refs: Vec<&str> = draw_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Drawing 2D diagram", &draw_refs);

    progress.step("Writing output");
    fs::write(&args.output, &svg)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
    let write_substep = format!("Write SVG → {}", args.output.display());
    progress.complete_step("Writing output", &[write_substep.as_str()]);

    progress.finish();

    Ok(())
}
