use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};

use mol_depict::conformer;
use mol_depict::fetch::{self, PubChemClient};
use mol_depict::io::sdf;
use mol_depict::render;
use mol_depict::smiles;

use crate::cli::ThreeDArgs;
use crate::config::{build_conformer_config, build_render_config};
use crate::display::{print_structure_summary, Context as DisplayContext, Progress};
use crate::util::path::{output_base, with_suffix};

pub fn run_three_d(args: ThreeDArgs, ctx: DisplayContext) -> Result<()> {
    let conformer_config = build_conformer_config(&args.conformer);
    // Validates templates up front, whether or not a PNG is requested.
    let render_config = build_render_config((&args).into())?;
    let optimize = !args.conformer.no_optimize;

    let total_steps = if args.render { 4 } else { 3 };
    let mut progress = Progress::new(ctx.interactive, total_steps);

    progress.step("Resolving compound");
    let client = PubChemClient::new()?;
    let resolved = fetch::resolve(&args.compound.compound, &client)?;
    let mut mol = smiles::parse_with_hydrogens(&resolved.smiles)
        .with_context(|| format!("Failed to parse the structure of '{}'", resolved.name))?;
    mol.name = resolved.name.clone();

    let formula = mol.formula();
    let resolve_substeps = vec![
        super::describe_resolution(&resolved),
        format!("{} ({})", resolved.name, formula),
        format!("{} atoms with hydrogens", mol.atom_count()),
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
            ("Atoms", mol.atom_count().to_string()),
            ("Bonds", mol.bond_count().to_string()),
        ]);
    }

    progress.step("Generating 3D conformer");
    let outcome = conformer::generate(&mut mol, &conformer_config, optimize)
        .context("Conformer generation failed")?;

    let mut conformer_substeps = vec![format!(
        "Embed {} trial conformer{} (seed {})",
        conformer_config.num_conformers,
        if conformer_config.num_conformers == 1 { "" } else { "s" },
        conformer_config.seed
    )];
    match outcome.energy {
        Some(energy) => {
            conformer_substeps.push(format!(
                "Optimize with {} (≤{} iterations)",
                conformer_config.force_field, conformer_config.max_iterations
            ));
            conformer_substeps.push(format!(
                "Final energy {:.2} kcal/mol{}",
                energy,
                if outcome.converged { "" } else { " (not converged)" }
            ));
        }
        None => conformer_substeps.push("Skip geometry optimization".to_string()),
    }
    if conformer_config.num_conformers > 1 {
        conformer_substeps.push(format!(
            "{} conformer{} kept after RMSD pruning",
            outcome.kept_conformers,
            if outcome.kept_conformers == 1 { "" } else { "s" }
        ));
    }
    let conformer_refs: Vec<&str> = conformer_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Generating 3D conformer", &conformer_refs);

    progress.step("Writing structure file");
    let base = args
        .output_base
        .clone()
        .unwrap_or_else(|| output_base(&resolved.name));
    let sdf_path = with_suffix(&base, ".sdf");
    let file = File::create(&sdf_path)
        .with_context(|| format!("Failed to create '{}'", sdf_path.display()))?;
    sdf::write(BufWriter::new(file), &mol)
        .with_context(|| format!("Failed to write '{}'", sdf_path.display()))?;
    let sdf_substep = format!("Write SDF → {}", sdf_path.display());
    progress.complete_step("Writing structure file", &[sdf_substep.as_str()]);

    if args.render {
        progress.step("Ray tracing image");
        let png_path = with_suffix(&base, ".png");
        let summary = render::render_png(&mol, &render_config, &png_path)
            .with_context(|| format!("Failed to render '{}'", png_path.display()))?;

        let render_substeps = vec![
            format!(
                "Orientation x {:.0}° y {:.0}° z {:.0}°{}",
                summary.orientation.0,
                summary.orientation.1,
                summary.orientation.2,
                if render_config.auto_orient { " (auto)" } else { "" }
            ),
            format!(
                "{}×{} px{}",
                summary.width,
                summary.height,
                if summary.cropped { " after crop" } else { "" }
            ),
            format!("Write PNG → {}", png_path.display()),
        ];
        let render_refs: Vec<&str> = render_substeps.iter().map(|s| s.as_str()).collect();
        progress.complete_step("Ray tracing image", &render_refs);
    }

    progress.finish();

    Ok(())
}
