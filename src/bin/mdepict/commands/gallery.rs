use std::fs::{self, File};
use std::io::BufWriter;

use anyhow::{Context, Result};

use mol_depict::conformer::{self, ConformerConfig};
use mol_depict::io::sdf;
use mol_depict::render::{self, RenderConfig};
use mol_depict::sketch::{SketchConfig, Sketcher};
use mol_depict::smiles;

use crate::cli::GalleryArgs;
use crate::display::{Context as DisplayContext, Progress};

/// Well-known pharmaceutical and biochemical compounds, as SMILES
/// literals so the gallery works offline.
const COMPOUNDS: &[(&str, &str)] = &[
    ("aspirin", "CC(=O)OC1=CC=CC=C1C(=O)O"),
    ("caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C"),
    ("glucose", "C(C1C(C(C(C(O1)O)O)O)O)O"),
    ("ibuprofen", "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O"),
    ("vitamin_c", "C(C(C1C(=C(C(=O)O1)O)O)O)O"),
    ("penicillin_g", "CC1(C(N2C(S1)C(C2=O)NC(=O)CC3=CC=CC=C3)C(=O)O)C"),
    ("dopamine", "C1=CC(=C(C=C1CCN)O)O"),
    ("serotonin", "C1=CC2=C(C=C1O)C(=CN2)CCN"),
];

pub fn run_gallery(args: GalleryArgs, ctx: DisplayContext) -> Result<()> {
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create '{}'", args.output_dir.display()))?;

    let sketch_config = SketchConfig {
        auto_orient: true,
        ..SketchConfig::default()
    };
    let render_config = RenderConfig::default();

    let mut progress = Progress::new(ctx.interactive, COMPOUNDS.len() as u8);

    for (name, smiles_str) in COMPOUNDS {
        progress.step(&format!("Depicting {name}"));
        let mut substeps = Vec::new();

        let (mut flat, hydrogens) =
            smiles::parse(smiles_str).with_context(|| format!("Bad structure for '{name}'"))?;
        flat.name = name.to_string();

        let svg_path = args.output_dir.join(format!("{name}_2d.svg"));
        let sketcher = Sketcher::new(flat, hydrogens, sketch_config.clone());
        let file = File::create(&svg_path)
            .with_context(|| format!("Failed to create '{}'", svg_path.display()))?;
        sketcher
            .render_svg(BufWriter::new(file))
            .with_context(|| format!("Failed to write '{}'", svg_path.display()))?;
        substeps.push(format!("Write SVG → {}", svg_path.display()));

        let mut mol = smiles::parse_with_hydrogens(smiles_str)
            .with_context(|| format!("Bad structure for '{name}'"))?;
        mol.name = name.to_string();
        let outcome = conformer::generate(&mut mol, &ConformerConfig::default(), true)
            .with_context(|| format!("Conformer generation failed for '{name}'"))?;

        let sdf_path = args.output_dir.join(format!("{name}_3d.sdf"));
        let file = File::create(&sdf_path)
            .with_context(|| format!("Failed to create '{}'", sdf_path.display()))?;
        sdf::write(BufWriter::new(file), &mol)
            .with_context(|| format!("Failed to write '{}'", sdf_path.display()))?;
        if let Some(energy) = outcome.energy {
            substeps.push(format!(
                "Write SDF → {} ({energy:.2} kcal/mol)",
                sdf_path.display()
            ));
        } else {
            substeps.push(format!("Write SDF → {}", sdf_path.display()));
        }

        if args.render {
            let png_path = args.output_dir.join(format!("{name}_3d.png"));
            render::render_png(&mol, &render_config, &png_path)
                .with_context(|| format!("Failed to render '{}'", png_path.display()))?;
            substeps.push(format!("Write PNG → {}", png_path.display()));
        }

        let substep_refs: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
        progress.complete_step(&format!("Depicting {name}"), &substep_refs);
    }

    progress.finish();

    Ok(())
}
