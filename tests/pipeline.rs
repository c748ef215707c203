//! End-to-end pipelines over the public API, offline: SMILES in,
//! SVG/SDF/PNG files out.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use mol_depict::conformer::{self, ConformerConfig, ForceField};
use mol_depict::io::sdf;
use mol_depict::render::{self, RenderConfig};
use mol_depict::sketch::{SketchConfig, Sketcher};
use mol_depict::smiles;
use mol_depict::templates;

const ASPIRIN: &str = "CC(=O)OC1=CC=CC=C1C(=O)O";

#[test]
fn smiles_to_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aspirin.svg");

    let (mut mol, hydrogens) = smiles::parse(ASPIRIN).unwrap();
    mol.name = "aspirin".to_string();
    assert_eq!(mol.formula(), "C9O4");

    let sketcher = Sketcher::new(mol, hydrogens, SketchConfig::default());
    let file = File::create(&path).unwrap();
    let summary = sketcher.render_svg(BufWriter::new(file)).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.trim_end().ends_with("</svg>"));
    // The carboxylic and ester oxygens produce labels.
    assert!(svg.contains("</text>"));
    assert!(summary.width > 0 && summary.height > 0);
}

#[test]
fn smiles_to_sdf_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ethanol.sdf");

    let mut mol = smiles::parse_with_hydrogens("CCO").unwrap();
    mol.name = "ethanol".to_string();
    let outcome = conformer::generate(&mut mol, &ConformerConfig::default(), true).unwrap();
    assert!(outcome.energy.unwrap().is_finite());

    let file = File::create(&path).unwrap();
    sdf::write(BufWriter::new(file), &mol).unwrap();

    let parsed = sdf::read(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(parsed.name, "ethanol");
    assert_eq!(parsed.atom_count(), mol.atom_count());
    assert_eq!(parsed.bond_count(), mol.bond_count());
    for (a, b) in mol.atoms.iter().zip(parsed.atoms.iter()) {
        assert_eq!(a.element, b.element);
        for k in 0..3 {
            assert!((a.position[k] - b.position[k]).abs() < 1e-3);
        }
    }
}

#[test]
fn conformer_to_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("methanol.png");

    let mut mol = smiles::parse_with_hydrogens("CO").unwrap();
    conformer::generate(&mut mol, &ConformerConfig::default(), true).unwrap();

    let config = RenderConfig {
        width: 96,
        height: 72,
        antialias: 0,
        ..RenderConfig::default()
    };
    let summary = render::render_png(&mol, &config, &path).unwrap();
    assert!(summary.width > 0 && summary.height > 0);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn uff_optimization_also_converges_geometry() {
    let mut mol = smiles::parse_with_hydrogens("CCO").unwrap();
    let settings = ConformerConfig {
        force_field: ForceField::Uff,
        ..ConformerConfig::default()
    };
    let outcome = conformer::generate(&mut mol, &settings, true).unwrap();
    assert!(outcome.energy.unwrap().is_finite());
    for bond in &mol.bonds {
        let pa = mol.atoms[bond.i].position;
        let pb = mol.atoms[bond.j].position;
        let d: f64 = (0..3).map(|k| (pa[k] - pb[k]).powi(2)).sum::<f64>().sqrt();
        assert!(d > 0.8 && d < 1.9, "bond {bond:?} length {d}");
    }
}

#[test]
fn templated_sketch_changes_the_canvas() {
    let template = templates::resolve_settings("publication_2d").unwrap();
    let mut large = SketchConfig::default();
    template.apply_sketch(&mut large).unwrap();

    let render_at = |config: SketchConfig| {
        let (mol, hydrogens) = smiles::parse(ASPIRIN).unwrap();
        let mut out = Vec::new();
        Sketcher::new(mol, hydrogens, config)
            .render_svg(&mut out)
            .unwrap()
    };

    let default_summary = render_at(SketchConfig::default());
    let large_summary = render_at(large);
    assert!(large_summary.width > default_summary.width);
    assert!(large_summary.height > default_summary.height);
}

#[test]
fn color_template_feeds_the_renderer() {
    let template = templates::resolve_color("dark_mode").unwrap();
    let mut config = RenderConfig {
        width: 64,
        height: 48,
        antialias: 0,
        auto_crop: false,
        ..RenderConfig::default()
    };
    template.apply_render(&mut config);
    assert_eq!(config.bg_color, "black");

    let mut mol = smiles::parse_with_hydrogens("C").unwrap();
    conformer::generate(&mut mol, &ConformerConfig::default(), false).unwrap();
    let (img, _) = render::render_image(&mol, &config).unwrap();
    assert!(img.pixels().any(|p| p[3] > 0));
}
