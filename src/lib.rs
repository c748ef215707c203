//! A pure Rust toolkit for depicting small molecules. It resolves a
//! compound identifier (PubChem CID, compound name, or SMILES string)
//! to a molecular structure and emits either a 2D vector diagram (SVG)
//! or a 3D structure file (SDF) with an optional ray-traced image.
//!
//! # Features
//!
//! - **Identifier resolution** — PubChem PUG REST lookup by CID or
//!   name, with direct SMILES input as the offline fallback
//! - **SMILES parsing** — organic subset, bracket atoms, branches,
//!   ring closures, and aromatic notation, with implicit hydrogen
//!   accounting
//! - **2D diagrams** — ring-aware coordinate layout, PCA
//!   auto-orientation, and hand-emitted SVG with heteroatom labels
//! - **3D conformers** — seeded deterministic embedding plus MMFF94 or
//!   UFF gradient-descent relaxation, with multi-conformer pruning
//! - **Ray tracing** — ball-and-stick renders with Phong shading,
//!   shadows, transparency, depth cueing, and alpha-aware cropping
//!
//! # Quick Start
//!
//! A 2D diagram is a [`Sketcher`](sketch::Sketcher) run over a parsed
//! molecule:
//!
//! ```
//! use mol_depict::sketch::{SketchConfig, Sketcher};
//! use mol_depict::smiles;
//!
//! // Caffeine, straight from its SMILES string.
//! let (mol, hydrogens) = smiles::parse("CN1C=NC2=C1C(=O)N(C(=O)N2C)C")?;
//! assert_eq!(mol.formula(), "C8N4O2");
//!
//! let sketcher = Sketcher::new(mol, hydrogens, SketchConfig::default());
//! let mut svg = Vec::new();
//! let summary = sketcher.render_svg(&mut svg)?;
//!
//! assert!(summary.width > 0 && summary.height > 0);
//! assert!(String::from_utf8(svg)?.trim_end().ends_with("</svg>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! 3D structures go through [`conformer::generate`] and the [`io`]
//! writers:
//!
//! ```
//! use mol_depict::conformer::{self, ConformerConfig};
//! use mol_depict::io::sdf;
//! use mol_depict::smiles;
//!
//! let mut mol = smiles::parse_with_hydrogens("CCO")?;
//! let outcome = conformer::generate(&mut mol, &ConformerConfig::default(), true)?;
//! assert!(outcome.energy.unwrap().is_finite());
//!
//! let mut block = Vec::new();
//! sdf::write(&mut block, &mol)?;
//! assert!(String::from_utf8(block)?.contains("V2000"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`fetch`] — compound identifier resolution (CID, name, SMILES)
//! - [`smiles`] — SMILES parsing and hydrogen materialization
//! - [`layout`] — 2D depiction coordinates and ring perception
//! - [`sketch`] — 2D diagram generation (SVG)
//! - [`conformer`] — 3D embedding and force-field optimization
//! - [`render`] — ray-traced ball-and-stick imaging (PNG)
//! - [`orient`] — PCA viewing-orientation heuristics
//! - [`io`] — structure file I/O (SDF, XYZ)
//! - [`templates`] — named color and settings presets
//!
//! # Data Types
//!
//! - [`Molecule`] — atoms plus bonds, one per generator instance
//! - [`Atom`] — element, position, formal charge, isotope
//! - [`Bond`] — index pair with a [`BondOrder`]
//! - [`Element`] — the full periodic table with per-element data

mod model;

pub mod conformer;
pub mod fetch;
pub mod io;
pub mod layout;
pub mod orient;
pub mod render;
pub mod sketch;
pub mod smiles;
pub mod templates;

pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};
