mod gallery;
mod render;
mod templates;
mod three_d;
mod two_d;

use anyhow::Result;

use mol_depict::fetch::{ResolvedCompound, CUSTOM_SMILES_NAME};

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::TwoD(args) => two_d::run_two_d(args, ctx),
        Command::ThreeD(args) => three_d::run_three_d(args, ctx),
        Command::Render(args) => render::run_render(args, ctx),
        Command::Templates => templates::run_templates(),
        Command::Gallery(args) => gallery::run_gallery(args, ctx),
    }
}

/// One-line account of how the identifier was interpreted, for the
/// resolution substep.
fn describe_resolution(resolved: &ResolvedCompound) -> String {
    match resolved.cid {
        Some(cid) => format!("Matched PubChem CID {cid}"),
        None if resolved.name == CUSTOM_SMILES_NAME => "Interpreted as a raw SMILES string".to_string(),
        None => format!("Resolved by name lookup: {}", resolved.name),
    }
}
