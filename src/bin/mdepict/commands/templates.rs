use std::io::{self, Write};

use anyhow::Result;

use mol_depict::templates::{
    predefined_color, predefined_settings, COLOR_TEMPLATE_NAMES, SETTINGS_TEMPLATE_NAMES,
};

/// Lists the predefined templates on stdout.
pub fn run_templates() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Color templates:")?;
    for name in COLOR_TEMPLATE_NAMES {
        if let Some(template) = predefined_color(name) {
            writeln!(out, "  {name:<18} {}", template.description)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Settings templates:")?;
    for name in SETTINGS_TEMPLATE_NAMES {
        if let Some(template) = predefined_settings(name) {
            writeln!(
                out,
                "  {name:<18} [{}] {}",
                template.dimension, template.description
            )?;
        }
    }

    Ok(())
}
