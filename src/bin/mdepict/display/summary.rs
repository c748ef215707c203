use std::io::{self, Write};

use crate::util::text::truncate;

const INDENT: &str = "      ";
const RULE_WIDTH: usize = 44;
const KEY_WIDTH: usize = 14;

/// Aligned key/value block printed once a structure has been
/// resolved.
pub fn print_structure_summary(rows: &[(&str, String)]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let value_width = RULE_WIDTH - KEY_WIDTH - 2;

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}\x1b[1mStructure Summary\x1b[0m");
    let _ = writeln!(out, "{INDENT}\x1b[2m{}\x1b[0m", "─".repeat(RULE_WIDTH));
    for (key, value) in rows {
        let _ = writeln!(
            out,
            "{INDENT}{:<KEY_WIDTH$}  {}",
            truncate(key, KEY_WIDTH),
            truncate(value, value_width)
        );
    }
    let _ = writeln!(out);
}
