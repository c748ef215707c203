use std::io::{self, Write};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER_ART: &str = r#"
   ╔╦╗╔═╗╦    ╔╦╗╔═╗╔═╗╦╔═╗╔╦╗
   ║║║║ ║║     ║║║╣ ╠═╝║║   ║
   ╩ ╩╚═╝╩═╝  ═╩╝╚═╝╩  ╩╚═╝ ╩
"#;

const TAGLINE: &str = "Molecular Structure Depiction";

/// Banner text placed above clap's generated help.
pub fn banner_for_help() -> String {
    format!("\n{BANNER_ART}")
}

pub fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{BANNER_ART}");
    let _ = writeln!(stderr, "   {TAGLINE:<38} v{VERSION}");
    let _ = writeln!(stderr);
}
