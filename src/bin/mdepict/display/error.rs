use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_fetch_hints(err);
        collector.collect_smiles_hints(err);
        collector.collect_template_hints(err);
        collector.collect_structure_io_hints(err);
        collector.collect_conformer_hints(err);
        collector.collect_render_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_fetch_hints(&mut self, err: &Error) {
        use mol_depict::fetch::FetchError;

        let Some(fetch_err) = err.downcast_ref::<FetchError>() else {
            return;
        };

        self.mark_typed();

        match fetch_err {
            FetchError::Http(_) => {
                self.add("The PubChem request could not be completed");
                self.add("Check network connectivity and proxy settings");
                self.add("Pass a SMILES string directly to work offline");
            }

            FetchError::Status { status, .. } => {
                if *status == 404 {
                    self.add("PubChem has no record matching the identifier");
                    self.add("Verify the CID, or try the exact compound name");
                } else if *status >= 500 {
                    self.add("PubChem reported a server-side problem");
                    self.add("Retry later, or pass a SMILES string directly");
                } else {
                    self.add(format!("PubChem rejected the request (HTTP {status})"));
                }
            }

            FetchError::EmptyResult => {
                self.add("The lookup succeeded but returned no compounds");
                self.add("Try a more specific name or the numeric CID");
            }

            FetchError::MissingSmiles { .. } => {
                self.add("The PubChem record carries no structure string");
                self.add("Look the compound up manually and pass its SMILES");
            }

            FetchError::BadBaseUrl(_) => {
                self.add("The configured lookup base URL is not a valid URL");
            }

            FetchError::Unresolvable { .. } => {
                self.add("Identifiers are tried as CID, then name, then SMILES");
                self.add("Quote compound names that contain spaces");
                self.add("For SMILES, check ring digits and bracket atoms");
            }
        }
    }

    fn collect_smiles_hints(&mut self, err: &Error) {
        use mol_depict::smiles::SmilesError;

        let Some(smiles_err) = err.downcast_ref::<SmilesError>() else {
            return;
        };

        self.mark_typed();
        self.add("The SMILES string could not be parsed");

        match smiles_err {
            SmilesError::UnmatchedParen { .. } => {
                self.add("Every branch '(' needs a matching ')'");
            }
            SmilesError::UnclosedRing { .. } | SmilesError::DanglingRingClosure { .. } => {
                self.add("Every ring-closure digit must appear exactly twice");
            }
            SmilesError::UnknownElement { .. } => {
                self.add("Element symbols are case-sensitive (Cl, not CL)");
                self.add("Elements outside the organic subset need brackets");
            }
            SmilesError::UnclosedBracket { .. } => {
                self.add("Bracket atoms must be closed: [NH4+], [13C]");
            }
            _ => {
                self.add("The reported position counts bytes from the start");
            }
        }
    }

    fn collect_template_hints(&mut self, err: &Error) {
        use mol_depict::templates::TemplateError;

        let Some(template_err) = err.downcast_ref::<TemplateError>() else {
            return;
        };

        self.mark_typed();

        match template_err {
            TemplateError::Unknown(_) => {
                self.add("Run `mdepict templates` to list the predefined names");
                self.add("A template file path must end in .json or .toml");
            }
            TemplateError::DimensionMismatch { .. } => {
                self.add("2D templates apply to `2d`; 3D templates to `3d` and `render`");
            }
            TemplateError::WrongKind { .. } => {
                self.add("Pass color files via --color-template and settings files via --template");
            }
            TemplateError::Json(_) | TemplateError::Toml(_) => {
                self.add("Check the template file for syntax errors");
                self.add("The `type` field must be 'color_style' or 'settings'");
            }
            TemplateError::UnsupportedExtension(_) => {
                self.add("Supported template formats: JSON (.json) and TOML (.toml)");
            }
            TemplateError::Io(source) => {
                self.collect_std_io_hints(source);
            }
            TemplateError::TomlSer(_) => {}
        }
    }

    fn collect_structure_io_hints(&mut self, err: &Error) {
        use mol_depict::io::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} data",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed entries");
                self.add("Only molfile V2000 blocks are accepted; V3000 is not");
            }

            IoError::UnsupportedReadFormat(fmt) => {
                self.add(format!("The '{}' format cannot be used for input", fmt));
                self.add("The render command reads SDF structure files");
            }
        }
    }

    fn collect_conformer_hints(&mut self, err: &Error) {
        use mol_depict::conformer::ConformerError;

        let Some(conf_err) = err.downcast_ref::<ConformerError>() else {
            return;
        };

        self.mark_typed();

        match conf_err {
            ConformerError::EmptyMolecule => {
                self.add("The resolved structure contains no atoms");
                self.add("Check the identifier or the input SMILES");
            }
            ConformerError::NonFiniteEnergy => {
                self.add("Geometry optimization diverged");
                self.add("Try a different --seed or fewer --max-iterations");
                self.add("Use --no-optimize to keep the raw embedding");
            }
        }
    }

    fn collect_render_hints(&mut self, err: &Error) {
        use mol_depict::render::RenderError;

        let Some(render_err) = err.downcast_ref::<RenderError>() else {
            return;
        };

        self.mark_typed();

        match render_err {
            RenderError::EmptyMolecule => {
                self.add("The structure file contains no atoms to render");
            }
            RenderError::Image(_) => {
                self.add("The PNG could not be written");
                self.add("Check that the output directory exists and is writable");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
            return;
        }

        if msg.contains("timed out") || msg.contains("connection") || msg.contains("dns") {
            self.add("The compound lookup needs network access");
            self.add("Pass a SMILES string directly to work offline");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
