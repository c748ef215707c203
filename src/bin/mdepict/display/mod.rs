mod banner;
mod error;
mod progress;
mod summary;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use summary::print_structure_summary;

use std::io::IsTerminal;

/// How much to say on stderr. Progress and summaries appear only when
/// stderr is a terminal and the user did not ask for quiet; file and
/// stdout output is unaffected either way.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn new(quiet: bool) -> Self {
        Self {
            interactive: !quiet && std::io::stderr().is_terminal(),
        }
    }
}
