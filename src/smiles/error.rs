use thiserror::Error;

/// Failure modes of the SMILES pipeline, tagged with the byte position
/// in the input where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unknown element '{text}' at position {pos}")]
    UnknownElement { pos: usize, text: String },

    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },

    #[error("formal charge out of range at position {pos}")]
    ChargeOutOfRange { pos: usize },

    #[error("ring closure digit {digit} at position {pos} precedes any atom")]
    DanglingRingClosure { digit: u16, pos: usize },

    #[error("conflicting bond symbols on ring closure {digit}")]
    RingBondConflict { digit: u16 },

    #[error("ring bond {digit} was opened but never closed")]
    UnclosedRing { digit: u16 },

    #[error("ring closure digit {digit} would bond an atom to itself")]
    SelfRingBond { digit: u16 },

    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },

    #[error("SMILES string contains no atoms")]
    Empty,
}
