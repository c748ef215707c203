use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomSpec, BondSymbol, Token};

/// One atom of the parsed SMILES with the bonds recorded on both
/// endpoints, in encounter order.
#[derive(Debug, Clone)]
pub struct ParsedAtom {
    pub spec: AtomSpec,
    pub neighbors: Vec<ParsedNeighbor>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedNeighbor {
    pub atom: usize,
    pub bond: Option<BondSymbol>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSmiles {
    pub atoms: Vec<ParsedAtom>,
}

/// Ring-closure digits can be reused once closed; SMILES allows up to
/// two-digit labels via `%nn`.
const RING_SLOTS: usize = 100;

pub fn parse_tokens(tokens: &[Token]) -> Result<ParsedSmiles, SmilesError> {
    let mut atoms: Vec<ParsedAtom> = Vec::new();
    let mut branch_stack: Vec<usize> = Vec::new();
    let mut current: Option<usize> = None;
    let mut pending_bond: Option<BondSymbol> = None;
    let mut open_rings: Vec<Option<(usize, Option<BondSymbol>)>> = vec![None; RING_SLOTS];

    for token in tokens {
        match token {
            Token::Atom(spec) => {
                let idx = atoms.len();
                atoms.push(ParsedAtom {
                    spec: spec.clone(),
                    neighbors: Vec::new(),
                });

                if let Some(prev) = current {
                    let bond = pending_bond.take();
                    atoms[prev].neighbors.push(ParsedNeighbor { atom: idx, bond });
                    atoms[idx].neighbors.push(ParsedNeighbor { atom: prev, bond });
                } else {
                    pending_bond = None;
                }
                current = Some(idx);
            }
            Token::Bond(symbol) => {
                pending_bond = Some(*symbol);
            }
            Token::Ring { bond, digit, pos } => {
                let slot = *digit as usize % RING_SLOTS;
                let here = current.ok_or(SmilesError::DanglingRingClosure {
                    digit: *digit,
                    pos: *pos,
                })?;

                match open_rings[slot].take() {
                    Some((opened_at, opening_bond)) => {
                        if opened_at == here {
                            return Err(SmilesError::SelfRingBond { digit: *digit });
                        }
                        let closing_bond = bond.or(pending_bond.take());
                        let ring_bond = match (opening_bond, closing_bond) {
                            (None, b) | (b, None) => b,
                            (Some(a), Some(b)) if a == b => Some(a),
                            _ => return Err(SmilesError::RingBondConflict { digit: *digit }),
                        };
                        atoms[opened_at].neighbors.push(ParsedNeighbor {
                            atom: here,
                            bond: ring_bond,
                        });
                        atoms[here].neighbors.push(ParsedNeighbor {
                            atom: opened_at,
                            bond: ring_bond,
                        });
                    }
                    None => {
                        open_rings[slot] = Some((here, bond.or(pending_bond.take())));
                    }
                }
            }
            Token::Open(pos) => {
                let here = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                branch_stack.push(here);
            }
            Token::Close(pos) => {
                current = Some(
                    branch_stack
                        .pop()
                        .ok_or(SmilesError::UnmatchedParen { pos: *pos })?,
                );
                pending_bond = None;
            }
            Token::Dot(_) => {
                current = None;
                pending_bond = None;
            }
        }
    }

    if !branch_stack.is_empty() {
        return Err(SmilesError::UnmatchedParen { pos: 0 });
    }
    for (digit, slot) in open_rings.iter().enumerate() {
        if slot.is_some() {
            return Err(SmilesError::UnclosedRing {
                digit: digit as u16,
            });
        }
    }
    if atoms.is_empty() {
        return Err(SmilesError::Empty);
    }

    Ok(ParsedSmiles { atoms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    fn parse(s: &str) -> Result<ParsedSmiles, SmilesError> {
        parse_tokens(&tokenize(s)?)
    }

    #[test]
    fn linear_chain() {
        let parsed = parse("CCO").unwrap();
        assert_eq!(parsed.atoms.len(), 3);
        assert_eq!(parsed.atoms[1].neighbors.len(), 2);
        assert_eq!(parsed.atoms[0].neighbors[0].atom, 1);
    }

    #[test]
    fn branch_connectivity() {
        let parsed = parse("CC(C)C").unwrap();
        assert_eq!(parsed.atoms.len(), 4);
        assert_eq!(parsed.atoms[1].neighbors.len(), 3);
        assert_eq!(parsed.atoms[2].neighbors.len(), 1);
    }

    #[test]
    fn ring_closure_bonds_both_ends() {
        let parsed = parse("C1CCCCC1").unwrap();
        for atom in &parsed.atoms {
            assert_eq!(atom.neighbors.len(), 2);
        }
    }

    #[test]
    fn ring_digit_reuse() {
        // Two separate rings reusing digit 1.
        let parsed = parse("C1CC1C1CC1").unwrap();
        assert_eq!(parsed.atoms.len(), 6);
        assert_eq!(parsed.atoms[0].neighbors.len(), 2);
        assert_eq!(parsed.atoms[3].neighbors.len(), 3);
    }

    #[test]
    fn dot_separates_fragments() {
        let parsed = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(parsed.atoms.len(), 2);
        assert!(parsed.atoms[0].neighbors.is_empty());
        assert!(parsed.atoms[1].neighbors.is_empty());
    }

    #[test]
    fn unclosed_ring_is_error() {
        assert!(matches!(
            parse("C1CC"),
            Err(SmilesError::UnclosedRing { digit: 1 })
        ));
    }

    #[test]
    fn unmatched_parens_are_errors() {
        assert!(matches!(
            parse("C(C"),
            Err(SmilesError::UnmatchedParen { .. })
        ));
        assert!(matches!(
            parse("CC)C"),
            Err(SmilesError::UnmatchedParen { .. })
        ));
    }

    #[test]
    fn conflicting_ring_bonds() {
        assert!(matches!(
            parse("C=1CC#1"),
            Err(SmilesError::RingBondConflict { digit: 1 })
        ));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(parse(""), Err(SmilesError::Empty)));
        assert!(matches!(parse("  "), Err(SmilesError::Empty)));
    }
}
