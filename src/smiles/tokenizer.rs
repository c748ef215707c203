use std::str::FromStr;

use crate::model::types::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Atom(AtomSpec),
    Bond(BondSymbol),
    Ring {
        bond: Option<BondSymbol>,
        digit: u16,
        pos: usize,
    },
    Open(usize),
    Close(usize),
    Dot(usize),
}

/// Everything a single SMILES atom term can carry. Chirality markers
/// are recorded so they never surface as parse errors, but geometry
/// generation ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSpec {
    pub element: Element,
    pub aromatic: bool,
    pub isotope: u16,
    pub chiral: bool,
    /// `Some` only for bracket atoms, where the H count is explicit.
    pub hcount: Option<u8>,
    pub charge: i8,
    pub bracket: bool,
    pub pos: usize,
}

impl AtomSpec {
    fn bare(element: Element, aromatic: bool, pos: usize) -> Self {
        Self {
            element,
            aromatic,
            isotope: 0,
            chiral: false,
            hcount: None,
            charge: 0,
            bracket: false,
            pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondSymbol {
    Single,
    Double,
    Triple,
    Aromatic,
    /// `/` and `\` directional bonds, treated as single bonds.
    Directional,
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn take_digits(&mut self) -> Option<u16> {
        let mut value: u16 = 0;
        let mut seen = false;
        while let Some(c) = self.peek() {
            let Some(d) = c.to_digit(10) else { break };
            seen = true;
            value = value.saturating_mul(10).saturating_add(d as u16);
            self.pos += 1;
        }
        seen.then_some(value)
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut cur = Cursor::new(input);
    let mut tokens = Vec::new();

    while let Some(c) = cur.peek() {
        let pos = cur.pos;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                cur.bump();
            }
            '[' => tokens.push(Token::Atom(bracket_atom(&mut cur)?)),
            '(' => {
                cur.bump();
                tokens.push(Token::Open(pos));
            }
            ')' => {
                cur.bump();
                tokens.push(Token::Close(pos));
            }
            '.' => {
                cur.bump();
                tokens.push(Token::Dot(pos));
            }
            '=' => {
                cur.bump();
                tokens.push(Token::Bond(BondSymbol::Double));
            }
            '#' => {
                cur.bump();
                tokens.push(Token::Bond(BondSymbol::Triple));
            }
            ':' => {
                cur.bump();
                tokens.push(Token::Bond(BondSymbol::Aromatic));
            }
            '/' | '\\' => {
                cur.bump();
                tokens.push(Token::Bond(BondSymbol::Directional));
            }
            '-' => {
                // A '-' is only a bond when something bondable precedes it.
                if matches!(
                    tokens.last(),
                    Some(Token::Atom(_)) | Some(Token::Ring { .. }) | Some(Token::Close(_))
                ) {
                    cur.bump();
                    tokens.push(Token::Bond(BondSymbol::Single));
                } else {
                    return Err(SmilesError::UnexpectedChar { pos, ch: '-' });
                }
            }
            '%' => {
                cur.bump();
                let d1 = cur.peek().and_then(|c| c.to_digit(10));
                let d2 = cur.peek_at(1).and_then(|c| c.to_digit(10));
                let (Some(d1), Some(d2)) = (d1, d2) else {
                    return Err(SmilesError::UnexpectedChar { pos, ch: '%' });
                };
                cur.bump();
                cur.bump();
                let bond = pop_pending_bond(&mut tokens);
                tokens.push(Token::Ring {
                    bond,
                    digit: (d1 * 10 + d2) as u16,
                    pos,
                });
            }
            '0'..='9' => {
                cur.bump();
                let bond = pop_pending_bond(&mut tokens);
                tokens.push(Token::Ring {
                    bond,
                    digit: c.to_digit(10).unwrap_or(0) as u16,
                    pos,
                });
            }
            _ => match bare_atom(&mut cur) {
                Some(spec) => tokens.push(Token::Atom(spec)),
                None => return Err(SmilesError::UnexpectedChar { pos, ch: c }),
            },
        }
    }

    Ok(tokens)
}

/// A ring-closure digit binds any immediately preceding bond symbol.
fn pop_pending_bond(tokens: &mut Vec<Token>) -> Option<BondSymbol> {
    if matches!(tokens.last(), Some(Token::Bond(_))) {
        if let Some(Token::Bond(b)) = tokens.pop() {
            return Some(b);
        }
    }
    None
}

fn bare_atom(cur: &mut Cursor) -> Option<AtomSpec> {
    let pos = cur.pos;
    let c = cur.peek()?;

    // Two-letter organic-subset symbols first.
    if c == 'C' && cur.peek_at(1) == Some('l') {
        cur.bump();
        cur.bump();
        return Some(AtomSpec::bare(Element::Cl, false, pos));
    }
    if c == 'B' && cur.peek_at(1) == Some('r') {
        cur.bump();
        cur.bump();
        return Some(AtomSpec::bare(Element::Br, false, pos));
    }

    let (element, aromatic) = match c {
        'B' => (Element::B, false),
        'C' => (Element::C, false),
        'N' => (Element::N, false),
        'O' => (Element::O, false),
        'P' => (Element::P, false),
        'S' => (Element::S, false),
        'F' => (Element::F, false),
        'I' => (Element::I, false),
        'b' => (Element::B, true),
        'c' => (Element::C, true),
        'n' => (Element::N, true),
        'o' => (Element::O, true),
        'p' => (Element::P, true),
        's' => (Element::S, true),
        _ => return None,
    };
    cur.bump();
    Some(AtomSpec::bare(element, aromatic, pos))
}

fn bracket_atom(cur: &mut Cursor) -> Result<AtomSpec, SmilesError> {
    let start = cur.pos;
    cur.bump(); // '['

    let isotope = cur.take_digits().unwrap_or(0);
    let (element, aromatic) = bracket_element(cur, start)?;

    let mut chiral = false;
    if cur.eat('@') {
        chiral = true;
        cur.eat('@');
    }

    let hcount = if cur.eat('H') {
        Some(cur.take_digits().map(|d| d.min(9) as u8).unwrap_or(1))
    } else {
        None
    };

    let charge = bracket_charge(cur, start)?;

    // Atom class: parsed and discarded.
    if cur.eat(':') {
        cur.take_digits();
    }

    if !cur.eat(']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }

    Ok(AtomSpec {
        element,
        aromatic,
        isotope,
        chiral,
        hcount: Some(hcount.unwrap_or(0)),
        charge,
        bracket: true,
        pos: start,
    })
}

fn bracket_element(cur: &mut Cursor, start: usize) -> Result<(Element, bool), SmilesError> {
    let Some(first) = cur.peek() else {
        return Err(SmilesError::UnclosedBracket { pos: start });
    };

    if first.is_ascii_lowercase() {
        // Aromatic bracket forms: se and te, then single letters.
        let two: String = [Some(first), cur.peek_at(1)]
            .into_iter()
            .flatten()
            .collect();
        let aromatic_two = matches!(two.as_str(), "se" | "te");
        if aromatic_two {
            cur.bump();
            cur.bump();
            let element = match two.as_str() {
                "se" => Element::Se,
                _ => Element::Te,
            };
            return Ok((element, true));
        }

        let element = match first {
            'b' => Element::B,
            'c' => Element::C,
            'n' => Element::N,
            'o' => Element::O,
            'p' => Element::P,
            's' => Element::S,
            _ => {
                return Err(SmilesError::UnknownElement {
                    pos: cur.pos,
                    text: first.to_string(),
                });
            }
        };
        cur.bump();
        return Ok((element, true));
    }

    // Two-letter uppercase-lowercase symbol wins over one-letter.
    if let Some(second) = cur.peek_at(1) {
        if first.is_ascii_uppercase() && second.is_ascii_lowercase() {
            let symbol: String = [first, second].iter().collect();
            if let Ok(element) = Element::from_str(&symbol) {
                cur.bump();
                cur.bump();
                return Ok((element, false));
            }
        }
    }

    if first.is_ascii_uppercase() {
        if let Ok(element) = Element::from_str(&first.to_string()) {
            cur.bump();
            return Ok((element, false));
        }
    }

    Err(SmilesError::UnknownElement {
        pos: cur.pos,
        text: first.to_string(),
    })
}

fn bracket_charge(cur: &mut Cursor, start: usize) -> Result<i8, SmilesError> {
    let sign: i16 = match cur.peek() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    cur.bump();

    // Either a run of repeated signs or an explicit magnitude.
    let repeat_char = if sign > 0 { '+' } else { '-' };
    let mut magnitude: i16 = 1;
    if let Some(d) = cur.take_digits() {
        magnitude = d as i16;
    } else {
        while cur.eat(repeat_char) {
            magnitude += 1;
        }
    }

    let charge = sign * magnitude;
    i8::try_from(charge).map_err(|_| SmilesError::ChargeOutOfRange { pos: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(tokens: &[Token], idx: usize) -> &AtomSpec {
        match &tokens[idx] {
            Token::Atom(a) => a,
            other => panic!("expected atom at {idx}, got {other:?}"),
        }
    }

    #[test]
    fn bare_atoms_and_two_letter_symbols() {
        let tokens = tokenize("CClBrN").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(atom(&tokens, 0).element, Element::C);
        assert_eq!(atom(&tokens, 1).element, Element::Cl);
        assert_eq!(atom(&tokens, 2).element, Element::Br);
        assert_eq!(atom(&tokens, 3).element, Element::N);
    }

    #[test]
    fn aromatic_lowercase() {
        let tokens = tokenize("c1ccccc1").unwrap();
        assert_eq!(tokens.len(), 8);
        assert!(atom(&tokens, 0).aromatic);
    }

    #[test]
    fn bond_symbols() {
        let tokens = tokenize("C=C#N").unwrap();
        assert!(matches!(tokens[1], Token::Bond(BondSymbol::Double)));
        assert!(matches!(tokens[3], Token::Bond(BondSymbol::Triple)));
    }

    #[test]
    fn directional_bonds_tokenize_as_bonds() {
        let tokens = tokenize("F/C=C/F").unwrap();
        assert!(matches!(tokens[1], Token::Bond(BondSymbol::Directional)));
    }

    #[test]
    fn leading_dash_rejected() {
        assert!(matches!(
            tokenize("-C"),
            Err(SmilesError::UnexpectedChar { pos: 0, ch: '-' })
        ));
    }

    #[test]
    fn bracket_atom_full() {
        let tokens = tokenize("[13C@H2+]").unwrap();
        let a = atom(&tokens, 0);
        assert_eq!(a.element, Element::C);
        assert_eq!(a.isotope, 13);
        assert!(a.chiral);
        assert_eq!(a.hcount, Some(2));
        assert_eq!(a.charge, 1);
        assert!(a.bracket);
    }

    #[test]
    fn bracket_charges() {
        let charge = |s: &str| atom(&tokenize(s).unwrap(), 0).charge;
        assert_eq!(charge("[O-]"), -1);
        assert_eq!(charge("[O-2]"), -2);
        assert_eq!(charge("[O--]"), -2);
        assert_eq!(charge("[Fe+3]"), 3);
        assert_eq!(charge("[NH4+]"), 1);
    }

    #[test]
    fn bracket_without_h_means_zero_h() {
        assert_eq!(atom(&tokenize("[C]").unwrap(), 0).hcount, Some(0));
    }

    #[test]
    fn bracket_aromatic_selenium() {
        let tokens = tokenize("[se]").unwrap();
        let a = atom(&tokens, 0);
        assert_eq!(a.element, Element::Se);
        assert!(a.aromatic);
    }

    #[test]
    fn unclosed_bracket() {
        assert!(matches!(
            tokenize("[CH4"),
            Err(SmilesError::UnclosedBracket { pos: 0 })
        ));
    }

    #[test]
    fn ring_digits_and_percent() {
        let tokens = tokenize("C1CC1").unwrap();
        assert!(matches!(tokens[1], Token::Ring { digit: 1, .. }));

        let tokens = tokenize("C%12CC%12").unwrap();
        assert!(matches!(tokens[1], Token::Ring { digit: 12, .. }));
    }

    #[test]
    fn ring_digit_takes_pending_bond() {
        let tokens = tokenize("C=1CC=1").unwrap();
        assert!(matches!(
            tokens[1],
            Token::Ring {
                bond: Some(BondSymbol::Double),
                digit: 1,
                ..
            }
        ));
    }

    #[test]
    fn unknown_character() {
        assert!(matches!(
            tokenize("C?C"),
            Err(SmilesError::UnexpectedChar { ch: '?', .. })
        ));
    }

    #[test]
    fn unknown_bracket_element() {
        assert!(matches!(
            tokenize("[Xq]"),
            Err(SmilesError::UnknownElement { .. })
        ));
    }
}
