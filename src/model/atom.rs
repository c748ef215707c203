use super::types::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: [f64; 3],
    /// Formal charge from SMILES bracket notation.
    pub charge: i8,
    /// Isotope mass number, 0 when unspecified.
    pub isotope: u16,
}

impl Atom {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self {
            element,
            position,
            charge: 0,
            isotope: 0,
        }
    }

    pub fn with_charge(element: Element, position: [f64; 3], charge: i8) -> Self {
        Self {
            element,
            position,
            charge,
            isotope: 0,
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}
