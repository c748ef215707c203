use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(pub(crate) String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(pub(crate) String);

/// Generates the [`Element`] enum together with its per-element data
/// tables: symbol, atomic mass (u), single-bond covalent radius (Å),
/// and van der Waals radius (Å).
macro_rules! elements {
    ($(($variant:ident, $num:literal, $symbol:literal, $mass:literal, $rcov:literal, $rvdw:literal)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Element {
            $($variant = $num,)*
        }

        impl Element {
            pub fn symbol(&self) -> &'static str {
                match self { $(Element::$variant => $symbol,)* }
            }

            pub fn atomic_mass(&self) -> f64 {
                match self { $(Element::$variant => $mass,)* }
            }

            /// Single-bond covalent radius in Å, used for ideal bond
            /// lengths during 3D embedding.
            pub fn covalent_radius(&self) -> f64 {
                match self { $(Element::$variant => $rcov,)* }
            }

            /// Van der Waals radius in Å, used for sphere sizing and
            /// nonbonded distance floors.
            pub fn vdw_radius(&self) -> f64 {
                match self { $(Element::$variant => $rvdw,)* }
            }
        }

        impl FromStr for Element {
            type Err = ParseElementError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($symbol => Ok(Element::$variant),)*
                    _ => Err(ParseElementError(s.to_string())),
                }
            }
        }
    };
}

elements! {
    (H, 1, "H", 1.008, 0.31, 1.10),
    (He, 2, "He", 4.0026, 0.28, 1.40),
    (Li, 3, "Li", 6.94, 1.28, 1.82),
    (Be, 4, "Be", 9.0122, 0.96, 1.53),
    (B, 5, "B", 10.81, 0.84, 1.92),
    (C, 6, "C", 12.011, 0.76, 1.70),
    (N, 7, "N", 14.007, 0.71, 1.55),
    (O, 8, "O", 15.999, 0.66, 1.52),
    (F, 9, "F", 18.998, 0.57, 1.47),
    (Ne, 10, "Ne", 20.18, 0.58, 1.54),
    (Na, 11, "Na", 22.99, 1.66, 2.27),
    (Mg, 12, "Mg", 24.305, 1.41, 1.73),
    (Al, 13, "Al", 26.982, 1.21, 1.84),
    (Si, 14, "Si", 28.085, 1.11, 2.10),
    (P, 15, "P", 30.974, 1.07, 1.80),
    (S, 16, "S", 32.06, 1.05, 1.80),
    (Cl, 17, "Cl", 35.45, 1.02, 1.75),
    (Ar, 18, "Ar", 39.948, 1.06, 1.88),
    (K, 19, "K", 39.098, 2.03, 2.75),
    (Ca, 20, "Ca", 40.078, 1.76, 2.31),
    (Sc, 21, "Sc", 44.956, 1.70, 2.15),
    (Ti, 22, "Ti", 47.867, 1.60, 2.11),
    (V, 23, "V", 50.942, 1.53, 2.07),
    (Cr, 24, "Cr", 51.996, 1.39, 2.06),
    (Mn, 25, "Mn", 54.938, 1.39, 2.05),
    (Fe, 26, "Fe", 55.845, 1.32, 2.04),
    (Co, 27, "Co", 58.933, 1.26, 2.00),
    (Ni, 28, "Ni", 58.693, 1.24, 1.97),
    (Cu, 29, "Cu", 63.546, 1.32, 1.96),
    (Zn, 30, "Zn", 65.38, 1.22, 2.01),
    (Ga, 31, "Ga", 69.723, 1.22, 1.87),
    (Ge, 32, "Ge", 72.63, 1.20, 2.11),
    (As, 33, "As", 74.922, 1.19, 1.85),
    (Se, 34, "Se", 78.971, 1.20, 1.90),
    (Br, 35, "Br", 79.904, 1.20, 1.85),
    (Kr, 36, "Kr", 83.798, 1.16, 2.02),
    (Rb, 37, "Rb", 85.468, 2.20, 3.03),
    (Sr, 38, "Sr", 87.62, 1.95, 2.49),
    (Y, 39, "Y", 88.906, 1.90, 2.32),
    (Zr, 40, "Zr", 91.224, 1.75, 2.23),
    (Nb, 41, "Nb", 92.906, 1.64, 2.18),
    (Mo, 42, "Mo", 95.96, 1.54, 2.17),
    (Tc, 43, "Tc", 98.0, 1.47, 2.16),
    (Ru, 44, "Ru", 101.07, 1.46, 2.13),
    (Rh, 45, "Rh", 102.91, 1.42, 2.10),
    (Pd, 46, "Pd", 106.42, 1.39, 2.10),
    (Ag, 47, "Ag", 107.87, 1.45, 2.11),
    (Cd, 48, "Cd", 112.41, 1.44, 2.18),
    (In, 49, "In", 114.82, 1.42, 1.93),
    (Sn, 50, "Sn", 118.71, 1.39, 2.17),
    (Sb, 51, "Sb", 121.76, 1.39, 2.06),
    (Te, 52, "Te", 127.6, 1.38, 2.06),
    (I, 53, "I", 126.9, 1.39, 1.98),
    (Xe, 54, "Xe", 131.29, 1.40, 2.16),
    (Cs, 55, "Cs", 132.91, 2.44, 3.43),
    (Ba, 56, "Ba", 137.33, 2.15, 2.68),
    (La, 57, "La", 138.91, 2.07, 2.43),
    (Ce, 58, "Ce", 140.12, 2.04, 2.42),
    (Pr, 59, "Pr", 140.91, 2.03, 2.40),
    (Nd, 60, "Nd", 144.24, 2.01, 2.39),
    (Pm, 61, "Pm", 145.0, 1.99, 2.38),
    (Sm, 62, "Sm", 150.36, 1.98, 2.36),
    (Eu, 63, "Eu", 151.96, 1.98, 2.35),
    (Gd, 64, "Gd", 157.25, 1.96, 2.34),
    (Tb, 65, "Tb", 158.93, 1.94, 2.33),
    (Dy, 66, "Dy", 162.5, 1.92, 2.31),
    (Ho, 67, "Ho", 164.93, 1.92, 2.30),
    (Er, 68, "Er", 167.26, 1.89, 2.29),
    (Tm, 69, "Tm", 168.93, 1.90, 2.27),
    (Yb, 70, "Yb", 173.05, 1.87, 2.26),
    (Lu, 71, "Lu", 174.97, 1.87, 2.24),
    (Hf, 72, "Hf", 178.49, 1.75, 2.23),
    (Ta, 73, "Ta", 180.95, 1.70, 2.22),
    (W, 74, "W", 183.84, 1.62, 2.18),
    (Re, 75, "Re", 186.21, 1.51, 2.16),
    (Os, 76, "Os", 190.23, 1.44, 2.16),
    (Ir, 77, "Ir", 192.22, 1.41, 2.13),
    (Pt, 78, "Pt", 195.08, 1.36, 2.13),
    (Au, 79, "Au", 196.97, 1.36, 2.14),
    (Hg, 80, "Hg", 200.59, 1.32, 2.23),
    (Tl, 81, "Tl", 204.38, 1.45, 1.96),
    (Pb, 82, "Pb", 207.2, 1.46, 2.02),
    (Bi, 83, "Bi", 208.98, 1.48, 2.07),
    (Po, 84, "Po", 209.0, 1.40, 1.97),
    (At, 85, "At", 210.0, 1.50, 2.02),
    (Rn, 86, "Rn", 222.0, 1.50, 2.20),
    (Fr, 87, "Fr", 223.0, 2.60, 3.48),
    (Ra, 88, "Ra", 226.0, 2.21, 2.83),
    (Ac, 89, "Ac", 227.0, 2.15, 2.47),
    (Th, 90, "Th", 232.04, 2.06, 2.45),
    (Pa, 91, "Pa", 231.04, 2.00, 2.43),
    (U, 92, "U", 238.03, 1.96, 2.41),
    (Np, 93, "Np", 237.0, 1.90, 2.39),
    (Pu, 94, "Pu", 244.0, 1.87, 2.43),
    (Am, 95, "Am", 243.0, 1.80, 2.44),
    (Cm, 96, "Cm", 247.0, 1.69, 2.45),
    (Bk, 97, "Bk", 247.0, 1.68, 2.44),
    (Cf, 98, "Cf", 251.0, 1.68, 2.45),
    (Es, 99, "Es", 252.0, 1.65, 2.45),
    (Fm, 100, "Fm", 257.0, 1.67, 2.45),
    (Md, 101, "Md", 258.0, 1.73, 2.46),
    (No, 102, "No", 259.0, 1.76, 2.46),
    (Lr, 103, "Lr", 262.0, 1.61, 2.46),
    (Rf, 104, "Rf", 267.0, 1.57, 2.40),
    (Db, 105, "Db", 270.0, 1.49, 2.40),
    (Sg, 106, "Sg", 271.0, 1.43, 2.40),
    (Bh, 107, "Bh", 270.0, 1.41, 2.40),
    (Hs, 108, "Hs", 277.0, 1.34, 2.40),
    (Mt, 109, "Mt", 276.0, 1.29, 2.40),
    (Ds, 110, "Ds", 281.0, 1.28, 2.40),
    (Rg, 111, "Rg", 280.0, 1.21, 2.40),
    (Cn, 112, "Cn", 285.0, 1.22, 2.40),
    (Nh, 113, "Nh", 284.0, 1.36, 2.40),
    (Fl, 114, "Fl", 289.0, 1.43, 2.40),
    (Mc, 115, "Mc", 288.0, 1.62, 2.40),
    (Lv, 116, "Lv", 293.0, 1.75, 2.40),
    (Ts, 117, "Ts", 294.0, 1.65, 2.40),
    (Og, 118, "Og", 294.0, 1.57, 2.40),
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Standard valences used to infer implicit hydrogen counts for
    /// bare (organic-subset) SMILES atoms. Elements outside the
    /// organic subset never receive implicit hydrogens.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            _ => &[],
        }
    }

    /// True for elements the SMILES organic subset allows without
    /// brackets.
    pub fn in_organic_subset(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Integer bond order as used for valence bookkeeping; aromatic
    /// bonds count as single, with the ring correction applied by the
    /// SMILES builder.
    pub fn integer_value(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    /// CTfile (molfile) bond type code.
    pub fn to_ctfile(&self) -> i32 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }

    pub fn from_ctfile(code: i32) -> Option<Self> {
        match code {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            4 => Some(BondOrder::Aromatic),
            _ => None,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "1" => Ok(BondOrder::Single),
            "double" | "2" => Ok(BondOrder::Double),
            "triple" | "3" => Ok(BondOrder::Triple),
            "aromatic" | "ar" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::Cl);
        assert_eq!(Element::from_str("Fe").unwrap(), Element::Fe);
        assert_eq!(Element::from_str("Og").unwrap(), Element::Og);
    }

    #[test]
    fn element_from_str_rejects_lowercase() {
        let err = Element::from_str("h").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid or unsupported element symbol: 'h'"
        );
    }

    #[test]
    fn element_symbol_display_and_atomic_number() {
        assert_eq!(Element::Na.symbol(), "Na");
        assert_eq!(Element::Na.to_string(), "Na");
        assert_eq!(Element::Na.atomic_number(), 11u8);
        assert_eq!(Element::C.atomic_number(), 6u8);
    }

    #[test]
    fn element_radii_and_masses() {
        assert!(approx_eq(Element::C.atomic_mass(), 12.011, 1e-6));
        assert!(approx_eq(Element::C.covalent_radius(), 0.76, 1e-6));
        assert!(approx_eq(Element::H.covalent_radius(), 0.31, 1e-6));
        assert!(approx_eq(Element::O.vdw_radius(), 1.52, 1e-6));
    }

    #[test]
    fn default_valences() {
        assert_eq!(Element::C.default_valences(), &[4]);
        assert_eq!(Element::N.default_valences(), &[3, 5]);
        assert_eq!(Element::S.default_valences(), &[2, 4, 6]);
        assert!(Element::Fe.default_valences().is_empty());
    }

    #[test]
    fn organic_subset_membership() {
        assert!(Element::C.in_organic_subset());
        assert!(Element::Br.in_organic_subset());
        assert!(!Element::Na.in_organic_subset());
    }

    #[test]
    fn bondorder_from_str_variants() {
        assert_eq!(BondOrder::from_str("single").unwrap(), BondOrder::Single);
        assert_eq!(BondOrder::from_str("2").unwrap(), BondOrder::Double);
        assert_eq!(BondOrder::from_str("AR").unwrap(), BondOrder::Aromatic);
        assert!(BondOrder::from_str("quad").is_err());
    }

    #[test]
    fn bondorder_ctfile_roundtrip() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_ctfile(order.to_ctfile()), Some(order));
        }
        assert_eq!(BondOrder::from_ctfile(9), None);
    }

    #[test]
    fn bondorder_values() {
        assert!(approx_eq(BondOrder::Aromatic.value(), 1.5, 1e-12));
        assert_eq!(BondOrder::Double.integer_value(), 2);
        assert_eq!(BondOrder::Aromatic.integer_value(), 1);
    }
}
