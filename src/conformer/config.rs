use std::fmt;
use std::str::FromStr;

/// Force-field parameter set used for geometry relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceField {
    #[default]
    Mmff94,
    Uff,
}

impl fmt::Display for ForceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceField::Mmff94 => write!(f, "MMFF94"),
            ForceField::Uff => write!(f, "UFF"),
        }
    }
}

impl FromStr for ForceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mmff94" | "mmff" => Ok(ForceField::Mmff94),
            "uff" => Ok(ForceField::Uff),
            _ => Err(format!("unknown force field: '{s}' (use MMFF94 or UFF)")),
        }
    }
}

/// Settings for conformer embedding and optimization.
#[derive(Debug, Clone)]
pub struct ConformerConfig {
    /// Seed for the embedding jitter; conformer `c` uses `seed + c`.
    pub seed: u64,
    /// Maximum minimization iterations per conformer.
    pub max_iterations: usize,
    /// Gradient infinity-norm below which minimization stops early
    /// (kcal/mol/Å).
    pub grad_tolerance: f64,
    /// Number of conformers to embed; the lowest-energy survivor is
    /// kept.
    pub num_conformers: usize,
    /// Heavy-atom RMSD below which two conformers count as duplicates
    /// (Å).
    pub prune_rms_threshold: f64,
    pub force_field: ForceField,
}

impl Default for ConformerConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            max_iterations: 200,
            grad_tolerance: 1e-3,
            num_conformers: 1,
            prune_rms_threshold: 0.5,
            force_field: ForceField::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_field_parsing() {
        assert_eq!("MMFF94".parse::<ForceField>().unwrap(), ForceField::Mmff94);
        assert_eq!("mmff".parse::<ForceField>().unwrap(), ForceField::Mmff94);
        assert_eq!("uff".parse::<ForceField>().unwrap(), ForceField::Uff);
        assert!("amber".parse::<ForceField>().is_err());
    }

    #[test]
    fn default_config() {
        let config = ConformerConfig::default();
        assert_eq!(config.seed, 1);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.num_conformers, 1);
        assert_eq!(config.force_field, ForceField::Mmff94);
    }
}
