//! Named colors for rendering.
//!
//! The palette mirrors the molecular-viewer convention: grays by
//! brightness, the CPK primaries, and a handful of extended names used
//! by the element color map. Unknown names fall back to mid-gray
//! rather than failing, so user templates degrade gracefully.

use std::collections::HashMap;

pub type Rgb = [f64; 3];

pub fn named_color(name: &str) -> Rgb {
    match name.to_lowercase().as_str() {
        "gray10" => [0.10, 0.10, 0.10],
        "gray20" => [0.20, 0.20, 0.20],
        "gray25" => [0.25, 0.25, 0.25],
        "gray30" => [0.30, 0.30, 0.30],
        "gray40" => [0.40, 0.40, 0.40],
        "gray50" | "gray" => [0.50, 0.50, 0.50],
        "gray60" => [0.60, 0.60, 0.60],
        "gray70" => [0.70, 0.70, 0.70],
        "gray80" => [0.80, 0.80, 0.80],
        "gray85" => [0.85, 0.85, 0.85],
        "gray90" => [0.90, 0.90, 0.90],
        "palegreen" => [0.596, 0.984, 0.596],
        "firebrick" => [0.698, 0.133, 0.133],
        "darkorange" => [1.0, 0.549, 0.0],
        "chocolate" => [0.824, 0.412, 0.118],
        "goldenrod" => [0.855, 0.647, 0.125],
        "gold" => [1.0, 0.843, 0.0],
        "white" => [1.0, 1.0, 1.0],
        "black" => [0.0, 0.0, 0.0],
        "red" => [1.0, 0.0, 0.0],
        "green" => [0.0, 1.0, 0.0],
        "blue" => [0.0, 0.0, 1.0],
        "yellow" => [1.0, 1.0, 0.0],
        "cyan" => [0.0, 1.0, 1.0],
        "magenta" => [1.0, 0.0, 1.0],
        "orange" => [1.0, 0.647, 0.0],
        "purple" => [0.627, 0.125, 0.941],
        "pink" => [1.0, 0.753, 0.796],
        "brown" => [0.647, 0.165, 0.165],
        "slate" => [0.439, 0.502, 0.565],
        "salmon" => [0.980, 0.502, 0.447],
        "violet" => [0.933, 0.510, 0.933],
        "forest" => [0.133, 0.545, 0.133],
        _ => [0.5, 0.5, 0.5],
    }
}

/// CPK-based element color names, adjusted for contrast on light
/// backgrounds. Elements outside the map render mid-gray.
pub fn default_element_colors() -> HashMap<String, String> {
    let entries: &[(&str, &str)] = &[
        ("C", "gray25"),
        ("H", "gray85"),
        ("N", "blue"),
        ("O", "red"),
        ("S", "yellow"),
        ("P", "orange"),
        ("F", "palegreen"),
        ("Cl", "green"),
        ("Br", "firebrick"),
        ("I", "purple"),
        ("Li", "violet"),
        ("Na", "slate"),
        ("K", "violet"),
        ("Mg", "forest"),
        ("Ca", "forest"),
        ("Fe", "darkorange"),
        ("Cu", "chocolate"),
        ("Zn", "brown"),
        ("Ni", "forest"),
        ("Co", "salmon"),
        ("Mn", "violet"),
        ("Cr", "gray50"),
        ("Pd", "forest"),
        ("Pt", "gray50"),
        ("Au", "gold"),
        ("Ag", "gray70"),
        ("B", "salmon"),
        ("Si", "goldenrod"),
        ("Se", "orange"),
        ("As", "violet"),
        ("He", "cyan"),
        ("Ne", "cyan"),
        ("Ar", "cyan"),
        ("Kr", "cyan"),
        ("Xe", "cyan"),
    ];
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(named_color("white"), [1.0, 1.0, 1.0]);
        assert_eq!(named_color("gray25"), [0.25, 0.25, 0.25]);
        assert_eq!(named_color("Forest"), [0.133, 0.545, 0.133]);
    }

    #[test]
    fn unknown_names_fall_back_to_gray() {
        assert_eq!(named_color("definitely-not-a-color"), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn default_map_covers_organic_elements() {
        let map = default_element_colors();
        for symbol in ["C", "H", "N", "O", "S", "P", "F", "Cl", "Br", "I"] {
            assert!(map.contains_key(symbol), "missing {symbol}");
        }
    }
}
