//! Category color assignment
//!
//! Colors are handed out in first-seen order from a fixed palette and never
//! change for the rest of the session, so the same store, product or payment
//! type keeps its color across every chart and across compared periods.

use std::collections::HashMap;

use serde::Serialize;

/// Default bright palette, cycled when exhausted
pub const DEFAULT_PALETTE: [&str; 20] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF",
    "#FF9F40", "#8AC926", "#FF595E", "#1982C4", "#6A4C93",
    "#F94144", "#F3722C", "#F8961E", "#F9C74F", "#90BE6D",
    "#43AA8B", "#577590", "#277DA1", "#EF476F", "#FFD166",
];

/// Session-scoped, append-only category -> color map
#[derive(Debug, Clone, Serialize)]
pub struct ColorRegistry {
    palette: Vec<String>,
    assigned: HashMap<String, usize>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl ColorRegistry {
    /// Create a registry over a palette; an empty palette falls back to the default
    pub fn new(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };

        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Color for a category, assigning the next palette slot on first sight
    pub fn color_for(&mut self, name: &str) -> String {
        let next = self.assigned.len();
        let slot = *self.assigned.entry(name.to_string()).or_insert(next);
        self.palette[slot % self.palette.len()].clone()
    }

    /// Colors for several categories, assigned in the given order
    pub fn colors_for<'a, I>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|n| self.color_for(n)).collect()
    }

    /// Color already assigned to a category, without assigning one
    pub fn peek(&self, name: &str) -> Option<&str> {
        self.assigned
            .get(name)
            .map(|slot| self.palette[slot % self.palette.len()].as_str())
    }

    /// Number of categories seen so far
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Forget every assignment (explicit session reset only)
    pub fn reset(&mut self) {
        self.assigned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut colors = ColorRegistry::default();
        assert_eq!(colors.color_for("Plush"), DEFAULT_PALETTE[0]);
        assert_eq!(colors.color_for("Keychain"), DEFAULT_PALETTE[1]);
        assert_eq!(colors.color_for("Plush"), DEFAULT_PALETTE[0]);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_stable_regardless_of_interleaving() {
        let mut colors = ColorRegistry::default();
        let first = colors.color_for("A");
        colors.colors_for(["B", "C", "D"]);
        let again = colors.color_for("A");
        assert_eq!(first, again);
        assert_eq!(colors.peek("C"), Some(DEFAULT_PALETTE[2]));
        assert_eq!(colors.peek("Z"), None);
    }

    #[test]
    fn test_palette_cycles() {
        let mut colors = ColorRegistry::new(vec!["red".to_string(), "blue".to_string()]);
        assert_eq!(colors.colors_for(["a", "b", "c"]), vec!["red", "blue", "red"]);
        assert_eq!(colors.color_for("b"), "blue");
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut colors = ColorRegistry::new(Vec::new());
        assert_eq!(colors.color_for("x"), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_reset() {
        let mut colors = ColorRegistry::default();
        colors.color_for("A");
        colors.color_for("B");
        colors.reset();
        assert!(colors.is_empty());
        assert_eq!(colors.color_for("B"), DEFAULT_PALETTE[0]);
    }
}
